use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use number_prefix::NumberPrefix;
use twenty_fourty_eight_expectimax::{
    board::Grid,
    game::solve_with,
    search::{
        Corner, DepthThresholds, Expectimax, HeuristicConfig, HeuristicWeights, SearchConfig,
    },
};

/// 2048 expectimax solver (configurable start)
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 16 comma/semicolon-separated ints (row-major)
    #[arg(long)]
    start: Option<String>,

    /// JSON file with [[...4],[...4],[...4],[...4]]; takes precedence over --start
    #[arg(long)]
    start_file: Option<PathBuf>,

    /// Preferred corner for the monotonic gradient (TL, TR, BL, BR)
    #[arg(long, default_value_t = Corner::BottomLeft)]
    corner: Corner,

    /// RNG seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 5000)]
    max_steps: usize,

    #[arg(long, default_value_t = HeuristicWeights::default().empty)]
    w_empty: f64,

    #[arg(long, default_value_t = HeuristicWeights::default().monotonicity)]
    w_mono: f64,

    #[arg(long, default_value_t = HeuristicWeights::default().smoothness)]
    w_smooth: f64,

    #[arg(long, default_value_t = HeuristicWeights::default().max_on_corner)]
    w_corner: f64,

    #[arg(long, default_value_t = SearchConfig::default().depth_base, allow_negative_numbers = true)]
    depth_base: i32,

    #[arg(long, default_value_t = SearchConfig::default().depth_bonus, allow_negative_numbers = true)]
    depth_bonus_empty: i32,

    /// Empty-cell thresholds (a,b): half the bonus depth from a empties, all of it from b
    #[arg(long, default_value_t = DepthThresholds::default())]
    depth_thresh: DepthThresholds,

    /// Ignore spawn outcomes whose probability is below this
    #[arg(long, default_value_t = SearchConfig::default().prune_prob, allow_negative_numbers = true)]
    prune_prob: f64,

    /// Show a spinner with the running move count and score
    #[arg(long)]
    progress: bool,
}

impl Args {
    fn start_board(&self) -> anyhow::Result<Option<Grid>> {
        if let Some(path) = &self.start_file {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading start file {}", path.display()))?;
            let grid = Grid::from_json(&json)
                .with_context(|| format!("parsing start file {}", path.display()))?;

            return Ok(Some(grid));
        }

        self.start
            .as_deref()
            .map(|start| start.parse().context("parsing --start"))
            .transpose()
    }

    fn engine(&self) -> Expectimax {
        let heuristic = HeuristicConfig {
            weights: HeuristicWeights {
                empty: self.w_empty,
                monotonicity: self.w_mono,
                smoothness: self.w_smooth,
                max_on_corner: self.w_corner,
            },
            corner: self.corner,
        };

        let search = SearchConfig {
            depth_base: self.depth_base,
            depth_bonus: self.depth_bonus_empty,
            thresholds: self.depth_thresh,
            prune_prob: self.prune_prob,
        };

        Expectimax::new(heuristic, search)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{args:?}");

    let start = args.start_board()?;
    let mut engine = args.engine();

    let progress = if args.progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} [{elapsed}] {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut nodes = 0;
    let outcome = solve_with(
        &mut engine,
        start,
        args.seed,
        args.max_steps,
        |game, engine| {
            nodes += engine.last_stats().nodes;
            progress.set_message(format!(
                "moves: {}, score: {}, nodes: {}",
                game.moves().len(),
                game.score(),
                human(nodes)
            ));
        },
    );

    progress.finish_and_clear();
    log::info!("Searched {} nodes", human(nodes));

    println!("Final board:");
    println!("{}", outcome.grid);
    println!("Final score: {}", outcome.score);
    println!("Moves made: {}", outcome.moves.len());

    Ok(())
}

fn human(n: u64) -> String {
    match NumberPrefix::decimal(n as f64) {
        NumberPrefix::Standalone(n) => format!("{n}"),
        NumberPrefix::Prefixed(prefix, n) => format!("{n:.1}{prefix}"),
    }
}
