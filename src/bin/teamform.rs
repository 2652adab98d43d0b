//! Forms balanced groups from a roster CSV and prints the report.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use u_teamform::balance::BalanceConfig;
use u_teamform::formation::{BalancedStrategy, FormationConfig};
use u_teamform::report::Reporter;
use u_teamform::roster::{self, RosterError};
use u_teamform::FormationError;

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Roster read or write failure
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// Rejected formation request
    #[error(transparent)]
    Formation(#[from] FormationError),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Roster CSV (id,name,email,game,skill,role,score[,type])
    #[arg(short, long)]
    input: PathBuf,

    /// Members per group
    #[arg(short, long, default_value_t = 4)]
    group_size: usize,

    /// RNG seed; a random seed is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the assignment CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cap on skill-balancing iterations
    #[arg(long, default_value_t = 10)]
    max_skill_iterations: usize,
}

fn main() -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .try_init();

    let args = Args::parse();

    let pool = roster::load_candidates(&args.input)?;
    info!(candidates = pool.len(), input = %args.input.display(), "roster loaded");

    let mut config = FormationConfig::default().with_balance(
        BalanceConfig::default().with_max_skill_iterations(args.max_skill_iterations),
    );
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let strategy = BalancedStrategy::new(config);
    let run = strategy.run(&pool, args.group_size)?;
    info!(seed = run.seed, "rerun with --seed to reproduce");

    let report = Reporter::new(strategy.config().rules.clone()).report(&pool, &run.assignment);
    println!("{report}");

    if let Some(output) = &args.output {
        roster::save_assignment(output, &pool, &run.assignment)?;
        info!(output = %output.display(), "assignment saved");
    }

    Ok(())
}
