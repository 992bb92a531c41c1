//! SimQuake uploader CLI.
//!
//! Generates synthetic earthquake events on an interval and pushes the
//! JSON feed file to a git remote for the Pages dashboard.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simquake_core::ScenarioId;
use simquake_uploader::{Publisher, PushMode, Scheduler, SleepPolicy, UploaderConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Synthetic earthquake feed uploader
#[derive(Parser, Debug)]
#[command(name = "simquake-uploader")]
#[command(about = "Generate synthetic quake events and push them to a feed repository", long_about = None)]
struct Args {
    /// Feed file path
    #[arg(short, long, default_value = "dist/quake.json")]
    out: PathBuf,

    /// Seconds between updates
    #[arg(short, long, default_value = "60")]
    interval: u64,

    /// Newest events retained in the feed
    #[arg(short, long, default_value = "120")]
    keep: usize,

    /// Branch to push to
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Remote for ambient-credential pushes
    #[arg(long, default_value = "origin")]
    remote: String,

    /// Significance acceptance threshold
    #[arg(short, long, default_value = "230.0")]
    target: f64,

    /// Sampler retry budget before the fallback event
    #[arg(long, default_value = "12")]
    max_tries: u32,

    /// Probability that a cycle forces the tsunami-prone scenario
    #[arg(long, default_value = "0.33")]
    tsunami_ratio: f64,

    /// Force a scenario (inland, andaman, far_big)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Generate one event and exit
    #[arg(long)]
    once: bool,

    /// Push with https://<GITHUB_TOKEN>@github.com/<GITHUB_REPO>.git
    #[arg(long)]
    token_push: bool,

    /// Sleep policy between cycles (fixed, drift, random)
    #[arg(long, default_value = "drift")]
    sleep_policy: String,

    /// Lower bound in seconds for the random sleep policy
    #[arg(long, default_value = "30")]
    min_sleep: u64,

    /// Upper bound in seconds for the random sleep policy
    #[arg(long, default_value = "90")]
    max_sleep: u64,

    /// Master seed for the RNG (0 = derive from time)
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Parse scenario override
    let scenario = args.scenario.as_deref().map(|s| {
        s.parse::<ScenarioId>().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: inland, andaman, far_big");
            std::process::exit(1);
        })
    });

    let interval = Duration::from_secs(args.interval);
    let sleep = match args.sleep_policy.as_str() {
        "fixed" => SleepPolicy::Fixed(interval),
        "drift" => SleepPolicy::DriftCorrected(interval),
        "random" => SleepPolicy::RandomRange {
            min: Duration::from_secs(args.min_sleep),
            max: Duration::from_secs(args.max_sleep),
        },
        other => {
            eprintln!("Error: unknown sleep policy: {}", other);
            eprintln!("Available policies: fixed, drift, random");
            std::process::exit(1);
        }
    };

    // Token credentials are resolved once, up front: a missing variable
    // must stop the process before the loop starts, not on the first push.
    let push = if args.token_push {
        match PushMode::token_from_env(args.branch.clone()) {
            Ok(mode) => mode,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        }
    } else {
        PushMode::Ambient {
            remote: args.remote.clone(),
            branch: args.branch.clone(),
        }
    };

    // Determine master seed
    let master_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    } else {
        args.seed
    };
    let rng = ChaCha8Rng::seed_from_u64(master_seed);

    let config = UploaderConfig {
        output_path: args.out,
        keep: args.keep,
        target: args.target,
        max_tries: args.max_tries,
        tsunami_ratio: args.tsunami_ratio,
        scenario,
        once: args.once,
        sleep,
        push,
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        error!("Failed to install interrupt handler: {e}");
        std::process::exit(1);
    }

    info!("🚀 SimQuake uploader started (seed={})", master_seed);
    info!(
        "   feed={} keep={} target={} interval={}s",
        config.output_path.display(),
        config.keep,
        config.target,
        args.interval,
    );

    let publisher = Publisher::new(".", config.push.clone());
    let mut scheduler = Scheduler::new(config, publisher, rng, shutdown);
    let cycles = scheduler.run();

    info!("👋 stopped after {} cycle(s)", cycles);
}
