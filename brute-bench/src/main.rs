use std::path::PathBuf;

use brute_bench::{
    ConsoleProgress, Error, ExperimentConfig, Overrides, analyze, analyze_checked, read_report,
    write_report,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "brute-bench")]
#[command(about = "Time exhaustive searches for random secrets over growing keyspaces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured test groups and write a JSON report
    Run(RunArgs),

    /// Verify a report's digests and print the observed and predicted means
    Analyze {
        /// Report written by `run`
        report: PathBuf,

        /// Only analyze this group
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON experiment config (defaults to $BRUTE_BENCH_CONFIG, then the reference run)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the report
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// Only run the named group (repeatable)
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Override the number of trials per length for every group
    #[arg(long)]
    trials: Option<usize>,

    /// Cap the maximum length of every group
    #[arg(long)]
    max_length: Option<usize>,

    /// Seed for secret generation
    #[arg(long)]
    seed: Option<u64>,

    /// Abandon a trial whose scan takes longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<f64>,

    /// Stream candidates instead of materializing each keyspace
    #[arg(long)]
    streaming: bool,

    /// Largest keyspace to materialize (0 disables the ceiling)
    #[arg(long)]
    materialize_limit: Option<u64>,

    /// Skip the rest of a failing group instead of aborting the run
    #[arg(long)]
    keep_going: bool,

    /// Disable progress bar
    #[arg(long)]
    no_progress: bool,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            groups: self.groups.clone(),
            trials: self.trials,
            max_length: self.max_length,
            seed: self.seed,
            timeout_secs: self.timeout_secs,
            materialize_limit: self.materialize_limit,
            streaming: self.streaming,
            keep_going: self.keep_going,
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Analyze { report, group } => analyze_report(&report, group.as_deref()),
    }
}

fn run(args: RunArgs) -> Result<(), Error> {
    let mut config = ExperimentConfig::load(args.config.as_deref())?;
    config.apply(&args.overrides())?;

    // Fail before hours of trials rather than after.
    if args.output.exists() && !args.force {
        return Err(Error::FileExists { path: args.output.clone() });
    }

    tracing::info!(
        groups = config.groups.len(),
        seed = ?config.seed,
        streaming = config.streaming,
        "Starting experiment"
    );

    let mut experiment = config.experiment()?;
    let mut progress = ConsoleProgress::new(!args.no_progress);
    let report = experiment.run(|event| progress.handle(event))?;
    drop(progress);

    if let Err(e) = write_report(&args.output, &report, args.force) {
        // The results are still in memory; dump them rather than lose the run.
        tracing::error!(error = %e, "Writing the report failed, printing it to stdout instead");
        let json = brute_bench::to_json(&report)?;
        println!("{}", String::from_utf8_lossy(&json));
        return Err(e);
    }
    tracing::info!(path = %args.output.display(), "Report written");

    print!("{}", analyze(&report, None).render());
    Ok(())
}

#[tracing::instrument(skip_all, fields(report = %path.display()))]
fn analyze_report(path: &std::path::Path, group: Option<&str>) -> Result<(), Error> {
    let report = read_report(path)?;
    let analysis = analyze_checked(&report, group)?;
    print!("{}", analysis.render());
    analysis.ensure_clean()
}
