use anyhow::Result;
use clap::Parser;
use license_calc::analyzer::LicenseAnalyzer;
use license_calc::config::Config;
use license_calc::logging::init_logging;
use license_calc::models::IdentityStrategy;
use license_calc::parser::CsvFileSource;
use license_calc::reports::OutputFormat;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "license-calc")]
#[command(about = "Calculate the minimum number of license copies an application needs")]
#[command(version)]
struct Cli {
    /// Ledger CSV file (ComputerID,UserID,ApplicationID,ComputerType,Comment)
    input: PathBuf,

    /// Application to calculate copies for
    #[arg(short, long)]
    app_id: Option<String>,

    /// Number of workers draining the queue
    #[arg(short, long)]
    workers: Option<usize>,

    /// Number of partitions the input is split into
    #[arg(short, long)]
    partitions: Option<usize>,

    /// Capacity of the chunk queue between parsers and workers
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Columns identifying a duplicate row: composite or device
    #[arg(long)]
    identity: Option<IdentityStrategy>,

    /// Configuration file to use instead of the default search path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Print only the number of copies
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.quiet {
            OutputFormat::Count
        } else {
            OutputFormat::Text
        }
    }

    fn apply_to(&self, config: &mut Config) {
        if let Some(app_id) = &self.app_id {
            config.processing.application_id = app_id.clone();
        }
        if let Some(workers) = self.workers {
            config.processing.worker_count = workers;
        }
        if let Some(partitions) = self.partitions {
            config.processing.partition_count = partitions;
        }
        if let Some(capacity) = self.queue_capacity {
            config.processing.queue_capacity = capacity;
        }
        if let Some(identity) = self.identity {
            config.dedup.identity = identity;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => handle_error(e, json),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_with(Some(path))?,
        None => Config::load()?,
    };
    cli.apply_to(&mut config);
    config.validate()?;

    let _log_guard = init_logging(&config.logging, &config.paths.log_directory)?;

    let analyzer = LicenseAnalyzer::new(config);
    analyzer
        .run_command(CsvFileSource::new(&cli.input), cli.output_format())
        .await?;

    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
