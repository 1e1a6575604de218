use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use unifi_advisor::advisor::backend::OpenAiBackend;
use unifi_advisor::advisor::{prompt, AdvisorSession};
use unifi_advisor::artifact::{self, Artifact};
use unifi_advisor::collector::Collector;
use unifi_advisor::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "unifi-advisor",
    about = "UniFi network data collector and optimization advisor"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Validate config and exit
    #[arg(long)]
    check: bool,

    /// Collect data and exit without starting the advisor session
    #[arg(long)]
    collect_only: bool,

    /// Print version and exit
    #[arg(short, long)]
    version: bool,
}

#[tokio::main(worker_threads = 2)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("unifi-advisor {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = Config::load(&cli.config)?;

    if cli.check {
        println!("Configuration is valid.");
        return Ok(());
    }

    // Initialize logging
    init_logging(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        controller = %config.controller.url,
        site = %config.controller.site,
        "Starting UniFi advisor"
    );

    if let Err(e) = run(config, cli.collect_only).await {
        error!(error = %e, "Run terminated with error");
        return Err(e);
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.agent.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    Ok(())
}

async fn run(config: Config, collect_only: bool) -> Result<()> {
    let out_dir = Path::new(&config.agent.output_dir);

    // One full collection pass: authenticate, then fetch and persist the
    // seven artifacts. Any failure here aborts before the advisor starts.
    let collector = Collector::connect(&config.controller).await?;
    collector.collect_all(out_dir).await?;

    if collect_only {
        info!("Collection finished, advisor disabled");
        return Ok(());
    }

    let backend = OpenAiBackend::new(&config.advisor)?;
    let mut session = AdvisorSession::new(Box::new(backend));

    info!(model = %config.advisor.model, "Starting analysis session");
    let reply = session.send(prompt::ANALYSIS_PROMPT).await?;
    println!("\n{}", reply);

    // Deliver the snapshot one artifact per message, as announced in the
    // analysis prompt.
    for input in Artifact::ADVISOR_INPUTS {
        let value = artifact::read(out_dir, input).await?;
        let message = prompt::data_message(input.filename(), &value)?;
        let reply = session.send(&message).await?;
        println!("\nResponse after sending {}:\n{}", input.filename(), reply);
    }

    // Follow-up Q&A loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nAsk a follow-up question (type 'exit' to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = session.send(question).await?;
        println!("\n{}", reply);
    }

    info!("Analysis session ended");
    Ok(())
}
