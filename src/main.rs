use std::sync::Arc;

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatsense::application::{DEFAULT_COMBINED_THRESHOLD, DEFAULT_MAX_BATCH_SIZE};
use chatsense::connector::adapter::DEFAULT_TIMEOUT_SECS;
use chatsense::connector::api::DEFAULT_MAX_MESSAGE_CHARS;
use chatsense::{serve, Commands, Container, ContainerConfig, DispatchPolicy, Router};

#[derive(Parser)]
#[command(name = "chatsense")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the offline keyword-based model instead of Groq
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Batches up to this size are analyzed with one combined prompt
    #[arg(long, global = true, default_value_t = DEFAULT_COMBINED_THRESHOLD)]
    combined_threshold: usize,

    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BATCH_SIZE, value_parser = at_least_one())]
    max_batch: usize,

    #[arg(long, global = true, default_value_t = DEFAULT_MAX_MESSAGE_CHARS, value_parser = at_least_one())]
    max_chars: usize,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ContainerConfig {
        mock_llm: cli.mock_llm,
        timeout_secs: cli.timeout_secs,
        policy: DispatchPolicy {
            combined_threshold: cli.combined_threshold,
            max_batch_size: cli.max_batch,
        },
        max_message_chars: cli.max_chars,
    };
    let container = Container::new(config)?;

    if let Commands::Serve { host, port } = &cli.command {
        let addr = format!("{}:{}", host, port);
        return serve(Arc::new(container), &addr).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
