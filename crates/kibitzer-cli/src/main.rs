use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kibitzer_cli::commands::{analyze, classify, encode, serve, stats};
use kibitzer_cli::config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kibitzer")]
#[command(author, version, about = "Chess position analysis and move-quality commentary", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the FEN for a JSON list of pieces
    Encode { input: PathBuf },
    /// Classify an evaluation given in pawns from white's side
    Classify {
        #[arg(allow_negative_numbers = true)]
        evaluation: f64,
        #[arg(long)]
        pieces: Option<usize>,
        #[arg(long)]
        pawns: Option<usize>,
    },
    /// Evaluate a position with the engine and classify the result
    Analyze {
        #[arg(required_unless_present = "fen")]
        input: Option<PathBuf>,
        #[arg(long, conflicts_with = "input")]
        fen: Option<String>,
        #[arg(short, long)]
        depth: Option<u8>,
    },
    /// Aggregate move-quality statistics over a JSON move list
    Stats {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Answer JSON-lines requests on stdin/stdout
    Serve,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode { input } => encode::execute(&input)?,
        Commands::Classify {
            evaluation,
            pieces,
            pawns,
        } => classify::execute(evaluation, pieces, pawns)?,
        Commands::Analyze { input, fen, depth } => {
            analyze::execute(&config, input.as_deref(), fen.as_deref(), depth).await?
        }
        Commands::Stats { input, json } => stats::execute(&input, json)?,
        Commands::Serve => serve::execute(&config).await?,
    }
    Ok(())
}
