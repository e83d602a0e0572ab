use clap::{Parser, Subcommand};

mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "melascope",
    version,
    about = "Melascope DX CLI: risk profiles and safety-constrained advisories for skin-lesion classifier results"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "MELASCOPE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health and execution mode
    Health,
    /// Compute the risk profile locally (no API call)
    Profile {
        /// Classifier label (e.g. "Melanoma")
        #[arg(long)]
        label: String,
        /// Classifier confidence in [0, 1]
        #[arg(long)]
        confidence: f64,
    },
    /// Print the precedence-ordered risk rule table
    Rules,
    /// Request a structured advisory from the API
    Advisory {
        #[arg(long)]
        label: String,
        #[arg(long)]
        confidence: f64,
    },
    /// Ask a follow-up question about a classified lesion
    Chat {
        #[arg(long)]
        label: String,
        #[arg(long)]
        confidence: f64,
        /// JSON file with prior turns (use '-' for stdin)
        #[arg(long)]
        history_file: Option<String>,
        /// The new user question
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Profile { label, confidence } => commands::profile::run(&label, confidence),
        Commands::Rules => commands::profile::rules(),
        Commands::Advisory { label, confidence } => {
            commands::advisory::advisory(&cli.api_url, &label, confidence).await
        }
        Commands::Chat {
            label,
            confidence,
            history_file,
            message,
        } => {
            commands::advisory::chat(
                &cli.api_url,
                &label,
                confidence,
                history_file.as_deref(),
                &message,
            )
            .await
        }
    };

    std::process::exit(code);
}
