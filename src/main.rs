use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info, warn};

use lucid_trace::analysis::client::HttpAnalysisService;
use lucid_trace::config::Config;
use lucid_trace::controller::UploadController;
use lucid_trace::media::{SelectedFile, ACCEPT_HINT};
use lucid_trace::output::terminal;

/// Lucid TRACE: check media evidence for AI generation and deepfakes.
///
/// Uploads a video or image to the analysis service and shows its verdict.
#[derive(Parser)]
#[command(name = "lucid-trace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload media files for analysis, one request per file
    Analyze {
        /// Video or image files to analyze, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also show the external review panel when the service provides one
        #[arg(long)]
        reveal: bool,

        /// Print the parsed result as JSON instead of the formatted report
        #[arg(long)]
        json: bool,
    },

    /// Print the SHA-256 fingerprint of a file (for chain of custody)
    Hash {
        file: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lucid_trace=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            reveal,
            json,
        } => {
            let config = Config::load()?;
            let service = HttpAnalysisService::from_config(&config)?;
            info!(endpoint = service.endpoint(), "Using analysis service");

            // Best effort; the upload flow never waits on it.
            let decoration = lucid_trace::decoration::from_url(config.decoration_url.as_deref());
            decoration.start();

            let mut controller =
                UploadController::new(Arc::new(service), Arc::new(terminal::TerminalNotifier));

            let total = files.len();
            let mut failed = 0usize;

            for path in &files {
                let file = match SelectedFile::from_path(path).await {
                    Ok(file) => file,
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable file");
                        println!("  {} {e:#}", "Skipped:".yellow());
                        failed += 1;
                        continue;
                    }
                };

                if !file.matches_accept_hint() {
                    println!(
                        "  {} {} is not a recognised image or video ({ACCEPT_HINT}); uploading anyway.",
                        "Note:".yellow(),
                        file.name
                    );
                }

                let name = file.name.clone();
                controller.select_file(file);

                let spinner = (!json).then(|| terminal::loading_spinner(&name));
                let outcome = controller.submit().await;
                if let Some(spinner) = spinner {
                    spinner.finish_and_clear();
                }

                if outcome.is_err() {
                    // Already reported through the notifier.
                    failed += 1;
                    continue;
                }

                if reveal {
                    controller.reveal_secondary_analysis();
                }

                if json {
                    if let Some(result) = controller.result() {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                } else if let Some(view) = controller.view() {
                    terminal::display_result(&name, &view);
                }
            }

            match decoration.loaded() {
                Some(asset) => debug!(bytes = asset.len(), "Decoration asset ready"),
                None => debug!("Decoration asset not loaded"),
            }

            if failed > 0 {
                anyhow::bail!("{failed} of {total} analyses failed");
            }
        }

        Commands::Hash { file } => {
            let digest = lucid_trace::media::sha256_file(&file).await?;
            println!("{}  {}", digest, file.display());
        }

        Commands::Config => {
            let config = Config::load()?;
            println!("Service URL:    {}", config.service_base_url);
            println!("Analyze URL:    {}", config.analyze_url());
            println!(
                "Decoration:     {}",
                config.decoration_url.as_deref().unwrap_or("none")
            );
            if let Err(e) = config.require_service() {
                println!("\n{} {e}", "Warning:".yellow());
            }
        }
    }

    Ok(())
}
