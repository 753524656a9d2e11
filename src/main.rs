//! Homeguard CLI - drive the security panel core from a terminal.
//!
//! This is the main binary entry point. See the `homeguard` library for
//! the core functionality.

use anyhow::Result;
use clap::{Parser, Subcommand};
use homeguard::commands::{self, RegisterOptions};
use homeguard::notifications::{init_presentation, NotificationPresentation};
use homeguard::Config;
use mimalloc::MiMalloc;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// CLI
#[derive(Parser)]
#[command(name = "homeguard")]
#[command(version)]
#[command(about = "Home security panel: PIN arming and push notification registration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay keypad presses (digits, '<' delete, '#' submit) and print the panel
    Keypad {
        /// Key sequence, e.g. "1234#"
        keys: String,
    },
    /// Register a push token with the configured registration endpoint
    Register {
        /// User to register the token for (defaults to config user_id)
        #[arg(long)]
        user_id: Option<String>,
        /// Push token to submit (defaults to a generated one)
        #[arg(long)]
        token: Option<String>,
        /// Act as a simulated host
        #[arg(long)]
        simulator: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Set up logging. `HOMEGUARD_LOG_FILE` redirects output to a file.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_secs();

    if let Ok(path) = std::env::var("HOMEGUARD_LOG_FILE") {
        match std::fs::File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Warning: could not open log file {path}: {e}"),
        }
    }

    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    if init_presentation(NotificationPresentation::default()).is_err() {
        log::warn!("Notification presentation policy was already set");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Keypad { keys } => {
            commands::keypad::run(&keys)?;
        }
        Commands::Register {
            user_id,
            token,
            simulator,
        } => {
            let config = Config::load()?;
            commands::register::run(
                &config,
                RegisterOptions {
                    user_id,
                    token,
                    simulator,
                },
            )
            .await?;
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
