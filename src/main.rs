//! Pinforge - Pinterest pin drafting and publishing CLI
//!
#![doc = "Pinforge - Pinterest pin drafting and publishing CLI"]
#![doc = "Main entry point for the Pinforge application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pinforge::cli::{Cli, Commands};
use pinforge::commands;
use pinforge::config::Config;
use pinforge::generator::PinEdit;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { addr } => {
            tracing::info!("Starting Pinterest proxy");
            commands::serve::run_serve(config, addr).await
        }
        Commands::Generate {
            title,
            summary,
            url,
            board,
        } => {
            tracing::debug!("Generating drafts for '{}'", title);
            commands::pins::run_generate(config, title, summary, url, board).await
        }
        Commands::Image { id } => commands::pins::run_image(config, id).await,
        Commands::Edit {
            id,
            title,
            description,
            alt_text,
            tags,
            link,
            board,
        } => {
            let edit = PinEdit {
                title,
                description,
                alt_text,
                tags,
                destination_link: link,
                board_name: board,
            };
            commands::pins::run_edit(config, id, edit)
        }
        Commands::Schedule { id, date } => commands::pins::run_schedule(config, id, date),
        Commands::Publish { id } => {
            tracing::info!("Publishing pin {}", id);
            commands::publish::run_publish(config, id).await
        }
        Commands::List { status } => commands::pins::run_list(config, status),
        Commands::Upcoming { limit } => commands::pins::run_upcoming(config, limit),
        Commands::Connect {
            username,
            token,
            board_id,
        } => commands::account::run_connect(config, username, token, board_id).await,
        Commands::Disconnect => commands::account::run_disconnect(config),
        Commands::Boards => commands::account::run_boards(config).await,
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "pinforge=debug"
    } else {
        "pinforge=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
