//! Publish command

use super::open_storage;
use crate::config::Config;
use crate::error::{PinforgeError, Result};
use crate::proxy::ProxyClient;
use crate::publish::{
    ConsoleNotifier, PublishOrchestrator, PublishOutcome, SystemDesktop, TokioDelay,
};
use crate::storage::{PinRepository, UserStore};

use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

/// Publish one pin through the API, falling back to the manual path
pub async fn run_publish(config: Config, id: String) -> Result<()> {
    let backend = open_storage(&config)?;
    let repo = Arc::new(PinRepository::new(backend.clone()));
    let user = UserStore::new(backend).load();

    // The proxy makes three upstream calls per pin.
    let proxy = ProxyClient::new(
        config.proxy.endpoint.clone(),
        Duration::from_secs(config.pinterest.timeout_seconds * 3),
    )?;

    let orchestrator = PublishOrchestrator::new(
        repo,
        Arc::new(proxy),
        Arc::new(ConsoleNotifier),
        Arc::new(SystemDesktop::from_config(
            config.publish.download_dir.as_deref(),
        )),
        Arc::new(TokioDelay),
        config.publish.clone(),
    );

    match orchestrator.publish(&id, user.as_ref()).await {
        Ok(PublishOutcome::Api) => Ok(()),
        Ok(PublishOutcome::ManualFallback) => {
            println!("Paste the copied text into the pin builder.");
            Ok(())
        }
        Ok(PublishOutcome::Manual) => {
            println!(
                "Paste the copied text into the pin builder. Run {} to publish through the API.",
                "pinforge connect".cyan()
            );
            Ok(())
        }
        Err(e) => match e.downcast_ref::<PinforgeError>() {
            // Already reported through the notifier
            Some(PinforgeError::MissingImage) => {
                println!("Run {} first.", format!("pinforge image {}", id).cyan());
                Err(e)
            }
            _ => Err(e),
        },
    }
}
