/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `serve`   — Run the Pinterest publish proxy
- `pins`    — Draft generation, editing, scheduling and the dashboard views
- `publish` — Run the publish orchestrator for one pin
- `account` — Connect, disconnect and list boards

Handlers are small and delegate to the library components: storage,
providers, the proxy client and the orchestrator.
*/

pub mod account;
pub mod pins;
pub mod publish;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{KeyValueBackend, SqliteStorage};
use std::sync::Arc;

/// Open the configured storage backend
///
/// Uses `storage.path` when set, otherwise the default database location.
pub fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueBackend>> {
    let storage = match config.storage.path.as_deref() {
        Some(path) => SqliteStorage::new_with_path(path)?,
        None => SqliteStorage::new()?,
    };
    tracing::debug!("Using storage at {}", storage.path().display());
    Ok(Arc::new(storage))
}

/// Shorten `text` to at most `max` characters for table output
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

// Proxy command handler
pub mod serve {
    //! Runs the publish proxy until interrupted.

    use super::*;
    use crate::error::PinforgeError;
    use std::net::SocketAddr;

    /// Start the proxy on `addr`, or on `proxy.listen_addr` when unset
    pub async fn run_serve(config: Config, addr: Option<String>) -> Result<()> {
        let addr_text = addr.unwrap_or_else(|| config.proxy.listen_addr.clone());
        let addr: SocketAddr = addr_text.parse().map_err(|e| {
            PinforgeError::Config(format!("Invalid listen address '{}': {}", addr_text, e))
        })?;

        crate::proxy::serve(&config, addr).await
    }
}
