//! Side effects the publish orchestrator depends on
//!
//! Each effect sits behind a trait so the orchestrator can be exercised
//! without a network, a desktop session or real timers.

use crate::error::{PinforgeError, Result};
use crate::pinterest::PinData;
use crate::proxy::ProxyClient;

use async_trait::async_trait;
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sends a pin to Pinterest through the API path
#[async_trait]
pub trait PinPublisher: Send + Sync {
    /// Create the pin; returns the created pin object
    async fn create_pin(&self, access_token: &str, board_id: &str, pin: PinData) -> Result<Value>;
}

#[async_trait]
impl PinPublisher for ProxyClient {
    async fn create_pin(&self, access_token: &str, board_id: &str, pin: PinData) -> Result<Value> {
        ProxyClient::create_pin(self, access_token, board_id, pin).await
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Transient user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn info(&self, message: &str) {
        self.notify(NotificationKind::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

/// Prints notifications to the terminal
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Info => println!("{} {}", "ℹ".cyan(), message),
            NotificationKind::Success => println!("{} {}", "✓".green().bold(), message.green()),
            NotificationKind::Error => eprintln!("{} {}", "✗".red().bold(), message.red()),
        }
    }
}

/// Desktop hand-off used by the manual path
pub trait DesktopEffects: Send + Sync {
    /// Save image bytes under `file_name`; returns the written path
    fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Put `text` on the system clipboard
    fn copy_text(&self, text: &str) -> Result<()>;

    /// Open `url` in the default browser
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Real desktop: download directory, system clipboard and default browser
#[derive(Debug, Clone)]
pub struct SystemDesktop {
    download_dir: PathBuf,
}

impl SystemDesktop {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }

    /// Use `configured` if set, otherwise the user's download directory
    pub fn from_config(configured: Option<&str>) -> Self {
        let dir = configured.map(PathBuf::from).unwrap_or_else(|| {
            directories::UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        Self::new(dir)
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

impl DesktopEffects for SystemDesktop {
    fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::debug!("Saved pin image to {}", path.display());
        Ok(path)
    }

    fn copy_text(&self, text: &str) -> Result<()> {
        cli_clipboard::set_contents(text.to_string()).map_err(|e| {
            PinforgeError::Desktop(format!("Clipboard access failed: {}", e)).into()
        })
    }

    fn open_url(&self, url: &str) -> Result<()> {
        webbrowser::open(url)
            .map_err(|e| PinforgeError::Desktop(format!("Failed to open {}: {}", url, e)).into())
    }
}

/// Fixed delays between publish steps
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
