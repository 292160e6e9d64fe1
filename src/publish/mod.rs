//! Publish orchestrator
//!
//! Decides per pin whether to publish through the proxy API or by hand, and
//! sequences the steps of each path:
//!
//! - API path: `create_pin` through the proxy, then mark the pin published.
//! - Manual path: save the image, copy title and description to the
//!   clipboard, mark the pin published, then open the pin builder.
//!
//! An API failure falls back to the manual path exactly once after a fixed
//! delay. A pin without an image is refused before anything else runs.

pub mod effects;

pub use effects::{
    ConsoleNotifier, Delay, DesktopEffects, NotificationKind, Notifier, PinPublisher,
    SystemDesktop, TokioDelay,
};

use crate::config::PublishConfig;
use crate::error::{PinforgeError, Result};
use crate::models::{PinSuggestion, PinterestUser};
use crate::pinterest::{decode_image, PinData};
use crate::storage::PinRepository;

use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Which path ended up publishing the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Published through the proxy API
    Api,
    /// No API credentials, published by hand
    Manual,
    /// The API path failed and the manual path took over
    ManualFallback,
}

/// Download file name for a pin title
///
/// Every character outside `[a-z0-9]` (case-insensitive) becomes `_`, and the
/// result is lowercased.
///
/// # Examples
///
/// ```
/// use pinforge::publish::download_file_name;
///
/// assert_eq!(download_file_name("My Setup!"), "pin-my_setup_.png");
/// ```
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("pin-{}.png", stem)
}

/// Removes a pin from the in-flight set when a publish attempt ends
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    pin_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.lock() {
            set.remove(&self.pin_id);
        }
    }
}

/// Runs publish attempts for stored pins
pub struct PublishOrchestrator {
    repo: Arc<PinRepository>,
    publisher: Arc<dyn PinPublisher>,
    notifier: Arc<dyn Notifier>,
    desktop: Arc<dyn DesktopEffects>,
    delay: Arc<dyn Delay>,
    config: PublishConfig,
    in_flight: Mutex<HashSet<String>>,
}

impl PublishOrchestrator {
    pub fn new(
        repo: Arc<PinRepository>,
        publisher: Arc<dyn PinPublisher>,
        notifier: Arc<dyn Notifier>,
        desktop: Arc<dyn DesktopEffects>,
        delay: Arc<dyn Delay>,
        config: PublishConfig,
    ) -> Self {
        Self {
            repo,
            publisher,
            notifier,
            desktop,
            delay,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn begin(&self, pin_id: &str) -> Result<InFlightGuard<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| PinforgeError::Storage("In-flight set poisoned".to_string()))?;
        if !set.insert(pin_id.to_string()) {
            return Err(PinforgeError::PublishInProgress(pin_id.to_string()).into());
        }
        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            pin_id: pin_id.to_string(),
        })
    }

    /// Publish one pin
    ///
    /// `user` supplies the API credentials; without both a token and a board
    /// id the manual path runs directly.
    ///
    /// # Errors
    ///
    /// Returns [`PinforgeError::PublishInProgress`] if the pin is already being
    /// published, [`PinforgeError::MissingImage`] if it has no image, or the
    /// manual path's error if that fails too. A storage error after the API
    /// created the pin is returned as is, without falling back. Every failure
    /// is also reported through the notifier.
    pub async fn publish(
        &self,
        pin_id: &str,
        user: Option<&PinterestUser>,
    ) -> Result<PublishOutcome> {
        let _guard = self.begin(pin_id)?;
        let pin = self.repo.require(pin_id)?;

        if !pin.has_image() {
            let err = PinforgeError::MissingImage;
            self.notifier.error(&err.to_string());
            return Err(err.into());
        }

        let Some((token, board_id)) = user.and_then(PinterestUser::api_credentials) else {
            tracing::info!(pin = %pin.id, "No API credentials, publishing manually");
            self.run_manual(&pin).await?;
            return Ok(PublishOutcome::Manual);
        };

        match self.attempt_api(&pin, token, board_id).await {
            Ok(created) => {
                let remote_id = created.get("id").cloned().unwrap_or_default();
                tracing::info!(pin = %pin.id, remote = %remote_id, "Published via API");

                // The pin exists upstream now; a failed status write must not
                // trigger the manual path.
                if let Err(e) = self.repo.update(&pin.id, PinSuggestion::mark_published) {
                    tracing::error!(pin = %pin.id, "Failed to record API publish: {:#}", e);
                    self.notifier
                        .error(&format!("Published to Pinterest but saving failed: {}", e));
                    return Err(e);
                }
                self.notifier.success("Successfully Published via API!");
                Ok(PublishOutcome::Api)
            }
            Err(e) => {
                tracing::warn!(pin = %pin.id, "API publish failed: {:#}", e);
                self.notifier
                    .error(&format!("API Error: {}. Switching to Manual.", e));
                self.delay
                    .sleep(Duration::from_millis(self.config.fallback_delay_ms))
                    .await;
                self.run_manual(&pin).await?;
                Ok(PublishOutcome::ManualFallback)
            }
        }
    }

    async fn attempt_api(
        &self,
        pin: &PinSuggestion,
        token: &str,
        board_id: &str,
    ) -> Result<Value> {
        self.notifier.info("Uploading to Pinterest API...");

        let pin_data = PinData {
            title: pin.title.clone(),
            description: pin.description.clone(),
            link: Some(
                pin.destination_link
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| self.config.default_link.clone()),
            ),
            image_base64: pin.generated_image_base64.clone(),
        };

        self.publisher.create_pin(token, board_id, pin_data).await
    }

    async fn run_manual(&self, pin: &PinSuggestion) -> Result<()> {
        match self.attempt_manual(pin).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(pin = %pin.id, "Manual publish failed: {:#}", e);
                self.notifier.error("Error starting publish flow");
                Err(e)
            }
        }
    }

    async fn attempt_manual(&self, pin: &PinSuggestion) -> Result<()> {
        let image = pin
            .generated_image_base64
            .as_deref()
            .ok_or(PinforgeError::MissingImage)?;
        let bytes = decode_image(image)?;

        let path = self
            .desktop
            .save_image(&download_file_name(&pin.title), &bytes)?;
        self.desktop.copy_text(&pin.clipboard_text())?;

        self.repo.update(&pin.id, PinSuggestion::mark_published)?;
        self.notifier.success("Image downloaded. Opening Pinterest...");
        tracing::info!(pin = %pin.id, image = %path.display(), "Published manually");

        self.delay
            .sleep(Duration::from_millis(self.config.open_builder_delay_ms))
            .await;
        if let Err(e) = self.desktop.open_url(&self.config.pin_builder_url) {
            // Already published; the user can still open the page themselves.
            tracing::warn!("{:#}", e);
            self.notifier.info(&format!(
                "Open {} to finish your pin",
                self.config.pin_builder_url
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PinConcept, PinStatus};
    use crate::storage::{KeyValueBackend, MemoryStorage};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakePublisher {
        fail: bool,
        calls: Mutex<Vec<PinData>>,
    }

    #[async_trait]
    impl PinPublisher for FakePublisher {
        async fn create_pin(&self, _token: &str, _board: &str, pin: PinData) -> Result<Value> {
            self.calls.lock().unwrap().push(pin);
            if self.fail {
                Err(PinforgeError::Upstream {
                    status: 401,
                    message: "Pinterest API Error (401): {}".to_string(),
                }
                .into())
            } else {
                Ok(json!({"id": "p1"}))
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<(NotificationKind, String)>>,
    }

    impl RecordingNotifier {
        fn errors(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| *k == NotificationKind::Error)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, kind: NotificationKind, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((kind, message.to_string()));
        }
    }

    #[derive(Default)]
    struct FakeDesktop {
        clipboard_fails: bool,
        saved: Mutex<Vec<(String, Vec<u8>)>>,
        copied: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    impl DesktopEffects for FakeDesktop {
        fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }

        fn copy_text(&self, text: &str) -> Result<()> {
            if self.clipboard_fails {
                return Err(PinforgeError::Desktop("clipboard denied".to_string()).into());
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn open_url(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    struct Harness {
        repo: Arc<PinRepository>,
        publisher: Arc<FakePublisher>,
        notifier: Arc<RecordingNotifier>,
        desktop: Arc<FakeDesktop>,
        delay: Arc<RecordingDelay>,
        orchestrator: PublishOrchestrator,
    }

    /// Memory storage whose writes can be switched off
    #[derive(Default)]
    struct ReadOnlyAfterSeed {
        inner: MemoryStorage,
        reject_writes: AtomicBool,
    }

    impl KeyValueBackend for ReadOnlyAfterSeed {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.reject_writes.load(Ordering::SeqCst) {
                return Err(PinforgeError::Storage("disk full".to_string()).into());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn harness(publisher: FakePublisher, desktop: FakeDesktop) -> Harness {
        harness_on(Arc::new(MemoryStorage::new()), publisher, desktop)
    }

    fn harness_on(
        backend: Arc<dyn KeyValueBackend>,
        publisher: FakePublisher,
        desktop: FakeDesktop,
    ) -> Harness {
        let repo = Arc::new(PinRepository::new(backend));
        let publisher = Arc::new(publisher);
        let notifier = Arc::new(RecordingNotifier::default());
        let desktop = Arc::new(desktop);
        let delay = Arc::new(RecordingDelay::default());
        let orchestrator = PublishOrchestrator::new(
            repo.clone(),
            publisher.clone(),
            notifier.clone(),
            desktop.clone(),
            delay.clone(),
            PublishConfig::default(),
        );
        Harness {
            repo,
            publisher,
            notifier,
            desktop,
            delay,
            orchestrator,
        }
    }

    fn stored_pin(repo: &PinRepository, image: Option<&str>) -> PinSuggestion {
        let mut pin = PinSuggestion::from_concept(
            PinConcept {
                title: "RGB Desk: Ideas".to_string(),
                description: "Light it up".to_string(),
                alt_text: "alt".to_string(),
                tags: vec![],
                image_prompt: "prompt".to_string(),
            },
            None,
            Some("Gaming Aesthetic".to_string()),
        );
        pin.generated_image_base64 = image.map(str::to_string);
        repo.upsert(pin.clone()).unwrap();
        pin
    }

    fn connected_user() -> PinterestUser {
        PinterestUser::connected("gamer", vec!["Board A".to_string()], "tok", "b1")
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("RGB Desk: Ideas"), "pin-rgb_desk__ideas.png");
        assert_eq!(download_file_name("abc123"), "pin-abc123.png");
    }

    #[tokio::test]
    async fn test_missing_image_refused_with_one_notification() {
        let h = harness(FakePublisher::default(), FakeDesktop::default());
        let pin = stored_pin(&h.repo, None);

        let err = h
            .orchestrator
            .publish(&pin.id, Some(&connected_user()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PinforgeError>(),
            Some(PinforgeError::MissingImage)
        ));
        assert_eq!(h.notifier.messages.lock().unwrap().len(), 1);
        assert_eq!(h.notifier.errors(), vec!["Please generate an image first."]);
        assert_eq!(h.repo.get(&pin.id).unwrap().status, PinStatus::Draft);
        assert!(h.publisher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_path_publishes_with_default_link() {
        let h = harness(FakePublisher::default(), FakeDesktop::default());
        let pin = stored_pin(&h.repo, Some("AAECAw=="));

        let outcome = h
            .orchestrator
            .publish(&pin.id, Some(&connected_user()))
            .await
            .unwrap();
        assert_eq!(outcome, PublishOutcome::Api);
        assert_eq!(h.repo.get(&pin.id).unwrap().status, PinStatus::Published);

        let calls = h.publisher.calls.lock().unwrap();
        assert_eq!(
            calls[0].link.as_deref(),
            Some("https://gamingsetupaesthetic.blogspot.com")
        );
        assert!(h.desktop.saved.lock().unwrap().is_empty());
        assert!(h.delay.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_failure_falls_back_once() {
        let h = harness(
            FakePublisher {
                fail: true,
                ..Default::default()
            },
            FakeDesktop::default(),
        );
        let pin = stored_pin(&h.repo, Some("AAECAw=="));

        let outcome = h
            .orchestrator
            .publish(&pin.id, Some(&connected_user()))
            .await
            .unwrap();
        assert_eq!(outcome, PublishOutcome::ManualFallback);
        assert_eq!(h.publisher.calls.lock().unwrap().len(), 1);
        assert_eq!(h.repo.get(&pin.id).unwrap().status, PinStatus::Published);
        assert_eq!(
            *h.delay.sleeps.lock().unwrap(),
            vec![Duration::from_millis(2000), Duration::from_millis(1000)]
        );
        assert_eq!(
            h.notifier.errors(),
            vec!["API Error: Pinterest API Error (401): {}. Switching to Manual."]
        );
        assert_eq!(
            h.desktop.saved.lock().unwrap()[0],
            ("pin-rgb_desk__ideas.png".to_string(), vec![0, 1, 2, 3])
        );
    }

    #[tokio::test]
    async fn test_storage_failure_after_api_success_does_not_fall_back() {
        let backend = Arc::new(ReadOnlyAfterSeed::default());
        let h = harness_on(
            backend.clone(),
            FakePublisher::default(),
            FakeDesktop::default(),
        );
        let pin = stored_pin(&h.repo, Some("AAECAw=="));
        backend.reject_writes.store(true, Ordering::SeqCst);

        let err = h
            .orchestrator
            .publish(&pin.id, Some(&connected_user()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PinforgeError>(),
            Some(PinforgeError::Storage(_))
        ));
        assert_eq!(h.publisher.calls.lock().unwrap().len(), 1);
        assert!(h.desktop.saved.lock().unwrap().is_empty());
        assert!(h.desktop.copied.lock().unwrap().is_empty());
        assert!(h.delay.sleeps.lock().unwrap().is_empty());
        assert_eq!(
            h.notifier.errors(),
            vec!["Published to Pinterest but saving failed: Storage error: disk full"]
        );
    }

    #[tokio::test]
    async fn test_manual_without_credentials() {
        let h = harness(FakePublisher::default(), FakeDesktop::default());
        let pin = stored_pin(&h.repo, Some("AAECAw=="));
        let mut user = connected_user();
        user.board_id = None;

        let outcome = h.orchestrator.publish(&pin.id, Some(&user)).await.unwrap();
        assert_eq!(outcome, PublishOutcome::Manual);
        assert!(h.publisher.calls.lock().unwrap().is_empty());
        assert_eq!(
            *h.desktop.copied.lock().unwrap(),
            vec!["RGB Desk: Ideas\n\nLight it up".to_string()]
        );
        assert_eq!(
            *h.desktop.opened.lock().unwrap(),
            vec!["https://www.pinterest.com/pin-builder/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_clipboard_failure_leaves_pin_unpublished() {
        let h = harness(
            FakePublisher::default(),
            FakeDesktop {
                clipboard_fails: true,
                ..Default::default()
            },
        );
        let pin = stored_pin(&h.repo, Some("AAECAw=="));

        assert!(h.orchestrator.publish(&pin.id, None).await.is_err());
        assert_eq!(h.repo.get(&pin.id).unwrap().status, PinStatus::Draft);
        assert_eq!(h.notifier.errors(), vec!["Error starting publish flow"]);
        assert!(h.desktop.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_publish_is_refused() {
        let h = harness(FakePublisher::default(), FakeDesktop::default());
        let pin = stored_pin(&h.repo, Some("AAECAw=="));

        let guard = h.orchestrator.begin(&pin.id).unwrap();
        let err = h.orchestrator.publish(&pin.id, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PinforgeError>(),
            Some(PinforgeError::PublishInProgress(_))
        ));
        drop(guard);

        assert!(h.orchestrator.publish(&pin.id, None).await.is_ok());
    }
}
