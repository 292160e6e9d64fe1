//! Typed stores on top of a [`KeyValueBackend`]
//!
//! Display reads are defensive: a missing key, a backend failure or a value
//! that no longer decodes all come back as "absent" with a warning. Writes
//! that merge into the stored value read strictly and abort on a backend
//! failure, so a failed read never overwrites what is stored.

use super::KeyValueBackend;
use crate::error::{PinforgeError, Result};
use crate::models::{PinStatus, PinSuggestion, PinterestUser};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Key holding the persisted pin list
pub const PINS_KEY: &str = "pinforge_pins";

/// Key holding the connected Pinterest user record
pub const USER_KEY: &str = "pinforge_user";

/// A JSON value stored under one key
pub struct JsonStore<T> {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonStore<T> {
    pub fn new(backend: Arc<dyn KeyValueBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// Load the stored value, or `None` if it is absent or malformed
    pub fn load(&self) -> Option<T> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read stored value: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %self.key, "Ignoring malformed stored value: {}", e);
                None
            }
        }
    }

    /// Load the stored value, propagating backend failures
    ///
    /// A malformed value still reads as `None`.
    pub fn try_load(&self) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %self.key, "Ignoring malformed stored value: {}", e);
                Ok(None)
            }
        }
    }

    /// Serialize and persist `value`
    pub fn save(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.set(&self.key, &json)
    }

    /// Remove the stored value
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key)
    }
}

/// Persisted pin list with upsert semantics
pub struct PinRepository {
    store: JsonStore<Vec<PinSuggestion>>,
}

impl PinRepository {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            store: JsonStore::new(backend, PINS_KEY),
        }
    }

    /// All pins in insertion order
    pub fn all(&self) -> Vec<PinSuggestion> {
        self.store.load().unwrap_or_default()
    }

    /// Look up a pin by identifier
    pub fn get(&self, id: &str) -> Option<PinSuggestion> {
        self.all().into_iter().find(|p| p.id == id)
    }

    /// Look up a pin, failing with [`PinforgeError::PinNotFound`]
    pub fn require(&self, id: &str) -> Result<PinSuggestion> {
        self.get(id)
            .ok_or_else(|| PinforgeError::PinNotFound(id.to_string()).into())
    }

    /// Replace the pin with the same id, or append it
    pub fn upsert(&self, pin: PinSuggestion) -> Result<()> {
        self.upsert_many(std::iter::once(pin))
    }

    /// Upsert several pins with a single write
    pub fn upsert_many(&self, pins: impl IntoIterator<Item = PinSuggestion>) -> Result<()> {
        let mut all = self.store.try_load()?.unwrap_or_default();
        for pin in pins {
            match all.iter_mut().find(|p| p.id == pin.id) {
                Some(existing) => *existing = pin,
                None => all.push(pin),
            }
        }
        self.store.save(&all)
    }

    /// Apply `f` to the stored pin and persist the result
    ///
    /// Nothing is written if `f` fails.
    pub fn update<F>(&self, id: &str, f: F) -> Result<PinSuggestion>
    where
        F: FnOnce(&mut PinSuggestion) -> Result<()>,
    {
        let mut pin = self.require(id)?;
        f(&mut pin)?;
        self.upsert(pin.clone())?;
        Ok(pin)
    }

    /// Pins with the given status
    pub fn with_status(&self, status: PinStatus) -> Vec<PinSuggestion> {
        self.all()
            .into_iter()
            .filter(|p| p.status == status)
            .collect()
    }

    /// Scheduled pins ordered by schedule date, earliest first
    pub fn upcoming(&self, limit: Option<usize>) -> Vec<PinSuggestion> {
        let mut scheduled: Vec<PinSuggestion> = self
            .with_status(PinStatus::Scheduled)
            .into_iter()
            .filter(|p| p.schedule_time().is_some())
            .collect();
        scheduled.sort_by_key(|p| p.schedule_time());
        if let Some(limit) = limit {
            scheduled.truncate(limit);
        }
        scheduled
    }
}

/// Persisted connected-user record
pub struct UserStore {
    store: JsonStore<PinterestUser>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            store: JsonStore::new(backend, USER_KEY),
        }
    }

    pub fn load(&self) -> Option<PinterestUser> {
        self.store.load()
    }

    pub fn save(&self, user: &PinterestUser) -> Result<()> {
        self.store.save(user)
    }

    /// Forget the connected account entirely
    pub fn disconnect(&self) -> Result<()> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PinConcept;
    use crate::storage::{MemoryStorage, SqliteStorage};

    fn concept(title: &str) -> PinConcept {
        PinConcept {
            title: title.to_string(),
            description: format!("{} description", title),
            alt_text: "alt".to_string(),
            tags: vec!["setup".to_string()],
            image_prompt: "prompt".to_string(),
        }
    }

    fn memory_backend() -> Arc<dyn KeyValueBackend> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_load_absent_is_none() {
        let store: JsonStore<Vec<PinSuggestion>> = JsonStore::new(memory_backend(), PINS_KEY);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_malformed_value_reads_as_absent() {
        let backend = memory_backend();
        backend.set(PINS_KEY, "{not json").unwrap();
        let repo = PinRepository::new(backend.clone());
        assert!(repo.all().is_empty());

        backend.set(USER_KEY, "[1,2,3]").unwrap();
        assert!(UserStore::new(backend).load().is_none());
    }

    /// Memory storage that fails the next read when armed
    #[derive(Default)]
    struct FlakyReads {
        inner: MemoryStorage,
        fail_next_get: std::sync::atomic::AtomicBool,
    }

    impl KeyValueBackend for FlakyReads {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self
                .fail_next_get
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                return Err(PinforgeError::Storage("database is locked".to_string()).into());
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_read_does_not_clobber_pins_on_upsert() {
        let backend = Arc::new(FlakyReads::default());
        let repo = PinRepository::new(backend.clone());
        let pins: Vec<PinSuggestion> = ["A", "B", "C"]
            .iter()
            .map(|t| PinSuggestion::from_concept(concept(t), None, None))
            .collect();
        repo.upsert_many(pins.clone()).unwrap();

        backend
            .fail_next_get
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let extra = PinSuggestion::from_concept(concept("D"), None, None);
        let err = repo.upsert(extra).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PinforgeError>(),
            Some(PinforgeError::Storage(_))
        ));

        let titles: Vec<String> = repo.all().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_try_load_treats_malformed_as_absent() {
        let backend = memory_backend();
        backend.set(PINS_KEY, "{not json").unwrap();
        let store: JsonStore<Vec<PinSuggestion>> = JsonStore::new(backend, PINS_KEY);
        assert!(store.try_load().unwrap().is_none());
    }

    #[test]
    fn test_pin_list_roundtrips_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn KeyValueBackend> =
            Arc::new(SqliteStorage::new_with_path(dir.path().join("pins.db")).unwrap());

        let bare = PinSuggestion::from_concept(concept("Bare"), None, None);
        let mut full = PinSuggestion::from_concept(
            concept("Full"),
            Some("https://blog.example/a".to_string()),
            Some("Desks".to_string()),
        );
        full.generated_image_base64 = Some("aGVsbG8=".to_string());
        full.schedule("2031-03-04T05:06:07Z").unwrap();

        let repo = PinRepository::new(backend.clone());
        repo.upsert_many(vec![bare.clone(), full.clone()]).unwrap();

        let reloaded = PinRepository::new(backend).all();
        assert_eq!(reloaded, vec![bare, full]);
    }

    #[test]
    fn test_upsert_replaces_and_appends_in_order() {
        let repo = PinRepository::new(memory_backend());
        let a = PinSuggestion::from_concept(concept("A"), None, None);
        let b = PinSuggestion::from_concept(concept("B"), None, None);
        repo.upsert(a.clone()).unwrap();
        repo.upsert(b.clone()).unwrap();

        let mut edited = a.clone();
        edited.title = "A2".to_string();
        repo.upsert(edited).unwrap();

        let titles: Vec<String> = repo.all().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["A2", "B"]);
    }

    #[test]
    fn test_update_does_not_write_on_error() {
        let repo = PinRepository::new(memory_backend());
        let pin = PinSuggestion::from_concept(concept("A"), None, None);
        repo.upsert(pin.clone()).unwrap();

        let result = repo.update(&pin.id, |p| {
            p.title = "changed".to_string();
            p.mark_published()
        });
        assert!(result.is_err());
        assert_eq!(repo.get(&pin.id).unwrap().title, "A");
    }

    #[test]
    fn test_require_missing_pin() {
        let repo = PinRepository::new(memory_backend());
        let err = repo.require("nope").unwrap_err();
        assert!(err.to_string().contains("Pin not found"));
    }

    #[test]
    fn test_upcoming_sorted_and_limited() {
        let repo = PinRepository::new(memory_backend());
        let mut late = PinSuggestion::from_concept(concept("Late"), None, None);
        late.schedule("2031-06-01T10:00").unwrap();
        let mut early = PinSuggestion::from_concept(concept("Early"), None, None);
        early.schedule("2031-01-01T10:00").unwrap();
        let mut mid = PinSuggestion::from_concept(concept("Mid"), None, None);
        mid.schedule("2031-03-01T10:00:00Z").unwrap();
        let draft = PinSuggestion::from_concept(concept("Draft"), None, None);
        repo.upsert_many(vec![late, early, mid, draft]).unwrap();

        let titles: Vec<String> = repo
            .upcoming(Some(2))
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Mid"]);
    }

    #[test]
    fn test_user_store_save_and_disconnect() {
        let users = UserStore::new(memory_backend());
        let user = PinterestUser::connected("pro", vec!["Desks".to_string()], "tok", "b1");
        users.save(&user).unwrap();
        assert_eq!(users.load(), Some(user));

        users.disconnect().unwrap();
        assert!(users.load().is_none());
    }
}
