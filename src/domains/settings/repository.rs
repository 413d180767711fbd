use super::defaults::DEFAULT_SETTINGS;
use super::types::{CategoryRecord, SettingsBackup, SettingsDocument};
use crate::autosave::AutoSave;
use crate::errors::{DomainError, DomainResult, PersistenceError};
use crate::gateway::SettingsGateway;
use crate::store::{self, keys, LocalStore};
use crate::types::{DataOrigin, SaveOutcome};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const BACKUP_VERSION: u32 = 1;

/// Owner of the in-memory settings document. Same load/save/fallback and
/// auto-save contract as the content repository, at category granularity.
pub struct SettingsRepository {
    gateway: Arc<dyn SettingsGateway>,
    store: Arc<dyn LocalStore>,
    state: RwLock<SettingsState>,
    dirty: AtomicBool,
    save_lock: Mutex<()>,
}

struct SettingsState {
    document: SettingsDocument,
    origin: DataOrigin,
}

impl SettingsRepository {
    pub fn new(gateway: Arc<dyn SettingsGateway>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            gateway,
            store,
            state: RwLock::new(SettingsState {
                document: DEFAULT_SETTINGS.clone(),
                origin: DataOrigin::Defaults,
            }),
            dirty: AtomicBool::new(false),
            save_lock: Mutex::new(()),
        }
    }

    /// Remote -> local store -> defaults; never fails, and every default
    /// category is present in the result whichever tier answered.
    pub async fn load(&self) -> SettingsDocument {
        let (document, origin) = self.load_tiers().await;
        let mut state = self.state.write().await;
        state.document = document.clone();
        state.origin = origin;
        self.dirty.store(false, Ordering::SeqCst);
        document
    }

    async fn load_tiers(&self) -> (SettingsDocument, DataOrigin) {
        match self.gateway.fetch_settings().await {
            Ok(remote) => return (remote.merged_over(&DEFAULT_SETTINGS), DataOrigin::Remote),
            Err(err) => log::warn!("settings fetch failed, trying local store: {}", err),
        }

        match store::read_json::<SettingsDocument>(self.store.as_ref(), keys::SITE_SETTINGS).await {
            Ok(Some(local)) => {
                log::info!("serving settings from local store");
                return (local.merged_over(&DEFAULT_SETTINGS), DataOrigin::LocalFallback);
            }
            Ok(None) => {}
            Err(err) => log::warn!("local settings read failed: {}", err),
        }

        log::info!("serving built-in default settings");
        (DEFAULT_SETTINGS.clone(), DataOrigin::Defaults)
    }

    pub async fn origin(&self) -> DataOrigin {
        self.state.read().await.origin
    }

    pub async fn document(&self) -> SettingsDocument {
        self.state.read().await.document.clone()
    }

    /// Current category record with defaults filling any gap.
    pub async fn get_category(&self, category: &str) -> CategoryRecord {
        let state = self.state.read().await;
        state
            .document
            .category(category)
            .or_else(|| DEFAULT_SETTINGS.category(category))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace one setting in one category and mark the document dirty.
    pub async fn update_setting(&self, category: &str, key: &str, value: Value) {
        let mut state = self.state.write().await;
        let record = state
            .document
            .ensure_category(category, DEFAULT_SETTINGS.category(category));
        record.insert(key.to_string(), value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Push to the backend; on failure mirror locally and report degraded
    /// success. In-memory state is never lost.
    pub async fn save(&self) -> DomainResult<SaveOutcome> {
        let _guard = self.save_lock.lock().await;
        self.save_locked().await
    }

    async fn save_locked(&self) -> DomainResult<SaveOutcome> {
        // Flag first, snapshot second: an interleaved edit either makes the
        // snapshot or leaves the document dirty for the next tick.
        self.dirty.store(false, Ordering::SeqCst);
        let snapshot = self.document().await;

        match self.gateway.persist_settings(&snapshot).await {
            Ok(()) => Ok(SaveOutcome::Remote),
            Err(err) => {
                log::warn!("remote settings save failed, mirroring locally: {}", err);
                match store::write_json(self.store.as_ref(), keys::SITE_SETTINGS, &snapshot).await {
                    Ok(()) => Ok(SaveOutcome::LocalOnly),
                    Err(persist_err) => {
                        self.dirty.store(true, Ordering::SeqCst);
                        log::error!("local settings mirror failed: {}", persist_err);
                        Err(DomainError::Persistence(persist_err))
                    }
                }
            }
        }
    }

    /// Write `{settings, timestamp, version}` to the dedicated backup slot.
    pub async fn create_backup(&self) -> DomainResult<()> {
        let backup = SettingsBackup {
            settings: self.document().await,
            timestamp: Utc::now(),
            version: BACKUP_VERSION,
        };
        store::write_json(self.store.as_ref(), keys::SETTINGS_BACKUP, &backup).await?;
        log::info!("settings backup written at {}", backup.timestamp);
        Ok(())
    }

    /// Replace the live document with the backup snapshot and perform a full
    /// save. An empty backup slot is a reported failure, not a silent no-op.
    pub async fn restore_backup(&self) -> DomainResult<SaveOutcome> {
        let backup =
            store::read_json::<SettingsBackup>(self.store.as_ref(), keys::SETTINGS_BACKUP)
                .await?
                .ok_or_else(|| {
                    PersistenceError::MissingKey(keys::SETTINGS_BACKUP.to_string())
                })?;

        {
            let mut state = self.state.write().await;
            state.document = backup.settings.merged_over(&DEFAULT_SETTINGS);
        }
        self.dirty.store(true, Ordering::SeqCst);
        self.save().await
    }
}

#[async_trait]
impl AutoSave for SettingsRepository {
    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    async fn autosave_tick(&self) {
        if !self.is_dirty() {
            return;
        }
        let _guard = match self.save_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::debug!("settings auto-save skipped, previous save still in flight");
                return;
            }
        };
        if let Err(err) = self.save_locked().await {
            log::warn!("settings auto-save failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::settings::types::CATEGORIES;
    use crate::errors::{GatewayError, GatewayResult};
    use crate::store::MemoryLocalStore;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct MockGateway {
        fetch_fails: bool,
        persist_fails: bool,
        remote: Option<SettingsDocument>,
        persist_calls: AtomicUsize,
    }

    #[async_trait]
    impl SettingsGateway for MockGateway {
        async fn fetch_settings(&self) -> GatewayResult<SettingsDocument> {
            match (&self.remote, self.fetch_fails) {
                (Some(doc), false) => Ok(doc.clone()),
                _ => Err(GatewayError::Network("connection refused".to_string())),
            }
        }

        async fn persist_settings(&self, _document: &SettingsDocument) -> GatewayResult<()> {
            self.persist_calls.fetch_add(1, Ordering::SeqCst);
            if self.persist_fails {
                Err(GatewayError::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn offline_repo(store: Arc<dyn LocalStore>) -> SettingsRepository {
        SettingsRepository::new(
            Arc::new(MockGateway {
                fetch_fails: true,
                ..Default::default()
            }),
            store,
        )
    }

    #[tokio::test]
    async fn load_keeps_every_category_on_any_tier() {
        let remote = SettingsDocument::from_categories(
            json!({"doctor": {"name": "Dr. Remoto"}}).as_object().unwrap().clone(),
        );
        let repo = SettingsRepository::new(
            Arc::new(MockGateway {
                remote: Some(remote),
                ..Default::default()
            }),
            Arc::new(MemoryLocalStore::new()),
        );

        let loaded = repo.load().await;
        for category in CATEGORIES {
            assert!(loaded.contains(category), "missing {}", category);
        }
        assert_eq!(
            loaded.category("doctor").unwrap().get("name"),
            Some(&json!("Dr. Remoto"))
        );
        assert_eq!(repo.origin().await, DataOrigin::Remote);
    }

    #[tokio::test]
    async fn load_prefers_local_over_defaults() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryLocalStore::new());
        let local = SettingsDocument::from_categories(
            json!({"whatsapp": {"widget_enabled": false}})
                .as_object()
                .unwrap()
                .clone(),
        );
        store::write_json(store.as_ref(), keys::SITE_SETTINGS, &local)
            .await
            .unwrap();

        let repo = offline_repo(store);
        let loaded = repo.load().await;
        assert_eq!(
            loaded.category("whatsapp").unwrap().get("widget_enabled"),
            Some(&json!(false))
        );
        assert_eq!(repo.origin().await, DataOrigin::LocalFallback);
    }

    #[tokio::test]
    async fn update_setting_marks_dirty_and_reads_back() {
        let repo = offline_repo(Arc::new(MemoryLocalStore::new()));
        repo.load().await;
        assert!(!repo.is_dirty());

        repo.update_setting("whatsapp", "widget_color", json!("#000000")).await;
        assert!(repo.is_dirty());
        assert_eq!(
            repo.get_category("whatsapp").await.get("widget_color"),
            Some(&json!("#000000"))
        );
        // Untouched keys still come from defaults.
        assert_eq!(
            repo.get_category("whatsapp").await.get("widget_position"),
            Some(&json!("bottom-right"))
        );
    }

    #[tokio::test]
    async fn save_failure_mirrors_locally() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryLocalStore::new());
        let repo = SettingsRepository::new(
            Arc::new(MockGateway {
                fetch_fails: true,
                persist_fails: true,
                ..Default::default()
            }),
            store.clone(),
        );
        repo.load().await;
        repo.update_setting("doctor", "name", json!("Dra. Nova")).await;

        assert_eq!(repo.save().await.unwrap(), SaveOutcome::LocalOnly);

        let mirrored: SettingsDocument = store::read_json(store.as_ref(), keys::SITE_SETTINGS)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            mirrored.category("doctor").unwrap().get("name"),
            Some(&json!("Dra. Nova"))
        );
    }

    #[tokio::test]
    async fn backup_and_restore_round_trip() {
        let repo = offline_repo(Arc::new(MemoryLocalStore::new()));
        repo.load().await;

        repo.update_setting("site", "active_theme", json!("warm")).await;
        repo.create_backup().await.unwrap();
        repo.update_setting("site", "active_theme", json!("classic")).await;

        repo.restore_backup().await.unwrap();
        assert_eq!(
            repo.get_category("site").await.get("active_theme"),
            Some(&json!("warm"))
        );
    }

    #[tokio::test]
    async fn restore_without_backup_fails() {
        let repo = offline_repo(Arc::new(MemoryLocalStore::new()));
        let result = repo.restore_backup().await;
        assert!(matches!(
            result,
            Err(DomainError::Persistence(PersistenceError::MissingKey(_)))
        ));
    }

    #[tokio::test]
    async fn autosave_tick_saves_once_per_window() {
        let gateway = Arc::new(MockGateway {
            fetch_fails: true,
            ..Default::default()
        });
        let repo = SettingsRepository::new(gateway.clone(), Arc::new(MemoryLocalStore::new()));
        repo.load().await;

        repo.update_setting("clinic", "phone", json!("+5511000000000")).await;
        repo.update_setting("clinic", "phone", json!("+5511111111111")).await;

        repo.autosave_tick().await;
        repo.autosave_tick().await;
        assert_eq!(gateway.persist_calls.load(Ordering::SeqCst), 1);
    }
}
