use super::defaults::DEFAULT_CONTENT;
use super::types::{ContentBackup, ContentDocument, Review, SectionRecord};
use crate::autosave::AutoSave;
use crate::errors::{DomainError, DomainResult, PersistenceError};
use crate::gateway::ContentGateway;
use crate::store::{self, keys, LocalStore};
use crate::types::{DataOrigin, SaveOutcome};
use crate::util::deep_merge;
use crate::validation::Validate;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub(crate) const BACKUP_VERSION: u32 = 1;

/// Owner of the in-memory site content document.
///
/// The presentation layer never mutates the document directly; every edit
/// goes through the named operations here, which mark the document dirty for
/// the auto-save loop. Load degrades remote -> legacy remote -> local store
/// -> defaults and always yields a usable document; save degrades remote ->
/// local mirror without ever discarding in-memory edits.
pub struct ContentRepository {
    gateway: Arc<dyn ContentGateway>,
    store: Arc<dyn LocalStore>,
    state: RwLock<DocumentState>,
    dirty: AtomicBool,
    save_lock: Mutex<()>,
}

struct DocumentState {
    document: ContentDocument,
    origin: DataOrigin,
}

impl ContentRepository {
    pub fn new(gateway: Arc<dyn ContentGateway>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            gateway,
            store,
            state: RwLock::new(DocumentState {
                document: DEFAULT_CONTENT.clone(),
                origin: DataOrigin::Defaults,
            }),
            dirty: AtomicBool::new(false),
            save_lock: Mutex::new(()),
        }
    }

    /// Reconcile the in-memory document with the fallback chain.
    ///
    /// Never fails: the worst case is the built-in default document. Every
    /// tier is merged over the defaults, so every default section key is
    /// present in the result regardless of which tier answered.
    pub async fn load(&self) -> ContentDocument {
        let (document, origin) = self.load_tiers().await;
        let mut state = self.state.write().await;
        state.document = document.clone();
        state.origin = origin;
        self.dirty.store(false, Ordering::SeqCst);
        document
    }

    async fn load_tiers(&self) -> (ContentDocument, DataOrigin) {
        match self.gateway.fetch_content().await {
            Ok(remote) => return (remote.merged_over(&DEFAULT_CONTENT), DataOrigin::Remote),
            Err(err) => log::warn!("content fetch failed, trying legacy endpoint: {}", err),
        }

        match self.gateway.fetch_site_content().await {
            Ok(remote) => return (remote.merged_over(&DEFAULT_CONTENT), DataOrigin::Remote),
            Err(err) => log::warn!("legacy content fetch failed, trying local store: {}", err),
        }

        match store::read_json::<ContentDocument>(self.store.as_ref(), keys::SITE_CONTENT).await {
            Ok(Some(local)) => {
                log::info!("serving content from local store");
                return (local.merged_over(&DEFAULT_CONTENT), DataOrigin::LocalFallback);
            }
            Ok(None) => {}
            Err(err) => log::warn!("local content read failed: {}", err),
        }

        log::info!("serving built-in default content");
        (DEFAULT_CONTENT.clone(), DataOrigin::Defaults)
    }

    /// Which fallback tier satisfied the most recent load.
    pub async fn origin(&self) -> DataOrigin {
        self.state.read().await.origin
    }

    /// Snapshot of the current document.
    pub async fn document(&self) -> ContentDocument {
        self.state.read().await.document.clone()
    }

    /// Current section record, falling back to the default section when the
    /// document somehow lacks it. Callers never see a missing section.
    pub async fn get_section(&self, section: &str) -> SectionRecord {
        let state = self.state.read().await;
        state
            .document
            .section(section)
            .or_else(|| DEFAULT_CONTENT.section(section))
            .cloned()
            .unwrap_or_default()
    }

    /// Re-fetch one section from the backend and merge it over the
    /// in-memory record. A failed fetch propagates and touches nothing.
    /// Server data is not a local edit, so this never marks the document
    /// dirty.
    pub async fn refresh_section(&self, section: &str) -> DomainResult<SectionRecord> {
        let remote = self.gateway.fetch_section(section).await?;
        let mut state = self.state.write().await;
        let record = state
            .document
            .ensure_section(section, DEFAULT_CONTENT.section(section));
        if let Value::Object(map) = deep_merge(&Value::Object(record.clone()), &Value::Object(remote))
        {
            *record = map;
        }
        Ok(record.clone())
    }

    /// Replace one scalar field of one section.
    pub async fn update_field(&self, section: &str, field: &str, value: Value) {
        let mut state = self.state.write().await;
        let record = state
            .document
            .ensure_section(section, DEFAULT_CONTENT.section(section));
        record.insert(field.to_string(), value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Patch one element of an ordered sub-collection by position.
    ///
    /// Object patches merge over the existing item; anything else replaces
    /// it. An out-of-range index mutates nothing and is reported, not fatal.
    pub async fn update_array_item(
        &self,
        section: &str,
        field: &str,
        index: usize,
        patch: Value,
    ) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let items = Self::collection_mut(&mut state.document, section, field)?;
        if index >= items.len() {
            let len = items.len();
            log::warn!(
                "ignoring update at index {} of {}.{} (len {})",
                index,
                section,
                field,
                len
            );
            return Err(DomainError::IndexOutOfRange {
                section: section.to_string(),
                field: field.to_string(),
                index,
                len,
            });
        }
        items[index] = deep_merge(&items[index], &patch);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Append to an ordered sub-collection. Insertion order is significant
    /// for rendering and survives save/reload round-trips.
    pub async fn add_array_item(&self, section: &str, field: &str, item: Value) {
        let mut state = self.state.write().await;
        match Self::collection_mut(&mut state.document, section, field) {
            Ok(items) => {
                items.push(item);
                self.dirty.store(true, Ordering::SeqCst);
            }
            Err(err) => log::warn!("cannot append to {}.{}: {}", section, field, err),
        }
    }

    /// Remove by position; later items shift down. Positional because
    /// sub-collection items carry no stable id.
    pub async fn remove_array_item(
        &self,
        section: &str,
        field: &str,
        index: usize,
    ) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let items = Self::collection_mut(&mut state.document, section, field)?;
        if index >= items.len() {
            let len = items.len();
            log::warn!(
                "ignoring removal at index {} of {}.{} (len {})",
                index,
                section,
                field,
                len
            );
            return Err(DomainError::IndexOutOfRange {
                section: section.to_string(),
                field: field.to_string(),
                index,
                len,
            });
        }
        items.remove(index);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Typed write boundary for the reviews section: validates, stamps an id,
    /// and appends to `reviews.items`. The rating was already clamped by the
    /// `Review` constructor or deserializer.
    pub async fn add_review(&self, mut review: Review) -> DomainResult<Review> {
        review.validate()?;
        if review.id == 0 {
            review.id = review.created_at.timestamp_millis();
        }
        let item = serde_json::to_value(&review)
            .map_err(|err| DomainError::Internal(format!("review serialization: {}", err)))?;
        self.add_array_item("reviews", "items", item).await;
        Ok(review)
    }

    fn collection_mut<'a>(
        document: &'a mut ContentDocument,
        section: &str,
        field: &str,
    ) -> DomainResult<&'a mut Vec<Value>> {
        let record = document.ensure_section(section, DEFAULT_CONTENT.section(section));
        let entry = record
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        entry.as_array_mut().ok_or_else(|| {
            DomainError::Internal(format!("{}.{} is not a collection", section, field))
        })
    }

    /// Push the whole document to the backend; on failure mirror it to the
    /// local store instead and report degraded success. Only when both tiers
    /// fail does this error, and even then the in-memory document is intact
    /// and stays dirty for the next attempt.
    pub async fn save(&self) -> DomainResult<SaveOutcome> {
        let _guard = self.save_lock.lock().await;
        self.save_locked().await
    }

    async fn save_locked(&self) -> DomainResult<SaveOutcome> {
        // Clear the flag before snapshotting: an edit that interleaves here
        // either lands in the snapshot or re-dirties the document for the
        // next tick. The reverse order could mark an unsaved edit clean.
        self.dirty.store(false, Ordering::SeqCst);
        let snapshot = self.document().await;

        match self.gateway.persist_content(&snapshot).await {
            Ok(()) => Ok(SaveOutcome::Remote),
            Err(err) => {
                log::warn!("remote content save failed, mirroring locally: {}", err);
                match store::write_json(self.store.as_ref(), keys::SITE_CONTENT, &snapshot).await {
                    Ok(()) => Ok(SaveOutcome::LocalOnly),
                    Err(persist_err) => {
                        self.dirty.store(true, Ordering::SeqCst);
                        log::error!("local content mirror failed: {}", persist_err);
                        Err(DomainError::Persistence(persist_err))
                    }
                }
            }
        }
    }

    /// Write a timestamped snapshot to the dedicated backup slot.
    pub async fn create_backup(&self) -> DomainResult<()> {
        let backup = ContentBackup {
            content: self.document().await,
            timestamp: Utc::now(),
            version: BACKUP_VERSION,
        };
        store::write_json(self.store.as_ref(), keys::CONTENT_BACKUP, &backup).await?;
        log::info!("content backup written at {}", backup.timestamp);
        Ok(())
    }

    /// Replace the live document with the backup snapshot and save it.
    /// Restoring with an empty backup slot is a reported failure.
    pub async fn restore_backup(&self) -> DomainResult<SaveOutcome> {
        let backup =
            store::read_json::<ContentBackup>(self.store.as_ref(), keys::CONTENT_BACKUP)
                .await?
                .ok_or_else(|| {
                    PersistenceError::MissingKey(keys::CONTENT_BACKUP.to_string())
                })?;

        {
            let mut state = self.state.write().await;
            state.document = backup.content.merged_over(&DEFAULT_CONTENT);
        }
        self.dirty.store(true, Ordering::SeqCst);
        self.save().await
    }
}

#[async_trait]
impl AutoSave for ContentRepository {
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
                log::debug!("content auto-save skipped, previous save still in flight");
                return;
            }
        };
        if let Err(err) = self.save_locked().await {
            log::warn!("content auto-save failed: {}", err);
        }
    }
}
