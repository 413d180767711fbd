//! Content core for a medical-practice marketing site and its admin panel.
//!
//! The presentation layer renders documents produced here and issues every
//! edit back through the repositories; it never mutates a document directly.
//! Each repository owns its in-memory document, reconciles it against the
//! remote backend with graceful degradation to the local store and built-in
//! defaults, and participates in debounced auto-save.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// Public modules
pub mod auth;
pub mod autosave;
pub mod domains;
pub mod errors;
pub mod gateway;
pub mod store;
pub mod types;
pub mod validation;

// Private modules
mod util;

pub use auth::{AuthService, SessionRecord, SessionUser};
pub use domains::blog::{slugify, BlogPost, BlogRepository, PostListing};
pub use domains::content::{ContentDocument, ContentRepository, Review};
pub use domains::settings::{SettingsDocument, SettingsRepository};
pub use types::{DataOrigin, ListOrigin, SaveOutcome};

use autosave::{spawn_autosave, AutoSave};
use errors::DomainResult;
use gateway::HttpGateway;
use store::{LocalStore, SqliteLocalStore};
use tokio::task::JoinHandle;

/// Auto-save cadence when the config does not override it.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(4);

/// Configuration for the core: where the backend lives and where the local
/// store database file goes.
#[derive(Debug, Clone)]
pub struct SiteCoreConfig {
    pub api_base_url: String,
    pub db_path: PathBuf,
    pub autosave_interval: Duration,
}

impl SiteCoreConfig {
    pub fn new(api_base_url: impl Into<String>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            db_path: db_path.into(),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

/// The one construction point for the repositories.
///
/// Built once at app start and handed by reference to whatever owns the UI
/// tree; a page-lifetime object, torn down never. Replaces the hidden
/// module-level singletons this design grew out of.
pub struct SiteCore {
    pub content: Arc<ContentRepository>,
    pub settings: Arc<SettingsRepository>,
    pub blog: Arc<BlogRepository>,
    pub auth: Arc<AuthService>,
    autosave_interval: Duration,
}

impl SiteCore {
    /// Open the local store, wire the HTTP gateway and construct every
    /// repository. This must be called before anything else in the library.
    pub async fn initialize(config: SiteCoreConfig) -> DomainResult<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(SqliteLocalStore::open(&config.db_path).await?);
        let gateway = Arc::new(HttpGateway::new(config.api_base_url));
        Ok(Self::from_parts(gateway, store, config.autosave_interval))
    }

    /// Assemble the core from explicit collaborators. Lets tests and
    /// embedders substitute the gateway or the store.
    pub fn from_parts(
        gateway: Arc<HttpGateway>,
        store: Arc<dyn LocalStore>,
        autosave_interval: Duration,
    ) -> Self {
        Self {
            content: Arc::new(ContentRepository::new(gateway.clone(), store.clone())),
            settings: Arc::new(SettingsRepository::new(gateway.clone(), store.clone())),
            blog: Arc::new(BlogRepository::new(gateway.clone())),
            auth: Arc::new(AuthService::new(gateway, store)),
            autosave_interval,
        }
    }

    /// Spawn the fixed-interval auto-save loops for the document
    /// repositories. Blog CRUD persists immediately and needs none.
    pub fn start_autosave(&self) -> Vec<JoinHandle<()>> {
        vec![
            spawn_autosave(self.content.clone() as Arc<dyn AutoSave>, self.autosave_interval),
            spawn_autosave(self.settings.clone() as Arc<dyn AutoSave>, self.autosave_interval),
        ]
    }
}
