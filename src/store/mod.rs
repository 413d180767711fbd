mod local;

pub use local::{read_json, write_json, LocalStore, MemoryLocalStore, SqliteLocalStore};

/// Namespaced keys for everything the core persists locally.
///
/// Each slot is an independently readable/writable JSON document.
pub mod keys {
    /// The site content document (offline fallback / save mirror).
    pub const SITE_CONTENT: &str = "clinic_site_content";
    /// The site settings document.
    pub const SITE_SETTINGS: &str = "clinic_site_settings";
    /// Timestamped content backup slot, distinct from the live slot.
    pub const CONTENT_BACKUP: &str = "clinic_site_content_backup";
    /// Timestamped settings backup slot.
    pub const SETTINGS_BACKUP: &str = "clinic_site_settings_backup";
    /// The admin session record.
    pub const AUTH_SESSION: &str = "clinic_admin_session";
    /// The raw admin token, mirrored out of the session record.
    pub const AUTH_TOKEN: &str = "clinic_admin_token";
}
