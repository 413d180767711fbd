pub mod defaults;
pub mod repository;
pub mod types;

pub use repository::SettingsRepository;
pub use types::{CategoryRecord, SettingsBackup, SettingsDocument};
