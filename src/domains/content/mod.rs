pub mod defaults;
pub mod repository;
pub mod types;

pub use repository::ContentRepository;
pub use types::{ContentBackup, ContentDocument, Review, SectionRecord};
