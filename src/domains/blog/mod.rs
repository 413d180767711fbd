pub mod repository;
pub mod types;

pub use repository::{BlogRepository, PostListing};
pub use types::{slugify, BlogPost};
