pub mod blog;
pub mod content;
pub mod settings;
