pub mod service;
pub mod session;

pub use service::AuthService;
pub use session::{SessionRecord, SessionUser};
