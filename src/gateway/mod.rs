mod http;
pub mod types;

pub use http::HttpGateway;

use crate::domains::blog::BlogPost;
use crate::domains::content::{ContentDocument, SectionRecord};
use crate::domains::settings::SettingsDocument;
use crate::errors::GatewayResult;
use async_trait::async_trait;
use types::{CheckAuthResponse, LoginResponse};

/// Remote CRUD surface for the site content document.
///
/// Pure I/O: request shaping and typed failures, no business logic. The
/// repositories own all merge and fallback behavior.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// `GET /api/content`
    async fn fetch_content(&self) -> GatewayResult<ContentDocument>;
    /// `GET /api/site/content`, the legacy full-content endpoint used as a
    /// secondary fallback before giving up on the network.
    async fn fetch_site_content(&self) -> GatewayResult<ContentDocument>;
    /// `GET /api/content/{section}`
    async fn fetch_section(&self, section: &str) -> GatewayResult<SectionRecord>;
    /// Push the whole document, one `PUT /api/content/{section}` per section
    /// (the backend has no bulk endpoint).
    async fn persist_content(&self, document: &ContentDocument) -> GatewayResult<()>;
}

/// Remote surface for site settings, fanned out over the
/// `/api/settings/general|whatsapp|colors` endpoints.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    async fn fetch_settings(&self) -> GatewayResult<SettingsDocument>;
    async fn persist_settings(&self, document: &SettingsDocument) -> GatewayResult<()>;
}

/// Remote CRUD surface for blog posts (`/api/blog/posts`).
#[async_trait]
pub trait BlogGateway: Send + Sync {
    async fn list_posts(&self) -> GatewayResult<Vec<BlogPost>>;
    async fn get_post(&self, id: i64) -> GatewayResult<BlogPost>;
    async fn create_post(&self, title: &str, content: &str) -> GatewayResult<BlogPost>;
    async fn update_post(&self, id: i64, title: &str, content: &str) -> GatewayResult<BlogPost>;
    async fn delete_post(&self, id: i64) -> GatewayResult<()>;
}

/// Remote surface for the admin session endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /api/admin/login`
    async fn login(&self, username: &str, password: &str) -> GatewayResult<LoginResponse>;
    /// `GET /api/admin/check-auth`
    async fn check_auth(&self, token: &str) -> GatewayResult<CheckAuthResponse>;
}
