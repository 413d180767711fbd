//! Wire DTOs. The backend speaks Portuguese field names for blog payloads
//! and splits settings across three endpoints; none of that leaks past the
//! gateway.

use crate::auth::SessionUser;
use crate::domains::blog::BlogPost;
use crate::domains::settings::CategoryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Blog post as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostPayload {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl From<BlogPostPayload> for BlogPost {
    fn from(payload: BlogPostPayload) -> Self {
        BlogPost {
            id: payload.id,
            title: payload.title,
            content: payload.content,
            created_at: payload.created_at,
        }
    }
}

/// Create/update body: `{titulo, conteudo}`, full-replace semantics.
#[derive(Debug, Serialize)]
pub struct BlogPostBody<'a> {
    #[serde(rename = "titulo")]
    pub title: &'a str,
    #[serde(rename = "conteudo")]
    pub content: &'a str,
}

/// `GET/POST /api/settings/general`: doctor, clinic, social and site fields
/// grouped by category.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeneralSettingsPayload {
    #[serde(default)]
    pub doctor: CategoryRecord,
    #[serde(default)]
    pub clinic: CategoryRecord,
    #[serde(default)]
    pub social: CategoryRecord,
    #[serde(default)]
    pub site: CategoryRecord,
}

/// `GET/POST /api/settings/whatsapp`: the widget config record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppSettingsPayload {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub welcome_message: String,
    #[serde(default)]
    pub widget_enabled: bool,
    #[serde(default)]
    pub widget_position: String,
    #[serde(default)]
    pub widget_color: String,
}

/// `GET/POST /api/settings/colors`: named themes plus the active theme id.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ColorSettingsPayload {
    #[serde(default)]
    pub themes: Map<String, Value>,
    #[serde(default)]
    pub active_theme: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response: a bearer token plus the admin record.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "admin")]
    pub user: SessionUser,
}

/// `{authenticated, admin|user}` from the check-auth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(default, alias = "admin")]
    pub user: Option<SessionUser>,
}
