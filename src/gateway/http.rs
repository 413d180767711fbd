use super::types::{
    BlogPostBody, BlogPostPayload, CheckAuthResponse, ColorSettingsPayload,
    GeneralSettingsPayload, LoginRequest, LoginResponse, WhatsAppSettingsPayload,
};
use super::{AuthGateway, BlogGateway, ContentGateway, SettingsGateway};
use crate::domains::blog::BlogPost;
use crate::domains::content::{ContentDocument, SectionRecord};
use crate::domains::settings::{CategoryRecord, SettingsDocument};
use crate::errors::{GatewayError, GatewayResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// The one concrete gateway: a thin typed reqwest client over the backend
/// CRUD endpoints, implementing every per-domain gateway trait.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &str,
        id: &str,
    ) -> GatewayResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(GatewayError::from)?;
        Self::decode(response, entity, id).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
        entity: &str,
        id: &str,
    ) -> GatewayResult<T> {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from)?;
        Self::decode(response, entity, id).await
    }

    async fn send_json_unit<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
        entity: &str,
        id: &str,
    ) -> GatewayResult<()> {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from)?;
        Self::check_status(&response, entity, id)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        entity: &str,
        id: &str,
    ) -> GatewayResult<T> {
        Self::check_status(&response, entity, id)?;
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Deserialize(err.to_string()))
    }

    fn check_status(response: &Response, entity: &str, id: &str) -> GatewayResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::from_status(status.as_u16(), entity, id))
        }
    }
}

#[async_trait]
impl ContentGateway for HttpGateway {
    async fn fetch_content(&self) -> GatewayResult<ContentDocument> {
        self.get_json("/api/content", "content", "-").await
    }

    async fn fetch_site_content(&self) -> GatewayResult<ContentDocument> {
        self.get_json("/api/site/content", "content", "-").await
    }

    async fn fetch_section(&self, section: &str) -> GatewayResult<SectionRecord> {
        self.get_json(&format!("/api/content/{}", section), "section", section)
            .await
    }

    async fn persist_content(&self, document: &ContentDocument) -> GatewayResult<()> {
        for (section, data) in document.sections() {
            self.send_json_unit(
                reqwest::Method::PUT,
                &format!("/api/content/{}", section),
                data,
                "section",
                section,
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsGateway for HttpGateway {
    async fn fetch_settings(&self) -> GatewayResult<SettingsDocument> {
        let general: GeneralSettingsPayload =
            self.get_json("/api/settings/general", "settings", "general").await?;
        let whatsapp: WhatsAppSettingsPayload =
            self.get_json("/api/settings/whatsapp", "settings", "whatsapp").await?;
        let colors: ColorSettingsPayload =
            self.get_json("/api/settings/colors", "settings", "colors").await?;

        let mut site = general.site;
        site.insert("themes".to_string(), Value::Object(colors.themes));
        site.insert(
            "active_theme".to_string(),
            Value::String(colors.active_theme),
        );

        let whatsapp_record = serde_json::to_value(&whatsapp)
            .ok()
            .and_then(|value| value.as_object().cloned())
            .unwrap_or_default();

        let mut categories = Map::new();
        categories.insert("doctor".to_string(), Value::Object(general.doctor));
        categories.insert("clinic".to_string(), Value::Object(general.clinic));
        categories.insert("social".to_string(), Value::Object(general.social));
        categories.insert("site".to_string(), Value::Object(site));
        categories.insert("whatsapp".to_string(), Value::Object(whatsapp_record));
        Ok(SettingsDocument::from_categories(categories))
    }

    async fn persist_settings(&self, document: &SettingsDocument) -> GatewayResult<()> {
        let category = |name: &str| -> CategoryRecord {
            document.category(name).cloned().unwrap_or_default()
        };

        let site = category("site");
        let general = GeneralSettingsPayload {
            doctor: category("doctor"),
            clinic: category("clinic"),
            social: category("social"),
            site: site.clone(),
        };
        self.send_json_unit(
            reqwest::Method::POST,
            "/api/settings/general",
            &general,
            "settings",
            "general",
        )
        .await?;

        let colors = ColorSettingsPayload {
            themes: site
                .get("themes")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            active_theme: site
                .get("active_theme")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };
        self.send_json_unit(
            reqwest::Method::POST,
            "/api/settings/colors",
            &colors,
            "settings",
            "colors",
        )
        .await?;

        let whatsapp: WhatsAppSettingsPayload =
            serde_json::from_value(Value::Object(category("whatsapp")))
                .map_err(|err| GatewayError::Deserialize(err.to_string()))?;
        self.send_json_unit(
            reqwest::Method::POST,
            "/api/settings/whatsapp",
            &whatsapp,
            "settings",
            "whatsapp",
        )
        .await
    }
}

#[async_trait]
impl BlogGateway for HttpGateway {
    async fn list_posts(&self) -> GatewayResult<Vec<BlogPost>> {
        let payloads: Vec<BlogPostPayload> =
            self.get_json("/api/blog/posts", "BlogPost", "-").await?;
        // Server order is authoritative; no client-side re-sorting.
        Ok(payloads.into_iter().map(BlogPost::from).collect())
    }

    async fn get_post(&self, id: i64) -> GatewayResult<BlogPost> {
        let payload: BlogPostPayload = self
            .get_json(
                &format!("/api/blog/posts/{}", id),
                "BlogPost",
                &id.to_string(),
            )
            .await?;
        Ok(payload.into())
    }

    async fn create_post(&self, title: &str, content: &str) -> GatewayResult<BlogPost> {
        let payload: BlogPostPayload = self
            .send_json(
                reqwest::Method::POST,
                "/api/blog/posts",
                &BlogPostBody { title, content },
                "BlogPost",
                "-",
            )
            .await?;
        Ok(payload.into())
    }

    async fn update_post(&self, id: i64, title: &str, content: &str) -> GatewayResult<BlogPost> {
        let payload: BlogPostPayload = self
            .send_json(
                reqwest::Method::PUT,
                &format!("/api/blog/posts/{}", id),
                &BlogPostBody { title, content },
                "BlogPost",
                &id.to_string(),
            )
            .await?;
        Ok(payload.into())
    }

    async fn delete_post(&self, id: i64) -> GatewayResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/blog/posts/{}", id)))
            .send()
            .await
            .map_err(GatewayError::from)?;
        Self::check_status(&response, "BlogPost", &id.to_string())
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> GatewayResult<LoginResponse> {
        self.send_json(
            reqwest::Method::POST,
            "/api/admin/login",
            &LoginRequest { username, password },
            "session",
            username,
        )
        .await
    }

    async fn check_auth(&self, token: &str) -> GatewayResult<CheckAuthResponse> {
        let response = self
            .client
            .get(self.url("/api/admin/check-auth"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(GatewayError::from)?;
        Self::decode(response, "session", "-").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let gateway = HttpGateway::new("https://clinic.example.com/");
        assert_eq!(
            gateway.url("/api/content"),
            "https://clinic.example.com/api/content"
        );
    }

    #[test]
    fn blog_payload_uses_portuguese_field_names() {
        let payload: BlogPostPayload = serde_json::from_str(
            r#"{"id": 7, "titulo": "Titulo", "conteudo": "Corpo do artigo"}"#,
        )
        .unwrap();
        let post = BlogPost::from(payload);
        assert_eq!(post.id, 7);
        assert_eq!(post.title, "Titulo");

        let body = serde_json::to_value(BlogPostBody {
            title: "T",
            content: "C",
        })
        .unwrap();
        assert_eq!(body["titulo"], "T");
        assert_eq!(body["conteudo"], "C");
    }
}
