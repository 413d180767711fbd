use super::session::{SessionRecord, SessionUser};
use crate::errors::{DomainError, GatewayError, ServiceError, ServiceResult};
use crate::gateway::AuthGateway;
use crate::store::{self, keys, LocalStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Minimal admin session state gating the editing surfaces.
///
/// The session record lives in the local store; `is_authenticated` is a pure
/// function of that record and the current clock. Expiry is lazy: the record
/// is deleted on the first read that finds it expired, never by a background
/// timer.
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn LocalStore>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn LocalStore>) -> Self {
        Self { gateway, store }
    }

    /// Authenticate against the backend and persist a session record with a
    /// 24-hour expiry. Credential checking itself is the backend's concern.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<SessionRecord> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::Authentication(
                "username and password are required".to_string(),
            ));
        }

        let response = self
            .gateway
            .login(username.trim(), password)
            .await
            .map_err(|err| match err {
                GatewayError::Status(401) | GatewayError::Validation(_) => {
                    ServiceError::Authentication("invalid credentials".to_string())
                }
                other => ServiceError::Domain(other.into()),
            })?;

        let record = SessionRecord::new(response.user, response.token.clone());
        store::write_json(self.store.as_ref(), keys::AUTH_SESSION, &record)
            .await
            .map_err(DomainError::from)?;
        self.store
            .put(keys::AUTH_TOKEN, &record.token)
            .await
            .map_err(DomainError::from)?;

        log::info!("admin session opened for {}", record.user.email);
        Ok(record)
    }

    /// Whether a valid, unexpired session exists right now.
    pub async fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now()).await
    }

    pub(crate) async fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        match store::read_json::<SessionRecord>(self.store.as_ref(), keys::AUTH_SESSION).await {
            Ok(Some(record)) if record.is_valid_at(now) => true,
            Ok(Some(_)) => {
                log::info!("admin session expired, clearing stored record");
                self.clear_session().await;
                false
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("session read failed: {}", err);
                false
            }
        }
    }

    /// The logged-in user, if the session is still valid.
    pub async fn current_user(&self) -> Option<SessionUser> {
        match store::read_json::<SessionRecord>(self.store.as_ref(), keys::AUTH_SESSION).await {
            Ok(Some(record)) if record.is_valid_at(Utc::now()) => Some(record.user),
            _ => None,
        }
    }

    /// Delete the stored session unconditionally.
    pub async fn logout(&self) {
        self.clear_session().await;
        log::info!("admin session closed");
    }

    async fn clear_session(&self) {
        if let Err(err) = self.store.remove(keys::AUTH_SESSION).await {
            log::warn!("failed to remove session record: {}", err);
        }
        if let Err(err) = self.store.remove(keys::AUTH_TOKEN).await {
            log::warn!("failed to remove session token: {}", err);
        }
    }

    /// Ask the backend whether the stored token is still accepted. A
    /// negative answer clears the local session.
    pub async fn check_auth(&self) -> ServiceResult<bool> {
        let token = self
            .store
            .get(keys::AUTH_TOKEN)
            .await
            .map_err(DomainError::from)?
            .ok_or(ServiceError::SessionExpired)?;

        let response = self
            .gateway
            .check_auth(&token)
            .await
            .map_err(|err| ServiceError::Domain(err.into()))?;

        if !response.authenticated {
            self.clear_session().await;
        }
        Ok(response.authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GatewayResult;
    use crate::gateway::types::{CheckAuthResponse, LoginResponse};
    use crate::store::MemoryLocalStore;
    use async_trait::async_trait;
    use chrono::Duration;

    struct MockGateway {
        accept: bool,
        check_authenticated: bool,
    }

    #[async_trait]
    impl AuthGateway for MockGateway {
        async fn login(&self, username: &str, _password: &str) -> GatewayResult<LoginResponse> {
            if self.accept {
                Ok(LoginResponse {
                    token: "token-123".to_string(),
                    user: SessionUser {
                        name: "Admin".to_string(),
                        role: "admin".to_string(),
                        email: format!("{}@clinic.test", username),
                    },
                })
            } else {
                Err(GatewayError::Status(401))
            }
        }

        async fn check_auth(&self, _token: &str) -> GatewayResult<CheckAuthResponse> {
            Ok(CheckAuthResponse {
                authenticated: self.check_authenticated,
                user: None,
            })
        }
    }

    fn service(accept: bool) -> AuthService {
        AuthService::new(
            Arc::new(MockGateway {
                accept,
                check_authenticated: accept,
            }),
            Arc::new(MemoryLocalStore::new()),
        )
    }

    #[tokio::test]
    async fn login_then_authenticated() {
        let auth = service(true);
        let record = auth.login("admin", "secret").await.unwrap();
        assert!(record.authenticated);
        assert!(auth.is_authenticated().await);
        assert_eq!(auth.current_user().await.unwrap().role, "admin");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_as_authentication_error() {
        let auth = service(false);
        let result = auth.login("admin", "wrong").await;
        assert!(matches!(result, Err(ServiceError::Authentication(_))));
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn empty_credentials_never_reach_the_gateway() {
        let auth = service(true);
        assert!(matches!(
            auth.login("  ", "x").await,
            Err(ServiceError::Authentication(_))
        ));
        assert!(matches!(
            auth.login("admin", "").await,
            Err(ServiceError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn session_expires_lazily_after_24_hours() {
        let auth = service(true);
        auth.login("admin", "secret").await.unwrap();

        assert!(auth.is_authenticated_at(Utc::now()).await);
        // 25 hours later the same stored record is expired and gets cleared
        // without any explicit logout.
        assert!(!auth.is_authenticated_at(Utc::now() + Duration::hours(25)).await);
        // The record is gone even for a clock back in the valid window.
        assert!(!auth.is_authenticated_at(Utc::now()).await);
    }

    #[tokio::test]
    async fn logout_clears_unconditionally() {
        let auth = service(true);
        auth.login("admin", "secret").await.unwrap();
        auth.logout().await;
        assert!(!auth.is_authenticated().await);
        assert!(auth.current_user().await.is_none());

        // Logging out twice is fine.
        auth.logout().await;
    }

    #[tokio::test]
    async fn check_auth_without_token_is_session_expired() {
        let auth = service(true);
        assert!(matches!(
            auth.check_auth().await,
            Err(ServiceError::SessionExpired)
        ));

        auth.login("admin", "secret").await.unwrap();
        assert!(auth.check_auth().await.unwrap());
    }
}
