use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session lifetime: expiry is written 24 hours out at login.
pub const SESSION_TTL_HOURS: i64 = 24;

/// The admin user as reported by the backend at login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
}

/// Persisted session state, created on successful login and destroyed on
/// logout or on the first read past `expires_at`.
///
/// Expiry is purely client-clock-based; there is no server-side session
/// invalidation. Known weakness, kept as designed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub authenticated: bool,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
    pub token: String,
}

impl SessionRecord {
    pub fn new(user: SessionUser, token: String) -> Self {
        Self {
            authenticated: true,
            user,
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
            token,
        }
    }

    /// Pure function of the record and the given clock.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.authenticated && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expires_by_clock() {
        let record = SessionRecord::new(SessionUser::default(), "tok".to_string());
        assert!(record.is_valid_at(Utc::now()));
        assert!(record.is_valid_at(Utc::now() + Duration::hours(23)));
        assert!(!record.is_valid_at(Utc::now() + Duration::hours(25)));
    }

    #[test]
    fn unauthenticated_record_is_never_valid() {
        let mut record = SessionRecord::new(SessionUser::default(), "tok".to_string());
        record.authenticated = false;
        assert!(!record.is_valid_at(Utc::now()));
    }
}
