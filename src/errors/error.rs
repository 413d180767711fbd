use std::fmt;
use thiserror::Error;

/// Errors produced by the remote HTTP gateway.
///
/// Every non-2xx response and every transport failure is mapped into one of
/// these variants so callers can branch on the failure class instead of
/// inspecting raw status codes.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("{0} not found: {1}")]
    NotFound(String, String),

    #[error("request rejected: {0}")]
    Validation(String),

    #[error("malformed response body: {0}")]
    Deserialize(String),
}

impl GatewayError {
    /// Map a non-2xx status to the failure class callers branch on.
    pub fn from_status(status: u16, entity: &str, id: &str) -> Self {
        match status {
            404 => GatewayError::NotFound(entity.to_string(), id.to_string()),
            400 | 422 => GatewayError::Validation(format!("{} rejected by server", entity)),
            other => GatewayError::Status(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_, _))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Deserialize(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

/// Local key-value store errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no value stored under key '{0}'")]
    MissingKey(String),

    #[error("local store unavailable: {0}")]
    Unavailable(String),
}

/// Validation errors
#[derive(Debug, Error, Clone)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' must be at least {min} characters")]
    MinLength { field: String, min: usize },

    #[error("Field '{field}' cannot exceed {max} characters")]
    MaxLength { field: String, max: usize },

    #[error("Field '{field}' must be between {min} and {max}")]
    Range {
        field: String,
        min: String,
        max: String,
    },

    #[error("Field '{field}' contains invalid format: {reason}")]
    Format { field: String, reason: String },

    #[error("Field '{field}' contains an invalid value: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Validation error: {0}")]
    Custom(String),
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        Self::Required {
            field: field.to_string(),
        }
    }

    pub fn min_length(field: &str, min: usize) -> Self {
        Self::MinLength {
            field: field.to_string(),
            min,
        }
    }

    pub fn max_length(field: &str, max: usize) -> Self {
        Self::MaxLength {
            field: field.to_string(),
            max,
        }
    }

    pub fn range<T: fmt::Display>(field: &str, min: T, max: T) -> Self {
        Self::Range {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn format(field: &str, reason: &str) -> Self {
        Self::Format {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn custom(message: &str) -> Self {
        Self::Custom(message.to_string())
    }
}

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} not found with id {1}")]
    EntityNotFound(String, String),

    #[error("index {index} out of range for {section}.{field} (len {len})")]
    IndexOutOfRange {
        section: String,
        field: String,
        index: usize,
        len: usize,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Service-level errors (auth-facing)
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("session expired")]
    SessionExpired,
}
