mod error;

pub use error::{DomainError, GatewayError, PersistenceError, ServiceError, ValidationError};

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type for local store operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
