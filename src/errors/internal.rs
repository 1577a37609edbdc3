use thiserror::Error;

/// Internal error type for store and service operations.
///
/// Never exposed via the API directly - endpoints convert to `AuthError` or
/// `ApiError`, which derive a user-facing message from these.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> Self {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
