//! Error types for port operations.

/// Outbound operation errors with context for debugging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// Resource not found on the remote side.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// HTTP request failed - includes operation name for tracing.
    #[error("HTTP error in {operation}: {message}")]
    Http {
        operation: &'static str,
        message: String,
    },

    /// Could not establish or keep a connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PortError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn http(operation: &'static str, message: impl ToString) -> Self {
        Self::Http {
            operation,
            message: message.to_string(),
        }
    }

    pub fn connection(message: impl ToString) -> Self {
        Self::Connection(message.to_string())
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
