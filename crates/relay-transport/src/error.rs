//! Transport-specific error types.
//!
//! Only setup and payload problems surface as errors. Failures of an
//! individual RPC are absorbed by the client and reported as "no response"
//! (see [`crate::client::RelayClient::invoke`]).

use thiserror::Error;
use tonic::Status;

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The configured host/port does not form a valid endpoint URI.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Failed to encode or decode a command payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] postcard::Error),

    /// gRPC transport error.
    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::transport::Error),

    /// gRPC status error.
    #[error("gRPC status: {0}")]
    Status(#[from] Status),

    /// I/O error, e.g. while building the blocking client's runtime.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Creates a new invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error indicates the relay is unreachable.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Status(status) => status.code() == tonic::Code::Unavailable,
            Self::Grpc(_) => true,
            _ => false,
        }
    }
}

impl From<TransportError> for Status {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidEndpoint { endpoint, reason } => {
                Status::invalid_argument(format!("invalid endpoint {}: {}", endpoint, reason))
            }
            TransportError::Serialization(e) => {
                Status::invalid_argument(format!("serialization error: {}", e))
            }
            TransportError::Grpc(e) => Status::unavailable(e.to_string()),
            TransportError::Status(s) => s,
            TransportError::Io(e) => Status::internal(e.to_string()),
        }
    }
}

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::invalid_endpoint("http://:0", "empty host");
        assert_eq!(err.to_string(), "invalid endpoint http://:0: empty host");

        let err = TransportError::Status(Status::unavailable("refused"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_error_unavailable() {
        assert!(TransportError::Status(Status::unavailable("down")).is_unavailable());
        assert!(!TransportError::Status(Status::not_found("x")).is_unavailable());
        assert!(!TransportError::invalid_endpoint("x", "y").is_unavailable());
    }

    #[test]
    fn test_error_to_status() {
        let truncated = postcard::from_bytes::<u32>(&[]).unwrap_err();
        let status: Status = TransportError::Serialization(truncated).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: Status = TransportError::Status(Status::already_exists("started")).into();
        assert_eq!(status.code(), tonic::Code::AlreadyExists);
    }
}
