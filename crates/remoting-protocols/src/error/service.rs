//! Errors returned by bound service functions.

use thiserror::Error;

/// Tag attached to failures that carry no more specific classification.
pub const UNEXPECTED_ERROR_KIND: &str = "UnexpectedError";

/// Failure of a bound service function.
///
/// `Expected` is a business outcome the service chose to report: its message
/// goes back to the caller and nothing is logged. `Unexpected` is a fault and
/// is logged server-side before being reported. Both carry a `kind` that is
/// surfaced to the client as `exceptionType`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Expected { kind: String, message: String },

    #[error("{error}")]
    Unexpected { kind: String, error: anyhow::Error },
}

impl ServiceError {
    pub fn expected(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Expected {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error, tagging it with its type name.
    pub fn unexpected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unexpected {
            kind: std::any::type_name::<E>().to_string(),
            error: anyhow::Error::new(error),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Expected { kind, .. } | Self::Unexpected { kind, .. } => kind,
        }
    }

    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Expected { .. })
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unexpected {
            kind: UNEXPECTED_ERROR_KIND.to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_error() {
        let err = ServiceError::expected("NotEnoughFunds", "balance too low");
        assert!(err.is_expected());
        assert_eq!(err.kind(), "NotEnoughFunds");
        assert_eq!(err.to_string(), "balance too low");
    }

    #[test]
    fn test_unexpected_from_std_error() {
        let parse_err = "x".parse::<i32>().unwrap_err();
        let err = ServiceError::unexpected(parse_err);
        assert!(!err.is_expected());
        assert!(err.kind().contains("ParseIntError"));
        assert!(err.to_string().contains("invalid digit"));
    }

    #[test]
    fn test_from_anyhow() {
        let err = ServiceError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.kind(), UNEXPECTED_ERROR_KIND);
        assert_eq!(err.to_string(), "disk on fire");
    }
}
