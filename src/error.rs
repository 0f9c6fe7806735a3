//! Error types for the spendwise library.

use rust_decimal::Decimal;

use crate::models::TransactionId;

/// All errors that can occur when using the spendwise library.
#[derive(Debug, thiserror::Error)]
pub enum SpendwiseError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transaction store backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// A submitted amount was zero or negative.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A submitted category name was empty or whitespace.
    #[error("category must not be blank")]
    BlankCategory,

    /// An update was submitted without any field to change.
    #[error("transaction update contains no changes")]
    EmptyPatch,

    /// No stored transaction has the given identifier.
    #[error("transaction {0} not found")]
    TransactionNotFound(TransactionId),
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, SpendwiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = SpendwiseError::from(serde_err);
        assert!(matches!(err, SpendwiseError::Serialization(_)));
        let msg = err.to_string();
        assert!(msg.contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = SpendwiseError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn error_invalid_amount_display() {
        let err = SpendwiseError::InvalidAmount(Decimal::new(-15, 1));
        assert_eq!(err.to_string(), "amount must be positive, got -1.5");
    }

    #[test]
    fn error_not_found_display() {
        let err = SpendwiseError::TransactionNotFound(TransactionId::new(42));
        assert_eq!(err.to_string(), "transaction 42 not found");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpendwiseError>();
    }
}
