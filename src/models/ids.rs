//! Newtype wrapper for transaction identifiers.

use serde::{Deserialize, Serialize};

/// Unique identifier of a stored transaction.
///
/// Identifiers are assigned by the store on first insert. Before that a
/// record carries [`TransactionId::UNASSIGNED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Placeholder identifier of a record the store has not seen yet.
    pub const UNASSIGNED: Self = Self(0);

    /// Creates a new identifier from the given value.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner value.
    #[inline]
    #[must_use]
    pub const fn as_inner(&self) -> &i64 {
        &self.0
    }

    /// Consumes the wrapper and returns the inner value.
    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Returns `true` once the store has assigned this identifier.
    #[inline]
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != Self::UNASSIGNED.0
    }
}

impl Default for TransactionId {
    #[inline]
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl core::fmt::Display for TransactionId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for TransactionId {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unassigned() {
        let id = TransactionId::default();
        assert_eq!(id, TransactionId::UNASSIGNED);
        assert!(!id.is_assigned());
    }

    #[test]
    fn assigned_id_roundtrips_inner_value() {
        let id = TransactionId::new(123);
        assert!(id.is_assigned());
        assert_eq!(*id.as_inner(), 123);
        assert_eq!(id.into_inner(), 123);
        assert_eq!(TransactionId::from(123_i64), id);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&TransactionId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: TransactionId = serde_json::from_str("7").unwrap();
        assert_eq!(back, TransactionId::new(7));
    }

    #[test]
    fn display_shows_number() {
        assert_eq!(TransactionId::new(42).to_string(), "42");
    }
}
