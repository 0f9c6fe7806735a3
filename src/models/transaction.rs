//! Transaction model and the edit-side drafts that produce it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TransactionId, TransactionType};
use crate::error::{Result, SpendwiseError};

/// A single recorded money movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Store-assigned identifier ([`TransactionId::UNASSIGNED`] before insert).
    #[serde(default)]
    pub id: TransactionId,
    /// Positive amount; the direction is carried by `kind`.
    pub amount: Decimal,
    /// Free-form category name, usually one of [`super::Category`].
    pub category: String,
    /// Income or expense. Fixed at creation.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// User note, may be empty.
    #[serde(default)]
    pub description: String,
    /// Economic date of the movement (epoch milliseconds on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Record creation time, not user editable.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the amount signed by direction: positive for income,
    /// negative for expense.
    #[inline]
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Returns `true` if this is an expense.
    #[inline]
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// A transaction as submitted by the presentation layer, before the
/// store has assigned it an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Positive amount.
    pub amount: Decimal,
    /// Category name.
    pub category: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// User note, may be empty.
    #[serde(default)]
    pub description: String,
    /// Economic date of the movement.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

impl NewTransaction {
    /// Creates a draft with an empty description.
    #[inline]
    #[must_use]
    pub fn new<C: Into<String>>(
        amount: Decimal,
        category: C,
        kind: TransactionType,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            kind,
            description: String::new(),
            date,
        }
    }

    /// Sets the description.
    #[inline]
    #[must_use]
    pub fn description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the edit-boundary rules: a positive amount and a
    /// non-blank category.
    ///
    /// # Errors
    ///
    /// Returns [`SpendwiseError::InvalidAmount`] or
    /// [`SpendwiseError::BlankCategory`].
    #[inline]
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_category(&self.category)
    }

    /// Turns the draft into an unassigned record created at `created_at`.
    #[inline]
    #[must_use]
    pub fn into_transaction(self, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::UNASSIGNED,
            amount: self.amount,
            category: self.category,
            kind: self.kind,
            description: self.description,
            date: self.date,
            created_at,
        }
    }
}

/// Partial update of a stored transaction.
///
/// Only the fields that are set change. Identifier, direction and
/// creation time cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New category name.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New economic date.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    /// Creates an empty patch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the amount.
    #[inline]
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Changes the category.
    #[inline]
    #[must_use]
    pub fn category<C: Into<String>>(mut self, category: C) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Changes the description.
    #[inline]
    #[must_use]
    pub fn description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Changes the economic date.
    #[inline]
    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns `true` if no field is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    /// Checks the set fields against the edit-boundary rules.
    ///
    /// # Errors
    ///
    /// Returns [`SpendwiseError::EmptyPatch`] when nothing is set, or the
    /// same validation errors as [`NewTransaction::validate`].
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SpendwiseError::EmptyPatch);
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = self.category.as_deref() {
            validate_category(category)?;
        }
        Ok(())
    }

    /// Returns a copy of `base` with the set fields replaced.
    #[inline]
    #[must_use]
    pub fn apply(&self, base: &Transaction) -> Transaction {
        let mut updated = base.clone();
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(category) = self.category.as_ref() {
            updated.category.clone_from(category);
        }
        if let Some(description) = self.description.as_ref() {
            updated.description.clone_from(description);
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        updated
    }
}

/// Rejects zero and negative amounts.
fn validate_amount(amount: Decimal) -> Result<()> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(SpendwiseError::InvalidAmount(amount))
    }
}

/// Rejects empty or whitespace-only category names.
fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        Err(SpendwiseError::BlankCategory)
    } else {
        Ok(())
    }
}
