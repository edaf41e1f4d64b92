//! Income and expense ledger records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{double_option, normalize_reference, reference_field, require_date, Collection, Record};
use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Booking date, usually `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "ConsultantId", default, deserialize_with = "reference_field")]
    pub consultant_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    "other".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(rename = "ConsultantId", default)]
    pub consultant_id: Option<String>,
}

impl TransactionDraft {
    pub fn income(amount: f64, date: impl Into<String>) -> Self {
        Self::new(TransactionKind::Income, amount, date)
    }

    pub fn expense(amount: f64, date: impl Into<String>) -> Self {
        Self::new(TransactionKind::Expense, amount, date)
    }

    fn new(kind: TransactionKind, amount: f64, date: impl Into<String>) -> Self {
        Self {
            amount,
            kind,
            category: default_category(),
            description: String::new(),
            date: date.into(),
            consultant_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        rename = "ConsultantId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub consultant_id: Option<Option<String>>,
}

impl Transaction {
    /// Amount with income positive and expense negative
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Record for Transaction {
    type Draft = TransactionDraft;
    type Patch = TransactionPatch;

    const COLLECTION: Collection = Collection::Transactions;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: TransactionDraft) -> Self {
        Self {
            id,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            consultant_id: normalize_reference(draft.consultant_id),
            created_at,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(StorageError::InvalidInput(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        require_date("date", &self.date)
    }

    fn consultant_id(&self) -> Option<&str> {
        self.consultant_id.as_deref()
    }
}
