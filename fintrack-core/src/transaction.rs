//! Transaction records as returned by the FinTrack API.
//!
//! Field names follow the server's JSON (`_id`, `is_transfer`, `linked_tx_id`, ...).

use serde::{Deserialize, Deserializer, Serialize};

/// Shown wherever a record has no account name.
pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";

/// A single transaction known to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Opaque unique identifier
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Date as sent by the server (usually YYYY-MM-DD)
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Positive = credit, negative = debit
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    /// "income" or "expense"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    /// Set upstream when the record is one leg of a transfer
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_transfer: bool,
    /// Id of the other leg; may point at a record we never received
    #[serde(
        rename = "linked_tx_id",
        default,
        deserialize_with = "lenient_link",
        skip_serializing_if = "Option::is_none"
    )]
    pub linked_id: Option<String>,
}

// one odd field must not fail the whole list
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Int(i64),
    Float(f64),
    #[allow(dead_code)]
    Other(serde::de::IgnoredAny),
}

impl IdValue {
    fn into_string(self) -> Option<String> {
        match self {
            IdValue::Text(s) => Some(s),
            IdValue::Int(n) => Some(n.to_string()),
            IdValue::Float(f) => Some(f.to_string()),
            IdValue::Other(_) => None,
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_link(d)?.unwrap_or_default())
}

/// String or number ids are kept; null and anything else become `None`
fn lenient_link<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdValue>::deserialize(d)?.and_then(IdValue::into_string))
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl TransactionRecord {
    /// Create a plain (non-transfer) record
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            description: description.into(),
            amount,
            kind: None,
            category: None,
            merchant: None,
            account_name: None,
            is_transfer: false,
            linked_id: None,
        }
    }

    /// Mark this record as a transfer leg pointing at `linked_id`
    pub fn linked_to(mut self, linked_id: impl Into<String>) -> Self {
        self.is_transfer = true;
        self.linked_id = Some(linked_id.into());
        self
    }

    pub fn with_account(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The linked id, if this record is flagged as a transfer with a non-empty link
    pub fn transfer_link(&self) -> Option<&str> {
        if !self.is_transfer {
            return None;
        }
        self.linked_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Returns true if this is a debit (negative amount)
    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }

    /// Income rows are highlighted in the transaction list
    pub fn is_income(&self) -> bool {
        self.kind.as_deref() == Some("income") || self.amount > 0.0
    }

    /// Account name for display, falling back to [`UNKNOWN_ACCOUNT`]
    pub fn account_label(&self) -> &str {
        match self.account_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_ACCOUNT,
        }
    }
}
