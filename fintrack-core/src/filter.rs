//! Filters applied when listing transactions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-side filters for `GET /transactions`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Substring of the vendor / description
    pub vendor: Option<String>,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Query parameters in a stable order. Blank strings are skipped.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(d) = self.start_date {
            out.push(("start_date", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.end_date {
            out.push(("end_date", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(v) = non_blank(&self.vendor) {
            out.push(("vendor", v.to_string()));
        }
        if let Some(c) = non_blank(&self.category) {
            out.push(("category", c.to_string()));
        }
        out
    }

    /// Reject ranges that end before they start
    pub fn validate(&self) -> Result<(), String> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end < start => Err(format!(
                "end date {end} is before start date {start}"
            )),
            _ => Ok(()),
        }
    }
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
