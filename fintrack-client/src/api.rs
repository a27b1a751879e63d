//! The seam between views and the backend.

use std::future::Future;
use std::path::Path;

use fintrack_core::{TransactionFilter, TransactionRecord};

use crate::error::Result;
use crate::models::{ChatReply, UploadReport};

/// Calls the presentation layer makes against the FinTrack backend.
///
/// [`crate::ApiClient`] talks HTTP; tests substitute an in-memory fake.
pub trait FinTrackApi {
    /// `GET /transactions`
    fn fetch_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>>> + Send;

    /// `POST /transfers/unlink`; the server clears both legs
    fn unlink_transfer(&self, transaction_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// `POST /upload`
    fn upload_statement(&self, path: &Path) -> impl Future<Output = Result<UploadReport>> + Send;

    /// `POST /chat`
    fn ask(&self, message: &str) -> impl Future<Output = Result<ChatReply>> + Send;
}
