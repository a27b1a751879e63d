//! Transfer review: load linked pairs and dissolve them.
//!
//! Nothing is cached between calls. After a successful unlink the pairs are
//! rebuilt from a fresh fetch, so what is shown is always whatever the
//! backend currently links.

use fintrack_core::{resolve_pairs, TransactionFilter, TransferPair};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::FinTrackApi;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("could not load transfers: {0}")]
    LoadFailed(#[source] ApiError),

    #[error("Failed to unlink transactions: {0}")]
    UnlinkFailed(#[source] ApiError),
}

impl ReviewError {
    /// Short notice suitable for showing to the user
    pub fn notice(&self) -> &'static str {
        match self {
            ReviewError::LoadFailed(_) => "could not load transfers",
            ReviewError::UnlinkFailed(_) => "Failed to unlink transactions",
        }
    }
}

/// Stateless operations over a [`FinTrackApi`]
pub struct TransferReview<'a, A> {
    api: &'a A,
}

impl<'a, A: FinTrackApi> TransferReview<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Fetch every transaction and resolve the linked pairs
    pub async fn load(&self) -> Result<Vec<TransferPair>, ReviewError> {
        let records = self
            .api
            .fetch_transactions(&TransactionFilter::default())
            .await
            .map_err(ReviewError::LoadFailed)?;
        let pairs = resolve_pairs(&records);
        debug!(records = records.len(), pairs = pairs.len(), "resolved transfer pairs");
        Ok(pairs)
    }

    /// Ask the backend to dissolve the pair containing `transaction_id`
    pub async fn request_unlink(&self, transaction_id: &str) -> Result<(), ReviewError> {
        self.api
            .unlink_transfer(transaction_id)
            .await
            .map_err(ReviewError::UnlinkFailed)?;
        info!(transaction_id, "transfer unlinked");
        Ok(())
    }
}

/// What the review panel shows: the last loaded pairs and an optional notice.
#[derive(Debug, Clone, Default)]
pub struct TransferBoard {
    pairs: Vec<TransferPair>,
    notice: Option<String>,
}

impl TransferBoard {
    pub fn pairs(&self) -> &[TransferPair] {
        &self.pairs
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Reload pairs. A failed load clears the list.
    pub async fn refresh<A: FinTrackApi>(&mut self, api: &A) -> Result<(), ReviewError> {
        match TransferReview::new(api).load().await {
            Ok(pairs) => {
                self.pairs = pairs;
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "transfer load failed");
                self.pairs.clear();
                self.notice = Some(e.notice().to_string());
                Err(e)
            }
        }
    }

    /// Unlink then reload. A failed unlink leaves the current pairs on screen.
    pub async fn unlink<A: FinTrackApi>(
        &mut self,
        api: &A,
        transaction_id: &str,
    ) -> Result<(), ReviewError> {
        if let Err(e) = TransferReview::new(api).request_unlink(transaction_id).await {
            warn!(error = %e, transaction_id, "unlink failed");
            self.notice = Some(e.notice().to_string());
            return Err(e);
        }
        self.refresh(api).await
    }
}
