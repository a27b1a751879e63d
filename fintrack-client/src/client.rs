//! HTTP client for the FinTrack backend.

use std::path::Path;
use std::time::Duration;

use fintrack_core::{StatementKind, TransactionFilter, TransactionRecord};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::FinTrackApi;
use crate::error::{ApiError, Result};
use crate::models::{
    error_detail, ChatReply, ChatRequest, StatusMessage, UnlinkRequest, UploadReport,
};

/// FinTrack API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`: the backend's liveness message
    pub async fn status(&self) -> Result<String> {
        let resp = self.http_client.get(self.url("/")).send().await?;
        let out: StatusMessage = Self::parse(resp).await?;
        Ok(out.message)
    }

    /// Turn a response into `T`, or into [`ApiError::Status`] with the server's detail
    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(status = status.as_u16(), detail = ?detail, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn expect_success(resp: Response) -> Result<()> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        warn!(status = status.as_u16(), detail = ?detail, "request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

impl FinTrackApi for ApiClient {
    async fn fetch_transactions(&self, filter: &TransactionFilter) -> Result<Vec<TransactionRecord>> {
        let query = filter.query_pairs();
        debug!(?query, "fetching transactions");
        let resp = self
            .http_client
            .get(self.url("/transactions"))
            .query(&query)
            .send()
            .await?;
        let txns: Vec<TransactionRecord> = Self::parse(resp).await?;
        debug!(count = txns.len(), "fetched transactions");
        Ok(txns)
    }

    async fn unlink_transfer(&self, transaction_id: &str) -> Result<()> {
        debug!(transaction_id, "unlinking transfer");
        let body = UnlinkRequest {
            tx_id: transaction_id.to_string(),
        };
        let resp = self
            .http_client
            .post(self.url("/transfers/unlink"))
            .json(&body)
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    async fn upload_statement(&self, path: &Path) -> Result<UploadReport> {
        let kind = StatementKind::from_path(path);
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement".to_string());
        debug!(file = %file_name, kind = kind.label(), size = bytes.len(), "uploading statement");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(kind.mime_type())?;
        let form = Form::new().part("file", part);

        let resp = self
            .http_client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn ask(&self, message: &str) -> Result<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let resp = self
            .http_client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await?;
        Self::parse(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let c = ApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(c.base_url(), "http://localhost:8000");
        assert_eq!(c.url("/transactions"), "http://localhost:8000/transactions");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("localhost", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));

        let err = ApiClient::new("ftp://example.com", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }
}
