//! fintrack-client: async client for the FinTrack API and the transfer review flow

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod review;

pub use api::FinTrackApi;
pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use models::{ChatReply, UploadReport};
pub use review::{ReviewError, TransferBoard, TransferReview};
