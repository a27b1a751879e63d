//! fintrack-core: transaction types and view models for the FinTrack client

pub mod category;
pub mod chat;
pub mod filter;
pub mod format;
pub mod statement;
pub mod transaction;
pub mod transfer;

pub use category::{summarize_categories, CategorySummary, UNCATEGORIZED};
pub use chat::{ChatMessage, ChatTranscript, Role};
pub use filter::TransactionFilter;
pub use format::format_amount;
pub use statement::StatementKind;
pub use transaction::{TransactionRecord, UNKNOWN_ACCOUNT};
pub use transfer::{resolve_pairs, TransferLegs, TransferPair};
