//! Statement files accepted for upload.

use std::path::Path;

/// How the server will read an uploaded statement, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Csv,
    Excel,
    /// Anything else is read as UTF-8 text
    Text,
}

impl StatementKind {
    /// Extensions are matched case-sensitively, as the server does:
    /// `AMEX.CSV` is read as text.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("csv") => StatementKind::Csv,
            Some("xlsx") | Some("xls") => StatementKind::Excel,
            _ => StatementKind::Text,
        }
    }

    /// MIME type for the multipart `file` part
    pub fn mime_type(&self) -> &'static str {
        match self {
            StatementKind::Csv => "text/csv",
            StatementKind::Excel => "application/vnd.ms-excel",
            StatementKind::Text => "text/plain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::Csv => "CSV",
            StatementKind::Excel => "Excel",
            StatementKind::Text => "text",
        }
    }
}
