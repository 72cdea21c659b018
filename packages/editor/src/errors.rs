//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] pagesmith_document::DocumentError),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Drag error: {0}")]
    Drag(#[from] crate::drag::DragError),

    #[error("Network error: {0}")]
    Network(#[from] crate::service::ServiceError),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Save is disabled: {0}")]
    SaveDisabled(String),

    #[error("Save request is for page {request}, but page {open} is open")]
    PageMismatch { request: String, open: String },
}
