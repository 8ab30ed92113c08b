//! # Error Types Module
//!
//! This module defines the error types raised by the collaborators the
//! conversation state machine talks to: search backends, the content
//! directory, and the chat transport.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the site and group search backends
#[derive(Debug, Error)]
pub enum SearchError {
    /// The HTTP request could not be completed
    #[error("Network error: {0}")]
    Network(String),
    /// The site answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),
    /// The response body could not be read as a page
    #[error("Parse error: {0}")]
    Parse(String),
    /// The search script could not be spawned or exited with a failure
    #[error("Process error: {0}")]
    Process(String),
    /// The search script printed something that is not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode(err.to_string())
    }
}

/// Errors raised while preparing static content for delivery
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to walk {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),
    #[error("Document not found: {}", .0.display())]
    DocumentMissing(PathBuf),
}

/// Errors raised by the chat transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The Telegram Bot API rejected or failed the request
    #[error("Telegram API error: {0}")]
    Api(String),
    /// The request could not be built from the given content
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// A multi-part album failed after some parts were already delivered
    #[error("Album interrupted after {delivered} of {total} images: {message}")]
    AlbumInterrupted {
        delivered: usize,
        total: usize,
        message: String,
    },
}

impl TransportError {
    /// Images that reached the chat before the request failed
    pub fn delivered_images(&self) -> usize {
        match self {
            TransportError::AlbumInterrupted { delivered, .. } => *delivered,
            _ => 0,
        }
    }
}

impl From<teloxide::RequestError> for TransportError {
    fn from(err: teloxide::RequestError) -> Self {
        TransportError::Api(err.to_string())
    }
}
