//! Common types and utilities shared across blogsync crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the workspace. It stays dependency‑light so every crate
//! can depend on it without dragging in the HTTP or config stacks.
//!
//! # Overview
//!
//! - [`SyncError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Classifying an error by how the import run should react to it:
//!
//! ```rust
//! use blogsync_common::SyncError;
//!
//! let err = SyncError::CommentCreate("rate limited".into());
//! assert!(err.is_recoverable());
//! assert!(!SyncError::Auth("bad password".into()).is_recoverable());
//! ```

pub mod observability;

/// Error types used across the blogsync workspace.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// A date or a record in the export file did not match the expected layout.
    #[error("Format error: {0}")]
    Format(String),

    /// The blog service rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A call to the blog service failed (create/list/update/delete).
    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    /// Creating a single comment failed; the run carries on with the next one.
    #[error("Comment creation failed: {0}")]
    CommentCreate(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the export or writing the audit log failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure that has not been attributed to a call site yet.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl SyncError {
    /// Errors the import run absorbs (log and continue) instead of aborting on.
    ///
    /// Malformed input only ever fails the record it belongs to, and comment
    /// creation is best-effort. Everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SyncError::Format(_) | SyncError::CommentCreate(_))
    }
}

/// Convenient alias for results that use [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;
