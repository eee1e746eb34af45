//! Persistence errors
//!
//! Both kinds are recovered where they happen: logged and swallowed.
//! Persistence is a convenience and never blocks form use.

use thiserror::Error;

/// Failure talking to the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No storage available (private mode, sandboxed frame, native build)
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    /// Includes quota exceeded
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Failure saving or loading a form snapshot
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize form snapshot: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("stored form record is malformed: {0}")]
    MalformedRecord(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
