//! Error types for the sync layer

use shared::RequestError;
use thiserror::Error;

/// Failure raised by a snapshot or change log store.
///
/// The forwarder never catches these; they surface to the transport
/// layer unchanged, which owns the retry-on-reconnect policy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Snapshot store failure
    #[error("snapshot source failure: {0}")]
    Snapshot(String),

    /// Change log store failure
    #[error("change log source failure: {0}")]
    ChangeLog(String),

    /// Opaque failure from the underlying storage backend
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error returned by the channel-level service API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request rejected before reaching the forwarder
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),

    /// Source failure propagated through the forwarder
    #[error(transparent)]
    Sync(#[from] SyncError),
}
