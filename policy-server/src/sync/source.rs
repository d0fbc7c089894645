//! Storage collaborator interfaces
//!
//! The durable store behind each channel exposes two capabilities: the
//! latest full snapshot, and the ordered log of incremental changes
//! recorded since. Calls may block on underlying I/O; failures propagate
//! to the caller unchanged.

use crate::core::error::SyncError;
use shared::Update;

/// Source of full snapshots for one channel.
pub trait SnapshotSource<U: Update>: Send + Sync {
    /// Id of the latest snapshot generation, or
    /// [`shared::EMPTY_SNAPSHOT_ID`] if no snapshot was ever produced.
    fn latest_snapshot_id(&self) -> Result<i64, SyncError>;

    /// Materialize the latest snapshot as a single full-image update,
    /// stamped with the sequence number and generation current at the
    /// moment of capture.
    fn retrieve_full_snapshot(&self) -> Result<U, SyncError>;
}

/// Source of incremental changes for one channel.
pub trait ChangeLogSource<U: Update>: Send + Sync {
    /// Highest recorded sequence number, or
    /// [`shared::EMPTY_CHANGELOG_ID`] if no change was ever recorded.
    fn latest_change_id(&self) -> Result<i64, SyncError>;

    /// Whether the contiguous run of changes starting immediately after
    /// `from_seq_exclusive` up through the latest is still retained, i.e.
    /// has not been compacted away.
    fn is_retained(&self, from_seq_exclusive: i64) -> Result<bool, SyncError>;

    /// The contiguous, strictly increasing run of incremental updates
    /// after `from_seq_exclusive`, each stamped with `img_num`.
    ///
    /// Only defined when [`is_retained`](Self::is_retained) holds for the
    /// same position; callers must check first.
    fn retrieve_run(&self, from_seq_exclusive: i64, img_num: i64) -> Result<Vec<U>, SyncError>;
}
