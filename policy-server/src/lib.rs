//! Policy update distribution server core
//!
//! Serves authoritative path hierarchy and permission grant state to
//! remote enforcement points that poll for updates. The central piece is
//! the [`sync::UpdateForwarder`], which decides per poll whether a
//! consumer gets nothing, one full snapshot, or an ordered run of
//! incremental changes.
//!
//! Durable storage, notification ingest, the bootstrap importer, and the
//! RPC framing live behind the collaborator interfaces in [`sync`] and
//! [`core::state`]; this crate owns only the forwarding decision.

pub mod core;
pub mod sync;

// Re-exports
pub use crate::core::error::{ServiceError, SyncError};
pub use crate::core::state::StateBank;
pub use sync::{ChangeLogSource, SnapshotSource, SyncService, UpdateForwarder};
