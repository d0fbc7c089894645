//! Shared protocol types for the policy distribution service
//!
//! Transfer types exchanged between the policy server and its enforcement
//! point consumers: the update variants, the reserved sentinel ids, and
//! the polling request/response contract.

pub mod request;
pub mod update;

// Re-exports
pub use request::{RequestError, UpdateRequest, UpdateResponse};
pub use update::{
    EMPTY_CHANGELOG_ID, EMPTY_SNAPSHOT_ID, PathChange, PathsUpdate, PermissionChange,
    PermissionsUpdate, SEQ_NUM_UNINITIALIZED, UNUSED_IMAGE_NUM, Update,
};
