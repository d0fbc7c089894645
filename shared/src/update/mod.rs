//! Update transfer types
//!
//! An update is a single unit of state transfer returned to a polling
//! consumer: either a complete replacement snapshot (full image) or an
//! incremental delta applied on top of the consumer's local state.
//!
//! Two variants exist. [`PathsUpdate`] tracks which snapshot generation a
//! delta was recorded against; [`PermissionsUpdate`] does not, and always
//! reports [`UNUSED_IMAGE_NUM`] as its generation.

pub mod paths;
pub mod permissions;

pub use paths::{PathChange, PathsUpdate};
pub use permissions::{PermissionChange, PermissionsUpdate};

/// The consumer has no prior position in the change sequence.
pub const SEQ_NUM_UNINITIALIZED: i64 = -1;

/// No incremental change has ever been recorded.
///
/// Must stay below [`SEQ_NUM_UNINITIALIZED`]: an uninitialized consumer
/// polling a server whose change log is empty lands in the already-current
/// branch of the forwarder and gets an empty answer.
pub const EMPTY_CHANGELOG_ID: i64 = -2;

/// No snapshot has ever been produced.
pub const EMPTY_SNAPSHOT_ID: i64 = -3;

/// The consumer does not track snapshot generations.
pub const UNUSED_IMAGE_NUM: i64 = -4;

/// Capability set shared by both update variants.
///
/// Valid ids are non-negative. The reserved sentinel constants in this
/// module mark out-of-band conditions and are never assigned to real
/// updates; 0 is a legitimate id, not a sentinel.
pub trait Update: Clone + Send + Sync {
    /// Position of this update in the global change sequence.
    /// Server-assigned, monotonically increasing, never reused.
    fn seq_num(&self) -> i64;

    /// Snapshot generation this update is relative to, or
    /// [`UNUSED_IMAGE_NUM`] for the generation-agnostic variant.
    fn img_num(&self) -> i64;

    /// True if the payload is a complete replacement snapshot rather than
    /// a delta.
    fn is_full_image(&self) -> bool;
}
