//! Consumer synchronization layer
//!
//! One forwarder per channel: path hierarchy updates (generation-
//! tracking) and permission grant updates (generation-agnostic). Each
//! forwarder is wired to its own snapshot and change log sources;
//! [`SyncService`] bundles the two channels behind request validation.

mod forwarder;
mod source;

pub use forwarder::UpdateForwarder;
pub use source::{ChangeLogSource, SnapshotSource};

use crate::core::error::ServiceError;
use shared::{PathsUpdate, PermissionsUpdate, UpdateRequest, UpdateResponse};

/// The two update channels exposed to polling consumers.
pub struct SyncService {
    paths: UpdateForwarder<PathsUpdate>,
    permissions: UpdateForwarder<PermissionsUpdate>,
}

impl SyncService {
    pub fn new(
        paths: UpdateForwarder<PathsUpdate>,
        permissions: UpdateForwarder<PermissionsUpdate>,
    ) -> Self {
        Self { paths, permissions }
    }

    /// Poll the path hierarchy channel.
    pub fn get_paths_updates(
        &self,
        request: &UpdateRequest,
    ) -> Result<UpdateResponse<PathsUpdate>, ServiceError> {
        request.validate()?;
        let updates = self
            .paths
            .get_all_updates_from(request.seq_num, request.img_num)?;
        Ok(UpdateResponse::new(updates))
    }

    /// Poll the permission grant channel.
    pub fn get_permissions_updates(
        &self,
        request: &UpdateRequest,
    ) -> Result<UpdateResponse<PermissionsUpdate>, ServiceError> {
        request.validate()?;
        let updates = self
            .permissions
            .get_all_updates_from(request.seq_num, request.img_num)?;
        Ok(UpdateResponse::new(updates))
    }
}
