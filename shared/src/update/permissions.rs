//! Permission grant updates - the generation-agnostic variant

use super::{UNUSED_IMAGE_NUM, Update};
use serde::{Deserialize, Serialize};

/// A single change to the privileges of one role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionChange {
    /// Role the privileges belong to
    pub role: String,
    /// Privileges granted to the role
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grant_privileges: Vec<String>,
    /// Privileges revoked from the role
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revoke_privileges: Vec<String>,
}

impl PermissionChange {
    /// Create an empty change set for one role.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            grant_privileges: Vec::new(),
            revoke_privileges: Vec::new(),
        }
    }

    /// Record a privilege as granted to the role.
    pub fn grant(mut self, privilege: impl Into<String>) -> Self {
        self.grant_privileges.push(privilege.into());
        self
    }

    /// Record a privilege as revoked from the role.
    pub fn revoke(mut self, privilege: impl Into<String>) -> Self {
        self.revoke_privileges.push(privilege.into());
        self
    }
}

/// Permission grant update.
///
/// Permission consumers do not track snapshot generations, so this
/// variant carries no generation of its own and always reports
/// [`UNUSED_IMAGE_NUM`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionsUpdate {
    /// Position in the global change sequence
    pub seq_num: i64,
    /// Whether the payload is a complete replacement permission set
    pub full_image: bool,
    /// Permission changes carried by this update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<PermissionChange>,
}

impl PermissionsUpdate {
    /// Create a full-image update carrying a complete permission set.
    pub fn full(seq_num: i64) -> Self {
        Self {
            seq_num,
            full_image: true,
            changes: Vec::new(),
        }
    }

    /// Create an incremental delta update.
    pub fn delta(seq_num: i64) -> Self {
        Self {
            seq_num,
            full_image: false,
            changes: Vec::new(),
        }
    }

    /// Append a permission change to the payload.
    pub fn with_change(mut self, change: PermissionChange) -> Self {
        self.changes.push(change);
        self
    }
}

impl Update for PermissionsUpdate {
    fn seq_num(&self) -> i64 {
        self.seq_num
    }

    fn img_num(&self) -> i64 {
        UNUSED_IMAGE_NUM
    }

    fn is_full_image(&self) -> bool {
        self.full_image
    }
}
