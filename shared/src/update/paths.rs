//! Path hierarchy updates - the generation-tracking variant

use super::Update;
use serde::{Deserialize, Serialize};

/// A single change to the path hierarchy of one authorizable object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathChange {
    /// Authorizable object the paths belong to (e.g. `db.table`)
    pub authz_obj: String,
    /// Paths newly mapped to the object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_paths: Vec<String>,
    /// Paths no longer mapped to the object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub del_paths: Vec<String>,
}

impl PathChange {
    /// Create an empty change set for one authorizable object.
    pub fn new(authz_obj: impl Into<String>) -> Self {
        Self {
            authz_obj: authz_obj.into(),
            add_paths: Vec::new(),
            del_paths: Vec::new(),
        }
    }

    /// Record a path as newly mapped to the object.
    pub fn add_path(mut self, path: impl Into<String>) -> Self {
        self.add_paths.push(path.into());
        self
    }

    /// Record a path as removed from the object.
    pub fn del_path(mut self, path: impl Into<String>) -> Self {
        self.del_paths.push(path.into());
        self
    }
}

/// Path hierarchy update.
///
/// Deltas are only valid against the snapshot generation they were
/// recorded under, so every update carries its `img_num`. A full-image
/// update replaces the consumer's entire local hierarchy; a delta is
/// applied on top of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsUpdate {
    /// Position in the global change sequence
    pub seq_num: i64,
    /// Snapshot generation this update is relative to
    pub img_num: i64,
    /// Whether the payload is a complete replacement hierarchy
    pub full_image: bool,
    /// Path changes carried by this update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<PathChange>,
}

impl PathsUpdate {
    /// Create a full-image update carrying a complete path hierarchy.
    pub fn full(seq_num: i64, img_num: i64) -> Self {
        Self {
            seq_num,
            img_num,
            full_image: true,
            changes: Vec::new(),
        }
    }

    /// Create an incremental delta update.
    pub fn delta(seq_num: i64, img_num: i64) -> Self {
        Self {
            seq_num,
            img_num,
            full_image: false,
            changes: Vec::new(),
        }
    }

    /// Append a path change to the payload.
    pub fn with_change(mut self, change: PathChange) -> Self {
        self.changes.push(change);
        self
    }
}

impl Update for PathsUpdate {
    fn seq_num(&self) -> i64 {
        self.seq_num
    }

    fn img_num(&self) -> i64 {
        self.img_num
    }

    fn is_full_image(&self) -> bool {
        self.full_image
    }
}
