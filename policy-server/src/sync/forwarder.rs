//! Catch-up decision logic
//!
//! Given the position a consumer last applied, answer with nothing, one
//! full snapshot, or an ordered run of incremental changes. Applying the
//! answer in order on top of the reported position reconstructs the
//! authority's current state (read-committed, not linearizable).
//!
//! The guarded returns below encode the precedence of the protocol:
//! reload flag, then no-snapshot, then generation-blind, then first-sync,
//! then generation rollover, then delta-or-fallback. Reordering them
//! changes observable behavior at the sentinel boundaries.

use std::sync::Arc;

use shared::{EMPTY_CHANGELOG_ID, EMPTY_SNAPSHOT_ID, UNUSED_IMAGE_NUM, Update};
use tracing::debug;

use super::source::{ChangeLogSource, SnapshotSource};
use crate::core::error::SyncError;
use crate::core::state::{FULL_RELOAD_RUNNING, StateBank};

/// Per-channel update forwarder.
///
/// Stateless: every call re-reads the two sources and the state bank and
/// returns a fresh result, so one instance serves any number of
/// concurrent consumer polls. Which consumer is asking is not tracked
/// here; position bookkeeping belongs to the consumers themselves.
pub struct UpdateForwarder<U: Update> {
    component: String,
    snapshots: Arc<dyn SnapshotSource<U>>,
    changelog: Arc<dyn ChangeLogSource<U>>,
    state: Arc<StateBank>,
}

impl<U: Update> UpdateForwarder<U> {
    pub fn new(
        component: impl Into<String>,
        snapshots: Arc<dyn SnapshotSource<U>>,
        changelog: Arc<dyn ChangeLogSource<U>>,
        state: Arc<StateBank>,
    ) -> Self {
        Self {
            component: component.into(),
            snapshots,
            changelog,
            state,
        }
    }

    /// Answer a consumer poll reporting `(seq_num, img_num)` as the last
    /// applied position.
    ///
    /// A non-empty result is ordered by ascending sequence number and is
    /// minimal-and-sufficient for the consumer to converge. An empty
    /// result means "nothing to do", never an error. Source failures
    /// propagate unchanged; nothing is retried or swallowed here.
    pub fn get_all_updates_from(&self, seq_num: i64, img_num: i64) -> Result<Vec<U>, SyncError> {
        // An in-progress full reload leaves the sources partially
        // rebuilt; nothing they report can be served until it finishes.
        if self.state.is_enabled(&self.component, FULL_RELOAD_RUNNING) {
            debug!(
                component = %self.component,
                "full reload in progress, returning no updates"
            );
            return Ok(Vec::new());
        }

        let latest_img = self.snapshots.latest_snapshot_id()?;
        if latest_img == EMPTY_SNAPSHOT_ID {
            debug!(
                component = %self.component,
                "no snapshot captured yet, returning no updates"
            );
            return Ok(Vec::new());
        }

        // A generation-blind consumer has no reference point to compute a
        // delta against; serve a full snapshot once anything has been
        // recorded at all.
        if img_num == UNUSED_IMAGE_NUM {
            let latest_change = self.changelog.latest_change_id()?;
            if latest_change == EMPTY_CHANGELOG_ID {
                debug!(
                    component = %self.component,
                    "change log empty, returning no updates"
                );
                return Ok(Vec::new());
            }
            debug!(
                component = %self.component,
                "serving full snapshot to generation-blind consumer"
            );
            return Ok(vec![self.snapshots.retrieve_full_snapshot()?]);
        }

        // First sync: the consumer saw nothing before, and a snapshot now
        // exists.
        if img_num == EMPTY_SNAPSHOT_ID {
            debug!(
                component = %self.component,
                latest_img, "serving first full snapshot"
            );
            return Ok(vec![self.snapshots.retrieve_full_snapshot()?]);
        }

        // Generation rollover: deltas recorded against an older snapshot
        // cannot be replayed onto a newer one, so the consumer rebases.
        if img_num != latest_img {
            debug!(
                component = %self.component,
                img_num, latest_img, "snapshot generation advanced, serving full snapshot"
            );
            return Ok(vec![self.snapshots.retrieve_full_snapshot()?]);
        }

        let latest_change = self.changelog.latest_change_id()?;
        if seq_num > latest_change {
            debug!(
                component = %self.component,
                seq_num, latest_change, "consumer already current, returning no updates"
            );
            return Ok(Vec::new());
        }

        if self.changelog.is_retained(seq_num)? {
            debug!(
                component = %self.component,
                seq_num, latest_change, "serving incremental run"
            );
            return self.changelog.retrieve_run(seq_num, img_num);
        }

        // The requested range was compacted out of retention.
        debug!(
            component = %self.component,
            seq_num, "requested run no longer retained, serving full snapshot"
        );
        Ok(vec![self.snapshots.retrieve_full_snapshot()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::PATHS_COMPONENT;
    use shared::{PathsUpdate, PermissionsUpdate, SEQ_NUM_UNINITIALIZED};

    struct FakeSnapshots<U> {
        latest: i64,
        full: Option<U>,
        fail: bool,
    }

    impl<U> Default for FakeSnapshots<U> {
        fn default() -> Self {
            Self {
                latest: EMPTY_SNAPSHOT_ID,
                full: None,
                fail: false,
            }
        }
    }

    impl<U: Update> SnapshotSource<U> for FakeSnapshots<U> {
        fn latest_snapshot_id(&self) -> Result<i64, SyncError> {
            if self.fail {
                return Err(SyncError::Snapshot("snapshot store offline".to_string()));
            }
            Ok(self.latest)
        }

        fn retrieve_full_snapshot(&self) -> Result<U, SyncError> {
            self.full
                .clone()
                .ok_or_else(|| SyncError::Snapshot("no full image staged".to_string()))
        }
    }

    struct FakeChangeLog<U> {
        latest: i64,
        retained: bool,
        run: Vec<U>,
    }

    impl<U> Default for FakeChangeLog<U> {
        fn default() -> Self {
            Self {
                latest: EMPTY_CHANGELOG_ID,
                retained: false,
                run: Vec::new(),
            }
        }
    }

    impl<U: Update> ChangeLogSource<U> for FakeChangeLog<U> {
        fn latest_change_id(&self) -> Result<i64, SyncError> {
            Ok(self.latest)
        }

        fn is_retained(&self, _from_seq_exclusive: i64) -> Result<bool, SyncError> {
            Ok(self.retained)
        }

        fn retrieve_run(&self, _from_seq_exclusive: i64, _img_num: i64) -> Result<Vec<U>, SyncError> {
            Ok(self.run.clone())
        }
    }

    fn forwarder<U: Update + 'static>(
        snapshots: FakeSnapshots<U>,
        changelog: FakeChangeLog<U>,
        state: Arc<StateBank>,
    ) -> UpdateForwarder<U> {
        UpdateForwarder::new(PATHS_COMPONENT, Arc::new(snapshots), Arc::new(changelog), state)
    }

    fn paths_forwarder(
        snapshots: FakeSnapshots<PathsUpdate>,
        changelog: FakeChangeLog<PathsUpdate>,
    ) -> UpdateForwarder<PathsUpdate> {
        forwarder(snapshots, changelog, Arc::new(StateBank::new()))
    }

    #[test]
    fn test_empty_when_no_snapshot_ever_captured() {
        let fwd = paths_forwarder(FakeSnapshots::default(), FakeChangeLog::default());

        let updates = fwd.get_all_updates_from(1, EMPTY_SNAPSHOT_ID).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_full_reload_running_from_start() {
        let state = Arc::new(StateBank::new());
        state.enable(PATHS_COMPONENT, FULL_RELOAD_RUNNING);
        let fwd = forwarder::<PathsUpdate>(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog::default(),
            state,
        );

        let updates = fwd.get_all_updates_from(SEQ_NUM_UNINITIALIZED, 1).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_full_reload_running_after_rollover() {
        let state = Arc::new(StateBank::new());
        state.enable(PATHS_COMPONENT, FULL_RELOAD_RUNNING);
        let fwd = forwarder::<PathsUpdate>(
            FakeSnapshots {
                latest: 2,
                ..Default::default()
            },
            FakeChangeLog::default(),
            state,
        );

        let updates = fwd.get_all_updates_from(SEQ_NUM_UNINITIALIZED, 1).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_generation_blind_and_no_changes_recorded() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog::default(),
        );

        let updates = fwd.get_all_updates_from(1, UNUSED_IMAGE_NUM).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_full_snapshot_when_generation_blind_and_changes_exist() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                full: Some(PathsUpdate::full(1, 1)),
                ..Default::default()
            },
            FakeChangeLog {
                latest: 1,
                ..Default::default()
            },
        );

        let updates = fwd.get_all_updates_from(0, UNUSED_IMAGE_NUM).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 1);
        assert_eq!(updates[0].img_num(), 1);
        assert!(updates[0].is_full_image());
    }

    #[test]
    fn test_full_snapshot_on_first_sync() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                full: Some(PathsUpdate::full(1, 1)),
                ..Default::default()
            },
            FakeChangeLog::default(),
        );

        let updates = fwd.get_all_updates_from(0, EMPTY_SNAPSHOT_ID).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 1);
        assert_eq!(updates[0].img_num(), 1);
        assert!(updates[0].is_full_image());
    }

    #[test]
    fn test_empty_on_first_sync_when_full_reload_running() {
        let state = Arc::new(StateBank::new());
        state.enable(PATHS_COMPONENT, FULL_RELOAD_RUNNING);
        let fwd = forwarder(
            FakeSnapshots {
                latest: 1,
                full: Some(PathsUpdate::full(1, 1)),
                ..Default::default()
            },
            FakeChangeLog::default(),
            state,
        );

        let updates = fwd.get_all_updates_from(0, EMPTY_SNAPSHOT_ID).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_consumer_already_current() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog {
                latest: 10,
                ..Default::default()
            },
        );

        let updates = fwd.get_all_updates_from(11, 1).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_consumer_ahead_of_change_log() {
        // A consumer position past the latest recorded change means there
        // is nothing newer to serve, however far past it is.
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog {
                latest: 10,
                ..Default::default()
            },
        );

        let updates = fwd.get_all_updates_from(15, 1).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_when_uninitialized_and_change_log_empty() {
        // Relies on SEQ_NUM_UNINITIALIZED sorting after EMPTY_CHANGELOG_ID:
        // an uninitialized consumer on the current generation with no
        // recorded activity is already current.
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog::default(),
        );

        let updates = fwd.get_all_updates_from(SEQ_NUM_UNINITIALIZED, 1).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_full_snapshot_when_generation_advanced() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 2,
                full: Some(PathsUpdate::full(1, 2)),
                ..Default::default()
            },
            FakeChangeLog::default(),
        );

        let updates = fwd.get_all_updates_from(1, 1).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 1);
        assert_eq!(updates[0].img_num(), 2);
        assert!(updates[0].is_full_image());
    }

    #[test]
    fn test_full_snapshot_when_run_compacted() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                full: Some(PathsUpdate::full(3, 1)),
                ..Default::default()
            },
            FakeChangeLog {
                latest: 3,
                retained: false,
                ..Default::default()
            },
        );

        let updates = fwd.get_all_updates_from(2, 1).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 3);
        assert_eq!(updates[0].img_num(), 1);
        assert!(updates[0].is_full_image());
    }

    #[test]
    fn test_incremental_run_when_retained() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog {
                latest: 3,
                retained: true,
                run: vec![PathsUpdate::delta(3, 1)],
            },
        );

        let updates = fwd.get_all_updates_from(2, 1).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 3);
        assert_eq!(updates[0].img_num(), 1);
        assert!(!updates[0].is_full_image());
    }

    #[test]
    fn test_incremental_run_is_ordered_ascending() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                latest: 1,
                ..Default::default()
            },
            FakeChangeLog {
                latest: 3,
                retained: true,
                run: vec![PathsUpdate::delta(2, 1), PathsUpdate::delta(3, 1)],
            },
        );

        let updates = fwd.get_all_updates_from(1, 1).unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates.windows(2).all(|w| w[0].seq_num() < w[1].seq_num()));
        assert!(updates.iter().all(|u| !u.is_full_image()));
    }

    #[test]
    fn test_permissions_full_snapshot_echoes_unused_generation() {
        // Snapshot and change ids of 0 are legitimate, not sentinels.
        let fwd = forwarder::<PermissionsUpdate>(
            FakeSnapshots {
                latest: 0,
                full: Some(PermissionsUpdate::full(1)),
                ..Default::default()
            },
            FakeChangeLog {
                latest: 0,
                ..Default::default()
            },
            Arc::new(StateBank::new()),
        );

        let updates = fwd.get_all_updates_from(0, UNUSED_IMAGE_NUM).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].seq_num(), 1);
        assert_eq!(updates[0].img_num(), UNUSED_IMAGE_NUM);
        assert!(updates[0].is_full_image());
    }

    #[test]
    fn test_snapshot_source_failure_propagates() {
        let fwd = paths_forwarder(
            FakeSnapshots {
                fail: true,
                ..Default::default()
            },
            FakeChangeLog::default(),
        );

        let err = fwd.get_all_updates_from(1, 1).unwrap_err();
        assert!(matches!(err, SyncError::Snapshot(_)));
    }
}
