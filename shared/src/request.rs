//! Polling request/response contract
//!
//! Transport-agnostic: whatever RPC layer fronts the server ships these
//! types as-is. A consumer reports the last position it applied and gets
//! back an ordered (possibly empty) run of updates. An empty response
//! means "nothing to do", never an error.

use crate::update::{
    EMPTY_CHANGELOG_ID, EMPTY_SNAPSHOT_ID, SEQ_NUM_UNINITIALIZED, UNUSED_IMAGE_NUM,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request rejected before reaching the forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid seq_num {0}: negative values must be a reserved sentinel")]
    InvalidSeqNum(i64),

    #[error("invalid img_num {0}: negative values must be a reserved sentinel")]
    InvalidImgNum(i64),
}

/// A consumer's poll: the last position it applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Last applied sequence number, or a reserved sentinel
    pub seq_num: i64,
    /// Last applied snapshot generation, or a reserved sentinel
    pub img_num: i64,
}

impl UpdateRequest {
    pub fn new(seq_num: i64, img_num: i64) -> Self {
        Self { seq_num, img_num }
    }

    /// Reject out-of-range ids before they reach the decision logic.
    ///
    /// Valid inputs are non-negative ids previously returned to the
    /// consumer, or one of the reserved sentinels for that field.
    pub fn validate(&self) -> Result<(), RequestError> {
        match self.seq_num {
            n if n >= 0 => {}
            SEQ_NUM_UNINITIALIZED | EMPTY_CHANGELOG_ID => {}
            n => return Err(RequestError::InvalidSeqNum(n)),
        }
        match self.img_num {
            n if n >= 0 => {}
            UNUSED_IMAGE_NUM | EMPTY_SNAPSHOT_ID => {}
            n => return Err(RequestError::InvalidImgNum(n)),
        }
        Ok(())
    }
}

/// Ordered run of updates answering a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse<U> {
    /// Updates in ascending sequence order, possibly empty
    pub updates: Vec<U>,
}

impl<U> UpdateResponse<U> {
    pub fn new(updates: Vec<U>) -> Self {
        Self { updates }
    }

    pub fn empty() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
