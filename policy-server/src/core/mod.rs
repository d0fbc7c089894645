//! Core service infrastructure: error types and shared process state.

pub mod error;
pub mod state;

pub use error::{ServiceError, SyncError};
pub use state::StateBank;
