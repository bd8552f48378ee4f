//! Lifecycle status shared by every resource store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of the most recent operation issued against a store.
///
/// Every store starts `Idle` and moves to `Loading` when an operation is
/// dispatched. The operation's completion settles the store in `Succeeded`
/// or `Failed`; either terminal state re-enters `Loading` on the next
/// dispatch. There is no retry or cancel transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// No operation has been issued yet
    #[default]
    Idle,

    /// An operation is in flight
    Loading,

    /// The latest operation completed and its result was folded in
    Succeeded,

    /// The latest operation failed; the error message is recorded alongside
    Failed,
}

impl LoadStatus {
    /// Check whether an operation is currently in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}
