// src/types.rs
use std::fmt;

/// Lifecycle of a [`WorkUnit`](crate::miner::WorkUnit)
///
/// A unit starts out `Created`, moves to `Searching` on its first batch and
/// ends in one of two terminal states. Terminal units are never searched again:
/// a unit that found a share waits for encoding and submission, and a stale
/// unit is simply dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WorkState {
    /// Built from a template, no batch run yet
    #[default]
    Created,

    /// At least one search batch has run without a share
    Searching,

    /// A share was found; the working buffer holds the matching nonce
    ShareFound,

    /// The template was replaced upstream; the unit is discarded
    Stale,
}

impl WorkState {
    /// Whether the unit can no longer be searched
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkState::ShareFound | WorkState::Stale)
    }
}

impl fmt::Display for WorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkState::Created => write!(f, "created"),
            WorkState::Searching => write!(f, "searching"),
            WorkState::ShareFound => write!(f, "share-found"),
            WorkState::Stale => write!(f, "stale"),
        }
    }
}
