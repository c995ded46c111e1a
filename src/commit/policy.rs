// src/commit/policy.rs
use crate::health::StatusRecord;

/// Decide whether the new observation is worth committing.
///
/// Only healthy-after-healthy stays silent. A first run, any failure and any
/// recovery all commit, so outages and their timestamps show up in history.
pub fn should_commit(previous: Option<&StatusRecord>, current: &StatusRecord) -> bool {
    match previous {
        None => true,
        Some(previous) => !(previous.ok && current.ok),
    }
}
