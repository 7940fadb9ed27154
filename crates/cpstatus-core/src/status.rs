//! Execution status to commit state mapping

use crate::types::CommitState;

/// Map a CodePipeline execution status label to a GitHub commit state
///
/// Only `InProgress` and `Succeeded` are distinguished. Every other label,
/// including `Stopped`, `Stopping` and `Superseded`, is reported as
/// [`CommitState::Failure`]: GitHub accepts no state for "did not finish".
#[inline]
pub fn map_status(execution_status: &str) -> CommitState {
    match execution_status {
        "InProgress" => CommitState::Pending,
        "Succeeded" => CommitState::Success,
        _ => CommitState::Failure,
    }
}
