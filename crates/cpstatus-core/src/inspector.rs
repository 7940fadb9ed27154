//! Execution lookup and source revision selection

use crate::error::{Result, UpstreamError};
use crate::traits::ExecutionSource;
use crate::types::{ArtifactRevision, ExecutionSnapshot, SOURCE_ARTIFACT};

/// First artifact revision named `SourceArtifact`; later matches are ignored.
pub fn find_source_revision(snapshot: &ExecutionSnapshot) -> Result<&ArtifactRevision> {
    snapshot
        .artifact_revisions
        .iter()
        .find(|rev| rev.name == SOURCE_ARTIFACT)
        .ok_or_else(|| UpstreamError::MissingSourceArtifact.into())
}

/// Wraps an [`ExecutionSource`] with source revision selection
#[derive(Debug, Clone)]
pub struct ExecutionInspector<S> {
    source: S,
}

impl<S: ExecutionSource> ExecutionInspector<S> {
    /// Create an inspector over `source`
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch an execution, failing if it carries no source revision
    pub async fn inspect(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<(ExecutionSnapshot, ArtifactRevision)> {
        let snapshot = self.source.get_execution(pipeline, execution_id).await?;
        let revision = find_source_revision(&snapshot)?.clone();
        Ok((snapshot, revision))
    }
}
