//! AWS CodePipeline execution lookup

use crate::error::{Result, UpstreamError};
use crate::traits::ExecutionSource;
use crate::types::{ArtifactRevision, ExecutionSnapshot};
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::types::PipelineExecution;
use std::future::Future;

/// CodePipeline client implementing [`ExecutionSource`]
#[derive(Debug, Clone)]
pub struct CodePipelineClient {
    client: aws_sdk_codepipeline::Client,
}

impl CodePipelineClient {
    /// Wrap an already configured SDK client
    pub fn new(client: aws_sdk_codepipeline::Client) -> Self {
        Self { client }
    }

    /// Build from the ambient AWS configuration (env, profile, instance role)
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_codepipeline::Client::new(&config))
    }
}

impl ExecutionSource for CodePipelineClient {
    fn get_execution<'a>(
        &'a self,
        pipeline: &'a str,
        execution_id: &'a str,
    ) -> impl Future<Output = Result<ExecutionSnapshot>> + Send + 'a {
        async move {
            tracing::debug!(pipeline, execution_id, "fetching pipeline execution");

            let output = self
                .client
                .get_pipeline_execution()
                .pipeline_name(pipeline)
                .pipeline_execution_id(execution_id)
                .send()
                .await
                .map_err(|e| UpstreamError::Lookup(DisplayErrorContext(&e).to_string()))?;

            let execution = output
                .pipeline_execution()
                .ok_or(UpstreamError::EmptyResponse)?;

            Ok(snapshot_from_execution(execution))
        }
    }
}

/// Convert the SDK shape; absent strings become empty
pub fn snapshot_from_execution(execution: &PipelineExecution) -> ExecutionSnapshot {
    let status = execution
        .status()
        .map(|s| s.as_str().to_string())
        .unwrap_or_default();

    let artifact_revisions = execution
        .artifact_revisions()
        .iter()
        .map(|rev| ArtifactRevision {
            name: rev.name().unwrap_or_default().to_string(),
            revision_id: rev.revision_id().unwrap_or_default().to_string(),
            revision_url: rev.revision_url().unwrap_or_default().to_string(),
        })
        .collect();

    ExecutionSnapshot {
        status,
        artifact_revisions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_codepipeline::types::{
        ArtifactRevision as SdkRevision, PipelineExecution, PipelineExecutionStatus,
    };

    #[test]
    fn test_snapshot_conversion() {
        let execution = PipelineExecution::builder()
            .status(PipelineExecutionStatus::InProgress)
            .artifact_revisions(
                SdkRevision::builder()
                    .name("SourceArtifact")
                    .revision_id("abc123")
                    .revision_url("https://github.com/acme/widgets/commit/abc123")
                    .build(),
            )
            .artifact_revisions(SdkRevision::builder().name("Other").build())
            .build();

        let snap = snapshot_from_execution(&execution);
        assert_eq!(snap.status, "InProgress");
        assert_eq!(snap.artifact_revisions.len(), 2);
        assert_eq!(
            snap.artifact_revisions[0],
            ArtifactRevision::new(
                "SourceArtifact",
                "abc123",
                "https://github.com/acme/widgets/commit/abc123"
            )
        );
        assert_eq!(snap.artifact_revisions[1].revision_url, "");
    }

    #[test]
    fn test_snapshot_unknown_status_kept_verbatim() {
        let execution = PipelineExecution::builder()
            .status(PipelineExecutionStatus::from("Superseded"))
            .build();
        let snap = snapshot_from_execution(&execution);
        assert_eq!(snap.status, "Superseded");
        assert!(snap.artifact_revisions.is_empty());
    }

    #[test]
    fn test_snapshot_missing_status_is_empty() {
        let snap = snapshot_from_execution(&PipelineExecution::builder().build());
        assert_eq!(snap.status, "");
    }
}
