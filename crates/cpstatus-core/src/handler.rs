//! Relay orchestration: one event in, one commit status out
//!
//! The handler runs a strictly linear pipeline and stops at the first error:
//!
//! 1. validate the event
//! 2. fetch the execution and select its `SourceArtifact` revision
//! 3. resolve the revision URL to `owner/repo`
//! 4. map the execution status to a commit state
//! 5. post the status with a deep link back to the console
//!
//! Only the last step has a side effect.

use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::inspector::ExecutionInspector;
use crate::resolver::{self, LocatorHosts};
use crate::status::map_status;
use crate::traits::{ExecutionSource, StatusSink};
use crate::types::{InboundEvent, StatusReport, StatusUpdate};

/// Relay handler with injected collaborators
#[derive(Debug)]
pub struct Handler<E, N> {
    inspector: ExecutionInspector<E>,
    notifier: N,
    config: RelayConfig,
    hosts: LocatorHosts,
}

impl<E: ExecutionSource, N: StatusSink> Handler<E, N> {
    /// Create a handler; `config` must already be validated
    pub fn new(executions: E, notifier: N, config: RelayConfig) -> Self {
        let hosts = config.locator_hosts();
        Self {
            inspector: ExecutionInspector::new(executions),
            notifier,
            config,
            hosts,
        }
    }

    /// Process one trigger event
    #[tracing::instrument(
        skip_all,
        fields(pipeline = %event.pipeline, execution_id = %event.execution_id)
    )]
    pub async fn handle(&self, event: &InboundEvent) -> Result<StatusUpdate> {
        event.validate()?;

        let (snapshot, revision) = self
            .inspector
            .inspect(&event.pipeline, &event.execution_id)
            .await?;

        tracing::debug!(
            revision_id = %revision.revision_id,
            revision_url = %revision.revision_url,
            "found source revision"
        );

        let repository = resolver::resolve_str(&revision.revision_url, &self.hosts).map_err(
            |reason| Error::Resolution {
                locator: revision.revision_url.clone(),
                reason,
            },
        )?;

        let state = map_status(&snapshot.status);

        let report = StatusReport {
            state,
            target_url: self
                .config
                .execution_link(&event.pipeline, &event.execution_id),
            description: self.config.description.clone(),
            context: self.config.context.clone(),
        };

        tracing::info!(
            repo = %repository,
            commit = %revision.revision_id,
            execution_status = %snapshot.status,
            state = %state,
            "setting commit status"
        );

        self.notifier
            .post_status(&repository, &revision.revision_id, &report, &event.github_token)
            .await?;

        Ok(StatusUpdate {
            repository,
            commit: revision.revision_id,
            report,
        })
    }
}
