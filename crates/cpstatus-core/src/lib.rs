//! # cpstatus core
//!
//! Relays AWS CodePipeline execution state to GitHub as commit statuses.
//!
//! Given a pipeline name and execution id, the relay looks up the execution,
//! finds the commit it built from its `SourceArtifact` revision, and posts a
//! `pending` / `success` / `failure` status to that commit with a link back
//! to the execution in the AWS console.
//!
//! ## Example
//!
//! ```no_run
//! use cpstatus_core::{relay, InboundEvent, RelayConfig};
//!
//! # async fn example() -> cpstatus_core::Result<()> {
//! let event = InboundEvent::new("exec-id", "ghp_token", "my-pipeline");
//! let update = relay(&event, RelayConfig::from_env()?).await?;
//! println!("{} @ {} -> {}", update.repository, update.commit, update.report.state);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod inspector;
pub mod resolver;
pub mod status;
pub mod traits;
pub mod types;

pub use config::RelayConfig;
pub use error::{Error, ErrorKind, NotifyError, ResolveError, Result, UpstreamError};
pub use handler::Handler;
pub use resolver::{resolve_str, LocatorHosts, LocatorKind};
pub use status::map_status;
pub use types::{
    ArtifactRevision, CommitState, ExecutionSnapshot, InboundEvent, RepositoryId, StatusReport,
    StatusUpdate,
};

/// Relay one event using the production AWS and GitHub clients
///
/// Builds fresh clients for this invocation: AWS credentials come from the
/// ambient provider chain, the GitHub API URL from `config`.
pub async fn relay(event: &InboundEvent, config: RelayConfig) -> Result<StatusUpdate> {
    config.validate()?;
    event.validate()?;

    let executions = http::CodePipelineClient::from_env().await;
    let notifier = http::GitHubStatusClient::new(config.api_base());
    Handler::new(executions, notifier, config).handle(event).await
}

/// Synchronous variant of [`relay`]
///
/// This creates a current-thread Tokio runtime and blocks on the async
/// version. Prefer the async version if you're already in an async context.
pub fn relay_sync(event: &InboundEvent, config: RelayConfig) -> Result<StatusUpdate> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?
        .block_on(relay(event, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        let _ = env!("CARGO_PKG_VERSION");
    }

    #[test]
    fn test_relay_sync_validates_before_network() {
        let err = relay_sync(&InboundEvent::new("", "tok", "pipe"), RelayConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_relay_sync_rejects_bad_config() {
        let config = RelayConfig {
            context: String::new(),
            ..Default::default()
        };
        let err = relay_sync(&InboundEvent::new("e", "t", "p"), config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
