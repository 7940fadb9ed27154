//! Core type definitions for one relay invocation

use crate::error::{Error, ResolveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name tag of the artifact revision that carries the source commit
pub const SOURCE_ARTIFACT: &str = "SourceArtifact";

/// Trigger event, as delivered by the scheduling rule
///
/// Missing keys deserialize as empty strings so that [`InboundEvent::validate`]
/// reports them with a field-specific message instead of a serde error.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundEvent {
    /// Pipeline execution to report on
    #[serde(rename = "execution-id", default)]
    pub execution_id: String,
    /// GitHub token used for the status POST
    #[serde(rename = "github-token", default)]
    pub github_token: String,
    /// Pipeline name
    #[serde(rename = "pipeline", default)]
    pub pipeline: String,
}

impl fmt::Debug for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundEvent")
            .field("execution_id", &self.execution_id)
            .field("github_token", &"<redacted>")
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl InboundEvent {
    /// Create an event from its three parts
    pub fn new(
        execution_id: impl Into<String>,
        github_token: impl Into<String>,
        pipeline: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: execution_id.into(),
            github_token: github_token.into(),
            pipeline: pipeline.into(),
        }
    }

    /// Parse an event from its JSON wire form
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check that every field is present, in wire order
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("execution-id", &self.execution_id),
            ("github-token", &self.github_token),
            ("pipeline", &self.pipeline),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(Error::Validation { field });
            }
        }
        Ok(())
    }
}

/// One artifact revision record of an execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactRevision {
    /// Artifact name tag
    pub name: String,
    /// Revision identifier (commit SHA for source artifacts)
    pub revision_id: String,
    /// Where the revision lives: a source host URL or a connection redirect URL
    pub revision_url: String,
}

impl ArtifactRevision {
    /// Create a revision record
    pub fn new(
        name: impl Into<String>,
        revision_id: impl Into<String>,
        revision_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            revision_id: revision_id.into(),
            revision_url: revision_url.into(),
        }
    }
}

/// The orchestration service's view of one execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionSnapshot {
    /// Execution status label (`InProgress`, `Succeeded`, `Failed`, ...)
    pub status: String,
    /// Artifact revisions, in API order
    pub artifact_revisions: Vec<ArtifactRevision>,
}

/// Canonical `owner/repo` identifier
///
/// Always holds exactly one `/` separating two segments made of ASCII
/// alphanumerics, `-`, `_` and `.`, neither of them `.` or `..`. The value is
/// spliced into API paths as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RepositoryId(String);

impl RepositoryId {
    /// Build from separate owner and repo segments
    pub fn from_parts(owner: &str, repo: &str) -> std::result::Result<Self, ResolveError> {
        if owner.is_empty() || repo.is_empty() {
            return Err(ResolveError::TooFewPathComponents);
        }
        Self::parse(&format!("{}/{}", owner, repo))
    }

    /// Validate a combined `owner/repo` string
    pub fn parse(s: &str) -> std::result::Result<Self, ResolveError> {
        match s.split_once('/') {
            Some((owner, repo)) if is_name_segment(owner) && is_name_segment(repo) => {
                Ok(Self(s.to_string()))
            }
            _ => Err(ResolveError::InvalidRepositoryId(s.to_string())),
        }
    }

    /// Borrow as `owner/repo`
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owner segment
    pub fn owner(&self) -> &str {
        self.0.split_once('/').map(|(o, _)| o).unwrap_or_default()
    }

    /// Repository segment
    pub fn repo(&self) -> &str {
        self.0.split_once('/').map(|(_, r)| r).unwrap_or_default()
    }
}

#[inline]
fn is_name_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commit status state accepted by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CommitState {
    /// Execution still running
    Pending,
    /// Execution succeeded
    Success,
    /// Anything else
    Failure,
}

impl CommitState {
    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /repos/{owner}/{repo}/statuses/{sha}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Tri-state status
    pub state: CommitState,
    /// Deep link shown as "Details" next to the check
    pub target_url: String,
    /// Short description; omitted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Label distinguishing this check from others on the commit
    pub context: String,
}

/// What a successful invocation reported, and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    /// Repository the status was attached to
    pub repository: RepositoryId,
    /// Commit SHA
    pub commit: String,
    /// Report as sent
    pub report: StatusReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_event_from_wire_keys() {
        let ev = InboundEvent::from_json(
            br#"{"execution-id":"exec1","github-token":"tok","pipeline":"pipe1"}"#,
        )
        .unwrap();
        assert_eq!(ev, InboundEvent::new("exec1", "tok", "pipe1"));
        assert!(ev.validate().is_ok());
    }

    #[test]
    fn test_event_missing_key_is_validation_error() {
        let ev = InboundEvent::from_json(br#"{"execution-id":"exec1","pipeline":"p"}"#).unwrap();
        assert_matches!(
            ev.validate(),
            Err(Error::Validation {
                field: "github-token"
            })
        );
    }

    #[test]
    fn test_event_fields_checked_in_order() {
        let ev = InboundEvent::default();
        assert_matches!(
            ev.validate(),
            Err(Error::Validation {
                field: "execution-id"
            })
        );

        let ev = InboundEvent::new("e", "t", "");
        assert_matches!(ev.validate(), Err(Error::Validation { field: "pipeline" }));
    }

    #[test]
    fn test_event_rejects_non_object() {
        assert_matches!(InboundEvent::from_json(b"[1,2]"), Err(Error::Json(_)));
    }

    #[test]
    fn test_event_debug_redacts_token() {
        let ev = InboundEvent::new("exec1", "ghp_secret", "pipe1");
        let debug = format!("{:?}", ev);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("exec1"));
    }

    #[test]
    fn test_repository_id_parse() {
        let id = RepositoryId::parse("acme/widgets").unwrap();
        assert_eq!(id.as_str(), "acme/widgets");
        assert_eq!(id.owner(), "acme");
        assert_eq!(id.repo(), "widgets");

        for bad in [
            "acme",
            "/widgets",
            "acme/",
            "a/b/c",
            "",
            "acme/w?x",
            "acme/w#x",
            "a b/c",
            "acme/..",
            "./widgets",
            "acme/wid%20gets",
        ] {
            assert_matches!(
                RepositoryId::parse(bad),
                Err(ResolveError::InvalidRepositoryId(_)),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_repository_id_allows_dots_dashes_underscores() {
        for good in ["my-org/my_repo.js", "a.b/.github", "octo-cat/x"] {
            assert_eq!(RepositoryId::parse(good).unwrap().as_str(), good);
        }
    }

    #[test]
    fn test_repository_id_from_empty_parts() {
        assert_matches!(
            RepositoryId::from_parts("acme", ""),
            Err(ResolveError::TooFewPathComponents)
        );
    }

    #[test]
    fn test_status_report_json_shape() {
        let report = StatusReport {
            state: CommitState::Success,
            target_url: "https://example.com".into(),
            description: None,
            context: "continuous-integration/codepipeline".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": "success",
                "target_url": "https://example.com",
                "context": "continuous-integration/codepipeline",
            })
        );
    }
}
