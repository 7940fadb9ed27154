//! Revision locator to repository resolution
//!
//! CodePipeline points at a source revision either directly (a commit URL on
//! the source host) or through a CodeStar connection redirect page on the AWS
//! console. Both forms resolve to the same `owner/repo` identifier.

use crate::error::ResolveError;
use crate::types::RepositoryId;
use reqwest::Url;

/// Exact path of the console's connection redirect page
pub const REDIRECT_PATH: &str = "/codesuite/settings/connections/redirect";

/// Query parameter carrying `owner/repo` on the redirect page
pub const REPOSITORY_PARAM: &str = "FullRepositoryId";

/// Supported locator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LocatorKind {
    /// `https://<source-host>/{owner}/{repo}/...`
    SourceHost,
    /// `https://<region>.console.<domain>/codesuite/settings/connections/redirect?FullRepositoryId=owner/repo`
    ConnectionRedirect,
}

impl LocatorKind {
    /// All kinds, in lookup order
    pub const ALL: [LocatorKind; 2] = [LocatorKind::SourceHost, LocatorKind::ConnectionRedirect];

    /// Pick the locator kind served by `host`, if any
    pub fn classify(host: &str, hosts: &LocatorHosts) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| hosts.host_for(*kind) == host)
    }

    /// Extract the repository from a URL already known to be of this kind
    fn extract(self, url: &Url) -> Result<RepositoryId, ResolveError> {
        match self {
            LocatorKind::SourceHost => {
                let segments: Vec<&str> = url.path().split('/').collect();
                match segments.as_slice() {
                    [_, owner, repo, ..] => RepositoryId::from_parts(owner, repo),
                    _ => Err(ResolveError::TooFewPathComponents),
                }
            }
            LocatorKind::ConnectionRedirect => {
                if url.path() != REDIRECT_PATH {
                    return Err(ResolveError::UnexpectedPath(url.path().to_string()));
                }
                let repo = url
                    .query_pairs()
                    .find(|(key, _)| key == REPOSITORY_PARAM)
                    .map(|(_, value)| value.into_owned())
                    .filter(|value| !value.is_empty())
                    .ok_or(ResolveError::MissingRepositoryParam)?;
                RepositoryId::parse(&repo)
            }
        }
    }
}

/// Host table the resolver dispatches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorHosts {
    source_host: String,
    console_host: String,
}

impl Default for LocatorHosts {
    fn default() -> Self {
        Self::new("github.com", "eu-west-1.console.aws.amazon.com")
    }
}

impl LocatorHosts {
    /// Create a host table
    pub fn new(source_host: impl Into<String>, console_host: impl Into<String>) -> Self {
        Self {
            source_host: source_host.into(),
            console_host: console_host.into(),
        }
    }

    /// Host serving a given locator kind
    #[inline]
    pub fn host_for(&self, kind: LocatorKind) -> &str {
        match kind {
            LocatorKind::SourceHost => &self.source_host,
            LocatorKind::ConnectionRedirect => &self.console_host,
        }
    }
}

/// Host exactly as written in the locator's authority, before URL parsing
/// lowercases it. Userinfo and port are dropped.
fn raw_host(locator: &str) -> Option<&str> {
    let (_, rest) = locator.split_once("://")?;
    let authority = rest
        .split(|c: char| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    if host_port.starts_with('[') {
        return host_port.split_inclusive(']').next();
    }
    Some(host_port.split(':').next().unwrap_or_default())
}

/// Parse and resolve a locator string
///
/// Host matching is exact and case-sensitive against the text of the input.
pub fn resolve_str(locator: &str, hosts: &LocatorHosts) -> Result<RepositoryId, ResolveError> {
    let url = Url::parse(locator).map_err(|e| ResolveError::MalformedLocator(e.to_string()))?;
    let host = raw_host(locator).unwrap_or_else(|| url.host_str().unwrap_or_default());
    let kind = LocatorKind::classify(host, hosts)
        .ok_or_else(|| ResolveError::UnknownHost(host.to_string()))?;
    kind.extract(&url)
}
