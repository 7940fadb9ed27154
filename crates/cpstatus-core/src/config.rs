//! Relay configuration
//!
//! Every field has a default matching the production deployment; environment
//! variables override individual fields.

use crate::error::{Error, Result};
use crate::resolver::LocatorHosts;

/// Default console region used for deep links and connection redirects
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default status check context
pub const DEFAULT_CONTEXT: &str = "continuous-integration/codepipeline";

/// Settings shared by every invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Console region (`eu-west-1`)
    pub region: String,
    /// Console domain the region is prefixed to (`aws.amazon.com`)
    pub console_domain: String,
    /// Web host of the source repositories (`github.com`)
    pub source_host: String,
    /// REST API base URL, no trailing slash
    pub api_url: String,
    /// Status check context label
    pub context: String,
    /// Optional status description
    pub description: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            console_domain: "aws.amazon.com".to_string(),
            source_host: "github.com".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            context: DEFAULT_CONTEXT.to_string(),
            description: None,
        }
    }
}

impl RelayConfig {
    /// Defaults overridden by environment variables
    ///
    /// Reads `CPSTATUS_CONSOLE_REGION`, `CPSTATUS_CONSOLE_DOMAIN`,
    /// `CPSTATUS_SOURCE_HOST`, `GITHUB_API_URL`, `CPSTATUS_CONTEXT` and
    /// `CPSTATUS_DESCRIPTION`. Empty values count as unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let config = Self {
            region: var("CPSTATUS_CONSOLE_REGION").unwrap_or(defaults.region),
            console_domain: var("CPSTATUS_CONSOLE_DOMAIN").unwrap_or(defaults.console_domain),
            source_host: var("CPSTATUS_SOURCE_HOST").unwrap_or(defaults.source_host),
            api_url: var("GITHUB_API_URL").unwrap_or(defaults.api_url),
            context: var("CPSTATUS_CONTEXT").unwrap_or(defaults.context),
            description: var("CPSTATUS_DESCRIPTION"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject empty required fields and non-http API URLs
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("region", &self.region),
            ("console_domain", &self.console_domain),
            ("source_host", &self.source_host),
            ("api_url", &self.api_url),
            ("context", &self.context),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        Ok(())
    }

    /// Console host, e.g. `eu-west-1.console.aws.amazon.com`
    pub fn console_host(&self) -> String {
        format!("{}.console.{}", self.region, self.console_domain)
    }

    /// Hosts the resolver recognizes
    pub fn locator_hosts(&self) -> LocatorHosts {
        LocatorHosts::new(self.source_host.clone(), self.console_host())
    }

    /// API base URL without trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Deep link to the pipeline execution console view
    pub fn execution_link(&self, pipeline: &str, execution_id: &str) -> String {
        format!(
            "https://{}/codesuite/codepipeline/pipelines/{}/executions/{}",
            self.console_host(),
            pipeline,
            execution_id
        )
    }
}
