//! Clients for the two remote services

pub mod codepipeline;
pub mod github;

pub use codepipeline::CodePipelineClient;
pub use github::GitHubStatusClient;
