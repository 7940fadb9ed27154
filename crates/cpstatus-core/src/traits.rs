//! Seams between the handler and the two remote services
//!
//! Both traits return `impl Future` so the handler stays generic over its
//! collaborators without boxing: production uses the AWS and GitHub clients
//! in [`crate::http`], tests substitute in-memory fakes.

use crate::error::Result;
use crate::types::{ExecutionSnapshot, RepositoryId, StatusReport};
use std::future::Future;

/// Source of pipeline execution snapshots
pub trait ExecutionSource {
    /// Fetch the current state of one execution
    fn get_execution<'a>(
        &'a self,
        pipeline: &'a str,
        execution_id: &'a str,
    ) -> impl Future<Output = Result<ExecutionSnapshot>> + Send + 'a;
}

/// Destination of commit status reports
pub trait StatusSink {
    /// Attach `report` to `commit` in `repository`, authenticating with `token`
    fn post_status<'a>(
        &'a self,
        repository: &'a RepositoryId,
        commit: &'a str,
        report: &'a StatusReport,
        token: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;
}

impl<T: ExecutionSource + Sync> ExecutionSource for &T {
    fn get_execution<'a>(
        &'a self,
        pipeline: &'a str,
        execution_id: &'a str,
    ) -> impl Future<Output = Result<ExecutionSnapshot>> + Send + 'a {
        (**self).get_execution(pipeline, execution_id)
    }
}

impl<T: StatusSink + Sync> StatusSink for &T {
    fn post_status<'a>(
        &'a self,
        repository: &'a RepositoryId,
        commit: &'a str,
        report: &'a StatusReport,
        token: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        (**self).post_status(repository, commit, report, token)
    }
}
