//! API resource endpoints
//!
//! One type per area of the server's REST surface. Each is a cheap handle
//! over the [`Client`](crate::Client) and is obtained from it, e.g.
//! `client.builds()`.

pub mod artifacts;
pub mod builds;
pub mod jobs;
pub mod nodes;
pub mod pipeline;
pub mod queue;
pub mod system;
pub mod views;

pub use artifacts::Artifacts;
pub use builds::Builds;
pub use jobs::Jobs;
pub use nodes::Nodes;
pub use pipeline::Pipeline;
pub use queue::Queue;
pub use system::System;
pub use views::Views;

use crate::error::{Error, Result};

/// Fields of a job summary.
pub(crate) const JOB_FIELDS: &str = "name,url,description,buildable,inQueue,color";

/// Fields of a build.
pub(crate) const BUILD_FIELDS: &str =
    "number,url,result,building,duration,timestamp,executor[number],estimatedDuration";

/// Path segments of a job, expanding folders: `a/b` becomes `job/a/job/b`.
pub(crate) fn job_path(name: &str) -> Vec<String> {
    name.split('/')
        .flat_map(|part| ["job".to_string(), part.to_string()])
        .collect()
}

/// Path segments of one build of a job.
pub(crate) fn build_path(job: &str, number: u32) -> Vec<String> {
    let mut path = job_path(job);
    path.push(number.to_string());
    path
}

/// Append `more` to `path`.
pub(crate) fn with_segments(mut path: Vec<String>, more: &[&str]) -> Vec<String> {
    path.extend(more.iter().map(|s| s.to_string()));
    path
}

pub(crate) fn validate_job_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("job name must not be empty".to_string()));
    }
    if name.split('/').any(|part| part.trim().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "job name '{}' has an empty folder segment",
            name
        )));
    }
    Ok(())
}

pub(crate) fn validate_build_number(number: u32) -> Result<()> {
    if number == 0 {
        return Err(Error::InvalidInput(
            "build number must be positive".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_queue_id(id: u64) -> Result<()> {
    if id == 0 {
        return Err(Error::InvalidInput("queue id must be positive".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_view_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("view name must not be empty".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_artifact_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::InvalidInput(
            "artifact path must not be empty".to_string(),
        ));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(Error::InvalidInput(format!(
            "artifact path '{}' must not contain '..' segments",
            path
        )));
    }
    Ok(())
}
