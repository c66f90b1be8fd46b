//! Jobs API endpoint

use super::{JOB_FIELDS, job_path, validate_job_name, with_segments};
use crate::client::Client;
use crate::context::Context;
use crate::decode::{decode_job_details, decode_jobs};
use crate::error::{ResourceRef, Result};
use crate::http::ApiRequest;
use crate::types::{Job, JobDetails};

/// Jobs API resource.
#[derive(Clone)]
pub struct Jobs {
    client: Client,
}

impl Jobs {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the jobs at the top level, or inside `folder`.
    ///
    /// Folders themselves appear as entries with an empty `color`.
    pub async fn list(&self, ctx: &Context, folder: Option<&str>) -> Result<Vec<Job>> {
        let (path, resource) = match folder {
            Some(folder) => {
                validate_job_name(folder)?;
                (
                    job_path(folder),
                    ResourceRef::Folder {
                        name: folder.to_string(),
                    },
                )
            }
            None => (Vec::new(), ResourceRef::Server),
        };

        let request = ApiRequest::get(with_segments(path, &["api", "json"]))
            .tree(format!("jobs[{}]", JOB_FIELDS));
        let response = self.client.executor().fetch(ctx, request, resource).await?;
        decode_jobs(response.body())
    }

    /// Get a job with its parameter schema and latest build references.
    pub async fn get(&self, ctx: &Context, name: &str) -> Result<JobDetails> {
        validate_job_name(name)?;

        let tree = format!(
            "{},disabled,lastBuild[number,url],lastSuccessfulBuild[number,url],\
             lastFailedBuild[number,url],\
             property[parameterDefinitions[name,type,description,defaultParameterValue[value],choices]]",
            JOB_FIELDS
        );
        let request = ApiRequest::get(with_segments(job_path(name), &["api", "json"])).tree(tree);
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::job(name))
            .await?;
        decode_job_details(response.body())
    }
}
