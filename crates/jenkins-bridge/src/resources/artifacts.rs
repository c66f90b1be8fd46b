//! Artifacts API endpoint

use super::{
    build_path, validate_artifact_path, validate_build_number, validate_job_name, with_segments,
};
use crate::client::Client;
use crate::context::Context;
use crate::decode::decode_artifacts;
use crate::error::{ResourceRef, Result};
use crate::http::ApiRequest;
use crate::stream::ByteStream;
use crate::types::Artifact;

/// Artifacts API resource.
#[derive(Clone)]
pub struct Artifacts {
    client: Client,
}

impl Artifacts {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the files archived by a build.
    pub async fn list(&self, ctx: &Context, job: &str, number: u32) -> Result<Vec<Artifact>> {
        validate_job_name(job)?;
        validate_build_number(number)?;

        let request = ApiRequest::get(with_segments(build_path(job, number), &["api", "json"]))
            .tree("artifacts[fileName,relativePath,size]");
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::build(job, number))
            .await?;
        decode_artifacts(response.body())
    }

    /// Stream one archived file.
    ///
    /// `path` is relative to the build's artifact root, as reported in
    /// [`Artifact::relative_path`].
    pub async fn download(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        path: &str,
    ) -> Result<ByteStream> {
        validate_job_name(job)?;
        validate_build_number(number)?;
        validate_artifact_path(path)?;

        let mut segments = with_segments(build_path(job, number), &["artifact"]);
        segments.extend(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );

        let resource = ResourceRef::Artifact {
            job: job.to_string(),
            number,
            path: path.to_string(),
        };
        self.client
            .executor()
            .stream(ctx, ApiRequest::get(segments).raw(), resource)
            .await
    }
}
