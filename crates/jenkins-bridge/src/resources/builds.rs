//! Builds API endpoint
//!
//! Besides plain reads this resource implements the two multi-step build
//! protocols:
//!
//! - **trigger**: check the supplied parameters against the job's schema,
//!   POST the build request, then recover the queue item id from the
//!   `Location` header or, failing that, from the response body.
//! - **stop**: refuse to stop a finished build, POST the stop request, wait
//!   for the server to settle, then read the build again to confirm it ended
//!   as `ABORTED`.

use super::{
    BUILD_FIELDS, build_path, job_path, validate_build_number, validate_job_name, with_segments,
};
use crate::client::Client;
use crate::context::Context;
use crate::decode::{decode_build, decode_last_build};
use crate::error::{Error, ResourceRef, Result};
use crate::http::ApiRequest;
use crate::stream::ByteStream;
use crate::types::{Build, BuildResult, QueueItem, RunningBuild};
use futures::{StreamExt, stream};
use http::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Jobs inspected at once while scanning for running builds.
const RUNNING_SCAN_CONCURRENCY: usize = 8;

static QUEUE_ITEM_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/queue/item/(\d+)").expect("Failed to compile queue item regex"));

static QUEUE_ITEM_IN_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/queue/item/(\d+)/").expect("Failed to compile queue item body regex")
});

/// Builds API resource.
#[derive(Clone)]
pub struct Builds {
    client: Client,
}

impl Builds {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get one build of a job.
    pub async fn get(&self, ctx: &Context, job: &str, number: u32) -> Result<Build> {
        validate_job_name(job)?;
        validate_build_number(number)?;

        let request = ApiRequest::get(with_segments(build_path(job, number), &["api", "json"]))
            .tree(BUILD_FIELDS);
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::build(job, number))
            .await?;
        decode_build(response.body())
    }

    /// Get the most recent build of a job.
    ///
    /// A job that has never been built yields `NotFound(LastBuild)`.
    pub async fn latest(&self, ctx: &Context, job: &str) -> Result<Build> {
        validate_job_name(job)?;

        let request = ApiRequest::get(with_segments(job_path(job), &["api", "json"]))
            .tree(format!("lastBuild[{}]", BUILD_FIELDS));
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::job(job))
            .await?;

        decode_last_build(response.body())?.ok_or_else(|| {
            Error::NotFound(ResourceRef::LastBuild {
                job: job.to_string(),
            })
        })
    }

    /// Stream the console output of a build, stopping after `limit` bytes.
    ///
    /// A limit of zero means the whole log.
    pub async fn log(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        limit: Option<u64>,
    ) -> Result<ByteStream> {
        validate_job_name(job)?;
        validate_build_number(number)?;

        let request =
            ApiRequest::get(with_segments(build_path(job, number), &["consoleText"])).raw();
        let resource = ResourceRef::BuildLog {
            job: job.to_string(),
            number,
        };
        let stream = self.client.executor().stream(ctx, request, resource).await?;

        Ok(match limit {
            Some(limit) if limit > 0 => stream.limit(limit),
            _ => stream,
        })
    }

    /// Console output of a build as text, truncated to `limit` bytes
    /// (zero or `None` for the whole log).
    pub async fn log_text(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        limit: Option<u64>,
    ) -> Result<String> {
        self.log(ctx, job, number, limit).await?.collect_text().await
    }

    /// Request a new build of `job`.
    ///
    /// Every key in `parameters` must be declared by the job; an unknown key
    /// fails with `InvalidInput` before anything is sent. The returned queue
    /// item carries the supplied parameters.
    #[instrument(skip_all, fields(job = %job, parameters = parameters.len()))]
    pub async fn trigger(
        &self,
        ctx: &Context,
        job: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<QueueItem> {
        validate_job_name(job)?;

        let details = self.client.jobs().get(ctx, job).await?;
        if let Some(unknown) = details.first_unknown_parameter(parameters.keys()) {
            return Err(Error::InvalidInput(format!(
                "job '{}' has no parameter named '{}'",
                job, unknown
            )));
        }

        let request = if parameters.is_empty() {
            ApiRequest::post(with_segments(job_path(job), &["build"]))
        } else {
            parameters.iter().fold(
                ApiRequest::post(with_segments(job_path(job), &["buildWithParameters"])),
                |request, (key, value)| request.query(key.as_str(), value.as_str()),
            )
        };

        let response = self.client.executor().execute(ctx, request).await?;
        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            return Err(response.error_for(ResourceRef::job(job)));
        }

        let id = correlate_queue_id(status.as_u16(), response.location(), response.body())?;
        info!(queue_id = id, "Build queued");

        Ok(QueueItem {
            id,
            job_name: job.to_string(),
            parameters: parameters.clone(),
            ..QueueItem::default()
        })
    }

    /// Abort a running build and confirm it ended as `ABORTED`.
    #[instrument(skip_all, fields(job = %job, number = number))]
    pub async fn stop(&self, ctx: &Context, job: &str, number: u32) -> Result<Build> {
        let build = self.get(ctx, job, number).await?;
        if !build.building {
            return Err(Error::BuildNotRunning {
                job: job.to_string(),
                number,
                result: build.result,
            });
        }

        let request = ApiRequest::post(with_segments(build_path(job, number), &["stop"]));
        let response = self.client.executor().execute(ctx, request).await?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::FOUND {
            return Err(response.error_for(ResourceRef::build(job, number)));
        }

        ctx.sleep(self.client.stop_settle_delay()).await?;

        let verified = self.get(ctx, job, number).await?;
        if verified.building {
            return Err(Error::BuildStillRunning {
                job: job.to_string(),
                number,
            });
        }
        if verified.result != Some(BuildResult::Aborted) {
            return Err(Error::UnexpectedBuildResult {
                job: job.to_string(),
                number,
                expected: BuildResult::Aborted,
                actual: verified.result,
            });
        }

        info!("Build aborted");
        Ok(verified)
    }

    /// Every build currently running, across all top-level jobs.
    ///
    /// Jobs whose details or latest build cannot be read are skipped.
    /// Cancellation and deadline expiry still end the whole scan.
    #[instrument(skip_all)]
    pub async fn running(&self, ctx: &Context) -> Result<Vec<RunningBuild>> {
        let jobs = self.client.jobs().list(ctx, None).await?;
        let scanned = jobs.len();

        let results: Vec<(String, Result<Option<RunningBuild>>)> = stream::iter(jobs)
            .map(|job| async move {
                let outcome = self.running_build_of(ctx, &job.name).await;
                (job.name, outcome)
            })
            .buffer_unordered(RUNNING_SCAN_CONCURRENCY)
            .collect()
            .await;

        let mut running = Vec::new();
        for (job, outcome) in results {
            match outcome {
                Ok(Some(build)) => running.push(build),
                Ok(None) => {}
                Err(err @ (Error::Cancelled | Error::Timeout(_))) => return Err(err),
                Err(err) => debug!(job = %job, error = %err, "Skipping job while scanning for running builds"),
            }
        }

        running.sort_by(|a, b| {
            a.job_name
                .cmp(&b.job_name)
                .then(a.build_number.cmp(&b.build_number))
        });
        debug!(scanned, running = running.len(), "Running build scan complete");
        Ok(running)
    }

    async fn running_build_of(&self, ctx: &Context, job: &str) -> Result<Option<RunningBuild>> {
        let details = self.client.jobs().get(ctx, job).await?;
        let Some(last) = details.last_build else {
            return Ok(None);
        };

        let build = self.get(ctx, job, last.number).await?;
        Ok(build
            .building
            .then(|| RunningBuild::from_build(job, build)))
    }
}

fn queue_id_from_location(location: &str) -> Option<u64> {
    QUEUE_ITEM_URL
        .captures(location)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn queue_id_from_body(body: &str) -> Option<u64> {
    QUEUE_ITEM_IN_BODY
        .captures(body)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn queue_id_from_links(body: &[u8]) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .pointer("/_links/self/href")
        .and_then(serde_json::Value::as_str)
        .and_then(queue_id_from_location)
}

/// Recover the queue item id of a build request.
///
/// Tried in order: the `Location` header, a queue-item path anywhere in the
/// body, the `_links.self.href` field of a JSON body.
pub(crate) fn correlate_queue_id(status: u16, location: Option<&str>, body: &[u8]) -> Result<u64> {
    if let Some(id) = location.and_then(queue_id_from_location) {
        return Ok(id);
    }

    if let Some(location) = location {
        debug!(location, "Location header is not a queue item, scanning body");
    }

    if let Some(id) = queue_id_from_body(&String::from_utf8_lossy(body)) {
        return Ok(id);
    }
    if let Some(id) = queue_id_from_links(body) {
        return Ok(id);
    }

    Err(Error::ProtocolAmbiguity {
        status,
        hints: vec![
            "an authentication redirect (MFA or SSO) intercepted the request".to_string(),
            "the API token is invalid or expired".to_string(),
            "a reverse proxy stripped the Location header".to_string(),
            "the build was not actually triggered".to_string(),
        ],
    })
}
