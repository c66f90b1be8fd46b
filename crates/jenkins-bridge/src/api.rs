//! Capability trait over the whole client surface
//!
//! Outer layers (tool adapters, caches, multi-controller routers) depend on
//! [`JenkinsApi`] rather than on [`Client`], so they can be tested against a
//! mock or wrap the client without touching it.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::client::Client;
use crate::context::Context;
use crate::error::Result;
use crate::stream::ByteStream;
use crate::types::{
    Artifact, Build, BuildReference, Job, JobDetails, Node, QueueItem, RunningBuild, ServerInfo,
    View, ViewDetails,
};

/// Every operation the client offers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    /// List jobs at the top level or inside a folder.
    async fn list_jobs(&self, ctx: &Context, folder: Option<String>) -> Result<Vec<Job>>;

    /// Get a job with its parameter schema.
    async fn get_job(&self, ctx: &Context, name: &str) -> Result<JobDetails>;

    /// Get one build.
    async fn get_build(&self, ctx: &Context, job: &str, number: u32) -> Result<Build>;

    /// Get the most recent build of a job.
    async fn get_latest_build(&self, ctx: &Context, job: &str) -> Result<Build>;

    /// Queue a build, returning the correlated queue item.
    async fn trigger_build(
        &self,
        ctx: &Context,
        job: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<QueueItem>;

    /// Abort a running build and verify the outcome.
    async fn stop_build(&self, ctx: &Context, job: &str, number: u32) -> Result<Build>;

    /// Console output of a build, truncated to `limit` bytes when non-zero.
    async fn build_log(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        limit: Option<u64>,
    ) -> Result<String>;

    /// List the artifacts of a build.
    async fn list_artifacts(&self, ctx: &Context, job: &str, number: u32)
    -> Result<Vec<Artifact>>;

    /// Stream one artifact.
    async fn download_artifact(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        path: &str,
    ) -> Result<ByteStream>;

    /// List pending queue items.
    async fn get_queue(&self, ctx: &Context) -> Result<Vec<QueueItem>>;

    /// Get one queue item.
    async fn get_queue_item(&self, ctx: &Context, id: u64) -> Result<QueueItem>;

    /// Cancel a queue item.
    async fn cancel_queue_item(&self, ctx: &Context, id: u64) -> Result<()>;

    /// Poll a queue item until it starts a build.
    async fn wait_for_build(
        &self,
        ctx: &Context,
        id: u64,
        poll_interval: Duration,
    ) -> Result<BuildReference>;

    /// Builds currently running across all top-level jobs.
    async fn running_builds(&self, ctx: &Context) -> Result<Vec<RunningBuild>>;

    /// List views.
    async fn list_views(&self, ctx: &Context) -> Result<Vec<View>>;

    /// Get a view with its jobs.
    async fn get_view(&self, ctx: &Context, name: &str) -> Result<ViewDetails>;

    /// Create an empty view.
    async fn create_view(
        &self,
        ctx: &Context,
        name: &str,
        description: Option<String>,
        view_type: Option<String>,
    ) -> Result<()>;

    /// List build agents.
    async fn list_nodes(&self, ctx: &Context) -> Result<Vec<Node>>;

    /// Inline pipeline script of a job.
    async fn pipeline_script(&self, ctx: &Context, job: &str) -> Result<String>;

    /// Controller information; doubles as a health check.
    async fn server_info(&self, ctx: &Context) -> Result<ServerInfo>;
}

#[async_trait]
impl JenkinsApi for Client {
    async fn list_jobs(&self, ctx: &Context, folder: Option<String>) -> Result<Vec<Job>> {
        self.jobs().list(ctx, folder.as_deref()).await
    }

    async fn get_job(&self, ctx: &Context, name: &str) -> Result<JobDetails> {
        self.jobs().get(ctx, name).await
    }

    async fn get_build(&self, ctx: &Context, job: &str, number: u32) -> Result<Build> {
        self.builds().get(ctx, job, number).await
    }

    async fn get_latest_build(&self, ctx: &Context, job: &str) -> Result<Build> {
        self.builds().latest(ctx, job).await
    }

    async fn trigger_build(
        &self,
        ctx: &Context,
        job: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<QueueItem> {
        self.builds().trigger(ctx, job, parameters).await
    }

    async fn stop_build(&self, ctx: &Context, job: &str, number: u32) -> Result<Build> {
        self.builds().stop(ctx, job, number).await
    }

    async fn build_log(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        limit: Option<u64>,
    ) -> Result<String> {
        self.builds().log_text(ctx, job, number, limit).await
    }

    async fn list_artifacts(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
    ) -> Result<Vec<Artifact>> {
        self.artifacts().list(ctx, job, number).await
    }

    async fn download_artifact(
        &self,
        ctx: &Context,
        job: &str,
        number: u32,
        path: &str,
    ) -> Result<ByteStream> {
        self.artifacts().download(ctx, job, number, path).await
    }

    async fn get_queue(&self, ctx: &Context) -> Result<Vec<QueueItem>> {
        self.queue().list(ctx).await
    }

    async fn get_queue_item(&self, ctx: &Context, id: u64) -> Result<QueueItem> {
        self.queue().get(ctx, id).await
    }

    async fn cancel_queue_item(&self, ctx: &Context, id: u64) -> Result<()> {
        self.queue().cancel(ctx, id).await
    }

    async fn wait_for_build(
        &self,
        ctx: &Context,
        id: u64,
        poll_interval: Duration,
    ) -> Result<BuildReference> {
        self.queue().wait_for_build(ctx, id, poll_interval).await
    }

    async fn running_builds(&self, ctx: &Context) -> Result<Vec<RunningBuild>> {
        self.builds().running(ctx).await
    }

    async fn list_views(&self, ctx: &Context) -> Result<Vec<View>> {
        self.views().list(ctx).await
    }

    async fn get_view(&self, ctx: &Context, name: &str) -> Result<ViewDetails> {
        self.views().get(ctx, name).await
    }

    async fn create_view(
        &self,
        ctx: &Context,
        name: &str,
        description: Option<String>,
        view_type: Option<String>,
    ) -> Result<()> {
        self.views()
            .create(ctx, name, description.as_deref(), view_type.as_deref())
            .await
    }

    async fn list_nodes(&self, ctx: &Context) -> Result<Vec<Node>> {
        self.nodes().list(ctx).await
    }

    async fn pipeline_script(&self, ctx: &Context, job: &str) -> Result<String> {
        self.pipeline().script(ctx, job).await
    }

    async fn server_info(&self, ctx: &Context) -> Result<ServerInfo> {
        self.system().info(ctx).await
    }
}
