//! Build queue API endpoint

use super::validate_queue_id;
use crate::client::Client;
use crate::context::Context;
use crate::decode::{decode_queue, decode_queue_item};
use crate::error::{Error, ResourceRef, Result};
use crate::http::ApiRequest;
use crate::types::{BuildReference, QueueItem};
use std::time::Duration;
use tracing::{debug, instrument};

const QUEUE_ITEM_FIELDS: &str =
    "id,task[name],why,blocked,buildable,stuck,inQueueSince,params,actions[parameters[name,value]]";

/// Build queue API resource.
#[derive(Clone)]
pub struct Queue {
    client: Client,
}

impl Queue {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the pending queue items.
    pub async fn list(&self, ctx: &Context) -> Result<Vec<QueueItem>> {
        let request = ApiRequest::get(["queue", "api", "json"])
            .tree(format!("items[{}]", QUEUE_ITEM_FIELDS));
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::Server)
            .await?;
        decode_queue(response.body())
    }

    /// Get one queue item, including items that already left the queue.
    pub async fn get(&self, ctx: &Context, id: u64) -> Result<QueueItem> {
        validate_queue_id(id)?;

        let id_segment = id.to_string();
        let request = ApiRequest::get(["queue", "item", id_segment.as_str(), "api", "json"])
            .tree(format!("{},cancelled,executable[number,url]", QUEUE_ITEM_FIELDS));
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::QueueItem { id })
            .await?;
        decode_queue_item(response.body())
    }

    /// Cancel a queued item before it starts.
    pub async fn cancel(&self, ctx: &Context, id: u64) -> Result<()> {
        validate_queue_id(id)?;

        let request = ApiRequest::post(["queue", "cancelItem"]).query("id", id.to_string());
        let response = self.client.executor().execute(ctx, request).await?;
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(response.error_for(ResourceRef::QueueItem { id }))
        }
    }

    /// Poll a queue item until it turns into a build.
    ///
    /// Returns the build reference once the item starts, or
    /// [`Error::QueueItemCancelled`] if it is cancelled first. Bound the wait
    /// with the context's deadline.
    #[instrument(skip_all, fields(queue_id = id))]
    pub async fn wait_for_build(
        &self,
        ctx: &Context,
        id: u64,
        poll_interval: Duration,
    ) -> Result<BuildReference> {
        loop {
            let item = self.get(ctx, id).await?;

            if let Some(build) = item.executable {
                debug!(build = build.number, "Queue item started");
                return Ok(build);
            }
            if item.cancelled {
                return Err(Error::QueueItemCancelled(id));
            }

            debug!(why = %item.why, "Queue item still waiting");
            ctx.sleep(poll_interval).await?;
        }
    }
}
