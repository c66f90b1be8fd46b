//! Nodes API endpoint

use crate::client::Client;
use crate::context::Context;
use crate::decode::decode_nodes;
use crate::error::{ResourceRef, Result};
use crate::http::ApiRequest;
use crate::types::Node;

/// Build agents ("computers") API resource.
#[derive(Clone)]
pub struct Nodes {
    client: Client,
}

impl Nodes {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the controller and every agent with executor availability.
    pub async fn list(&self, ctx: &Context) -> Result<Vec<Node>> {
        let request = ApiRequest::get(["computer", "api", "json"])
            .tree("computer[displayName,offline,temporarilyOffline,numExecutors,idle]");
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::Server)
            .await?;
        decode_nodes(response.body())
    }
}
