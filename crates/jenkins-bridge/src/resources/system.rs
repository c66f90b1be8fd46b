//! Controller-level information

use crate::client::Client;
use crate::context::Context;
use crate::decode::decode_server_info;
use crate::error::{ResourceRef, Result};
use crate::http::ApiRequest;
use crate::types::ServerInfo;

/// Header carrying the controller version on every response.
pub const VERSION_HEADER: &str = "X-Jenkins";

/// Server information API resource.
#[derive(Clone)]
pub struct System {
    client: Client,
}

impl System {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch controller mode, quiet-down state and version.
    ///
    /// Also serves as a connectivity and credentials check.
    pub async fn info(&self, ctx: &Context) -> Result<ServerInfo> {
        let request = ApiRequest::get(["api", "json"]).tree("mode,quietingDown,useSecurity");
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::Server)
            .await?;
        let version = response.header(VERSION_HEADER).map(str::to_string);
        decode_server_info(response.body(), version)
    }
}
