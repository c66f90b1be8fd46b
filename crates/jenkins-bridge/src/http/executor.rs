//! Request executor
//!
//! Turns an [`ApiRequest`] into an authenticated request against the
//! configured server, attaches a CSRF crumb to mutations, sends it through
//! the transport and buffers or streams the response. Every step runs inside
//! the caller's [`Context`].

use super::request::ApiRequest;
use super::response::Response;
use crate::auth::Credentials;
use crate::context::Context;
use crate::crumb::{Crumb, CrumbPolicy};
use crate::decode::decode_crumb;
use crate::error::{Error, ResourceRef, Result};
use crate::observability::{
    RequestMetadata, RequestTimer, ResponseMetadata, log_transport_failure,
};
use crate::stream::ByteStream;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, StatusCode};
use jenkins_bridge_transport::Transport;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Sends requests on behalf of the resources.
pub(crate) struct HttpExecutor {
    transport: Arc<dyn Transport>,
    base_url: Url,
    credentials: Credentials,
    crumb_policy: CrumbPolicy,
    user_agent: HeaderValue,
}

/// A sent request whose body has not been read yet.
struct InFlight {
    response: reqwest::Response,
    metadata: RequestMetadata,
    timer: RequestTimer,
}

impl HttpExecutor {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        base_url: Url,
        credentials: Credentials,
        crumb_policy: CrumbPolicy,
    ) -> Self {
        Self {
            transport,
            base_url,
            credentials,
            crumb_policy,
            user_agent: HeaderValue::from_static(crate::USER_AGENT),
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `request` and buffer the whole response, whatever its status.
    pub(crate) async fn execute(&self, ctx: &Context, request: ApiRequest) -> Result<Response> {
        let crumb = if request.is_mutation() {
            self.crumb(ctx).await?
        } else {
            None
        };

        let in_flight = self.send(ctx, &request, crumb.as_ref()).await?;
        self.read(ctx, in_flight).await
    }

    /// Send a read and fail unless it returns 2xx.
    pub(crate) async fn fetch(
        &self,
        ctx: &Context,
        request: ApiRequest,
        resource: ResourceRef,
    ) -> Result<Response> {
        self.execute(ctx, request).await?.ensure_success(resource)
    }

    /// Send a read and stream the body of a 2xx response.
    pub(crate) async fn stream(
        &self,
        ctx: &Context,
        request: ApiRequest,
        resource: ResourceRef,
    ) -> Result<ByteStream> {
        let in_flight = self.send(ctx, &request, None).await?;

        if !in_flight.response.status().is_success() {
            let response = self.read(ctx, in_flight).await?;
            return Err(response.error_for(resource));
        }

        let InFlight {
            response,
            metadata,
            timer,
        } = in_flight;
        ResponseMetadata::new(response.status().as_u16(), timer.elapsed()).log(&metadata);
        Ok(ByteStream::from_response(response, ctx.clone()))
    }

    fn build(&self, request: &ApiRequest, crumb: Option<&Crumb>) -> Result<reqwest::Request> {
        let url = request.url(&self.base_url)?;
        let mut http_request = reqwest::Request::new(request.method().clone(), url);

        let headers = http_request.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(request.accept()));
        if let Some(authorization) = self.credentials.authorization()? {
            headers.insert(AUTHORIZATION, authorization);
        }
        if let Some(crumb) = crumb {
            let (name, value) = crumb.header()?;
            headers.insert(name, value);
        }

        match request.request_body() {
            Some(body) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(body.content_type));
                *http_request.body_mut() = Some(reqwest::Body::from(body.bytes.clone()));
            }
            None if request.is_mutation() => {
                *http_request.body_mut() = Some(reqwest::Body::from(Bytes::new()));
            }
            None => {}
        }

        Ok(http_request)
    }

    async fn send(
        &self,
        ctx: &Context,
        request: &ApiRequest,
        crumb: Option<&Crumb>,
    ) -> Result<InFlight> {
        let http_request = self.build(request, crumb)?;

        let mut metadata = RequestMetadata::new(request.method().as_str(), http_request.url().path())
            .with_crumb(crumb.is_some());
        if let Some(body) = request.request_body() {
            metadata = metadata.with_body_size(body.bytes.len());
        }
        metadata.log_request();

        let timer = RequestTimer::start();
        let sent = ctx
            .run(async { self.transport.send(http_request).await.map_err(Error::from) })
            .await;

        match sent {
            Ok(response) => Ok(InFlight {
                response,
                metadata,
                timer,
            }),
            Err(err) => {
                log_transport_failure(&metadata, timer.elapsed(), &err.to_string());
                Err(err)
            }
        }
    }

    async fn read(&self, ctx: &Context, in_flight: InFlight) -> Result<Response> {
        let InFlight {
            response,
            metadata,
            timer,
        } = in_flight;

        let status = response.status();
        let headers = response.headers().clone();
        let body = ctx
            .run(async {
                response
                    .bytes()
                    .await
                    .map_err(|e| Error::Network(format!("failed to read response body: {}", e)))
            })
            .await?;

        ResponseMetadata::new(status.as_u16(), timer.elapsed())
            .with_body_size(body.len())
            .log(&metadata);

        Ok(Response::new(status, headers, body))
    }

    /// Fetch a crumb for a mutation, applying the configured policy.
    async fn crumb(&self, ctx: &Context) -> Result<Option<Crumb>> {
        let outcome = self.fetch_crumb(ctx).await;
        self.crumb_policy.resolve(outcome)
    }

    async fn fetch_crumb(&self, ctx: &Context) -> Result<Option<Crumb>> {
        let request = ApiRequest::get(["crumbIssuer", "api", "json"]);
        let in_flight = self.send(ctx, &request, None).await?;
        let response = self.read(ctx, in_flight).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Crumb issuer not found, CSRF protection is disabled");
            return Ok(None);
        }

        let response = response.ensure_success(ResourceRef::CrumbIssuer)?;
        decode_crumb(response.body()).map(Some)
    }
}

impl fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("crumb_policy", &self.crumb_policy)
            .finish_non_exhaustive()
    }
}
