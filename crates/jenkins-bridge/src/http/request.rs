//! Request description

use crate::error::{Error, Result};
use bytes::Bytes;
use http::Method;
use url::Url;

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_ANY: &str = "*/*";

/// A request body with its content type.
#[derive(Debug, Clone)]
pub struct RequestBody {
    /// Raw body bytes
    pub bytes: Bytes,
    /// `Content-Type` header value
    pub content_type: &'static str,
}

/// A request relative to the server base URL.
///
/// Path segments are percent-encoded individually, so a segment may contain
/// spaces or slashes without changing the path structure.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    tree: Option<String>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    accept: &'static str,
}

impl ApiRequest {
    /// Create a request for `method` on the given path segments.
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            tree: None,
            query: Vec::new(),
            body: None,
            accept: ACCEPT_JSON,
        }
    }

    /// A `GET` request.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    /// A `POST` request.
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    /// Restrict the JSON response to the given field projection.
    pub fn tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = Some(tree.into());
        self
    }

    /// Append a query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn body(mut self, bytes: impl Into<Bytes>, content_type: &'static str) -> Self {
        self.body = Some(RequestBody {
            bytes: bytes.into(),
            content_type,
        });
        self
    }

    /// Accept any content type instead of JSON.
    pub fn raw(mut self) -> Self {
        self.accept = ACCEPT_ANY;
        self
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the body.
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// `Accept` header value.
    pub fn accept(&self) -> &'static str {
        self.accept
    }

    /// Whether the request changes server state and needs a crumb.
    pub fn is_mutation(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }

    /// Resolve against `base`, keeping any path prefix the base carries.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::InvalidUrl(format!("'{}' cannot be used as a base URL", base))
            })?;
            path.pop_if_empty();
            path.extend(self.segments.iter());
        }

        if self.tree.is_some() || !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(tree) = &self.tree {
                pairs.append_pair("tree", tree);
            }
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
