//! Views API endpoint

use super::{JOB_FIELDS, validate_view_name};
use crate::client::Client;
use crate::context::Context;
use crate::decode::{decode_view, decode_views};
use crate::error::{Error, ResourceRef, Result};
use crate::http::ApiRequest;
use crate::types::{View, ViewDetails};
use http::StatusCode;
use tracing::info;

/// View class used when none is given.
pub const LIST_VIEW: &str = "hudson.model.ListView";

/// Views API resource.
#[derive(Clone)]
pub struct Views {
    client: Client,
}

impl Views {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List every view.
    pub async fn list(&self, ctx: &Context) -> Result<Vec<View>> {
        let request = ApiRequest::get(["api", "json"]).tree("views[name,url,description]");
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::Server)
            .await?;
        decode_views(response.body())
    }

    /// Get a view with its jobs.
    pub async fn get(&self, ctx: &Context, name: &str) -> Result<ViewDetails> {
        validate_view_name(name)?;

        let request = ApiRequest::get(["view", name, "api", "json"])
            .tree(format!("name,url,description,jobs[{}]", JOB_FIELDS));
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::view(name))
            .await?;
        decode_view(response.body())
    }

    /// Create an empty view of class `view_type` (default [`LIST_VIEW`]).
    pub async fn create(
        &self,
        ctx: &Context,
        name: &str,
        description: Option<&str>,
        view_type: Option<&str>,
    ) -> Result<()> {
        validate_view_name(name)?;

        let body = view_config_xml(name, description.unwrap_or(""), view_type.unwrap_or(LIST_VIEW));
        let request = ApiRequest::post(["createView"])
            .query("name", name)
            .body(body, "application/xml");

        let response = self.client.executor().execute(ctx, request).await?;
        let status = response.status();

        if status == StatusCode::CONFLICT
            || (status == StatusCode::BAD_REQUEST
                && response.text().to_ascii_lowercase().contains("already exists"))
        {
            return Err(Error::AlreadyExists(ResourceRef::view(name)));
        }
        if !status.is_success() && !status.is_redirection() {
            return Err(response.error_for(ResourceRef::view(name)));
        }

        info!(view = name, "View created");
        Ok(())
    }
}

/// Escape the five predefined XML entities.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn view_config_xml(name: &str, description: &str, view_type: &str) -> String {
    let class = escape_xml(view_type);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<{class}>
  <name>{name}</name>
  <description>{description}</description>
  <filterExecutors>false</filterExecutors>
  <filterQueue>false</filterQueue>
  <properties class="hudson.model.View$PropertyList"/>
  <jobNames>
    <comparator class="hudson.util.CaseInsensitiveComparator"/>
  </jobNames>
  <jobFilters/>
  <columns>
    <hudson.views.StatusColumn/>
    <hudson.views.WeatherColumn/>
    <hudson.views.JobColumn/>
    <hudson.views.LastSuccessColumn/>
    <hudson.views.LastFailureColumn/>
    <hudson.views.LastDurationColumn/>
    <hudson.views.BuildButtonColumn/>
  </columns>
  <recurse>false</recurse>
</{class}>
"#,
        class = class,
        name = escape_xml(name),
        description = escape_xml(description),
    )
}
