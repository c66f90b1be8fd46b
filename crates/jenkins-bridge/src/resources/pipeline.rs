//! Pipeline definition retrieval
//!
//! Jenkins stores inline pipeline scripts inside the job's `config.xml`.
//! Only the `<script>` element is needed, so the document is scanned
//! instead of parsed.

use super::{job_path, validate_job_name, with_segments};
use crate::client::Client;
use crate::context::Context;
use crate::error::{Error, ResourceRef, Result};
use crate::http::ApiRequest;
use once_cell::sync::Lazy;
use regex::Regex;

const INLINE_DEFINITION: &str = "org.jenkinsci.plugins.workflow.cps.CpsFlowDefinition";
const SCM_DEFINITION: &str = "org.jenkinsci.plugins.workflow.cps.CpsScmFlowDefinition";

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<script>([\s\S]*?)</script>").expect("Failed to compile script block regex")
});

/// Pipeline API resource.
#[derive(Clone)]
pub struct Pipeline {
    client: Client,
}

impl Pipeline {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the inline Groovy script of a pipeline job.
    ///
    /// Fails with [`Error::PipelineFromScm`] when the Jenkinsfile lives in
    /// source control and [`Error::NotAPipeline`] for freestyle or
    /// multibranch jobs.
    pub async fn script(&self, ctx: &Context, job: &str) -> Result<String> {
        validate_job_name(job)?;

        let request = ApiRequest::get(with_segments(job_path(job), &["config.xml"])).raw();
        let response = self
            .client
            .executor()
            .fetch(ctx, request, ResourceRef::job(job))
            .await?;
        extract_pipeline_script(job, &response.text())
    }
}

/// Pull the inline script out of a job's `config.xml`.
pub fn extract_pipeline_script(job: &str, xml: &str) -> Result<String> {
    if !xml.contains(INLINE_DEFINITION) {
        return Err(if xml.contains(SCM_DEFINITION) {
            Error::PipelineFromScm(job.to_string())
        } else {
            Error::NotAPipeline(job.to_string())
        });
    }

    let script = SCRIPT_BLOCK
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_xml(m.as_str()))
        .unwrap_or_default();
    if script.trim().is_empty() {
        return Err(Error::PipelineScriptMissing(job.to_string()));
    }
    Ok(script)
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn inline_config(script: &str) -> String {
        format!(
            r#"<?xml version='1.1' encoding='UTF-8'?>
<flow-definition plugin="workflow-job@1400.v7fd111b_ec82f">
  <definition class="org.jenkinsci.plugins.workflow.cps.CpsFlowDefinition" plugin="workflow-cps@3903">
    <script>{}</script>
    <sandbox>true</sandbox>
  </definition>
</flow-definition>"#,
            script
        )
    }

    #[test]
    fn test_extracts_and_unescapes_inline_script() {
        let xml = inline_config(
            "pipeline {\n  stages {\n    stage(&apos;Build&apos;) { steps { sh &quot;make &amp;&amp; echo &lt;ok&gt;&quot; } }\n  }\n}",
        );
        let script = extract_pipeline_script("deploy", &xml).unwrap();
        assert_eq!(
            script,
            "pipeline {\n  stages {\n    stage('Build') { steps { sh \"make && echo <ok>\" } }\n  }\n}"
        );
    }

    #[test]
    fn test_double_escaped_entity_unescapes_once() {
        let xml = inline_config("echo &amp;lt;");
        assert_eq!(extract_pipeline_script("deploy", &xml).unwrap(), "echo &lt;");
    }

    #[test]
    fn test_empty_script_block() {
        let err = extract_pipeline_script("deploy", &inline_config("  ")).unwrap_err();
        assert_matches!(err, Error::PipelineScriptMissing(job) if job == "deploy");
    }

    #[test]
    fn test_missing_script_block() {
        let xml = r#"<flow-definition><definition class="org.jenkinsci.plugins.workflow.cps.CpsFlowDefinition"/></flow-definition>"#;
        assert_matches!(
            extract_pipeline_script("deploy", xml),
            Err(Error::PipelineScriptMissing(_))
        );
    }

    #[test]
    fn test_scm_pipeline() {
        let xml = r#"<flow-definition>
  <definition class="org.jenkinsci.plugins.workflow.cps.CpsScmFlowDefinition">
    <scriptPath>Jenkinsfile</scriptPath>
  </definition>
</flow-definition>"#;
        assert_matches!(
            extract_pipeline_script("deploy", xml),
            Err(Error::PipelineFromScm(job)) if job == "deploy"
        );
    }

    #[test]
    fn test_freestyle_job_is_not_a_pipeline() {
        let xml = "<project><builders><hudson.tasks.Shell><command>make</command></hudson.tasks.Shell></builders></project>";
        assert_matches!(
            extract_pipeline_script("deploy", xml),
            Err(Error::NotAPipeline(_))
        );
    }
}
