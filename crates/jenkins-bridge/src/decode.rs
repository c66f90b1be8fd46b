//! Response decoders
//!
//! Pure functions from raw response bytes to domain types. The server's JSON
//! is nested and inconsistent (job parameters live under a generic property
//! list, queue items nest the job name under `task`, optional fields arrive
//! as `null` or not at all), so each decoder reads into a private wire struct
//! that tolerates those shapes and then flattens it.
//!
//! Absent or `null` optional fields become empty containers or `None`.
//! Malformed JSON yields [`Error::Decode`], never a panic.

use crate::crumb::Crumb;
use crate::error::{Error, Result};
use crate::types::{
    Artifact, Build, BuildReference, BuildResult, Job, JobDetails, JobParameter, Node, QueueItem,
    ServerInfo, View, ViewDetails,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse<'a, T: Deserialize<'a>>(bytes: &'a [u8], what: &'static str) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::decode(what, e))
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireJob {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    #[serde(default, deserialize_with = "nullable")]
    buildable: bool,
    #[serde(default, deserialize_with = "nullable")]
    in_queue: bool,
    #[serde(default, deserialize_with = "nullable")]
    color: String,
}

impl From<WireJob> for Job {
    fn from(wire: WireJob) -> Self {
        Job {
            name: wire.name,
            url: wire.url,
            description: wire.description,
            buildable: wire.buildable,
            in_queue: wire.in_queue,
            color: wire.color,
        }
    }
}

#[derive(Deserialize)]
struct WireJobList {
    #[serde(default, deserialize_with = "nullable")]
    jobs: Vec<WireJob>,
}

/// Decode `{"jobs": [...]}`. `null` or missing `jobs` is an empty list.
pub fn decode_jobs(bytes: &[u8]) -> Result<Vec<Job>> {
    let list: WireJobList = parse(bytes, "job list")?;
    Ok(list.jobs.into_iter().map(Job::from).collect())
}

#[derive(Deserialize)]
struct WireBuildRef {
    number: u32,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
}

impl From<WireBuildRef> for BuildReference {
    fn from(wire: WireBuildRef) -> Self {
        BuildReference {
            number: wire.number,
            url: wire.url,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDefaultValue {
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireParameterDefinition {
    name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    param_type: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    #[serde(default)]
    default_parameter_value: Option<WireDefaultValue>,
    #[serde(default, deserialize_with = "nullable")]
    choices: Vec<String>,
}

impl From<WireParameterDefinition> for JobParameter {
    fn from(wire: WireParameterDefinition) -> Self {
        JobParameter {
            name: wire.name,
            param_type: wire.param_type,
            default_value: wire.default_parameter_value.and_then(|d| d.value),
            description: wire.description,
            choices: wire.choices,
        }
    }
}

/// One entry of the job's `property` list. Only the parameter-definitions
/// property carries `parameterDefinitions`; every other entry decodes empty.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireJobProperty {
    #[serde(default, deserialize_with = "nullable")]
    parameter_definitions: Vec<WireParameterDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireJobDetails {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    #[serde(default, deserialize_with = "nullable")]
    buildable: bool,
    #[serde(default, deserialize_with = "nullable")]
    in_queue: bool,
    #[serde(default, deserialize_with = "nullable")]
    color: String,
    #[serde(default, deserialize_with = "nullable")]
    disabled: bool,
    #[serde(default)]
    last_build: Option<WireBuildRef>,
    #[serde(default)]
    last_successful_build: Option<WireBuildRef>,
    #[serde(default)]
    last_failed_build: Option<WireBuildRef>,
    #[serde(default, deserialize_with = "nullable")]
    property: Vec<WireJobProperty>,
}

/// Decode a single job with its parameter schema and build references.
pub fn decode_job_details(bytes: &[u8]) -> Result<JobDetails> {
    let wire: WireJobDetails = parse(bytes, "job details")?;

    let parameters = wire
        .property
        .into_iter()
        .flat_map(|property| property.parameter_definitions)
        .map(JobParameter::from)
        .collect();

    Ok(JobDetails {
        job: Job {
            name: wire.name,
            url: wire.url,
            description: wire.description,
            buildable: wire.buildable,
            in_queue: wire.in_queue,
            color: wire.color,
        },
        last_build: wire.last_build.map(BuildReference::from),
        last_successful_build: wire.last_successful_build.map(BuildReference::from),
        last_failed_build: wire.last_failed_build.map(BuildReference::from),
        parameters,
        disabled: wire.disabled,
    })
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBuild {
    number: u32,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
    #[serde(default)]
    result: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    building: bool,
    #[serde(default, deserialize_with = "nullable")]
    duration: i64,
    #[serde(default, deserialize_with = "nullable")]
    timestamp: i64,
    #[serde(default)]
    executor: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    estimated_duration: i64,
}

/// The executor field is a string on some servers, an object on others.
fn executor_label(value: Value) -> Option<String> {
    match value {
        Value::String(label) if !label.is_empty() => Some(label),
        Value::Object(map) => {
            if let Some(number) = map.get("number").and_then(Value::as_u64) {
                Some(format!("executor #{}", number))
            } else {
                map.get("_class")
                    .and_then(Value::as_str)
                    .map(|class| class.rsplit('.').next().unwrap_or(class).to_string())
            }
        }
        _ => None,
    }
}

impl From<WireBuild> for Build {
    fn from(wire: WireBuild) -> Self {
        // A running build has no result, whatever the payload says
        let result = if wire.building {
            None
        } else {
            wire.result.map(BuildResult::from)
        };

        Build {
            number: wire.number,
            url: wire.url,
            result,
            building: wire.building,
            duration: wire.duration,
            timestamp: wire.timestamp,
            executor: wire.executor.and_then(executor_label),
            estimated_duration: wire.estimated_duration,
        }
    }
}

/// Decode a single build.
pub fn decode_build(bytes: &[u8]) -> Result<Build> {
    let wire: WireBuild = parse(bytes, "build")?;
    Ok(wire.into())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLastBuild {
    #[serde(default)]
    last_build: Option<WireBuild>,
}

/// Decode `{"lastBuild": {...}}`; `None` when the job has never been built.
pub fn decode_last_build(bytes: &[u8]) -> Result<Option<Build>> {
    let wire: WireLastBuild = parse(bytes, "last build")?;
    Ok(wire.last_build.map(Build::from))
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArtifact {
    #[serde(default, deserialize_with = "nullable")]
    file_name: String,
    #[serde(default, deserialize_with = "nullable")]
    relative_path: String,
    #[serde(default, deserialize_with = "nullable")]
    size: u64,
}

#[derive(Deserialize)]
struct WireArtifactList {
    #[serde(default, deserialize_with = "nullable")]
    artifacts: Vec<WireArtifact>,
}

/// Decode `{"artifacts": [...]}`.
pub fn decode_artifacts(bytes: &[u8]) -> Result<Vec<Artifact>> {
    let list: WireArtifactList = parse(bytes, "artifact list")?;
    Ok(list
        .artifacts
        .into_iter()
        .map(|a| Artifact {
            file_name: a.file_name,
            relative_path: a.relative_path,
            size: a.size,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct WireTask {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
}

#[derive(Deserialize)]
struct WireParameterValue {
    name: String,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Deserialize)]
struct WireAction {
    #[serde(default, deserialize_with = "nullable")]
    parameters: Vec<WireParameterValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQueueItem {
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    task: WireTask,
    #[serde(default, deserialize_with = "nullable")]
    why: String,
    #[serde(default, deserialize_with = "nullable")]
    blocked: bool,
    #[serde(default, deserialize_with = "nullable")]
    buildable: bool,
    #[serde(default, deserialize_with = "nullable")]
    stuck: bool,
    #[serde(default, deserialize_with = "nullable")]
    in_queue_since: i64,
    #[serde(default, deserialize_with = "nullable")]
    params: String,
    #[serde(default, deserialize_with = "nullable")]
    actions: Vec<WireAction>,
    #[serde(default, deserialize_with = "nullable")]
    cancelled: bool,
    #[serde(default)]
    executable: Option<WireBuildRef>,
}

fn parameter_value_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

/// Parse the queue's `params` string: newline-separated `NAME=value` lines,
/// usually with a leading newline. Lines without `=` are skipped.
pub fn parse_queue_params(params: &str) -> BTreeMap<String, String> {
    params
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            let (name, value) = line.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

impl From<WireQueueItem> for QueueItem {
    fn from(wire: WireQueueItem) -> Self {
        let mut parameters: BTreeMap<String, String> = wire
            .actions
            .into_iter()
            .flat_map(|action| action.parameters)
            .map(|p| (p.name, parameter_value_text(p.value)))
            .collect();

        if parameters.is_empty() {
            parameters = parse_queue_params(&wire.params);
        }

        QueueItem {
            id: wire.id,
            job_name: wire.task.name,
            why: wire.why,
            blocked: wire.blocked,
            buildable: wire.buildable,
            stuck: wire.stuck,
            in_queue_since: wire.in_queue_since,
            parameters,
            cancelled: wire.cancelled,
            executable: wire.executable.map(BuildReference::from),
        }
    }
}

#[derive(Deserialize)]
struct WireQueue {
    #[serde(default, deserialize_with = "nullable")]
    items: Vec<WireQueueItem>,
}

/// Decode `{"items": [...]}`, flattening `task.name` into `job_name`.
pub fn decode_queue(bytes: &[u8]) -> Result<Vec<QueueItem>> {
    let queue: WireQueue = parse(bytes, "queue")?;
    Ok(queue.items.into_iter().map(QueueItem::from).collect())
}

/// Decode a single queue item.
pub fn decode_queue_item(bytes: &[u8]) -> Result<QueueItem> {
    let wire: WireQueueItem = parse(bytes, "queue item")?;
    Ok(wire.into())
}

// ---------------------------------------------------------------------------
// Views, nodes, server
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WireView {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
}

impl From<WireView> for View {
    fn from(wire: WireView) -> Self {
        View {
            name: wire.name,
            url: wire.url,
            description: wire.description,
        }
    }
}

#[derive(Deserialize)]
struct WireViewList {
    #[serde(default, deserialize_with = "nullable")]
    views: Vec<WireView>,
}

/// Decode `{"views": [...]}`.
pub fn decode_views(bytes: &[u8]) -> Result<Vec<View>> {
    let list: WireViewList = parse(bytes, "view list")?;
    Ok(list.views.into_iter().map(View::from).collect())
}

#[derive(Deserialize)]
struct WireViewDetails {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    url: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    #[serde(default, deserialize_with = "nullable")]
    jobs: Vec<WireJob>,
}

/// Decode a view with its jobs.
pub fn decode_view(bytes: &[u8]) -> Result<ViewDetails> {
    let wire: WireViewDetails = parse(bytes, "view")?;
    Ok(ViewDetails {
        view: View {
            name: wire.name,
            url: wire.url,
            description: wire.description,
        },
        jobs: wire.jobs.into_iter().map(Job::from).collect(),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    #[serde(default, deserialize_with = "nullable")]
    display_name: String,
    #[serde(default, deserialize_with = "nullable")]
    offline: bool,
    #[serde(default, deserialize_with = "nullable")]
    temporarily_offline: bool,
    #[serde(default, deserialize_with = "nullable")]
    num_executors: u32,
    #[serde(default, deserialize_with = "nullable")]
    idle: bool,
}

#[derive(Deserialize)]
struct WireComputerSet {
    #[serde(default, deserialize_with = "nullable")]
    computer: Vec<WireNode>,
}

/// Decode `{"computer": [...]}`.
pub fn decode_nodes(bytes: &[u8]) -> Result<Vec<Node>> {
    let set: WireComputerSet = parse(bytes, "node list")?;
    Ok(set
        .computer
        .into_iter()
        .map(|n| Node {
            display_name: n.display_name,
            offline: n.offline,
            temporarily_offline: n.temporarily_offline,
            num_executors: n.num_executors,
            idle: n.idle,
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireServer {
    #[serde(default, deserialize_with = "nullable")]
    mode: String,
    #[serde(default, deserialize_with = "nullable")]
    quieting_down: bool,
    #[serde(default, deserialize_with = "nullable")]
    use_security: bool,
}

/// Decode the root `/api/json` document; `version` comes from a header.
pub fn decode_server_info(bytes: &[u8], version: Option<String>) -> Result<ServerInfo> {
    let wire: WireServer = parse(bytes, "server info")?;
    Ok(ServerInfo {
        version,
        mode: wire.mode,
        quieting_down: wire.quieting_down,
        use_security: wire.use_security,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCrumb {
    #[serde(default, deserialize_with = "nullable")]
    crumb: String,
    #[serde(default, deserialize_with = "nullable")]
    crumb_request_field: String,
}

/// Decode `{"crumbRequestField": ..., "crumb": ...}`.
///
/// A crumb with an empty field name or value is useless and is rejected as a
/// handshake failure.
pub fn decode_crumb(bytes: &[u8]) -> Result<Crumb> {
    let wire: WireCrumb = parse(bytes, "crumb")?;
    if wire.crumb.is_empty() || wire.crumb_request_field.is_empty() {
        return Err(Error::CsrfHandshake(
            "crumb issuer returned an empty crumb".to_string(),
        ));
    }
    Ok(Crumb {
        request_field: wire.crumb_request_field,
        value: wire.crumb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(r#"{"jobs": null}"#)]
    #[case(r#"{"jobs": []}"#)]
    #[case(r#"{"_class": "hudson.model.Hudson"}"#)]
    fn test_empty_job_lists(#[case] body: &str) {
        assert!(decode_jobs(body.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_jobs_with_null_fields() {
        let body = json!({
            "jobs": [
                {"name": "deploy", "url": "http://j/job/deploy/", "description": null,
                 "buildable": true, "inQueue": false, "color": "blue"},
                {"_class": "com.cloudbees.hudson.plugins.folder.Folder",
                 "name": "team", "url": "http://j/job/team/"}
            ]
        });

        let jobs = decode_jobs(body.to_string().as_bytes()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].description, "");
        assert_eq!(jobs[0].color, "blue");
        assert!(jobs[0].buildable);
        assert_eq!(jobs[1].name, "team");
        assert_eq!(jobs[1].color, "");
    }

    #[rstest]
    #[case(b"not json".as_slice())]
    #[case(b"".as_slice())]
    #[case(br#"{"jobs": "nope"}"#.as_slice())]
    fn test_malformed_job_list(#[case] body: &[u8]) {
        assert_matches!(decode_jobs(body), Err(Error::Decode { what: "job list", .. }));
    }

    #[test]
    fn test_job_details_collects_parameters_across_properties() {
        let body = json!({
            "name": "deploy",
            "url": "http://j/job/deploy/",
            "description": "Deploys things",
            "buildable": true,
            "inQueue": false,
            "color": "red",
            "disabled": false,
            "lastBuild": {"number": 12, "url": "http://j/job/deploy/12/"},
            "lastSuccessfulBuild": null,
            "lastFailedBuild": {"number": 12, "url": "http://j/job/deploy/12/"},
            "property": [
                {"_class": "jenkins.model.BuildDiscarderProperty"},
                {
                    "_class": "hudson.model.ParametersDefinitionProperty",
                    "parameterDefinitions": [
                        {"name": "ENV", "type": "ChoiceParameterDefinition",
                         "description": "Target", "choices": ["dev", "prod"],
                         "defaultParameterValue": {"value": "dev"}},
                        {"name": "DRY_RUN", "type": "BooleanParameterDefinition",
                         "defaultParameterValue": {"value": true}},
                        {"name": "TOKEN", "type": "PasswordParameterDefinition",
                         "defaultParameterValue": null}
                    ]
                }
            ]
        });

        let details = decode_job_details(body.to_string().as_bytes()).unwrap();
        assert_eq!(details.job.name, "deploy");
        assert_eq!(details.last_build.as_ref().map(|b| b.number), Some(12));
        assert!(details.last_successful_build.is_none());
        assert_eq!(details.parameters.len(), 3);

        let env = details.parameter("ENV").unwrap();
        assert_eq!(env.param_type, "ChoiceParameterDefinition");
        assert_eq!(env.default_value, Some(json!("dev")));
        assert_eq!(env.choices, vec!["dev".to_string(), "prod".to_string()]);

        assert_eq!(details.parameter("DRY_RUN").unwrap().default_value, Some(json!(true)));
        assert_eq!(details.parameter("TOKEN").unwrap().default_value, None);
    }

    #[test]
    fn test_job_details_without_properties() {
        let body = br#"{"name": "plain", "url": "http://j/job/plain/", "property": null}"#;
        let details = decode_job_details(body).unwrap();
        assert!(details.parameters.is_empty());
        assert!(details.last_build.is_none());
        assert!(!details.is_parameterized());
    }

    #[test]
    fn test_running_build_has_no_result() {
        let body = json!({
            "number": 5, "url": "http://j/job/a/5/", "result": "SUCCESS", "building": true,
            "duration": 0, "timestamp": 1_700_000_000_000_i64,
            "executor": {"number": 1}, "estimatedDuration": 60_000
        });
        let build = decode_build(body.to_string().as_bytes()).unwrap();
        assert!(build.building);
        assert_eq!(build.result, None);
        assert_eq!(build.executor.as_deref(), Some("executor #1"));
    }

    #[rstest]
    #[case(json!(null), None)]
    #[case(json!("master-1"), Some("master-1"))]
    #[case(json!({"_class": "hudson.model.OneOffExecutor"}), Some("OneOffExecutor"))]
    #[case(json!({"number": 3}), Some("executor #3"))]
    fn test_executor_shapes(#[case] executor: Value, #[case] expected: Option<&str>) {
        let body = json!({
            "number": 9, "url": "u", "result": "FAILURE", "building": false,
            "duration": 10, "timestamp": 1, "executor": executor, "estimatedDuration": -1
        });
        let build = decode_build(body.to_string().as_bytes()).unwrap();
        assert_eq!(build.executor.as_deref(), expected);
        assert_eq!(build.result, Some(BuildResult::Failure));
        assert_eq!(build.estimated_duration, -1);
    }

    #[test]
    fn test_last_build_absent() {
        assert_eq!(decode_last_build(br#"{"lastBuild": null}"#).unwrap(), None);
        assert_eq!(decode_last_build(b"{}").unwrap(), None);
    }

    #[test]
    fn test_queue_flattens_task_and_parses_params() {
        let body = json!({
            "items": [
                {"id": 101, "task": {"name": "deploy"}, "why": "Waiting for next available executor",
                 "blocked": false, "buildable": true, "stuck": false, "inQueueSince": 1_700_000_000_000_i64,
                 "params": "\nENV=prod\nVERSION=1.2.3"},
                {"id": 102, "task": {"name": "test"}, "why": null, "blocked": true,
                 "buildable": false, "stuck": true, "inQueueSince": 5,
                 "actions": [{}, {"parameters": [{"name": "SUITE", "value": "smoke"},
                                                  {"name": "RETRIES", "value": 2}]}]}
            ]
        });

        let items = decode_queue(body.to_string().as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].job_name, "deploy");
        assert_eq!(items[0].parameters.get("ENV").map(String::as_str), Some("prod"));
        assert_eq!(items[0].parameters.get("VERSION").map(String::as_str), Some("1.2.3"));

        assert_eq!(items[1].job_name, "test");
        assert_eq!(items[1].why, "");
        assert!(items[1].stuck);
        assert_eq!(items[1].parameters.get("SUITE").map(String::as_str), Some("smoke"));
        assert_eq!(items[1].parameters.get("RETRIES").map(String::as_str), Some("2"));
    }

    #[rstest]
    #[case(r#"{"items": null}"#)]
    #[case(r#"{"items": []}"#)]
    fn test_empty_queue(#[case] body: &str) {
        assert!(decode_queue(body.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_queue_item_with_executable() {
        let body = json!({
            "id": 77, "task": {"name": "deploy"}, "cancelled": false,
            "executable": {"number": 31, "url": "http://j/job/deploy/31/"}
        });
        let item = decode_queue_item(body.to_string().as_bytes()).unwrap();
        assert!(item.is_started());
        assert_eq!(item.executable.unwrap().number, 31);
        assert!(item.parameters.is_empty());
    }

    #[rstest]
    #[case("", &[])]
    #[case("\nA=1", &[("A", "1")])]
    #[case("A=1\r\nB=x=y\nnoequals\n=orphan", &[("A", "1"), ("B", "x=y")])]
    #[case("\nEMPTY=", &[("EMPTY", "")])]
    fn test_parse_queue_params(#[case] raw: &str, #[case] expected: &[(&str, &str)]) {
        let parsed = parse_queue_params(raw);
        let expected: BTreeMap<String, String> = expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_views_and_view_details() {
        let views = decode_views(
            br#"{"views": [{"name": "all", "url": "http://j/", "description": null}]}"#,
        )
        .unwrap();
        assert_eq!(views[0].name, "all");
        assert_eq!(views[0].description, "");

        let view = decode_view(br#"{"name": "ops", "url": "http://j/view/ops/", "jobs": null}"#)
            .unwrap();
        assert_eq!(view.view.name, "ops");
        assert!(view.jobs.is_empty());
    }

    #[test]
    fn test_nodes() {
        let nodes = decode_nodes(
            br#"{"computer": [
                {"displayName": "Built-In Node", "offline": false, "temporarilyOffline": false, "numExecutors": 2, "idle": true},
                {"displayName": "agent-1", "offline": true, "temporarilyOffline": true, "numExecutors": 4}
            ]}"#,
        )
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_available());
        assert!(!nodes[1].is_available());
        assert!(decode_nodes(br#"{"computer": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_artifacts() {
        let artifacts = decode_artifacts(
            br#"{"artifacts": [{"fileName": "app.jar", "relativePath": "target/app.jar", "size": 1024}]}"#,
        )
        .unwrap();
        assert_eq!(artifacts[0].relative_path, "target/app.jar");
        assert_eq!(artifacts[0].size, 1024);
        assert!(decode_artifacts(br#"{"artifacts": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_server_info() {
        let info = decode_server_info(
            br#"{"mode": "NORMAL", "quietingDown": true, "useSecurity": true}"#,
            Some("2.440.1".to_string()),
        )
        .unwrap();
        assert_eq!(info.version.as_deref(), Some("2.440.1"));
        assert!(!info.is_accepting_builds());
    }

    #[test]
    fn test_crumb() {
        let crumb = decode_crumb(
            br#"{"_class": "hudson.security.csrf.DefaultCrumbIssuer", "crumb": "c0ffee", "crumbRequestField": "Jenkins-Crumb"}"#,
        )
        .unwrap();
        assert_eq!(crumb.request_field, "Jenkins-Crumb");
        assert_eq!(crumb.value, "c0ffee");

        assert_matches!(
            decode_crumb(br#"{"crumb": "", "crumbRequestField": "Jenkins-Crumb"}"#),
            Err(Error::CsrfHandshake(_))
        );
        assert_matches!(decode_crumb(b"<html>"), Err(Error::Decode { what: "crumb", .. }));
    }
}
