//! Response bodies as a controller returns them

use serde_json::{Value, json};

pub const CRUMB_FIELD: &str = "Jenkins-Crumb";
pub const CRUMB: &str = "4f1c0b9d2e";

pub fn crumb_json() -> Value {
    json!({
        "_class": "hudson.security.csrf.DefaultCrumbIssuer",
        "crumb": CRUMB,
        "crumbRequestField": CRUMB_FIELD
    })
}

/// A string parameter definition.
pub fn parameter_json(name: &str, default: &str) -> Value {
    json!({
        "_class": "hudson.model.StringParameterDefinition",
        "name": name,
        "type": "StringParameterDefinition",
        "description": "",
        "defaultParameterValue": {
            "_class": "hudson.model.StringParameterValue",
            "value": default
        }
    })
}

/// Job details with the given parameter definitions.
pub fn job_details_json(name: &str, parameters: Vec<Value>) -> Value {
    let property = if parameters.is_empty() {
        json!([])
    } else {
        json!([{
            "_class": "hudson.model.ParametersDefinitionProperty",
            "parameterDefinitions": parameters
        }])
    };
    json!({
        "_class": "hudson.model.FreeStyleProject",
        "name": name,
        "url": format!("http://jenkins.local/job/{}/", name),
        "description": "",
        "buildable": true,
        "inQueue": false,
        "color": "blue",
        "disabled": false,
        "lastBuild": {"number": 41, "url": format!("http://jenkins.local/job/{}/41/", name)},
        "lastSuccessfulBuild": null,
        "lastFailedBuild": null,
        "property": property
    })
}

/// A build; `result` is ignored while `building`.
pub fn build_json(job: &str, number: u32, building: bool, result: Option<&str>) -> Value {
    json!({
        "_class": "hudson.model.FreeStyleBuild",
        "number": number,
        "url": format!("http://jenkins.local/job/{}/{}/", job, number),
        "result": if building { None } else { result },
        "building": building,
        "duration": if building { 0 } else { 93_000 },
        "timestamp": 1_700_000_000_000_i64,
        "estimatedDuration": 90_000,
        "executor": if building { json!({"number": 1}) } else { Value::Null }
    })
}
