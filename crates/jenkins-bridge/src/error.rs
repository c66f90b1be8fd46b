//! Error types for the Jenkins client
//!
//! Every failure is a returned value: HTTP statuses are classified into the
//! variants below, transport failures are converted from
//! [`TransportError`], and decode failures carry the serde error as source.

use crate::types::BuildResult;
use jenkins_bridge_transport::TransportError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies the server-side resource an error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    /// A job, possibly folder-qualified (`team/app`)
    Job {
        /// Job name
        name: String,
    },
    /// A folder whose children were listed
    Folder {
        /// Folder path
        name: String,
    },
    /// One build of a job
    Build {
        /// Job name
        job: String,
        /// Build number
        number: u32,
    },
    /// The most recent build of a job
    LastBuild {
        /// Job name
        job: String,
    },
    /// Console output of a build
    BuildLog {
        /// Job name
        job: String,
        /// Build number
        number: u32,
    },
    /// A file archived by a build
    Artifact {
        /// Job name
        job: String,
        /// Build number
        number: u32,
        /// Path relative to the artifact root
        path: String,
    },
    /// A build queue entry
    QueueItem {
        /// Queue item id
        id: u64,
    },
    /// A view
    View {
        /// View name
        name: String,
    },
    /// The CSRF crumb issuer
    CrumbIssuer,
    /// A server-wide endpoint (queue, views, nodes)
    Server,
}

impl ResourceRef {
    /// Reference to a job.
    pub fn job(name: impl Into<String>) -> Self {
        Self::Job { name: name.into() }
    }

    /// Reference to a build.
    pub fn build(job: impl Into<String>, number: u32) -> Self {
        Self::Build {
            job: job.into(),
            number,
        }
    }

    /// Reference to a view.
    pub fn view(name: impl Into<String>) -> Self {
        Self::View { name: name.into() }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job { name } => write!(f, "job '{}'", name),
            Self::Folder { name } => write!(f, "folder '{}'", name),
            Self::Build { job, number } => write!(f, "build #{} of job '{}'", number, job),
            Self::LastBuild { job } => write!(f, "last build of job '{}'", job),
            Self::BuildLog { job, number } => {
                write!(f, "console log of build #{} of job '{}'", number, job)
            }
            Self::Artifact { job, number, path } => write!(
                f,
                "artifact '{}' of build #{} of job '{}'",
                path, number, job
            ),
            Self::QueueItem { id } => write!(f, "queue item {}", id),
            Self::View { name } => write!(f, "view '{}'", name),
            Self::CrumbIssuer => write!(f, "crumb issuer"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Main error type for the Jenkins client.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials were missing or rejected (401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The resource does not exist (404).
    #[error("Not found: {0}")]
    NotFound(ResourceRef),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authenticated but not authorized for the resource (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(ResourceRef),

    /// DNS, connection, TLS or mid-request transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The caller's deadline or the transport timeout elapsed.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Any other non-success status.
    #[error("Jenkins returned status {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A read kept failing after every retry.
    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total attempts, including the first
        attempts: u32,
        /// Last observed transport failure
        #[source]
        source: TransportError,
    },

    /// A trigger was accepted but no queue item could be correlated.
    #[error(
        "Jenkins did not return a queue item location (status {status}); likely causes: {}",
        .hints.join("; ")
    )]
    ProtocolAmbiguity {
        /// Status of the trigger response
        status: u16,
        /// Likely causes, most common first
        hints: Vec<String>,
    },

    /// Stop was requested for a build that already finished.
    #[error(
        "Build #{number} of job '{job}' is not running (result: {})",
        .result.as_ref().map_or("UNKNOWN", BuildResult::as_str)
    )]
    BuildNotRunning {
        /// Job name
        job: String,
        /// Build number
        number: u32,
        /// Terminal result of the build
        result: Option<BuildResult>,
    },

    /// The build was still running after the stop request settled.
    #[error("Build #{number} of job '{job}' is still running after stop request")]
    BuildStillRunning {
        /// Job name
        job: String,
        /// Build number
        number: u32,
    },

    /// The build finished with a different result than the one requested.
    #[error(
        "Build #{number} of job '{job}' finished as {}, expected {}",
        .actual.as_ref().map_or("UNKNOWN", BuildResult::as_str),
        .expected.as_str()
    )]
    UnexpectedBuildResult {
        /// Job name
        job: String,
        /// Build number
        number: u32,
        /// Result that was requested
        expected: BuildResult,
        /// Result the server reported
        actual: Option<BuildResult>,
    },

    /// The job is an inline pipeline but its script block is empty or absent.
    #[error("Pipeline job '{0}' has an empty or missing <script> block")]
    PipelineScriptMissing(String),

    /// The pipeline definition lives in source control, not in the job config.
    #[error("Pipeline of job '{0}' is loaded from SCM; the Jenkinsfile is not stored inline")]
    PipelineFromScm(String),

    /// The job is not an inline pipeline job.
    #[error("Job '{0}' is not an inline pipeline job")]
    NotAPipeline(String),

    /// A queue item was cancelled before it started a build.
    #[error("Queue item {0} was cancelled")]
    QueueItemCancelled(u64),

    /// The resource already exists (409).
    #[error("Already exists: {0}")]
    AlreadyExists(ResourceRef),

    /// Strict crumb policy: the CSRF handshake failed.
    #[error("CSRF crumb handshake failed: {0}")]
    CsrfHandshake(String),

    /// The response body did not have the expected shape.
    #[error("Failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid or inconsistent configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable error codes for rendering failures to outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Credentials rejected
    AuthFailed,
    /// Resource absent
    NotFound,
    /// Caller error
    InvalidInput,
    /// Transport failure
    NetworkError,
    /// Deadline elapsed or operation cancelled
    Timeout,
    /// Not authorized
    PermissionDenied,
    /// Server-side or protocol failure
    JenkinsError,
    /// Failure inside the client itself
    InternalError,
}

impl ErrorCode {
    /// Wire form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::JenkinsError => "JENKINS_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify a non-success HTTP status for `resource`.
    ///
    /// 401 and 403 map to authentication and permission errors, 404 to
    /// `NotFound`, everything else to `Upstream` with the raw body.
    pub fn from_status(status: u16, body: &str, resource: ResourceRef) -> Self {
        match status {
            401 => Error::Authentication(format!(
                "credentials rejected while accessing {}",
                resource
            )),
            403 => Error::PermissionDenied(resource),
            404 => Error::NotFound(resource),
            _ => Error::Upstream {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Wrap a JSON decode failure.
    pub fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { what, source }
    }

    /// Stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Authentication(_) => ErrorCode::AuthFailed,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::InvalidInput(_)
            | Error::BuildNotRunning { .. }
            | Error::AlreadyExists(_)
            | Error::InvalidUrl(_)
            | Error::Config(_) => ErrorCode::InvalidInput,
            Error::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Error::Network(_) | Error::RetriesExhausted { .. } => ErrorCode::NetworkError,
            Error::Timeout(_) | Error::Cancelled => ErrorCode::Timeout,
            Error::Upstream { .. }
            | Error::ProtocolAmbiguity { .. }
            | Error::BuildStillRunning { .. }
            | Error::UnexpectedBuildResult { .. }
            | Error::PipelineScriptMissing(_)
            | Error::PipelineFromScm(_)
            | Error::NotAPipeline(_)
            | Error::QueueItemCancelled(_)
            | Error::CsrfHandshake(_)
            | Error::Decode { .. } => ErrorCode::JenkinsError,
            Error::HttpClient(_) | Error::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Check if retrying the whole operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) | Error::RetriesExhausted { .. } => true,
            Error::BuildStillRunning { .. } => true,
            Error::Upstream { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::RetriesExhausted { attempts, last } => Error::RetriesExhausted {
                attempts,
                source: *last,
            },
            TransportError::Timeout(duration) => Error::Timeout(duration),
            TransportError::Connection(msg) | TransportError::Request(msg) => Error::Network(msg),
            TransportError::Tls(msg) => Error::Network(format!("TLS: {}", msg)),
            TransportError::ServerError { status, body } => Error::Upstream { status, body },
            TransportError::Builder(msg) => Error::HttpClient(msg),
            TransportError::Io(err) => Error::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, ErrorCode::AuthFailed)]
    #[case(403, ErrorCode::PermissionDenied)]
    #[case(404, ErrorCode::NotFound)]
    #[case(409, ErrorCode::JenkinsError)]
    #[case(500, ErrorCode::JenkinsError)]
    fn test_from_status_codes(#[case] status: u16, #[case] expected: ErrorCode) {
        let err = Error::from_status(status, "body", ResourceRef::job("deploy"));
        assert_eq!(err.code(), expected);
    }

    #[test]
    fn test_not_found_carries_key() {
        let err = Error::from_status(404, "", ResourceRef::build("deploy", 42));
        match &err {
            Error::NotFound(ResourceRef::Build { job, number }) => {
                assert_eq!(job, "deploy");
                assert_eq!(*number, 42);
            }
            _ => panic!("Expected NotFound variant"),
        }
        assert_eq!(err.to_string(), "Not found: build #42 of job 'deploy'");
    }

    #[test]
    fn test_upstream_keeps_body() {
        let err = Error::from_status(502, "<html>Bad Gateway</html>", ResourceRef::Server);
        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            _ => panic!("Expected Upstream variant"),
        }
    }

    #[test]
    fn test_protocol_ambiguity_lists_hints() {
        let err = Error::ProtocolAmbiguity {
            status: 201,
            hints: vec!["first".to_string(), "second".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("status 201"));
        assert!(msg.contains("first; second"));
    }

    #[test]
    fn test_build_not_running_message() {
        let err = Error::BuildNotRunning {
            job: "deploy".to_string(),
            number: 7,
            result: Some(BuildResult::Success),
        };
        assert_eq!(
            err.to_string(),
            "Build #7 of job 'deploy' is not running (result: SUCCESS)"
        );
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[test]
    fn test_transport_exhaustion_conversion() {
        let err: Error = TransportError::RetriesExhausted {
            attempts: 4,
            last: Box::new(TransportError::ServerError {
                status: 503,
                body: String::new(),
            }),
        }
        .into();

        match &err {
            Error::RetriesExhausted { attempts, source } => {
                assert_eq!(*attempts, 4);
                assert!(matches!(source, TransportError::ServerError { status: 503, .. }));
            }
            _ => panic!("Expected RetriesExhausted variant"),
        }
        assert!(err.is_retryable());
        assert_eq!(err.code(), ErrorCode::NetworkError);
    }

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::PermissionDenied).unwrap();
        assert_eq!(json, "\"PERMISSION_DENIED\"");
        assert_eq!(ErrorCode::AuthFailed.to_string(), "AUTH_FAILED");
    }

    #[test]
    fn test_resource_ref_serializes_tagged() {
        let json = serde_json::to_value(ResourceRef::QueueItem { id: 12 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "queue_item", "id": 12}));
    }
}
