//! Domain types returned by the client
//!
//! All types are value snapshots: fetched per call, never cached, and
//! serializable with camelCase field names for re-encoding.

mod artifact;
mod build;
mod job;
mod node;
mod queue;
mod server;
mod view;

pub use artifact::Artifact;
pub use build::{Build, BuildReference, BuildResult, RunningBuild};
pub use job::{Job, JobDetails, JobParameter};
pub use node::Node;
pub use queue::QueueItem;
pub use server::ServerInfo;
pub use view::{View, ViewDetails};
