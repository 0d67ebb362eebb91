//! Bulk multi-site search: job model and coordinator.

pub mod coordinator;
pub mod job;

pub use coordinator::SearchCoordinator;
pub use job::{
    ExecutionMode, JobReport, JobState, SearchJob, SearchRequest, SiteProgress, SiteSelection,
    SiteState,
};
