//! Job catalog: posting and listing positions.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ExperienceLevel, Job, JobDraft, JobId, JobSummary, JobType, SalaryRange};
pub use repository::{JobFilter, JobRepository};
pub use router::job_router;
pub use service::{JobCatalog, JobServiceError};
