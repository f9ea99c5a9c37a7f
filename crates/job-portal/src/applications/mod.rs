//! Application intake: resume-backed submissions and the per-job query views.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantFields, Application, ApplicationDetail, ApplicationId, Submission, SubmissionReceipt,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
