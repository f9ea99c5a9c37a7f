//! Job board backend: a job catalog, a credential store, and the resume-backed
//! application intake pipeline, all persisted through a small document store.

pub mod accounts;
pub mod applications;
pub mod config;
pub mod error;
pub mod jobs;
pub mod store;
pub mod telemetry;
pub mod uploads;
pub mod validation;
