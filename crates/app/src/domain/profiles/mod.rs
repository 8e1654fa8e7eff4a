//! Profiles

pub mod dashboard;
pub mod data;
pub mod errors;
pub mod records;
pub mod service;

pub use dashboard::{Dashboard, DashboardError, Dashboards};
pub use errors::ProfilesServiceError;
pub use service::*;
