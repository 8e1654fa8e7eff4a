//! Catering

pub mod errors;
pub mod service;

pub use errors::CateringError;
pub use service::CateringService;
