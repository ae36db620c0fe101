//! Utilities
//!
//! - [`error`] - HTTP error envelope and status mapping
//! - [`logger`] - tracing setup with optional rolling file output

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult};
