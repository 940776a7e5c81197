//! eiam - ephemeral-iam configuration manager
//!
//! Prints, inspects, views and updates the key/value settings stored in the
//! ephemeral-iam configuration file, keeping the process logger in step with
//! the logging settings.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// Re-export commonly used types
pub use error::{EiamError, Result};
