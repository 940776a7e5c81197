//! Utility functions module
//!
//! This module contains literal parsing helpers and console output formatting.

pub mod format;
pub mod helpers;

pub use format::*;
pub use helpers::*;
