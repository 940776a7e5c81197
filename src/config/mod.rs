//! Configuration management module
//!
//! This module handles the on-disk configuration store, the registry of
//! recognized keys, and the validated operations exposed by `eiam config`.

pub mod keys;
pub mod manager;
pub mod settings;
pub mod store;
pub mod value;

pub use keys::{ConfigKey, KeyKind};
pub use manager::SetOutcome;
pub use settings::get_config_path;
pub use store::ConfigStore;
pub use value::ConfigValue;
