//! FeatureFlow configuration
//!
//! Reads the deployment settings and external reference snapshot from a KDL
//! file, applies environment and command-line overrides, and validates the
//! result before it reaches the plan builder.

pub mod discovery;
pub mod error;
pub mod loader;
pub mod overrides;

pub use discovery::{CONFIG_PATH_ENV, find_config_file, find_in_dir};
pub use error::{ConfigError, Result};
pub use loader::{FeatureConfig, RawConfig, load, parse_kdl_file, parse_kdl_string};
pub use overrides::ConfigOverrides;
