//! Configuration parsing for glazewm-autotile
//!
//! This crate handles parsing the KDL configuration file shared by the
//! `autotiled` daemon and the `autotile` CLI.

mod error;
mod model;
mod parser;

pub use error::ConfigError;
pub use model::*;
pub use parser::{load_config, parse_config, parse_config_str, validate_endpoint};

/// Default configuration path (tilde is expanded by the callers)
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/glazewm-autotile/config.kdl";
