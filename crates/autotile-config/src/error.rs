use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to parse KDL")]
    #[diagnostic(code(glazewm_autotile::config::parse_error))]
    ParseError {
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(glazewm_autotile::config::invalid))]
    Invalid { message: String },

    #[error("Missing value for `{node}`")]
    #[diagnostic(
        code(glazewm_autotile::config::missing_value),
        help("write the value after the node name, e.g. `{node} <value>`")
    )]
    MissingValue { node: String },

    #[error("Invalid endpoint `{endpoint}`: {reason}")]
    #[diagnostic(
        code(glazewm_autotile::config::endpoint),
        help("use a plain ws:// URL; GlazeWM listens on ws://127.0.0.1:6123 by default")
    )]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
