//! KDL configuration parser

use std::path::Path;

use crate::error::ConfigError;
use crate::model::*;

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Load configuration, falling back to defaults when the file does not exist
///
/// The daemon runs unattended, so a missing config file is the normal case
/// rather than an error. Any other IO failure or a malformed file is still
/// reported.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(
            "No configuration at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    parse_config(path)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // kdl pins an older miette, so the span is rebuilt from offset/len
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::ParseError {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "endpoint" => {
                let endpoint = string_arg(node)?;
                validate_endpoint(endpoint)?;
                config.endpoint = endpoint.to_string();
            }
            "retry-delay-ms" => {
                config.retry_delay_ms = positive_millis(node)?;
            }
            "connect-timeout-ms" => {
                config.connect_timeout_ms = positive_millis(node)?;
            }
            "log-level" => {
                config.log_level = string_arg(node)?
                    .parse()
                    .map_err(|e| ConfigError::Invalid { message: e })?;
            }
            "log-file" => {
                let path = string_arg(node)?;
                config.log_file = Some(shellexpand::tilde(path).into_owned().into());
            }
            name => {
                tracing::warn!("Unknown config option: {}", name);
            }
        }
    }

    Ok(config)
}

/// Check that an endpoint is a plain `ws://` URL
///
/// TLS is not built into the transport, so `wss://` is rejected up front
/// instead of failing on every connection attempt.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "ws" => Ok(()),
        other => Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme `{}`, expected ws", other),
        }),
    }
}

fn string_arg(node: &kdl::KdlNode) -> Result<&str, ConfigError> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| ConfigError::MissingValue {
            node: node.name().value().to_string(),
        })
}

fn positive_millis(node: &kdl::KdlNode) -> Result<u64, ConfigError> {
    let name = node.name().value();
    let value = node
        .entries()
        .first()
        .and_then(|e| e.value().as_i64())
        .ok_or_else(|| ConfigError::MissingValue {
            node: name.to_string(),
        })?;

    if value <= 0 {
        return Err(ConfigError::Invalid {
            message: format!("`{}` must be a positive number of milliseconds, got {}", name, value),
        });
    }

    Ok(value as u64)
}
