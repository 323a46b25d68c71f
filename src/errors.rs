// src/errors.rs

// dependencies
use thiserror::Error;

// enum type to represent an error while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid HTTP method in cors.methods: {0}")]
    InvalidMethod(String),
}
