use thiserror::Error;

use crate::models::ModelType;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed format error: {0}")]
    FeedFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a single feed record could not be turned into a `FeedItem`.
///
/// These are permanent for the record that produced them: decoding is pure,
/// so feeding the same record back in yields the same error.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("record has no string \"type\" field")]
    MissingDiscriminator,

    #[error("unknown item type {0:?}")]
    UnknownVariant(String),

    #[error("{kind} record does not match its schema: {source}")]
    SchemaMismatch {
        kind: ModelType,
        #[source]
        source: serde_json::Error,
    },
}
