// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the asset pipeline. Per-image errors are collected into the
/// run report rather than aborting the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("filesystem error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error at {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

/// Failures reading the static data files (albums and books).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tab-separated data: {0}")]
    Tsv(#[from] csv::Error),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the remote APIs. All of them are fatal for the fetch run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to get access token: {0}")]
    MissingAccessToken(String),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
