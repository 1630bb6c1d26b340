// ABOUTME: Application-wide error types for edgeship.
// ABOUTME: Config failures plus every module error, for the binary's exit path.

use std::path::PathBuf;
use thiserror::Error;

use crate::provider::{CdnError, StorageError};
use crate::prune::PruneError;
use crate::release::ReleaseError;
use crate::stack::StackError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown environment {name} (available: {available})")]
    UnknownEnvironment { name: String, available: String },

    #[error("multiple environments defined, pass --env (available: {0})")]
    EnvironmentRequired(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot read version from {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("cannot read stack template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Prune(#[from] PruneError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("CDN error: {0}")]
    Cdn(#[from] CdnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
