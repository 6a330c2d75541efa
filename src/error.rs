//! Error types for loading, saving, validating and applying rules.
use crate::config::RuleKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The stored rule set could not be read. Callers on the transform path fall back to defaults.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The rule set could not be written. The previous file on disk is left as it was.
#[derive(Error, Debug)]
pub enum ConfigSaveError {
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to replace config {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A pattern was rejected by the regex compiler.
#[derive(Error, Debug)]
#[error("invalid regex '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A stored rule could not be applied. The rule is skipped.
#[derive(Error, Debug)]
#[error("{kind} rule #{position} ('{pattern}') skipped: {source}")]
pub struct RuleApplyError {
    pub kind: RuleKind,
    /// 1-based position in its list.
    pub position: usize,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Failure of a rule administration command.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Load(#[from] ConfigLoadError),
    #[error(transparent)]
    Save(#[from] ConfigSaveError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("{kind} rule #{index} does not exist ({len} {kind} rule(s) configured)")]
    IndexOutOfRange {
        kind: RuleKind,
        /// The 1-based index the caller asked for.
        index: i64,
        len: usize,
    },
    #[error("{0} content must not be empty")]
    EmptyContent(&'static str),
}

impl AdminError {
    /// Whether the failure came from storage rather than from the request itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, AdminError::Load(_) | AdminError::Save(_))
    }
}
