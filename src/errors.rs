//! # Error Types
//!
//! Error handling for argument resolution and the transformation pipeline.
//!
//! Per-field failures (`ArgumentError`) are recovered by the resolver and turned into
//! advisories. `ResolveError` and `PipelineError` are fatal and reach the caller.

use std::fmt;
use std::path::PathBuf;

/// Failure to turn one raw value into a setting.
#[derive(Debug)]
pub enum ArgumentError {
    /// A coercer rejected the input
    Validation(String),
    /// Input did not match any accepted token
    Coercion(String),
    /// A structured file could not be parsed
    ConfigParse { path: PathBuf, message: String },
    /// A referenced file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ArgumentError {
    pub fn validation(message: impl Into<String>) -> Self {
        ArgumentError::Validation(message.into())
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::Validation(msg) => write!(f, "{msg}"),
            ArgumentError::Coercion(msg) => write!(f, "{msg}"),
            ArgumentError::ConfigParse { path, message } => {
                write!(f, "Failed to parse {}: {message}", path.display())
            }
            ArgumentError::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ArgumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgumentError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fatal errors raised while resolving settings.
///
/// User cancellation is not an error; see `Resolution::Canceled`.
#[derive(Debug)]
pub enum ResolveError {
    /// The definition set itself is inconsistent
    InvalidDefinition(String),
    /// The raw invocation could not be tokenized
    Invocation(clap::Error),
    /// A default provider failed
    Default { key: String, source: ArgumentError },
    /// The prompt backend failed
    Prompt(std::io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::InvalidDefinition(msg) => write!(f, "Invalid argument definition: {msg}"),
            ResolveError::Invocation(err) => write!(f, "Invalid invocation: {err}"),
            ResolveError::Default { key, source } => {
                write!(f, "Failed to compute the default value of \"{key}\": {source}")
            }
            ResolveError::Prompt(err) => write!(f, "Prompt error: {err}"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<clap::Error> for ResolveError {
    fn from(err: clap::Error) -> Self {
        ResolveError::Invocation(err)
    }
}

/// Errors that abort the transformation pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Target root missing, not a directory, or unnamed
    Target(String),
    /// Filesystem failure while executing a step
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Glob pattern compilation error
    Glob(globset::Error),
    /// Error walking the target tree
    WalkDir(walkdir::Error),
    /// Pattern or computed path escapes the root
    InvalidPattern(String),
    /// Rename target already exists
    RenameCollision { from: PathBuf, to: PathBuf },
    /// A caller supplied transform failed
    Transform {
        path: PathBuf,
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Target(msg) => write!(f, "Target error: {msg}"),
            PipelineError::Io { path, source } => {
                write!(f, "IO error on {}: {source}", path.display())
            }
            PipelineError::Glob(err) => write!(f, "Glob error: {err}"),
            PipelineError::WalkDir(err) => write!(f, "Directory traversal error: {err}"),
            PipelineError::InvalidPattern(msg) => write!(f, "Invalid pattern: {msg}"),
            PipelineError::RenameCollision { from, to } => write!(
                f,
                "Cannot rename {} to {}: target already exists",
                from.display(),
                to.display()
            ),
            PipelineError::Transform { path, source } => {
                write!(f, "Transform failed for {}: {source:#}", path.display())
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Glob(err) => Some(err),
            PipelineError::WalkDir(err) => Some(err),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for PipelineError {
    fn from(err: walkdir::Error) -> Self {
        PipelineError::WalkDir(err)
    }
}

impl From<globset::Error> for PipelineError {
    fn from(err: globset::Error) -> Self {
        PipelineError::Glob(err)
    }
}
