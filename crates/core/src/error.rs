//! Error types for xcompile
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for xcompile
#[derive(Error, Debug)]
pub enum XcompileError {
    #[error("NDK not found: please set ${var} env variable (${var}/{marker} must exist)")]
    ToolchainNotFound { var: String, marker: String },

    #[error("Unsupported target: {target}. Supported targets: {}", .supported.join(", "))]
    UnknownTarget { target: String, supported: Vec<String> },

    #[error("Unsupported arch for {target}: {}. Supported: {}", .unknown.join(", "), .supported.join(", "))]
    UnknownArchitecture {
        target: String,
        unknown: Vec<String>,
        supported: Vec<String>,
    },

    #[error("Build method not found for directory \"{}\"", .0.display())]
    NoBuildStrategy(PathBuf),

    #[error("Unknown build type: {name}. Known build types: {}", .known.join(", "))]
    UnknownBuildStrategy { name: String, known: Vec<String> },

    #[error("Build type {strategy} requires the {required} build context, but target {target} uses {actual}")]
    StrategyPrecondition {
        strategy: String,
        required: String,
        target: String,
        actual: String,
    },

    #[error("{phase} failed: `{command}` exited with {status}")]
    BuildToolFailure {
        phase: String,
        command: String,
        status: String,
    },

    #[error("Unable to compile for {arch} in {}:\n{source}", .working_dir.display())]
    ArchitectureFailed {
        arch: String,
        working_dir: PathBuf,
        #[source]
        source: Box<XcompileError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for xcompile operations
pub type Result<T> = std::result::Result<T, XcompileError>;

impl XcompileError {
    /// Wrap an I/O error with the path it concerned
    pub fn io_at(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        let path = path.into();
        XcompileError::Io(std::io::Error::new(
            error.kind(),
            format!("{}: {}", path.display(), error),
        ))
    }

    /// Architecture and working directory of a per-architecture failure
    pub fn failed_job(&self) -> Option<(&str, &PathBuf)> {
        match self {
            XcompileError::ArchitectureFailed { arch, working_dir, .. } => {
                Some((arch.as_str(), working_dir))
            }
            _ => None,
        }
    }
}
