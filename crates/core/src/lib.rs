//! xcompile Core - shared types
//!
//! Target registry, layered settings and the error taxonomy used by every
//! other xcompile crate.

pub mod config;
pub mod error;
pub mod target;

pub use config::{AndroidSettings, BuildSettings, Settings, ToolchainLayout};
pub use error::{Result, XcompileError};
pub use target::{ContextKind, TargetPlatform, TargetRegistry};
