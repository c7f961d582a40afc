//! Android Toolchain Management
//!
//! Handles everything xcompile needs to know about an installed NDK:
//! - locating the NDK root
//! - architecture triples and tool prefixes
//! - per-architecture build environments
//! - standalone toolchain generation

pub mod command;
pub mod context;
pub mod detector;
pub mod env;
pub mod ndk;

pub use command::ToolCommand;
pub use context::AndroidBuildContext;
pub use detector::ToolchainLocator;
pub use env::BuildEnvironment;
pub use ndk::{AndroidArch, ARCHITECTURES};
