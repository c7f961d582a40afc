//! xcompile - cross-compile native source trees for every Android ABI
//!
//! Copies a source tree once per target architecture, points its native
//! build system (autotools, OpenSSL's `Configure`) at the NDK toolchain for
//! that architecture and installs the result under `<output>/<arch>`.
//!
//! ## Architecture
//!
//! - `xcompile-core`: target registry, settings and errors
//! - `xcompile-android-toolchain`: NDK location and build environments
//! - `xcompile-build-engine`: build strategies and the per-architecture driver

pub mod commands;

pub use xcompile_android_toolchain as android_toolchain;
pub use xcompile_build_engine as build_engine;
pub use xcompile_core as core;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "xcompile";
