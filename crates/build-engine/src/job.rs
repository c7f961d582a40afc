//! Build Jobs
//!
//! A single architecture's build, and its result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use xcompile_android_toolchain::BuildEnvironment;
use xcompile_core::Result;

use crate::context::BuildContext;
use crate::strategy::BuildStrategy;

/// Everything one architecture's build needs
#[derive(Debug, Clone, Copy)]
pub struct BuildJob<'a> {
    pub target: &'a str,
    pub arch: &'a str,
    /// Private working copy of the source tree
    pub working_dir: &'a Path,
    /// Install prefix, `<output>/<arch>`
    pub output_dir: &'a Path,
    pub strategy: BuildStrategy,
    pub context: &'a BuildContext,
    /// Host environment snapshot the build environment derives from
    pub base_env: &'a BuildEnvironment,
}

impl BuildJob<'_> {
    /// Environment the native build tool runs under
    pub fn environment(&self) -> Result<BuildEnvironment> {
        self.context
            .build_environment(self.arch, self.output_dir, self.base_env)
    }

    /// `--host` triple for this job
    pub fn host_triple(&self) -> Result<&'static str> {
        self.context.host_triple(self.arch)
    }
}

/// Result of a successful architecture build
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub arch: String,
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
    pub duration: Duration,
}

/// Results of a whole `build` invocation, one outcome per architecture
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub target: String,
    pub strategy: BuildStrategy,
    pub outcomes: Vec<BuildOutcome>,
}

impl BuildReport {
    pub fn architectures(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.arch.as_str()).collect()
    }
}
