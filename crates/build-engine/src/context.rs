//! Build Contexts
//!
//! One build context per target platform, chosen by the platform's
//! [`ContextKind`].

use std::path::Path;

use xcompile_android_toolchain::{AndroidBuildContext, BuildEnvironment};
use xcompile_core::{ContextKind, Result, Settings, TargetPlatform};

/// Per-target toolchain context
#[derive(Debug, Clone)]
pub enum BuildContext {
    Android(AndroidBuildContext),
}

impl BuildContext {
    /// Construct the context for `platform`, locating its toolchain
    pub fn for_target(
        platform: &TargetPlatform,
        settings: &Settings,
        base: &BuildEnvironment,
    ) -> Result<Self> {
        match platform.context() {
            ContextKind::Android => Ok(BuildContext::Android(AndroidBuildContext::locate(
                &settings.android,
                base,
            )?)),
        }
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            BuildContext::Android(_) => ContextKind::Android,
        }
    }

    /// Triple passed to the native build tool as `--host`
    pub fn host_triple(&self, arch: &str) -> Result<&'static str> {
        match self {
            BuildContext::Android(ctx) => ctx.host_triple(arch),
        }
    }

    /// One-time toolchain preparation for `arch`
    pub async fn prepare(&self, arch: &str) -> Result<()> {
        match self {
            BuildContext::Android(ctx) => ctx.prepare(arch).await,
        }
    }

    /// Fresh environment for building `arch` into `output`
    pub fn build_environment(
        &self,
        arch: &str,
        output: &Path,
        base: &BuildEnvironment,
    ) -> Result<BuildEnvironment> {
        match self {
            BuildContext::Android(ctx) => ctx.build_environment(arch, output, base),
        }
    }
}

impl From<AndroidBuildContext> for BuildContext {
    fn from(ctx: AndroidBuildContext) -> Self {
        BuildContext::Android(ctx)
    }
}
