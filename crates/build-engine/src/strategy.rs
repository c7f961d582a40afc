//! Build Strategies
//!
//! The native build systems xcompile knows how to drive, and how one is
//! picked for a source tree.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use xcompile_android_toolchain::ToolCommand;
use xcompile_core::{ContextKind, Result, TargetPlatform, XcompileError};

use crate::context::BuildContext;
use crate::job::BuildJob;
use crate::{autotools, openssl};

/// Native build system driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStrategy {
    /// `configure` + `make` + `make install`
    Autotools,
    /// OpenSSL's `Configure` + `make` + `make install_sw`
    OpenSsl,
}

impl BuildStrategy {
    /// Every strategy, selectable by name
    pub const ALL: &'static [BuildStrategy] = &[BuildStrategy::Autotools, BuildStrategy::OpenSsl];

    pub fn name(&self) -> &'static str {
        match self {
            BuildStrategy::Autotools => "autotools",
            BuildStrategy::OpenSsl => "openssl",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.name().to_string()).collect()
    }

    /// Build context this strategy can only run under, if any
    pub fn required_context(&self) -> Option<ContextKind> {
        match self {
            BuildStrategy::Autotools => None,
            BuildStrategy::OpenSsl => Some(ContextKind::Android),
        }
    }

    /// Fail if `platform`'s context cannot run this strategy
    pub fn check_target(&self, platform: &TargetPlatform) -> Result<()> {
        match self.required_context() {
            Some(required) if required != platform.context() => {
                Err(XcompileError::StrategyPrecondition {
                    strategy: self.name().to_string(),
                    required: required.to_string(),
                    target: platform.name().to_string(),
                    actual: platform.context().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Commands of the configure, build and install phases
    pub fn commands(&self, job: &BuildJob<'_>, make: &str) -> Result<Vec<ToolCommand>> {
        match (self, job.context) {
            (BuildStrategy::Autotools, _) => autotools::commands(job, make),
            (BuildStrategy::OpenSsl, BuildContext::Android(android)) => {
                openssl::commands(android, job, make)
            }
        }
    }

    /// Run every phase in order, stopping at the first failure
    pub async fn run(&self, job: &BuildJob<'_>, make: &str) -> Result<()> {
        for command in self.commands(job, make)? {
            info!("{} {} [{}]", job.arch, command.phase(), self);
            command.run().await?;
        }
        Ok(())
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildStrategy {
    type Err = XcompileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| XcompileError::UnknownBuildStrategy {
                name: s.to_string(),
                known: Self::names(),
            })
    }
}

/// Detect the build strategy from the source tree
pub fn detect_strategy(source_dir: &Path) -> Option<BuildStrategy> {
    if source_dir.join(autotools::CONFIGURE_SCRIPT).exists() {
        return Some(BuildStrategy::Autotools);
    }
    None
}

/// Pick the strategy: explicit name first, otherwise by inspecting the tree
pub fn select_strategy(source_dir: &Path, requested: Option<&str>) -> Result<BuildStrategy> {
    if let Some(name) = requested {
        let strategy: BuildStrategy = name.parse()?;
        debug!("Using requested build type {}", strategy);
        return Ok(strategy);
    }

    let strategy = detect_strategy(source_dir)
        .ok_or_else(|| XcompileError::NoBuildStrategy(source_dir.to_path_buf()))?;
    debug!("Detected build type {} in {:?}", strategy, source_dir);
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcompile_core::TargetRegistry;

    #[test]
    fn test_configure_selects_autotools() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("configure"), "#!/bin/sh\n").unwrap();
        assert_eq!(
            select_strategy(dir.path(), None).unwrap(),
            BuildStrategy::Autotools
        );
    }

    #[test]
    fn test_no_configure_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Makefile"), "all:\n").unwrap();
        match select_strategy(dir.path(), None) {
            Err(XcompileError::NoBuildStrategy(path)) => assert_eq!(path, dir.path()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_override_skips_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            select_strategy(dir.path(), Some("openssl")).unwrap(),
            BuildStrategy::OpenSsl
        );
    }

    #[test]
    fn test_unknown_override_lists_known_names() {
        let dir = tempfile::tempdir().unwrap();
        let err = select_strategy(dir.path(), Some("cmake")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cmake"));
        assert!(message.contains("autotools, openssl"));
    }

    #[test]
    fn test_name_round_trip() {
        for strategy in BuildStrategy::ALL {
            assert_eq!(strategy.name().parse::<BuildStrategy>().unwrap(), *strategy);
        }
    }

    #[test]
    fn test_openssl_requires_android() {
        assert_eq!(BuildStrategy::OpenSsl.required_context(), Some(ContextKind::Android));
        assert_eq!(BuildStrategy::Autotools.required_context(), None);

        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        BuildStrategy::OpenSsl.check_target(android).unwrap();
        BuildStrategy::Autotools.check_target(android).unwrap();
    }
}
