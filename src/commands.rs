//! CLI commands for xcompile
//!
//! Each command resolves the layered settings (defaults, settings file,
//! environment, command line) and hands off to the build engine.

use std::path::PathBuf;
use anyhow::Result;
use tracing::{debug, info};

use xcompile_build_engine::{BuildOrchestrator, BuildReport, BuildRequest};
use xcompile_core::config::{expand_home, CONFIG_ENV};
use xcompile_core::{Settings, TargetRegistry, ToolchainLayout};

/// Command-line overrides applied on top of file and environment settings
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config: Option<PathBuf>,
    pub ndk: Option<PathBuf>,
    pub api_level: Option<u32>,
    pub toolchain: Option<ToolchainLayout>,
}

impl SettingsOverrides {
    /// Resolve the effective settings
    pub fn resolve(&self) -> Result<Settings> {
        let config = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut settings = Settings::load(config.as_deref())?;
        settings.apply_env(|key| std::env::var(key).ok())?;

        if let Some(ref ndk) = self.ndk {
            settings.android.ndk_path = Some(expand_home(ndk));
        }
        if let Some(api) = self.api_level {
            settings.android.api_level = api;
        }
        if let Some(layout) = self.toolchain {
            settings.android.toolchain = layout;
        }

        debug!("Effective settings: {:?}", settings);
        Ok(settings)
    }
}

/// `list-arch` command options
pub struct ListArchCommand {
    pub target: String,
}

impl ListArchCommand {
    /// Comma-joined architectures of the target
    pub fn execute(&self, settings: Settings) -> Result<String> {
        let orchestrator = BuildOrchestrator::new(TargetRegistry::builtin(), settings);
        Ok(orchestrator.list_architectures(&self.target)?)
    }
}

/// `build` command options
pub struct BuildCommand {
    pub target: String,
    pub output: PathBuf,
    pub source: PathBuf,
    pub architectures: Option<String>,
    pub build_type: Option<String>,
}

impl BuildCommand {
    /// Execute the build command
    pub async fn execute(&self, settings: Settings) -> Result<BuildReport> {
        let mut request = BuildRequest::new(&self.target, &self.output, &self.source);
        if let Some(ref archs) = self.architectures {
            request = request.with_architectures(archs.clone());
        }
        if let Some(ref build_type) = self.build_type {
            request = request.with_strategy(build_type.clone());
        }

        info!("Building project: {:?}", self.source);

        let orchestrator = BuildOrchestrator::new(TargetRegistry::builtin(), settings);
        let report = orchestrator.build(&request).await?;

        for outcome in &report.outcomes {
            info!(
                "{} {} installed to {}",
                report.target,
                outcome.arch,
                outcome.output_dir.display()
            );
        }
        Ok(report)
    }
}
