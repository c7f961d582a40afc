//! Toolchain Detection
//!
//! Locates an installed Android NDK. An explicit path or the override
//! variable always wins; otherwise conventional install locations are probed
//! for the marker of the configured toolchain layout.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use xcompile_core::{AndroidSettings, Result, ToolchainLayout, XcompileError};

use crate::env::BuildEnvironment;
use crate::ndk::{LLVM_PREBUILT, MAKE_STANDALONE_TOOLCHAIN};

/// Finds the NDK root
#[derive(Debug, Clone)]
pub struct ToolchainLocator {
    explicit: Option<PathBuf>,
    env_var: String,
    candidates: Vec<PathBuf>,
    marker: PathBuf,
}

impl ToolchainLocator {
    /// Locator probing the default install locations for `marker`
    pub fn new(env_var: impl Into<String>, marker: impl Into<PathBuf>) -> Self {
        Self {
            explicit: None,
            env_var: env_var.into(),
            candidates: Self::default_candidates(),
            marker: marker.into(),
        }
    }

    /// Locator configured from the Android settings
    pub fn from_settings(settings: &AndroidSettings) -> Self {
        let mut candidates = settings.ndk_search_paths.clone();
        if settings.probe_default_locations {
            candidates.extend(Self::default_candidates());
        }

        Self {
            explicit: settings.ndk_path.clone(),
            env_var: settings.ndk_env.clone(),
            candidates,
            marker: PathBuf::from(Self::marker_for(settings.toolchain)),
        }
    }

    /// Path that must exist under a probed NDK root
    pub fn marker_for(layout: ToolchainLayout) -> &'static str {
        match layout {
            ToolchainLayout::Prebuilt => LLVM_PREBUILT,
            ToolchainLayout::Standalone => MAKE_STANDALONE_TOOLCHAIN,
        }
    }

    /// Replace the probed install locations
    pub fn with_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Conventional NDK install locations, in probe order
    pub fn default_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("Library").join("Android").join("sdk").join("ndk-bundle"));
            candidates.push(home.join("Android").join("Sdk").join("ndk-bundle"));
        }
        if cfg!(unix) {
            candidates.push(PathBuf::from("/opt/android-ndk"));
        }

        candidates
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// Check if `path` looks like an NDK for the configured layout
    pub fn is_valid_ndk(&self, path: &Path) -> bool {
        path.join(&self.marker).exists()
    }

    /// Resolve the NDK root.
    ///
    /// `env` is the base environment the override variable is read from.
    pub fn locate(&self, env: &BuildEnvironment) -> Result<PathBuf> {
        if let Some(ref path) = self.explicit {
            debug!("Using configured NDK at {:?}", path);
            return Ok(path.clone());
        }

        if let Some(path) = env.get_os(&self.env_var).filter(|p| !p.is_empty()) {
            debug!("Using ${} = {:?}", self.env_var, path);
            return Ok(PathBuf::from(path));
        }

        println!("${} not set: trying to find NDK", self.env_var);
        for candidate in &self.candidates {
            debug!("Probing {:?}", candidate.join(&self.marker));
            if self.is_valid_ndk(candidate) {
                println!("${} found at {}", self.env_var, candidate.display());
                info!("Found Android NDK at {:?}", candidate);
                return Ok(candidate.clone());
            }
        }

        Err(XcompileError::ToolchainNotFound {
            var: self.env_var.clone(),
            marker: self.marker.to_string_lossy().into_owned(),
        })
    }
}
