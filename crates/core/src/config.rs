//! Settings
//!
//! Layered configuration for xcompile:
//! - built-in defaults
//! - `config.toml` (from `--config`, `$XCOMPILE_CONFIG` or the user config dir)
//! - environment overrides (`XCOMPILE_MAKE`, `XCOMPILE_ANDROID_API`)
//! - command line flags, applied by the caller

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, XcompileError};

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV: &str = "XCOMPILE_CONFIG";

/// Environment variable overriding the build tool program
pub const MAKE_ENV: &str = "XCOMPILE_MAKE";

/// Environment variable overriding the Android API level
pub const API_LEVEL_ENV: &str = "XCOMPILE_ANDROID_API";

/// Default Android API level compilers are pinned to
pub const DEFAULT_ANDROID_API: u32 = 28;

/// How the NDK toolchain is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainLayout {
    /// Unified LLVM toolchain shipped prebuilt inside the NDK
    #[default]
    Prebuilt,
    /// Per-ABI toolchain generated by `make_standalone_toolchain.py`
    Standalone,
}

impl ToolchainLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainLayout::Prebuilt => "prebuilt",
            ToolchainLayout::Standalone => "standalone",
        }
    }
}

impl fmt::Display for ToolchainLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolchainLayout {
    type Err = XcompileError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prebuilt" => Ok(ToolchainLayout::Prebuilt),
            "standalone" => Ok(ToolchainLayout::Standalone),
            other => Err(XcompileError::Config(format!(
                "unknown toolchain layout '{}' (expected prebuilt or standalone)",
                other
            ))),
        }
    }
}

/// Android toolchain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidSettings {
    /// API level compilers are pinned to
    pub api_level: u32,
    /// Explicit NDK root, trusted without checks
    pub ndk_path: Option<PathBuf>,
    /// Environment variable naming the NDK root
    pub ndk_env: String,
    /// Toolchain layout to drive
    pub toolchain: ToolchainLayout,
    /// Where standalone toolchains are generated, one directory per ABI
    pub standalone_root: PathBuf,
    /// Extra NDK install locations, probed before the built-in ones
    pub ndk_search_paths: Vec<PathBuf>,
    /// Also probe the conventional NDK install locations
    pub probe_default_locations: bool,
}

impl Default for AndroidSettings {
    fn default() -> Self {
        Self {
            api_level: DEFAULT_ANDROID_API,
            ndk_path: None,
            ndk_env: "NDK".to_string(),
            toolchain: ToolchainLayout::default(),
            standalone_root: PathBuf::from("/tmp/android-toolchain"),
            ndk_search_paths: Vec::new(),
            probe_default_locations: true,
        }
    }
}

/// Native build tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Program run for the build and install phases
    pub make_program: String,
    /// Prefix of the private per-architecture temp directories
    pub work_dir_prefix: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            make_program: "make".to_string(),
            work_dir_prefix: "xcompile-".to_string(),
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub android: AndroidSettings,
    pub build: BuildSettings,
}

impl Settings {
    /// Default settings file location
    pub fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("org", "xcompile", "xcompile")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(contents)?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Load settings from a file.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (Self::config_file(), false),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            if required {
                return Err(XcompileError::Config(format!(
                    "settings file {} does not exist",
                    path.display()
                )));
            }
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        debug!("Loading settings from {:?}", path);
        let contents =
            std::fs::read_to_string(&path).map_err(|e| XcompileError::io_at(&path, e))?;
        Self::from_toml_str(&contents)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(make) = lookup(MAKE_ENV).filter(|v| !v.is_empty()) {
            self.build.make_program = make;
        }

        if let Some(api) = lookup(API_LEVEL_ENV).filter(|v| !v.is_empty()) {
            self.android.api_level = api.trim().parse().map_err(|_| {
                XcompileError::Config(format!("{} must be a number, got '{}'", API_LEVEL_ENV, api))
            })?;
        }

        Ok(())
    }

    fn expand_paths(&mut self) {
        if let Some(ndk) = self.android.ndk_path.take() {
            self.android.ndk_path = Some(expand_home(&ndk));
        }
        self.android.standalone_root = expand_home(&self.android.standalone_root);
        for path in &mut self.android.ndk_search_paths {
            *path = expand_home(path);
        }
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.android.api_level, 28);
        assert_eq!(settings.android.ndk_env, "NDK");
        assert_eq!(settings.android.toolchain, ToolchainLayout::Prebuilt);
        assert_eq!(settings.build.make_program, "make");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [android]
            api_level = 26
            toolchain = "standalone"
            "#,
        )
        .unwrap();
        assert_eq!(settings.android.api_level, 26);
        assert_eq!(settings.android.toolchain, ToolchainLayout::Standalone);
        assert_eq!(settings.android.standalone_root, PathBuf::from("/tmp/android-toolchain"));
        assert_eq!(settings.build.make_program, "make");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Settings::from_toml_str("[android]\napi_level = \"high\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(MAKE_ENV, "gmake"), (API_LEVEL_ENV, "30")].into();
        let mut settings = Settings::default();
        settings
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.build.make_program, "gmake");
        assert_eq!(settings.android.api_level, 30);
    }

    #[test]
    fn test_bad_api_override() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(|key| (key == API_LEVEL_ENV).then(|| "latest".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(API_LEVEL_ENV));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[build]\nmake_program = \"bmake\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.build.make_program, "bmake");

        let missing = dir.path().join("missing.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("standalone".parse::<ToolchainLayout>().unwrap(), ToolchainLayout::Standalone);
        assert!("unified".parse::<ToolchainLayout>().is_err());
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home(Path::new("/opt/ndk")), PathBuf::from("/opt/ndk"));
    }
}
