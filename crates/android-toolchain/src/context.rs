//! Android Build Context
//!
//! Turns an NDK root into per-architecture build environments. Two toolchain
//! layouts are supported:
//! - prebuilt: the unified LLVM toolchain under `toolchains/llvm/prebuilt`,
//!   compilers named `<triple><api>-clang`, binutils `<prefix>-<tool>`
//! - standalone: a per-ABI toolchain generated by
//!   `make_standalone_toolchain.py`, every tool named `<prefix>-<tool>`

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use xcompile_core::{AndroidSettings, Result, ToolchainLayout};

use crate::command::ToolCommand;
use crate::detector::ToolchainLocator;
use crate::env::BuildEnvironment;
use crate::ndk::{self, MAKE_STANDALONE_TOOLCHAIN};

/// Position independent code flags required by Android's loader
pub const CFLAGS: &str = "-fPIE -fPIC";
pub const LDFLAGS: &str = "-pie";

/// Build context for the Android target
#[derive(Debug, Clone)]
pub struct AndroidBuildContext {
    ndk_root: PathBuf,
    api_level: u32,
    layout: ToolchainLayout,
    standalone_root: PathBuf,
}

impl AndroidBuildContext {
    /// Context for an already resolved NDK root
    pub fn new(ndk_root: impl Into<PathBuf>, settings: &AndroidSettings) -> Self {
        Self {
            ndk_root: ndk_root.into(),
            api_level: settings.api_level,
            layout: settings.toolchain,
            standalone_root: settings.standalone_root.clone(),
        }
    }

    /// Locate the NDK once and build a context around it
    pub fn locate(settings: &AndroidSettings, env: &BuildEnvironment) -> Result<Self> {
        let ndk_root = ToolchainLocator::from_settings(settings).locate(env)?;
        info!("Using Android NDK at {:?} ({} toolchain)", ndk_root, settings.toolchain);
        Ok(Self::new(ndk_root, settings))
    }

    pub fn ndk_root(&self) -> &Path {
        &self.ndk_root
    }

    /// Install directory of the generated toolchain for `arch`
    pub fn standalone_dir(&self, arch: &str) -> PathBuf {
        self.standalone_root.join(arch)
    }

    /// Root of the toolchain whose `bin` and `sysroot` are used for `arch`
    pub fn toolchain_dir(&self, arch: &str) -> PathBuf {
        match self.layout {
            ToolchainLayout::Prebuilt => ndk::prebuilt_toolchain_dir(&self.ndk_root),
            ToolchainLayout::Standalone => self.standalone_dir(arch),
        }
    }

    /// Triple passed to `configure --host`
    pub fn host_triple(&self, arch: &str) -> Result<&'static str> {
        match self.layout {
            ToolchainLayout::Prebuilt => ndk::host_triple(arch),
            ToolchainLayout::Standalone => ndk::tool_prefix(arch),
        }
    }

    /// Toolchain generation command, if the layout needs one
    pub fn preparation(&self, arch: &str) -> Result<Option<ToolCommand>> {
        ndk::lookup(arch)?;

        match self.layout {
            ToolchainLayout::Prebuilt => Ok(None),
            ToolchainLayout::Standalone => {
                let install_dir = self.standalone_dir(arch);
                Ok(Some(
                    ToolCommand::new(
                        "toolchain generation",
                        self.ndk_root.join(MAKE_STANDALONE_TOOLCHAIN),
                    )
                    .args(["--arch", arch])
                    .args(["--api".to_string(), self.api_level.to_string()])
                    .args([
                        "--install-dir".to_string(),
                        install_dir.to_string_lossy().into_owned(),
                    ])
                    .arg("--force"),
                ))
            }
        }
    }

    /// One-time toolchain preparation for `arch`.
    ///
    /// The standalone layout regenerates its toolchain on every call.
    pub async fn prepare(&self, arch: &str) -> Result<()> {
        match self.preparation(arch)? {
            Some(command) => {
                println!("Generating android toolchain for {}", arch);
                command.run().await
            }
            None => {
                debug!("Prebuilt toolchain needs no preparation for {}", arch);
                Ok(())
            }
        }
    }

    fn clang_name(&self, arch: &str, name: &str) -> Result<String> {
        match self.layout {
            ToolchainLayout::Prebuilt => Ok(format!(
                "{}{}-{}",
                ndk::host_triple(arch)?,
                self.api_level,
                name
            )),
            ToolchainLayout::Standalone => self.tool_name(arch, name),
        }
    }

    fn tool_name(&self, arch: &str, name: &str) -> Result<String> {
        Ok(format!("{}-{}", ndk::tool_prefix(arch)?, name))
    }

    /// Environment for building `arch` into `output`, derived from `base`
    pub fn build_environment(
        &self,
        arch: &str,
        output: &Path,
        base: &BuildEnvironment,
    ) -> Result<BuildEnvironment> {
        let toolchain = self.toolchain_dir(arch);
        let sysroot = toolchain.join("sysroot");

        let mut overrides: Vec<(&str, OsString)> = vec![
            ("PATH", base.path_with(&toolchain.join("bin"))),
            ("SYSROOT", sysroot.into_os_string()),
            ("AR", self.tool_name(arch, "ar")?.into()),
            ("AS", self.clang_name(arch, "clang")?.into()),
            ("CC", self.clang_name(arch, "clang")?.into()),
            ("CXX", self.clang_name(arch, "clang++")?.into()),
            ("LD", self.tool_name(arch, "ld")?.into()),
            ("STRIP", self.tool_name(arch, "strip")?.into()),
            ("RANLIB", self.tool_name(arch, "ranlib")?.into()),
            ("CFLAGS", CFLAGS.into()),
            ("LDFLAGS", LDFLAGS.into()),
        ];

        if self.layout == ToolchainLayout::Prebuilt {
            overrides.push(("ANDROID_NDK", self.ndk_root.clone().into_os_string()));
            overrides.push((
                "PKG_CONFIG_PATH",
                output.join("lib").join("pkgconfig").into_os_string(),
            ));
        }

        Ok(base.derive(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcompile_core::TargetRegistry;

    fn context(layout: ToolchainLayout) -> AndroidBuildContext {
        let settings = AndroidSettings {
            toolchain: layout,
            standalone_root: PathBuf::from("/tmp/android-toolchain"),
            ..Default::default()
        };
        AndroidBuildContext::new("/ndk", &settings)
    }

    fn base() -> BuildEnvironment {
        BuildEnvironment::from_vars([("PATH", "/usr/bin"), ("HOME", "/home/builder")])
    }

    #[test]
    fn test_prebuilt_arm_names() {
        let ctx = context(ToolchainLayout::Prebuilt);
        let env = ctx
            .build_environment("arm", Path::new("/out/arm"), &base())
            .unwrap();

        assert_eq!(env.get("CC"), Some("armv7a-linux-androideabi28-clang"));
        assert_eq!(env.get("AS"), Some("armv7a-linux-androideabi28-clang"));
        assert_eq!(env.get("CXX"), Some("armv7a-linux-androideabi28-clang++"));
        assert_eq!(env.get("AR"), Some("arm-linux-androideabi-ar"));
        assert_eq!(env.get("LD"), Some("arm-linux-androideabi-ld"));
        assert_eq!(env.get("STRIP"), Some("arm-linux-androideabi-strip"));
        assert_eq!(env.get("RANLIB"), Some("arm-linux-androideabi-ranlib"));
        assert_eq!(env.get("CFLAGS"), Some("-fPIE -fPIC"));
        assert_eq!(env.get("LDFLAGS"), Some("-pie"));
        assert_eq!(env.get("ANDROID_NDK"), Some("/ndk"));
        assert_eq!(env.get("PKG_CONFIG_PATH"), Some("/out/arm/lib/pkgconfig"));
        assert_eq!(env.get("HOME"), Some("/home/builder"));
    }

    #[test]
    fn test_prebuilt_path_and_sysroot() {
        let ctx = context(ToolchainLayout::Prebuilt);
        let env = ctx
            .build_environment("arm64", Path::new("/out/arm64"), &base())
            .unwrap();

        let toolchain = ndk::prebuilt_toolchain_dir(Path::new("/ndk"));
        let path = env.get("PATH").unwrap();
        assert!(path.starts_with(&*toolchain.join("bin").to_string_lossy()));
        assert!(path.ends_with("/usr/bin"));
        assert_eq!(
            env.get("SYSROOT"),
            Some(&*toolchain.join("sysroot").to_string_lossy())
        );
        assert_eq!(ctx.host_triple("arm64").unwrap(), "aarch64-linux-android");
    }

    #[test]
    fn test_standalone_names() {
        let ctx = context(ToolchainLayout::Standalone);
        let env = ctx
            .build_environment("arm", Path::new("/out/arm"), &base())
            .unwrap();

        assert_eq!(env.get("CC"), Some("arm-linux-androideabi-clang"));
        assert_eq!(env.get("CXX"), Some("arm-linux-androideabi-clang++"));
        assert_eq!(env.get("SYSROOT"), Some("/tmp/android-toolchain/arm/sysroot"));
        assert!(env.get("PATH").unwrap().starts_with("/tmp/android-toolchain/arm/bin"));
        assert!(!env.contains("PKG_CONFIG_PATH"));
        assert_eq!(ctx.host_triple("arm").unwrap(), "arm-linux-androideabi");
    }

    #[test]
    fn test_standalone_preparation_command() {
        let ctx = context(ToolchainLayout::Standalone);
        let cmd = ctx.preparation("x86").unwrap().unwrap();
        assert_eq!(
            cmd.program(),
            Path::new("/ndk/build/tools/make_standalone_toolchain.py")
        );
        assert_eq!(
            cmd.get_args(),
            &[
                "--arch",
                "x86",
                "--api",
                "28",
                "--install-dir",
                "/tmp/android-toolchain/x86",
                "--force"
            ]
        );
    }

    #[test]
    fn test_prebuilt_needs_no_preparation() {
        let ctx = context(ToolchainLayout::Prebuilt);
        assert!(ctx.preparation("x86_64").unwrap().is_none());
        assert!(ctx.preparation("mips").is_err());
    }

    #[test]
    fn test_environment_follows_its_base() {
        let ctx = context(ToolchainLayout::Prebuilt);
        let first_base = base();
        let first = ctx
            .build_environment("x86", Path::new("/out/x86"), &first_base)
            .unwrap();

        let second_base = first_base.derive([("HOME", "/home/other")]);
        let second = ctx
            .build_environment("x86", Path::new("/out/x86"), &second_base)
            .unwrap();

        assert_eq!(first.get("HOME"), Some("/home/builder"));
        assert_eq!(second.get("HOME"), Some("/home/other"));
        assert_eq!(first_base.get("CC"), None);
        assert_eq!(first.get("CC"), second.get("CC"));
    }

    #[test]
    fn test_registry_matches_ndk_tables() {
        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        assert_eq!(android.architectures(), ndk::architecture_names().as_slice());
    }

    #[tokio::test]
    async fn test_prebuilt_prepare_is_noop() {
        let ctx = context(ToolchainLayout::Prebuilt);
        ctx.prepare("arm64").await.unwrap();
    }

    #[test]
    fn test_locate_uses_configured_path() {
        let settings = AndroidSettings {
            ndk_path: Some(PathBuf::from("/opt/my-ndk")),
            ..Default::default()
        };
        let ctx = AndroidBuildContext::locate(&settings, &BuildEnvironment::default()).unwrap();
        assert_eq!(ctx.ndk_root(), Path::new("/opt/my-ndk"));
    }
}
