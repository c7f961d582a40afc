//! NDK Layout
//!
//! Architecture naming tables and on-disk layout of an Android NDK.

use std::path::{Path, PathBuf};

use xcompile_core::{Result, XcompileError};

/// Generator script for per-ABI standalone toolchains, relative to the NDK root
pub const MAKE_STANDALONE_TOOLCHAIN: &str = "build/tools/make_standalone_toolchain.py";

/// Prebuilt LLVM toolchain directory, relative to the NDK root
pub const LLVM_PREBUILT: &str = "toolchains/llvm/prebuilt";

/// Naming conventions of one Android architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndroidArch {
    /// Identifier used on the command line and in output paths
    pub name: &'static str,
    /// Compiler target triple, passed as `--host`
    pub host_triple: &'static str,
    /// Prefix of the binutils tools (`ar`, `ld`, `strip`, ...)
    pub tool_prefix: &'static str,
}

/// Every architecture the NDK can target, in registry order.
///
/// 32-bit ARM compilers are named after `armv7a` while binutils keep the
/// unversioned `arm` prefix.
pub const ARCHITECTURES: &[AndroidArch] = &[
    AndroidArch {
        name: "arm",
        host_triple: "armv7a-linux-androideabi",
        tool_prefix: "arm-linux-androideabi",
    },
    AndroidArch {
        name: "arm64",
        host_triple: "aarch64-linux-android",
        tool_prefix: "aarch64-linux-android",
    },
    AndroidArch {
        name: "x86",
        host_triple: "i686-linux-android",
        tool_prefix: "i686-linux-android",
    },
    AndroidArch {
        name: "x86_64",
        host_triple: "x86_64-linux-android",
        tool_prefix: "x86_64-linux-android",
    },
];

/// Names of every supported architecture
pub fn architecture_names() -> Vec<String> {
    ARCHITECTURES.iter().map(|a| a.name.to_string()).collect()
}

/// Look up an architecture by name
pub fn lookup(arch: &str) -> Result<&'static AndroidArch> {
    ARCHITECTURES
        .iter()
        .find(|a| a.name == arch)
        .ok_or_else(|| XcompileError::UnknownArchitecture {
            target: "android".to_string(),
            unknown: vec![arch.to_string()],
            supported: architecture_names(),
        })
}

/// Compiler target triple for `arch`
pub fn host_triple(arch: &str) -> Result<&'static str> {
    lookup(arch).map(|a| a.host_triple)
}

/// Binutils prefix for `arch`
pub fn tool_prefix(arch: &str) -> Result<&'static str> {
    lookup(arch).map(|a| a.tool_prefix)
}

/// Host platform tag of the prebuilt toolchain directory
pub fn host_tag() -> String {
    let system = if cfg!(windows) {
        "windows"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        std::env::consts::OS
    };
    format!("{}-x86_64", system)
}

/// Prebuilt LLVM toolchain directory for this host
pub fn prebuilt_toolchain_dir(ndk_root: &Path) -> PathBuf {
    ndk_root.join(LLVM_PREBUILT).join(host_tag())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_triple_differs_from_prefix() {
        assert_eq!(host_triple("arm").unwrap(), "armv7a-linux-androideabi");
        assert_eq!(tool_prefix("arm").unwrap(), "arm-linux-androideabi");
    }

    #[test]
    fn test_other_triples_match_prefix() {
        for arch in ["arm64", "x86", "x86_64"] {
            assert_eq!(host_triple(arch).unwrap(), tool_prefix(arch).unwrap());
        }
    }

    #[test]
    fn test_lookup_is_stable() {
        assert_eq!(host_triple("x86").unwrap(), host_triple("x86").unwrap());
        assert_eq!(lookup("arm64").unwrap(), lookup("arm64").unwrap());
    }

    #[test]
    fn test_unknown_arch() {
        match tool_prefix("mips") {
            Err(XcompileError::UnknownArchitecture { unknown, .. }) => {
                assert_eq!(unknown, vec!["mips"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_registry_order() {
        assert_eq!(architecture_names(), vec!["arm", "arm64", "x86", "x86_64"]);
    }

    #[test]
    fn test_prebuilt_dir_uses_host_tag() {
        let dir = prebuilt_toolchain_dir(Path::new("/ndk"));
        assert!(dir.starts_with("/ndk/toolchains/llvm/prebuilt"));
        assert!(dir.to_string_lossy().ends_with("-x86_64"));
    }
}
