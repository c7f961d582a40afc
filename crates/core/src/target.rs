//! Target Registry
//!
//! Immutable table of target platforms, the architectures each one supports
//! and the kind of build context that drives it.

use std::fmt;

use crate::error::{Result, XcompileError};

/// Kind of build context a target platform is driven by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Android,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Android => "android",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target platform and its ordered architecture list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlatform {
    name: String,
    architectures: Vec<String>,
    context: ContextKind,
}

impl TargetPlatform {
    pub fn new<I, S>(name: impl Into<String>, architectures: I, context: ContextKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            architectures: architectures.into_iter().map(Into::into).collect(),
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Supported architectures, in registry order
    pub fn architectures(&self) -> &[String] {
        &self.architectures
    }

    pub fn context(&self) -> ContextKind {
        self.context
    }

    pub fn supports(&self, arch: &str) -> bool {
        self.architectures.iter().any(|a| a == arch)
    }

    /// Comma-joined architecture list, as printed by `list-arch`
    pub fn architecture_list(&self) -> String {
        self.architectures.join(",")
    }

    /// Resolve a comma-separated architecture override against this platform.
    ///
    /// `None` selects every supported architecture. Every unknown name is
    /// reported at once rather than only the first.
    pub fn resolve_architectures(&self, requested: Option<&str>) -> Result<Vec<String>> {
        let Some(requested) = requested else {
            return Ok(self.architectures.clone());
        };

        let archs: Vec<String> = requested
            .split(',')
            .map(|a| a.trim().to_string())
            .collect();

        let unknown: Vec<String> = archs
            .iter()
            .filter(|a| !self.supports(a))
            .cloned()
            .collect();

        if !unknown.is_empty() {
            return Err(XcompileError::UnknownArchitecture {
                target: self.name.clone(),
                unknown,
                supported: self.architectures.clone(),
            });
        }

        Ok(archs)
    }
}

/// Registry of every target platform known to the process
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Vec<TargetPlatform>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<TargetPlatform>) -> Self {
        Self { targets }
    }

    /// The targets shipped with xcompile
    pub fn builtin() -> Self {
        Self::new(vec![TargetPlatform::new(
            "android",
            ["arm", "arm64", "x86", "x86_64"],
            ContextKind::Android,
        )])
    }

    pub fn names(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&TargetPlatform> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Look up a target, failing with the list of supported targets
    pub fn resolve(&self, name: &str) -> Result<&TargetPlatform> {
        self.get(name).ok_or_else(|| XcompileError::UnknownTarget {
            target: name.to_string(),
            supported: self.names(),
        })
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_android_architectures() {
        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        assert_eq!(android.architecture_list(), "arm,arm64,x86,x86_64");
        assert_eq!(android.context(), ContextKind::Android);
    }

    #[test]
    fn test_unknown_target_lists_supported() {
        let registry = TargetRegistry::builtin();
        let err = registry.resolve("ios").unwrap_err();
        match &err {
            XcompileError::UnknownTarget { target, supported } => {
                assert_eq!(target, "ios");
                assert_eq!(supported, &vec!["android".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("android"));
    }

    #[test]
    fn test_default_architectures_are_full_set() {
        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        assert_eq!(
            android.resolve_architectures(None).unwrap(),
            vec!["arm", "arm64", "x86", "x86_64"]
        );
    }

    #[test]
    fn test_override_keeps_requested_order() {
        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        assert_eq!(
            android.resolve_architectures(Some("x86_64,arm")).unwrap(),
            vec!["x86_64", "arm"]
        );
    }

    #[test]
    fn test_every_unknown_architecture_is_reported() {
        let registry = TargetRegistry::builtin();
        let android = registry.resolve("android").unwrap();
        let err = android
            .resolve_architectures(Some("mips,arm64,armv5"))
            .unwrap_err();
        match err {
            XcompileError::UnknownArchitecture { unknown, .. } => {
                assert_eq!(unknown, vec!["mips", "armv5"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_registry() {
        let registry = TargetRegistry::new(vec![TargetPlatform::new(
            "fake",
            ["a", "b"],
            ContextKind::Android,
        )]);
        assert_eq!(registry.names(), vec!["fake"]);
        assert!(registry.get("android").is_none());
        assert!(registry.resolve("fake").unwrap().supports("b"));
    }
}
