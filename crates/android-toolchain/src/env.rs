//! Build Environment
//!
//! Process environments handed to native build tools. A build environment is
//! derived from a base snapshot and never written back into the calling
//! process. Names and values are kept as OS strings so variables that are not
//! valid unicode reach the build tool unchanged.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

const PATH_SEP: &str = if cfg!(windows) { ";" } else { ":" };

/// Immutable set of environment variables for one build tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl BuildEnvironment {
    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Build an environment from explicit pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Value of `key`, if set and valid unicode
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_os(key).and_then(OsStr::to_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(OsStr::new(key))
    }

    /// PATH value with `dir` in front of the existing entries
    pub fn path_with(&self, dir: &Path) -> OsString {
        let mut path = dir.as_os_str().to_os_string();
        if let Some(existing) = self.get_os("PATH").filter(|p| !p.is_empty()) {
            path.push(PATH_SEP);
            path.push(existing);
        }
        path
    }

    /// Copy this environment and apply `overrides` on top of the copy
    pub fn derive<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut vars = self.vars.clone();
        for (key, value) in overrides {
            vars.insert(key.into(), value.into());
        }
        Self { vars }
    }

    /// Shell export lines for `keys`, skipping unset ones
    pub fn shell_exports<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> String {
        let mut exports = String::new();
        for key in keys {
            if let Some(value) = self.get_os(key) {
                exports.push_str(&format!("export {}=\"{}\"\n", key, value.to_string_lossy()));
            }
        }
        exports
    }
}

impl<'a> IntoIterator for &'a BuildEnvironment {
    type Item = (&'a OsString, &'a OsString);
    type IntoIter = std::collections::btree_map::Iter<'a, OsString, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}
