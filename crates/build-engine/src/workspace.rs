//! Working Copies
//!
//! Every architecture builds inside a private copy of the source tree, under
//! a fresh temporary directory. Copies are kept on disk after the build so a
//! failed tree can be inspected.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use xcompile_core::{Result, XcompileError};

/// A private copy of the source tree
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    root: PathBuf,
    source_dir: PathBuf,
}

impl WorkingCopy {
    /// Create a fresh `<tmp>/<prefix>XXXXXX` directory; the copy goes to `src`
    pub fn allocate(prefix: &str) -> Result<Self> {
        let root = tempfile::Builder::new().prefix(prefix).tempdir()?.keep();
        let source_dir = root.join("src");
        Ok(Self { root, source_dir })
    }

    /// Temporary directory owning the copy
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the source tree is copied to
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Copy `source` into this working copy.
    ///
    /// `exclude` is skipped when it lives inside `source`, so an output
    /// directory nested in the tree is not copied into later builds.
    pub async fn populate(&self, source: &Path, exclude: Option<&Path>) -> Result<()> {
        let source = source.to_path_buf();
        let dest = self.source_dir.clone();
        let exclude = exclude.map(Path::to_path_buf);

        tokio::task::spawn_blocking(move || copy_tree(&source, &dest, exclude.as_deref()))
            .await
            .map_err(|e| XcompileError::Io(std::io::Error::other(e)))?
    }
}

/// Recursively copy `source` to `dest`, keeping symlinks as symlinks
pub fn copy_tree(source: &Path, dest: &Path, exclude: Option<&Path>) -> Result<()> {
    if !source.is_dir() {
        return Err(XcompileError::io_at(
            source,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    let skip = exclude.and_then(|e| relative_inside(source, e));

    let walker = WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| match (&skip, entry.path().strip_prefix(source)) {
            (Some(skip), Ok(rel)) => rel != skip.as_path(),
            _ => true,
        });

    let mut copied = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| XcompileError::Io(e.into()))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| XcompileError::Io(std::io::Error::other(e)))?;
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| XcompileError::io_at(&target, e))?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())
                .map_err(|e| XcompileError::io_at(entry.path(), e))?;
            symlink(&link, &target).map_err(|e| XcompileError::io_at(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| XcompileError::io_at(&target, e))?;
            copied += 1;
        }
    }

    debug!("Copied {} files from {:?} to {:?}", copied, source, dest);
    Ok(())
}

/// `inner` relative to `outer`, if it lies strictly inside it
fn relative_inside(outer: &Path, inner: &Path) -> Option<PathBuf> {
    let outer = fs::canonicalize(outer).ok()?;
    let inner = fs::canonicalize(inner).ok()?;
    match inner.strip_prefix(&outer) {
        Ok(rel) if !rel.as_os_str().is_empty() => Some(rel.to_path_buf()),
        _ => None,
    }
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
