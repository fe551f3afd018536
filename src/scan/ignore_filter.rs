//! Exclusion rules compiled from a single gitignore-style file

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Decides whether a path under the walk root is excluded.
///
/// An empty filter excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    matcher: Option<Gitignore>,
}

impl IgnoreFilter {
    /// Filter that excludes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile `ignore_file` (relative to `root`) with patterns anchored at `root`.
    ///
    /// Lines that fail to parse are dropped with a warning; the file being
    /// missing or unreadable is an error.
    pub fn from_file(root: &Path, ignore_file: &Path) -> Result<Self, ignore::Error> {
        let path = root.join(ignore_file);
        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&path) {
            if err.is_io() {
                return Err(err);
            }
            tracing::warn!("ignore file {}: {}", path.display(), err);
        }
        let matcher = builder.build()?;
        Ok(Self { matcher: Some(matcher) })
    }

    /// Like [`IgnoreFilter::from_file`], but any failure degrades to
    /// [`IgnoreFilter::none`] after logging it.
    pub fn load_or_none(root: &Path, ignore_file: &Path) -> Self {
        match Self::from_file(root, ignore_file) {
            Ok(filter) => {
                tracing::info!("using ignore file: {}", ignore_file.display());
                filter
            }
            Err(err) => {
                tracing::warn!("not using ignore file: {}", err);
                Self::none()
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    /// `relative` must be relative to the walk root.
    ///
    /// A file is excluded when it or any of its parent directories matches.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.matched_path_or_any_parents(relative, is_dir).is_ignore(),
            None => false,
        }
    }
}
