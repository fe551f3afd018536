//! Depth-first traversal yielding the files to count

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::IgnoreFilter;
use crate::error::{CountError, Result};

/// Lazy traversal of a directory tree.
///
/// Directories are descended but never yielded, and symbolic links are not
/// followed. Ignored directories are pruned, so nothing beneath them is read or
/// reported. Entries within a directory are visited in file-name order.
pub struct Walker<'a> {
    root: &'a Path,
    filter: &'a IgnoreFilter,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, filter: &'a IgnoreFilter) -> Self {
        Self { root, filter }
    }

    /// Iterate over the non-ignored files under the root.
    ///
    /// The first traversal error is yielded as [`CountError::Walk`]; callers
    /// are expected to stop there.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_ignored_dir(entry))
            .filter_map(move |entry| match entry {
                Err(err) => {
                    let path =
                        err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.to_path_buf());
                    Some(Err(CountError::Walk { path, source: err }))
                }
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => {
                    if self.filter.is_ignored(self.relative(entry.path()), false) {
                        tracing::trace!("ignored {}", entry.path().display());
                        None
                    } else {
                        Some(Ok(entry.into_path()))
                    }
                }
            })
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self.filter.is_ignored(self.relative(entry.path()), true)
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collect(root: &Path, filter: &IgnoreFilter) -> Vec<String> {
        Walker::new(root, filter)
            .files()
            .map(|entry| {
                let path = entry.unwrap();
                crate::utils::relative_display(root, &path)
            })
            .collect()
    }

    #[test]
    fn test_yields_files_depth_first_without_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b/inner/c.txt"), "c").unwrap();
        fs::write(root.join("b/d.txt"), "d").unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();

        let files = collect(root, &IgnoreFilter::none());
        assert_eq!(files, vec!["a.txt", "b/d.txt", "b/inner/c.txt", "z.txt"]);
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(collect(tmp.path(), &IgnoreFilter::none()).is_empty());
    }

    #[test]
    fn test_ignored_files_and_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".gitignore"), "target/\n*.log\n").unwrap();
        fs::write(root.join("target/debug/out.txt"), "x").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn f() {}").unwrap();
        fs::write(root.join("src/run.log"), "log").unwrap();

        let filter = IgnoreFilter::from_file(root, Path::new(".gitignore")).unwrap();
        let files = collect(root, &filter);
        assert_eq!(files, vec![".gitignore", "src/lib.rs"]);
    }

    #[test]
    fn test_missing_root_is_a_walk_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let filter = IgnoreFilter::none();
        let first = Walker::new(&missing, &filter).files().next();
        assert!(matches!(first, Some(Err(CountError::Walk { .. }))));
    }
}
