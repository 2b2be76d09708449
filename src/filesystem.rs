//! Filesystem capability used by the tree walk.
//!
//! The indexer never touches `std::fs` directly. Everything it needs (list a
//! directory, stat an entry, write a page) goes through the [`Filesystem`]
//! trait, so tests can observe write order or make a file disappear between
//! enumeration and rendering without racing a real background thread.
//!
//! [`LocalFs`] is the production implementation.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// What the listing needs to know about one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub is_dir: bool,
    /// Size in bytes. Meaningless for directories.
    pub len: u64,
    pub modified: SystemTime,
}

pub trait Filesystem {
    /// Names of the immediate children of `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Stat `path`, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// Whether `path` currently resolves to a directory. Errors count as "no".
    fn is_dir(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_dir).unwrap_or(false)
    }

    /// Create or truncate `path` and write `contents` to it.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        (**self).list_dir(dir)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        (**self).metadata(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(dir = %dir.display(), name = ?raw, "skipping non-UTF-8 file name");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        let meta = std::fs::metadata(path)?;
        Ok(EntryMetadata {
            is_dir: meta.is_dir(),
            len: meta.len(),
            modified: meta.modified()?,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_dir_is_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("c")).unwrap();

        let names = LocalFs.list_dir(tmp.path()).unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn list_dir_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFs.list_dir(&tmp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn metadata_reports_size_and_kind() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("f"), vec![0u8; 1500]).unwrap();

        let file = LocalFs.metadata(&tmp.path().join("f")).unwrap();
        assert!(!file.is_dir);
        assert_eq!(file.len, 1500);

        let dir = LocalFs.metadata(tmp.path()).unwrap();
        assert!(dir.is_dir);
    }

    #[test]
    fn is_dir_false_for_missing_path() {
        let tmp = TempDir::new().unwrap();
        assert!(!LocalFs.is_dir(&tmp.path().join("gone")));
        assert!(LocalFs.is_dir(tmp.path()));
    }

    #[test]
    fn write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");
        LocalFs.write(&path, "first").unwrap();
        LocalFs.write(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
