//! Shared test utilities for the simple-index test suite.
//!
//! Tree builders, page readers and instrumented [`Filesystem`]s that let the
//! indexer tests observe write order or inject failures deterministically.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &["a.txt", "sub/b.txt", "empty/"]);
//!
//! let fs = RecordingFs::default();
//! TreeIndexer::new(&test_assets(), &fs)
//!     .write_index(tmp.path(), None, None, true)
//!     .unwrap();
//!
//! assert_eq!(row_count(&read_index(tmp.path()), "a.txt"), 1);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::assets::{Assets, IconCatalog};
use crate::filesystem::{EntryMetadata, Filesystem, LocalFs};
use crate::indexer::INDEX_FILE;

pub const TEST_VERSION: &str = "test-0.0.0";

// =========================================================================
// Tree setup
// =========================================================================

/// Create files and directories under `root`.
///
/// Entries ending in `/` become empty directories; everything else becomes a
/// file whose content is its own relative path. Parents are created as needed.
pub fn write_tree(root: &Path, entries: &[&str]) {
    for entry in entries {
        let path = root.join(entry.trim_end_matches('/'));
        if entry.ends_with('/') {
            std::fs::create_dir_all(&path).unwrap();
        } else {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, entry).unwrap();
        }
    }
}

// =========================================================================
// Assets
// =========================================================================

/// The built-in assets, stamped with [`TEST_VERSION`].
pub fn test_assets() -> Assets {
    Assets::builtin(TEST_VERSION).unwrap()
}

/// Assets whose page is just the concatenated rows, with a custom row
/// template. Built-in icons.
pub fn row_assets(row: &str) -> Assets {
    let icons: IconCatalog = test_assets().icons().clone();
    Assets::from_parts("#GEN_DIRS#GEN_FILES", row, "", TEST_VERSION, icons)
}

// =========================================================================
// Reading results
// =========================================================================

/// Contents of `dir/index.html`. Panics if it was not written.
pub fn read_index(dir: &Path) -> String {
    let path = dir.join(INDEX_FILE);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

/// Number of stock-template rows linking to `href`.
pub fn row_count(html: &str, href: &str) -> usize {
    html.matches(&format!(r#"<a href="{href}">"#)).count()
}

/// The generated rows of a stock-template page.
pub fn tbody(html: &str) -> &str {
    let start = html.find("<tbody>").expect("page has a <tbody>") + "<tbody>".len();
    let end = html.find("</tbody>").expect("page has a </tbody>");
    &html[start..end]
}

/// Every `index.html` under `root`, keyed by path.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut pages = BTreeMap::new();
    collect_pages(root, &mut pages);
    pages
}

fn collect_pages(dir: &Path, pages: &mut BTreeMap<PathBuf, String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_pages(&path, pages);
        } else if path.file_name().is_some_and(|n| n == INDEX_FILE) {
            pages.insert(path.clone(), std::fs::read_to_string(&path).unwrap());
        }
    }
}

// =========================================================================
// Instrumented filesystems
// =========================================================================

/// Delegates to [`LocalFs`] and records every write, in order.
#[derive(Default)]
pub struct RecordingFs {
    writes: RefCell<Vec<PathBuf>>,
}

impl RecordingFs {
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }
}

impl Filesystem for RecordingFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        LocalFs.list_dir(dir)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        LocalFs.metadata(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.writes.borrow_mut().push(path.to_path_buf());
        LocalFs.write(path, contents)
    }
}

/// Deletes `victim` right after its parent directory has been listed, so
/// it is enumerated but gone by the time it is rendered.
pub struct VanishingFs {
    victim: PathBuf,
}

impl VanishingFs {
    pub fn new(victim: PathBuf) -> Self {
        Self { victim }
    }
}

impl Filesystem for VanishingFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let names = LocalFs.list_dir(dir)?;
        if self.victim.parent() == Some(dir) && self.victim.exists() {
            std::fs::remove_file(&self.victim)?;
        }
        Ok(names)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        LocalFs.metadata(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        LocalFs.write(path, contents)
    }
}

/// Refuses to list `locked`, as if permissions were denied.
pub struct FailingFs {
    locked: PathBuf,
}

impl FailingFs {
    pub fn new(locked: PathBuf) -> Self {
        Self { locked }
    }
}

impl Filesystem for FailingFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        if dir == self.locked {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "listing denied",
            ));
        }
        LocalFs.list_dir(dir)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        LocalFs.metadata(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        LocalFs.write(path, contents)
    }
}

/// Refuses to write `denied`, as if the directory were read-only.
pub struct DenyWriteFs {
    denied: PathBuf,
}

impl DenyWriteFs {
    pub fn new(denied: PathBuf) -> Self {
        Self { denied }
    }
}

impl Filesystem for DenyWriteFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        LocalFs.list_dir(dir)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        LocalFs.metadata(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if path == self.denied {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "write denied",
            ));
        }
        LocalFs.write(path, contents)
    }
}

// =========================================================================
// Log capture
// =========================================================================

/// In-memory sink for a test subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return its result along with
/// everything logged at `debug` and above, without ANSI colors.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
