//! One listed item and its rendered row.
//!
//! An [`Entry`] is a name plus where it lives: the filesystem location of the
//! indexing root (`base`) and the path from that root to the containing
//! directory (`root`). Everything else (kind, size, mtime) is read from the
//! filesystem when asked and never cached, so an entry always reflects the
//! tree at the moment it is queried.
//!
//! ## Names
//!
//! Names are normalized on construction: empty and `.` segments are dropped,
//! which strips a leading `./`, a trailing `/` and any `/./` in the middle.
//! The indexing root itself carries the name `.`, and `..` is reserved for
//! the synthetic "parent directory" row; it is never produced by listing a
//! directory.
//!
//! ## Atomicity
//!
//! [`Entry::is_directory`] and [`Entry::render_html`] each stat the path
//! separately. If the tree changes between the two calls the indexer may
//! classify an entry one way and render it another; the only case the walk
//! tolerates is a file that has vanished by the time it is rendered.

use crate::assets::{Assets, IconCatalog, RowFields};
use crate::filesystem::Filesystem;
use crate::indexer::IndexError;
use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Name of the synthetic row linking to the parent directory.
pub const PARENT_LINK: &str = "..";

/// Name carried by the entry for the indexing root.
const INDEX_ROOT: &str = ".";

/// Size column for directories.
pub const DIRECTORY_SIZE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    base: PathBuf,
    root: String,
    name: String,
}

impl Entry {
    /// An entry called `name` inside `root`, which is relative to the
    /// indexing root at `base`.
    pub fn new(base: impl AsRef<Path>, root: &str, name: &str) -> Self {
        Self {
            base: clean_path(base.as_ref()),
            root: normalize_segments(root),
            name: normalize_name(name),
        }
    }

    /// The directory being indexed, as its own entry.
    pub fn index_root(base: impl AsRef<Path>) -> Self {
        Self::new(base, "", INDEX_ROOT)
    }

    /// An entry for `name` inside this one.
    pub fn child(&self, name: &str) -> Self {
        Self {
            base: self.base.clone(),
            root: self.relative_path(),
            name: normalize_name(name),
        }
    }

    /// The `..` row shown at the top of this directory's listing.
    pub fn parent_link(&self) -> Self {
        self.child(PARENT_LINK)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path from the indexing root to the containing directory.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_index_root(&self) -> bool {
        self.root.is_empty() && self.name == INDEX_ROOT
    }

    pub fn is_parent_link(&self) -> bool {
        self.name == PARENT_LINK
    }

    /// Path from the indexing root to this entry; empty for the root itself.
    pub fn relative_path(&self) -> String {
        normalize_segments(&format!("{}/{}", self.root, self.name))
    }

    /// Where the entry lives on disk. Used for recursion and for matching
    /// against the ignore set.
    pub fn root_path(&self) -> PathBuf {
        clean_path(&self.base.join(self.relative_path()))
    }

    /// `/` for the indexing root, `/<relative path>` otherwise. Display only;
    /// links use [`Entry::url_path`].
    pub fn path_from_index_root(&self) -> String {
        format!("/{}", self.relative_path())
    }

    /// The href of this entry's row, relative to the page listing it.
    /// Each segment of the name is percent-encoded.
    pub fn url_path(&self) -> String {
        self.name
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Text shown in the name column.
    pub fn display_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Whether the entry is a directory right now. Not cached.
    pub fn is_directory(&self, fs: &impl Filesystem) -> bool {
        fs.is_dir(&self.root_path())
    }

    /// Base64 icon for this entry's row.
    pub fn resolve_icon<'a>(&self, icons: &'a IconCatalog, fs: &impl Filesystem) -> &'a str {
        let is_dir = !self.is_parent_link() && self.is_directory(fs);
        self.icon(icons, is_dir)
    }

    fn icon<'a>(&self, icons: &'a IconCatalog, is_dir: bool) -> &'a str {
        if self.is_parent_link() {
            icons.back_icon()
        } else if is_dir {
            icons.folder_icon()
        } else {
            icons.icon_for(&self.name)
        }
    }

    /// Render this entry's row.
    ///
    /// Fails with [`IndexError::NotFound`] if the entry no longer exists; the
    /// caller decides whether that is fatal.
    pub fn render_html(&self, assets: &Assets, fs: &impl Filesystem) -> Result<String, IndexError> {
        let path = self.root_path();
        let meta = fs.metadata(&path).map_err(|err| IndexError::io(&path, err))?;

        let size = if meta.is_dir {
            DIRECTORY_SIZE.to_string()
        } else {
            format_size(meta.len)
        };
        let modified = format_modified(meta.modified);
        let url = self.url_path();

        Ok(assets.render_row(&RowFields {
            filename: self.display_name(),
            url: &url,
            modified: &modified,
            size: &size,
            icon: self.icon(assets.icons(), meta.is_dir),
        }))
    }
}

/// Whole kilobytes, rounded down: 999 bytes is `0 kB`.
pub fn format_size(len: u64) -> String {
    format!("{} kB", len / 1000)
}

/// `DD-Mon-YYYY HH:MM` in local time.
pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%d-%b-%Y %H:%M")
        .to_string()
}

/// Drop `.` components. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(INDEX_ROOT)
    } else {
        cleaned
    }
}

fn normalize_segments(raw: &str) -> String {
    raw.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_name(raw: &str) -> String {
    let name = normalize_segments(raw);
    if name.is_empty() {
        INDEX_ROOT.to_string()
    } else {
        name
    }
}
