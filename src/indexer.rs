//! The recursive walk that writes one `index.html` per directory.
//!
//! [`TreeIndexer::write_index`] lists a directory, renders a row for each
//! child, recurses into subdirectories and finally writes the page. The
//! recursion happens while the parent's rows are being collected, so every
//! subdirectory's `index.html` is on disk before the page linking to it:
//!
//! ```text
//! site/
//! ├── docs/
//! │   ├── api/
//! │   │   └── index.html    # written 1st
//! │   └── index.html        # written 2nd
//! ├── notes.txt
//! └── index.html            # written 3rd
//! ```
//!
//! ## Filtering
//!
//! A child is left out of its parent's listing (and never recursed into) when
//! - its path, after dropping `./` components, is in the ignore set;
//! - it is called `index.html`, so the tool never lists its own output;
//! - hidden-file exclusion is on and its name starts with `.`.
//!
//! ## Ordering
//!
//! Directory rows and file rows are sorted separately, each by the complete
//! rendered row markup rather than by file name. With the stock row template
//! the link comes first, which makes the two orders agree for ordinary names.
//! Non-root pages then get the `..` row prepended to the directory group.
//!
//! ## Failures
//!
//! A file that disappears between listing and rendering is logged, recorded
//! in [`IndexReport::skipped`] and left out. Every other error (an unreadable
//! directory, a directory that vanished mid-walk, a failed write) aborts the
//! whole run.

use crate::assets::{Assets, PageFields};
use crate::entry::{Entry, clean_path};
use crate::filesystem::Filesystem;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of every generated page.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IndexError {
    /// Attach `path` to an I/O error, splitting out "not found".
    pub fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Pages in write order: every directory after all of its subdirectories.
    pub written: Vec<PathBuf>,
    /// Files that vanished between listing and rendering.
    pub skipped: Vec<PathBuf>,
}

pub struct TreeIndexer<'a, F> {
    assets: &'a Assets,
    fs: F,
    ignore: HashSet<PathBuf>,
    ignore_hidden: bool,
}

impl<'a, F: Filesystem> TreeIndexer<'a, F> {
    pub fn new(assets: &'a Assets, fs: F) -> Self {
        Self {
            assets,
            fs,
            ignore: HashSet::new(),
            ignore_hidden: false,
        }
    }

    /// Add paths to the ignore set. They are compared against each child's
    /// [`Entry::root_path`], so they should be spelled the way the walk
    /// reaches them: relative to the same directory the root was given from.
    pub fn ignore<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.ignore
            .extend(paths.into_iter().map(|p| clean_path(p.as_ref())));
        self
    }

    /// Leave out names starting with `.`.
    pub fn ignore_hidden(mut self, ignore_hidden: bool) -> Self {
        self.ignore_hidden = ignore_hidden;
        self
    }

    /// Index `start` and everything below it.
    ///
    /// `title` replaces the default title (the directory's path from the
    /// indexing root) on the first page only; `footer` replaces the stock
    /// footer on every page. A top-level page gets no `..` row.
    pub fn write_index(
        &self,
        start: &Path,
        title: Option<&str>,
        footer: Option<&str>,
        is_top_level: bool,
    ) -> Result<IndexReport, IndexError> {
        let mut report = IndexReport::default();
        let root = Entry::index_root(start);
        self.index_dir(&root, title, footer, is_top_level, &mut report)?;
        Ok(report)
    }

    fn index_dir(
        &self,
        dir: &Entry,
        title: Option<&str>,
        footer: Option<&str>,
        is_top_level: bool,
        report: &mut IndexReport,
    ) -> Result<(), IndexError> {
        let dir_path = dir.root_path();
        let heading = dir.path_from_index_root();

        let names = self
            .fs
            .list_dir(&dir_path)
            .map_err(|err| IndexError::io(&dir_path, err))?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for name in names {
            let child = dir.child(&name);
            if self.is_excluded(&child) {
                continue;
            }

            if child.is_directory(&self.fs) {
                dirs.push(child.render_html(self.assets, &self.fs)?);
                self.index_dir(&child, None, footer, false, report)?;
            } else {
                match child.render_html(self.assets, &self.fs) {
                    Ok(row) => files.push(row),
                    Err(IndexError::NotFound(path)) => {
                        tracing::warn!(path = %path.display(), "file vanished before it could be listed");
                        report.skipped.push(path);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        dirs.sort();
        files.sort();
        if !is_top_level {
            dirs.insert(0, dir.parent_link().render_html(self.assets, &self.fs)?);
        }

        let html = self.assets.render_page(&PageFields {
            title: title.unwrap_or(&heading),
            footer: footer.unwrap_or(self.assets.footer()),
            dir: &heading,
            dirs: &dirs.concat(),
            files: &files.concat(),
        });

        let index_path = dir_path.join(INDEX_FILE);
        self.fs
            .write(&index_path, &html)
            .map_err(|err| IndexError::io(&index_path, err))?;
        tracing::info!(path = %index_path.display(), "wrote index");
        report.written.push(index_path);

        Ok(())
    }

    fn is_excluded(&self, entry: &Entry) -> bool {
        self.ignore.contains(&entry.root_path())
            || entry.name() == INDEX_FILE
            || (self.ignore_hidden && entry.name().starts_with('.'))
    }
}
