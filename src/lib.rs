//! # Simple Index
//!
//! Writes a static `index.html` into every directory of a tree, so the tree
//! can be browsed from any plain file server. Each page lists the directory's
//! subdirectories and files with an icon, a modification date and a size, and
//! links down into the subdirectories and back up to the parent.
//!
//! # Architecture
//!
//! A run is a single depth-first walk:
//!
//! ```text
//! ROOT/               list → skip ignored → render rows → recurse → write page
//! ├── docs/           (written before ROOT/index.html)
//! │   └── api/        (written before docs/index.html)
//! └── readme.txt
//! ```
//!
//! Every directory's page is written after the pages of all its
//! subdirectories. Directory rows come first on a page, then file rows, each
//! group sorted by its rendered markup.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`indexer`] | The recursive walk: exclusion, row grouping, page writing |
//! | [`entry`] | One directory child: paths, URL, icon, rendered row |
//! | [`assets`] | Templates and icon catalog, built-in or loaded from a directory |
//! | [`template`] | Single-pass `#TOKEN` substitution and the stock templates |
//! | [`filesystem`] | The filesystem capability the walk goes through |
//! | [`config`] | Optional `--config` TOML file and flag overrides |
//! | [`output`] | CLI output formatting for a finished run |
//!
//! # Design Decisions
//!
//! ## Token Templates
//!
//! Page, row and footer templates are plain HTML with `#TOKEN` placeholders,
//! so a theme can be edited without rebuilding. Substitution is a single
//! pass over the parsed template: a file named `#SIZE` is printed as-is and
//! never expanded again. The stock templates are authored with
//! [Maud](https://maud.lambda.xyz/) and the tokens travel through it as
//! literal text.
//!
//! ## Inline Icons
//!
//! Icons are embedded in every row as base64 `data:` URIs. A generated tree
//! has no companion asset directory, so it can be copied or served from any
//! prefix without broken images.
//!
//! ## Filesystem Capability
//!
//! The walk never touches `std::fs` directly. It goes through
//! [`filesystem::Filesystem`], which lets tests observe write order, delete a
//! file between listing and rendering, or deny a directory read.

pub mod assets;
pub mod config;
pub mod entry;
pub mod filesystem;
pub mod indexer;
pub mod output;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
