//! Templates and icons, loaded once per run.
//!
//! [`Assets`] bundles everything a listing page is built from: the page, row
//! and footer templates plus the [`IconCatalog`]. It is constructed before
//! the walk starts and only borrowed afterwards, so a missing or malformed
//! asset stops the run before a single `index.html` is written.
//!
//! ## Sources
//!
//! - [`Assets::builtin`]: compiled into the binary. Templates come from
//!   [`crate::template`], icons and their description from `resources/`.
//! - [`Assets::load_dir`]: the same layout read from a directory, for users
//!   who want their own look:
//!
//! ```text
//! theme/
//! ├── index.template.html    # page: #TITLE #FOOTER #DIR #GEN_DIRS #GEN_FILES
//! ├── file.template.html     # row:  #FILENAME #FILEURL #MODIFIED #SIZE #IMAGE
//! ├── footer.template.html   # footer: #VERSION
//! ├── icons.toml             # ordered extension → icon mapping
//! └── images/
//!     ├── file.png           # default file icon
//!     ├── folder.png         # directories
//!     ├── back.png           # the ".." row
//!     └── ...                # anything icons.toml names
//! ```
//!
//! ## Icon Description
//!
//! ```toml
//! [[icon]]
//! file = "archive.png"
//! extensions = [".tar.gz", ".zip", ".gz"]
//! ```
//!
//! Entries are checked in declaration order and the first whose extension
//! list holds a literal suffix of the file name wins. Entries may overlap;
//! order breaks the tie. Icon bytes are base64-encoded once here, so rows
//! can inline them as `data:` URLs.

use crate::template::{
    self, FOOTER_TOKENS, PAGE_TOKENS, ROW_TOKENS, Template, escape_html,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Icon description parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Icon description names an unknown image: {0}")]
    MissingIcon(String),
}

pub const PAGE_TEMPLATE_FILE: &str = "index.template.html";
pub const ROW_TEMPLATE_FILE: &str = "file.template.html";
pub const FOOTER_TEMPLATE_FILE: &str = "footer.template.html";
pub const ICONS_FILE: &str = "icons.toml";
pub const IMAGES_DIR: &str = "images";

pub const FILE_ICON: &str = "file.png";
pub const FOLDER_ICON: &str = "folder.png";
pub const BACK_ICON: &str = "back.png";

const BUILTIN_ICONS: &str = include_str!("../resources/icons.toml");

const BUILTIN_IMAGES: &[(&str, &[u8])] = &[
    ("archive.png", include_bytes!("../resources/images/archive.png")),
    ("audio.png", include_bytes!("../resources/images/audio.png")),
    ("back.png", include_bytes!("../resources/images/back.png")),
    ("code.png", include_bytes!("../resources/images/code.png")),
    ("file.png", include_bytes!("../resources/images/file.png")),
    ("folder.png", include_bytes!("../resources/images/folder.png")),
    ("image.png", include_bytes!("../resources/images/image.png")),
    ("pdf.png", include_bytes!("../resources/images/pdf.png")),
    ("text.png", include_bytes!("../resources/images/text.png")),
    ("video.png", include_bytes!("../resources/images/video.png")),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IconDescription {
    #[serde(default, rename = "icon")]
    icons: Vec<IconSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IconSpec {
    file: String,
    extensions: Vec<String>,
}

/// One `[[icon]]` entry with its image already encoded.
#[derive(Debug, Clone)]
pub struct IconEntry {
    pub file: String,
    pub extensions: Vec<String>,
    data: String,
}

impl IconEntry {
    /// Whether any declared extension is a suffix of `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Base64 image data.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Ordered extension → icon mapping plus the three reserved icons.
#[derive(Debug, Clone)]
pub struct IconCatalog {
    entries: Vec<IconEntry>,
    file: String,
    folder: String,
    back: String,
}

impl IconCatalog {
    /// Parse an icon description, reading each named image through
    /// `read_image`. The reserved icons are always read, listed or not.
    pub fn parse(
        description: &str,
        mut read_image: impl FnMut(&str) -> Result<Vec<u8>, AssetError>,
    ) -> Result<Self, AssetError> {
        let desc: IconDescription = toml::from_str(description)?;

        let mut entries = Vec::with_capacity(desc.icons.len());
        for spec in desc.icons {
            let data = STANDARD.encode(read_image(&spec.file)?);
            entries.push(IconEntry {
                file: spec.file,
                extensions: spec.extensions,
                data,
            });
        }

        Ok(Self {
            entries,
            file: STANDARD.encode(read_image(FILE_ICON)?),
            folder: STANDARD.encode(read_image(FOLDER_ICON)?),
            back: STANDARD.encode(read_image(BACK_ICON)?),
        })
    }

    /// First entry, in declaration order, matching `name`.
    pub fn lookup(&self, name: &str) -> Option<&IconEntry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    /// Icon data for a regular file called `name`, falling back to the
    /// default file icon.
    pub fn icon_for(&self, name: &str) -> &str {
        self.lookup(name).map_or(self.file.as_str(), IconEntry::data)
    }

    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    pub fn file_icon(&self) -> &str {
        &self.file
    }

    pub fn folder_icon(&self) -> &str {
        &self.folder
    }

    pub fn back_icon(&self) -> &str {
        &self.back
    }
}

fn builtin_image(name: &str) -> Result<Vec<u8>, AssetError> {
    BUILTIN_IMAGES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, bytes)| bytes.to_vec())
        .ok_or_else(|| AssetError::MissingIcon(name.to_string()))
}

fn read_text(path: PathBuf) -> Result<String, AssetError> {
    fs::read_to_string(&path).map_err(|source| AssetError::Io { path, source })
}

fn read_bytes(path: PathBuf) -> Result<Vec<u8>, AssetError> {
    fs::read(&path).map_err(|source| AssetError::Io { path, source })
}

/// Values for one listing page. `title` and `dir` are escaped on render;
/// the rest is inserted as markup.
#[derive(Debug, Clone, Copy)]
pub struct PageFields<'a> {
    pub title: &'a str,
    pub footer: &'a str,
    pub dir: &'a str,
    pub dirs: &'a str,
    pub files: &'a str,
}

/// Values for one row. `filename` and `url` are escaped on render.
#[derive(Debug, Clone, Copy)]
pub struct RowFields<'a> {
    pub filename: &'a str,
    pub url: &'a str,
    pub modified: &'a str,
    pub size: &'a str,
    pub icon: &'a str,
}

/// Everything a run renders with. Immutable once built.
#[derive(Debug, Clone)]
pub struct Assets {
    page: Template,
    row: Template,
    footer: String,
    icons: IconCatalog,
}

impl Assets {
    /// Assets compiled into the binary.
    pub fn builtin(version: &str) -> Result<Self, AssetError> {
        let icons = IconCatalog::parse(BUILTIN_ICONS, builtin_image)?;
        Ok(Self::from_parts(
            &template::stock_page_template(),
            &template::stock_row_template(),
            &template::stock_footer_template(),
            version,
            icons,
        ))
    }

    /// Assets read from `dir`, laid out as described in the module docs.
    pub fn load_dir(dir: &Path, version: &str) -> Result<Self, AssetError> {
        let page = read_text(dir.join(PAGE_TEMPLATE_FILE))?;
        let row = read_text(dir.join(ROW_TEMPLATE_FILE))?;
        let footer = read_text(dir.join(FOOTER_TEMPLATE_FILE))?;
        let description = read_text(dir.join(ICONS_FILE))?;

        let images = dir.join(IMAGES_DIR);
        let icons = IconCatalog::parse(&description, |name| read_bytes(images.join(name)))?;

        Ok(Self::from_parts(&page, &row, &footer, version, icons))
    }

    /// Assemble assets from raw template text. `#VERSION` in the footer is
    /// substituted here, once.
    pub fn from_parts(
        page: &str,
        row: &str,
        footer: &str,
        version: &str,
        icons: IconCatalog,
    ) -> Self {
        let footer = Template::parse(footer, &FOOTER_TOKENS).render(&[version]);
        Self {
            page: Template::parse(page, &PAGE_TOKENS),
            row: Template::parse(row, &ROW_TOKENS),
            footer,
            icons,
        }
    }

    pub fn icons(&self) -> &IconCatalog {
        &self.icons
    }

    /// The footer with its version already filled in.
    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn render_page(&self, fields: &PageFields<'_>) -> String {
        let title = escape_html(fields.title);
        let dir = escape_html(fields.dir);
        self.page
            .render(&[&title, fields.footer, &dir, fields.dirs, fields.files])
    }

    pub fn render_row(&self, fields: &RowFields<'_>) -> String {
        let filename = escape_html(fields.filename);
        let url = escape_html(fields.url);
        self.row.render(&[
            &filename,
            &url,
            fields.modified,
            fields.size,
            fields.icon,
        ])
    }
}
