//! Placeholder templates and the stock page markup.
//!
//! Listing pages are produced by plain token substitution: a template is raw
//! HTML text containing `#TOKEN` placeholders, and rendering swaps each token
//! for a value. There is no nesting, no conditionals and no loops; the
//! indexer concatenates rendered rows itself and hands the result to the page
//! template as one value.
//!
//! ## Token Contract
//!
//! | Template | Tokens |
//! |----------|--------|
//! | page (`index.template.html`) | `#TITLE` `#FOOTER` `#DIR` `#GEN_DIRS` `#GEN_FILES` |
//! | row (`file.template.html`) | `#FILENAME` `#FILEURL` `#MODIFIED` `#SIZE` `#IMAGE` |
//! | footer (`footer.template.html`) | `#VERSION` |
//!
//! ## Single Pass
//!
//! [`Template::parse`] splits the text into literal runs and slots once, and
//! [`Template::render`] writes each slot's value without rescanning it. A file
//! called `#SIZE.txt` therefore renders as itself instead of being replaced by
//! the next token in line, and the order tokens are listed in does not matter.
//! Where one token is a prefix of another, the longest match wins.
//!
//! Text that looks like a token but is not in the template's token list is
//! left untouched.
//!
//! ## Stock Templates
//!
//! The built-in templates are written with [maud](https://maud.lambda.xyz/)
//! and rendered to strings once at asset-load time. Tokens appear in them as
//! ordinary text, which maud passes through unchanged because `#` and
//! uppercase letters need no escaping.

use maud::{DOCTYPE, PreEscaped, html};

/// Tokens of the page template, in the order [`Template::render`] expects values.
pub const PAGE_TOKENS: [&str; 5] = ["#TITLE", "#FOOTER", "#DIR", "#GEN_DIRS", "#GEN_FILES"];

/// Tokens of the per-entry row template, in render order.
pub const ROW_TOKENS: [&str; 5] = ["#FILENAME", "#FILEURL", "#MODIFIED", "#SIZE", "#IMAGE"];

/// Tokens of the footer template.
pub const FOOTER_TOKENS: [&str; 1] = ["#VERSION"];

const STYLE: &str = include_str!("../resources/style.css");

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Slot(usize),
}

/// A parsed template: literal text interleaved with numbered slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
    slots: usize,
}

impl Template {
    /// Split `text` on the given tokens. Slot `i` is filled by `values[i]`
    /// at render time.
    pub fn parse(text: &str, tokens: &[&str]) -> Self {
        let mut by_length: Vec<usize> = (0..tokens.len()).collect();
        by_length.sort_by_key(|&i| std::cmp::Reverse(tokens[i].len()));

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(pos) = rest.find('#') {
            literal.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            let matched = by_length
                .iter()
                .copied()
                .find(|&i| !tokens[i].is_empty() && tail.starts_with(tokens[i]));

            match matched {
                Some(slot) => {
                    if !literal.is_empty() {
                        parts.push(Part::Text(std::mem::take(&mut literal)));
                    }
                    parts.push(Part::Slot(slot));
                    rest = &tail[tokens[slot].len()..];
                }
                None => {
                    literal.push('#');
                    rest = &tail[1..];
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(Part::Text(literal));
        }

        Self {
            parts,
            slots: tokens.len(),
        }
    }

    /// Substitute `values` into the slots. Every occurrence of a token gets
    /// the same value; missing values render as the empty string.
    pub fn render(&self, values: &[&str]) -> String {
        debug_assert_eq!(values.len(), self.slots, "one value per token");

        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Slot(i) => out.push_str(values.get(*i).copied().unwrap_or_default()),
            }
        }
        out
    }
}

/// Escape text for use inside HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

/// The built-in listing page.
pub fn stock_page_template() -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "#TITLE" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                main.listing {
                    h1 { "Index of #DIR" }
                    table {
                        thead {
                            tr {
                                th { "Name" }
                                th { "Last modified" }
                                th.size { "Size" }
                            }
                        }
                        tbody {
                            (PreEscaped("#GEN_DIRS"))
                            (PreEscaped("#GEN_FILES"))
                        }
                    }
                }
                footer {
                    (PreEscaped("#FOOTER"))
                }
            }
        }
    }
    .into_string()
}

/// The built-in row for one entry. The link comes first so rows sort by
/// their target.
pub fn stock_row_template() -> String {
    html! {
        tr {
            td {
                a href="#FILEURL" {
                    img src="data:image/png;base64,#IMAGE" alt="" width="16" height="16";
                    "#FILENAME"
                }
            }
            td.modified { "#MODIFIED" }
            td.size { "#SIZE" }
        }
    }
    .into_string()
}

/// The built-in footer.
pub fn stock_footer_template() -> String {
    html! {
        p { "Generated by simple-index #VERSION" }
    }
    .into_string()
}
