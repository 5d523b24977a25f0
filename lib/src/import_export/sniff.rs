use crate::error::{Result, WebmarksError};
use memchr::memmem;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Doctype marker every Netscape bookmark file starts with
pub const NETSCAPE_DOCTYPE_MARKER: &str = "NETSCAPE-Bookmark-file-1";

/// Format an import file was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    #[serde(rename = "chrome-html")]
    ChromeHtml,
    #[serde(rename = "app-json")]
    AppJson,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::ChromeHtml => "chrome-html",
            ImportFormat::AppJson => "app-json",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sniffed {
    /// Netscape bookmark HTML; parse the text with `parse_bookmarks_html`
    Html,
    /// Already-parsed JSON, presumably a backup
    Json(Value),
}

impl Sniffed {
    pub fn format(&self) -> ImportFormat {
        match self {
            Sniffed::Html => ImportFormat::ChromeHtml,
            Sniffed::Json(_) => ImportFormat::AppJson,
        }
    }
}

/// Markup with both a list and a linked anchor, even without the doctype.
/// `lowered` must already be ASCII-lowercased.
fn looks_like_bookmark_markup(lowered: &[u8]) -> bool {
    [&b"<dl"[..], b"<a", b"href="]
        .iter()
        .all(|needle| memmem::find(lowered, needle).is_some())
}

/// Decide how to read an import file.
///
/// An `.html`/`.htm` extension wins, then the doctype marker, then the
/// list-plus-anchor heuristic; anything else must parse as JSON.
pub fn sniff(path: &Path, text: &str) -> Result<Sniffed> {
    let html_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));

    let lowered = text.to_ascii_lowercase();
    let doctype = NETSCAPE_DOCTYPE_MARKER.to_ascii_lowercase();
    let has_doctype = memmem::find(lowered.as_bytes(), doctype.as_bytes()).is_some();

    if html_extension || has_doctype || looks_like_bookmark_markup(lowered.as_bytes()) {
        log::debug!("Sniffed {:?} as bookmark HTML", path);
        return Ok(Sniffed::Html);
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            log::debug!("Sniffed {:?} as JSON", path);
            Ok(Sniffed::Json(value))
        }
        Err(e) => {
            log::debug!("{:?} is neither bookmark HTML nor JSON: {}", path, e);
            Err(WebmarksError::UnrecognizedFormat)
        }
    }
}
