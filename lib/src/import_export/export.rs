use super::backup;
use crate::error::{Result, WebmarksError};
use crate::models::{Bookmark, Folder, Settings, StoreData};
use crate::store::BookmarkStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Default `<TITLE>`/`<H1>` of generated HTML files
pub const DEFAULT_HTML_TITLE: &str = "Bookmarks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Netscape bookmark HTML, importable by browsers
    Html,
    /// Lossless backup envelope
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = WebmarksError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            other => Err(WebmarksError::InvalidInput(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

/// Trait for exporting bookmarks to different formats
pub trait BookmarkExporter {
    fn export(&self, folders: &[Folder], bookmarks: &[Bookmark], settings: &Settings)
        -> Result<Vec<u8>>;
}

/// Netscape bookmark file exporter
pub struct HtmlExporter {
    pub title: String,
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self {
            title: DEFAULT_HTML_TITLE.to_string(),
        }
    }
}

impl BookmarkExporter for HtmlExporter {
    fn export(&self, folders: &[Folder], bookmarks: &[Bookmark], _settings: &Settings) -> Result<Vec<u8>> {
        Ok(generate_bookmarks_html(folders, bookmarks, &self.title).into_bytes())
    }
}

/// Backup envelope exporter
pub struct BackupExporter;

impl BookmarkExporter for BackupExporter {
    fn export(&self, folders: &[Folder], bookmarks: &[Bookmark], settings: &Settings) -> Result<Vec<u8>> {
        Ok(backup::encode_backup(folders, bookmarks, settings)?.into_bytes())
    }
}

/// Escape the five characters `decode_entities` understands
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render folders as one level of `<H3>` headings.
///
/// Folders without bookmarks are left out, as are bookmarks whose folder
/// is not in `folders`. Both folders and bookmarks are written in `order`.
pub fn generate_bookmarks_html(folders: &[Folder], bookmarks: &[Bookmark], title: &str) -> String {
    let mut sorted_folders: Vec<&Folder> = folders.iter().collect();
    sorted_folders.sort_by_key(|f| f.order);

    let mut by_folder: HashMap<&str, Vec<&Bookmark>> = HashMap::new();
    for bookmark in bookmarks {
        by_folder
            .entry(bookmark.folder_id.as_str())
            .or_default()
            .push(bookmark);
    }

    let title = escape_html(title);
    let mut lines = vec![
        "<!DOCTYPE NETSCAPE-Bookmark-file-1>".to_string(),
        "<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">".to_string(),
        format!("<TITLE>{}</TITLE>", title),
        format!("<H1>{}</H1>", title),
        "<DL><p>".to_string(),
    ];

    for folder in sorted_folders {
        let Some(list) = by_folder.get_mut(folder.id.as_str()) else {
            continue;
        };
        list.sort_by_key(|b| b.order);

        lines.push(format!("  <DT><H3>{}</H3>", escape_html(&folder.name)));
        lines.push("  <DL><p>".to_string());
        for bookmark in list.iter() {
            lines.push(format!(
                "    <DT><A HREF=\"{}\">{}</A>",
                escape_html(&bookmark.url),
                escape_html(bookmark.display_name())
            ));
        }
        lines.push("  </DL><p>".to_string());
    }

    lines.push("</DL><p>".to_string());
    lines.join("\n")
}

/// Serialize the given collections in `format`
pub fn export_to_format(
    format: ExportFormat,
    folders: &[Folder],
    bookmarks: &[Bookmark],
    settings: &Settings,
) -> Result<Vec<u8>> {
    let exporter: Box<dyn BookmarkExporter> = match format {
        ExportFormat::Html => Box::new(HtmlExporter::default()),
        ExportFormat::Json => Box::new(BackupExporter),
    };
    exporter.export(folders, bookmarks, settings)
}

/// Export the whole store to `path`.
///
/// Without an explicit format the file extension decides. `title` only
/// affects HTML output.
pub fn export_bookmarks(
    store: &BookmarkStore,
    path: &Path,
    format: Option<ExportFormat>,
    title: Option<&str>,
) -> Result<ExportFormat> {
    let format = match format.or_else(|| ExportFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(WebmarksError::InvalidInput(format!(
                "Cannot tell export format from {:?}; use .html or .json",
                path
            )))
        }
    };

    let StoreData {
        folders,
        bookmarks,
        settings,
    } = store.all_data();
    let bytes = match (format, title) {
        (ExportFormat::Html, Some(title)) => HtmlExporter {
            title: title.to_string(),
        }
        .export(&folders, &bookmarks, &settings)?,
        _ => export_to_format(format, &folders, &bookmarks, &settings)?,
    };
    std::fs::write(path, bytes)?;

    log::info!(
        "Exported {} bookmark(s) in {} folder(s) to {:?} as {:?}",
        bookmarks.len(),
        folders.len(),
        path,
        format
    );
    Ok(format)
}
