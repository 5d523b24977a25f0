use super::backup::decode_backup;
use super::parser::{parse_bookmarks_html, ParsedBookmark};
use super::sniff::{sniff, ImportFormat, Sniffed};
use crate::error::{Result, WebmarksError};
use crate::models::{NewBookmark, StoreData, DEFAULT_FOLDER_ID, DEFAULT_FOLDER_NAME};
use crate::store::BookmarkStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Separator between the segments of a flattened folder name
pub const FOLDER_PATH_SEPARATOR: &str = " / ";

/// Counts of what an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub added_folders: usize,
    pub added_bookmarks: usize,
    /// Duplicates of a `(folder, url)` pair already present
    pub skipped_bookmarks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub format: ImportFormat,
    #[serde(flatten)]
    pub stats: ImportStats,
}

/// Trait for merging bookmarks from different formats into a store
pub trait BookmarkImporter {
    fn format(&self) -> ImportFormat;
    fn import(&self, store: &mut BookmarkStore) -> Result<ImportStats>;
}

/// Netscape bookmark HTML, placed under one root folder
pub struct HtmlImporter<'a> {
    pub text: &'a str,
    pub root_folder_name: &'a str,
}

impl BookmarkImporter for HtmlImporter<'_> {
    fn format(&self) -> ImportFormat {
        ImportFormat::ChromeHtml
    }

    fn import(&self, store: &mut BookmarkStore) -> Result<ImportStats> {
        let items = parse_bookmarks_html(self.text);
        import_interchange(store, &items, self.root_folder_name)
    }
}

/// Backup envelope or bare store document
pub struct BackupImporter {
    pub value: Value,
}

impl BookmarkImporter for BackupImporter {
    fn format(&self) -> ImportFormat {
        ImportFormat::AppJson
    }

    fn import(&self, store: &mut BookmarkStore) -> Result<ImportStats> {
        let decoded = decode_backup(&self.value);
        if !decoded.is_clean() {
            log::warn!(
                "Importing backup with {} problem(s); unreadable parts were skipped",
                decoded.issues.len()
            );
        }
        import_backup(store, &decoded.data)
    }
}

/// `(folder id, url)` pairs already in the store
fn existing_keys(store: &BookmarkStore) -> HashSet<(String, String)> {
    store
        .all_bookmarks()
        .iter()
        .map(|b| (b.folder_id.clone(), b.url.clone()))
        .collect()
}

/// First live folder id for every folder name
fn folder_ids_by_name(store: &BookmarkStore) -> HashMap<String, String> {
    let mut by_name = HashMap::new();
    for folder in store.folders() {
        by_name
            .entry(folder.name.clone())
            .or_insert_with(|| folder.id.clone());
    }
    by_name
}

/// Merge a decoded backup into the store without touching what is already there.
///
/// Folders match by name; the backup's default folder always lands in the
/// local default folder regardless of its id.
pub fn import_backup(store: &mut BookmarkStore, payload: &StoreData) -> Result<ImportStats> {
    let stats = store.batch(|store| merge_backup(store, payload))?;
    log::info!(
        "Backup import: {} folder(s) added, {} bookmark(s) added, {} skipped",
        stats.added_folders,
        stats.added_bookmarks,
        stats.skipped_bookmarks
    );
    Ok(stats)
}

fn merge_backup(store: &mut BookmarkStore, payload: &StoreData) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let mut by_name = folder_ids_by_name(store);
    // backup folder id -> live folder id
    let mut destinations: HashMap<&str, String> = HashMap::new();

    for folder in &payload.folders {
        if folder.id == DEFAULT_FOLDER_ID || folder.name == DEFAULT_FOLDER_NAME {
            destinations.insert(folder.id.as_str(), DEFAULT_FOLDER_ID.to_string());
            continue;
        }
        let live_id = match by_name.get(&folder.name) {
            Some(id) => id.clone(),
            None => {
                let created = store.add_folder(&folder.name)?;
                stats.added_folders += 1;
                by_name.insert(created.name.clone(), created.id.clone());
                created.id
            }
        };
        destinations.insert(folder.id.as_str(), live_id);
    }

    let mut bookmarks: Vec<_> = payload.bookmarks.iter().collect();
    bookmarks.sort_by_key(|b| b.order);

    let mut seen = existing_keys(store);
    for bookmark in bookmarks {
        if bookmark.url.trim().is_empty() {
            continue;
        }
        let destination = destinations
            .get(bookmark.folder_id.as_str())
            .cloned()
            .unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string());

        let key = (destination, bookmark.url.clone());
        if seen.contains(&key) {
            stats.skipped_bookmarks += 1;
            continue;
        }

        store.add_bookmark(
            NewBookmark::new(bookmark.display_name(), &bookmark.url)
                .in_folder(&key.0)
                .with_icon(&bookmark.icon),
        )?;
        stats.added_bookmarks += 1;
        seen.insert(key);
    }
    Ok(stats)
}

/// Flattened folder name for an interchange item
pub fn destination_folder_name(root_folder_name: &str, folder_path: &[String]) -> String {
    if folder_path.is_empty() {
        root_folder_name.to_string()
    } else {
        format!(
            "{}{}{}",
            root_folder_name,
            FOLDER_PATH_SEPARATOR,
            folder_path.join(FOLDER_PATH_SEPARATOR)
        )
    }
}

/// Merge parsed HTML items under `root_folder_name`.
///
/// Nested folders become one flat folder each, named by joining the path.
pub fn import_interchange(
    store: &mut BookmarkStore,
    items: &[ParsedBookmark],
    root_folder_name: &str,
) -> Result<ImportStats> {
    let stats = store.batch(|store| merge_interchange(store, items, root_folder_name))?;
    log::info!(
        "HTML import: {} folder(s) added, {} bookmark(s) added, {} skipped",
        stats.added_folders,
        stats.added_bookmarks,
        stats.skipped_bookmarks
    );
    Ok(stats)
}

fn merge_interchange(
    store: &mut BookmarkStore,
    items: &[ParsedBookmark],
    root_folder_name: &str,
) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    let mut by_name = folder_ids_by_name(store);
    let mut seen = existing_keys(store);

    for item in items {
        if item.url.is_empty() {
            continue;
        }
        let folder_name = destination_folder_name(root_folder_name, &item.folder_path);
        let folder_id = match by_name.get(&folder_name) {
            Some(id) => id.clone(),
            None => {
                let created = store.add_folder(&folder_name)?;
                stats.added_folders += 1;
                by_name.insert(folder_name, created.id.clone());
                created.id
            }
        };

        let key = (folder_id, item.url.clone());
        if seen.contains(&key) {
            stats.skipped_bookmarks += 1;
            continue;
        }

        let name = if item.title.is_empty() {
            item.url.as_str()
        } else {
            item.title.as_str()
        };
        store.add_bookmark(NewBookmark::new(name, &item.url).in_folder(&key.0))?;
        stats.added_bookmarks += 1;
        seen.insert(key);
    }
    Ok(stats)
}

/// Sniff `bytes` and merge them into the store
pub fn import_from_file(
    store: &mut BookmarkStore,
    path: &Path,
    bytes: &[u8],
    root_folder_name: &str,
) -> Result<ImportReport> {
    let content = String::from_utf8_lossy(bytes);
    let text: &str = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let importer: Box<dyn BookmarkImporter + '_> = match sniff(path, text)? {
        Sniffed::Html => Box::new(HtmlImporter {
            text,
            root_folder_name,
        }),
        Sniffed::Json(value) => Box::new(BackupImporter { value }),
    };
    let stats = importer.import(store)?;
    Ok(ImportReport {
        format: importer.format(),
        stats,
    })
}

/// Read `path` and merge it into the store
pub fn import_bookmarks(store: &mut BookmarkStore, path: &Path, root_folder_name: &str) -> Result<ImportReport> {
    let bytes = std::fs::read(path)?;
    log::debug!("Read {} byte(s) from {:?}", bytes.len(), path);
    import_from_file(store, path, &bytes, root_folder_name)
}
