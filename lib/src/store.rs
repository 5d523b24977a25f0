//! Durable bookmark store.
//!
//! [`BookmarkStore`] owns the whole `{folders, bookmarks, settings}` document
//! and rewrites it to disk after every mutation. A mutation is applied to a
//! copy of the document; the copy replaces the live one only after the write
//! succeeded, so a failed write leaves the store exactly as it was.

use crate::error::{Result, WebmarksError};
use crate::models::settings::{self, Settings};
use crate::models::{
    Bookmark, BookmarkPatch, Folder, FolderPatch, NewBookmark, StoreData, DEFAULT_FOLDER_ID,
};
use crate::utils;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct BookmarkStore {
    data: StoreData,
    path: Option<PathBuf>,
    write_retries: u32,
    /// Inside `batch`: mutations edit `data` in place and skip the write
    in_batch: bool,
}

impl BookmarkStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            data: StoreData::default(),
            path: None,
            write_retries: 0,
            in_batch: false,
        }
    }

    /// Open the document at `path`, starting from defaults when the file does not exist.
    ///
    /// Nothing is written until the first mutation.
    pub fn open(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(raw) => Self::hydrate(path, &raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No store at {:?}, starting empty", path);
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };

        log::debug!(
            "Opened store {:?}: {} folders, {} bookmarks",
            path,
            data.folders.len(),
            data.bookmarks.len()
        );

        Ok(Self {
            data,
            path: Some(path.to_path_buf()),
            write_retries: 0,
            in_batch: false,
        })
    }

    /// Number of extra write attempts before a mutation fails
    pub fn with_write_retries(mut self, retries: u32) -> Self {
        self.write_retries = retries;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Decode the stored document, refusing any file whose entries would be lost on the next write
    fn hydrate(path: &Path, raw: &str) -> Result<StoreData> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let (mut data, issues) = StoreData::from_value_lenient(&value);
        if !issues.is_empty() {
            for issue in &issues {
                log::error!("Store document {:?}: {}", path, issue);
            }
            return Err(WebmarksError::CorruptStore {
                path: path.to_path_buf(),
                details: issues.join("; "),
            });
        }

        if value.get("folders").is_none() {
            data.folders = vec![Folder::default_folder()];
        } else if !data.folders.iter().any(Folder::is_default) {
            log::warn!("Store document has no default folder, restoring it");
            data.folders.insert(0, Folder::default_folder());
        }

        let mut merged = settings::default_settings();
        settings::merge(&mut merged, &data.settings);
        data.settings = merged;

        Ok(data)
    }

    /// Apply `change` to a copy of the document, persist the copy, then make it live.
    ///
    /// Without a file, or inside `batch`, nothing can fail before the commit
    /// point, so the change goes straight to the live document.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut StoreData) -> T) -> Result<T> {
        if self.in_batch || self.path.is_none() {
            return Ok(change(&mut self.data));
        }
        let mut next = self.data.clone();
        let out = change(&mut next);
        self.persist(&next)?;
        self.data = next;
        Ok(out)
    }

    fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(data)?;

        let mut attempt = 0;
        loop {
            match write_atomically(path, &bytes) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.write_retries => {
                    attempt += 1;
                    log::warn!(
                        "Write to {:?} failed ({}), retry {}/{}",
                        path,
                        e,
                        attempt,
                        self.write_retries
                    );
                }
                Err(e) => {
                    log::error!("Giving up writing {:?}: {}", path, e);
                    return Err(WebmarksError::PersistenceWrite {
                        path: path.clone(),
                        source: e,
                    });
                }
            }
        }
    }

    /// Run several mutations as one: the document is written once at the end,
    /// and an error from `work` or from that write restores the previous state.
    pub fn batch<T>(&mut self, work: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.data.clone();
        let outer = std::mem::replace(&mut self.in_batch, true);
        let result = work(self);
        self.in_batch = outer;

        // a nested batch leaves the write to the outermost one
        let result = if outer {
            result
        } else {
            result.and_then(|out| self.persist(&self.data).map(|()| out))
        };
        if result.is_err() {
            self.data = snapshot;
        }
        result
    }

    fn require_folder(&self, folder_id: &str) -> Result<()> {
        if self.folder(folder_id).is_some() {
            Ok(())
        } else {
            Err(WebmarksError::folder_not_found(folder_id))
        }
    }

    // ----- folders -----

    pub fn folders(&self) -> &[Folder] {
        &self.data.folders
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.data.folders.iter().find(|f| f.id == id)
    }

    /// Create a folder ordered after all existing ones
    pub fn add_folder(&mut self, name: &str) -> Result<Folder> {
        let folder = Folder::new(
            utils::generate_id(),
            name.to_string(),
            self.data.folders.len() as i64,
        );
        let created = folder.clone();
        self.mutate(|data| data.folders.push(folder))?;
        log::info!("Added folder {} ({})", created.name, created.id);
        Ok(created)
    }

    pub fn update_folder(&mut self, id: &str, patch: &FolderPatch) -> Result<Option<Folder>> {
        let Some(index) = self.data.folders.iter().position(|f| f.id == id) else {
            log::debug!("update_folder: no folder {}", id);
            return Ok(None);
        };
        let updated = self.mutate(|data| {
            data.folders[index].apply(patch);
            data.folders[index].clone()
        })?;
        log::info!("Updated folder {}", id);
        Ok(Some(updated))
    }

    /// Remove a folder, moving its bookmarks to the default folder.
    ///
    /// Returns `false` for the default folder and for unknown ids.
    pub fn delete_folder(&mut self, id: &str) -> Result<bool> {
        if id == DEFAULT_FOLDER_ID || self.folder(id).is_none() {
            return Ok(false);
        }
        let moved = self.mutate(|data| {
            data.folders.retain(|f| f.id != id);
            let mut moved = 0;
            for bookmark in data.bookmarks.iter_mut().filter(|b| b.folder_id == id) {
                bookmark.folder_id = DEFAULT_FOLDER_ID.to_string();
                moved += 1;
            }
            moved
        })?;
        log::info!("Deleted folder {}, {} bookmark(s) moved to default", id, moved);
        Ok(true)
    }

    // ----- bookmarks -----

    pub fn all_bookmarks(&self) -> &[Bookmark] {
        &self.data.bookmarks
    }

    /// Bookmarks of one folder, or all of them when `folder_id` is `None`
    pub fn bookmarks(&self, folder_id: Option<&str>) -> Vec<Bookmark> {
        match folder_id {
            Some(fid) => self
                .data
                .bookmarks
                .iter()
                .filter(|b| b.folder_id == fid)
                .cloned()
                .collect(),
            None => self.data.bookmarks.clone(),
        }
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.data.bookmarks.iter().find(|b| b.id == id)
    }

    /// First bookmark pointing at `url`, if any
    pub fn find_by_url(&self, url: &str) -> Option<&Bookmark> {
        self.data.bookmarks.iter().find(|b| b.url == url)
    }

    /// Add a bookmark at the end of its folder (`order` = bookmarks already in it)
    pub fn add_bookmark(&mut self, new: NewBookmark) -> Result<Bookmark> {
        let folder_id = match new.folder_id {
            Some(fid) if !fid.is_empty() => fid,
            _ => DEFAULT_FOLDER_ID.to_string(),
        };
        self.require_folder(&folder_id)?;

        let order = self
            .data
            .bookmarks
            .iter()
            .filter(|b| b.folder_id == folder_id)
            .count() as i64;
        let bookmark = Bookmark {
            id: utils::generate_id(),
            folder_id,
            name: new.name,
            url: new.url,
            icon: new.icon,
            order,
            created_at: utils::now_millis(),
            updated_at: None,
        };

        let created = bookmark.clone();
        self.mutate(|data| data.bookmarks.push(bookmark))?;
        log::info!("Added bookmark {} -> {}", created.id, created.url);
        Ok(created)
    }

    pub fn update_bookmark(&mut self, id: &str, patch: &BookmarkPatch) -> Result<Option<Bookmark>> {
        let Some(index) = self.data.bookmarks.iter().position(|b| b.id == id) else {
            log::debug!("update_bookmark: no bookmark {}", id);
            return Ok(None);
        };
        if let Some(folder_id) = &patch.folder_id {
            self.require_folder(folder_id)?;
        }

        let now = utils::now_millis();
        let updated = self.mutate(|data| {
            let bookmark = &mut data.bookmarks[index];
            bookmark.apply(patch);
            bookmark.updated_at = Some(now);
            bookmark.clone()
        })?;
        log::info!("Updated bookmark {}", id);
        Ok(Some(updated))
    }

    /// Remove a bookmark. Always reports `true`, whether or not the id existed.
    pub fn delete_bookmark(&mut self, id: &str) -> Result<bool> {
        self.mutate(|data| data.bookmarks.retain(|b| b.id != id))?;
        log::info!("Deleted bookmark {}", id);
        Ok(true)
    }

    /// Set `order = position` for every listed id; unlisted bookmarks keep their order.
    ///
    /// Returns every bookmark in the store.
    pub fn reorder_bookmarks(&mut self, ordered_ids: &[String]) -> Result<Vec<Bookmark>> {
        let bookmarks = self.mutate(|data| {
            for (index, id) in ordered_ids.iter().enumerate() {
                if let Some(bookmark) = data.bookmarks.iter_mut().find(|b| &b.id == id) {
                    bookmark.order = index as i64;
                }
            }
            data.bookmarks.clone()
        })?;
        log::info!("Reordered {} bookmark(s)", ordered_ids.len());
        Ok(bookmarks)
    }

    /// Renumber one folder to `0..n`, keeping the current relative order.
    ///
    /// Ties (possible after a partial reorder) are broken by creation time.
    pub fn normalize_bookmark_order(&mut self, folder_id: &str) -> Result<Vec<Bookmark>> {
        self.require_folder(folder_id)?;
        let renumbered = self.mutate(|data| {
            let mut indices: Vec<usize> = data
                .bookmarks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.folder_id == folder_id)
                .map(|(i, _)| i)
                .collect();
            indices.sort_by_key(|&i| (data.bookmarks[i].order, data.bookmarks[i].created_at));

            let mut out = Vec::with_capacity(indices.len());
            for (position, i) in indices.into_iter().enumerate() {
                data.bookmarks[i].order = position as i64;
                out.push(data.bookmarks[i].clone());
            }
            out
        })?;
        log::info!("Normalized order of {} bookmark(s) in {}", renumbered.len(), folder_id);
        Ok(renumbered)
    }

    // ----- settings -----

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    /// Merge `patch` into the settings and return the result
    pub fn update_settings(&mut self, patch: &Settings) -> Result<Settings> {
        let merged = self.mutate(|data| {
            settings::merge(&mut data.settings, patch);
            data.settings.clone()
        })?;
        log::info!("Updated settings: {:?}", patch.keys().collect::<Vec<_>>());
        Ok(merged)
    }

    /// Snapshot of everything, for export
    pub fn all_data(&self) -> StoreData {
        self.data.clone()
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> BookmarkStore {
        BookmarkStore::in_memory()
    }

    fn add(store: &mut BookmarkStore, folder: &str, url: &str) -> Bookmark {
        store
            .add_bookmark(NewBookmark::new(url, url).in_folder(folder))
            .unwrap()
    }

    #[rstest]
    fn test_fresh_store_has_default_folder(store: BookmarkStore) {
        assert_eq!(store.folders().len(), 1);
        assert!(store.folders()[0].is_default());
        assert_eq!(store.folders()[0].name, "默认收藏");
        assert!(store.all_bookmarks().is_empty());
    }

    #[rstest]
    fn test_add_folder_order_is_folder_count(mut store: BookmarkStore) {
        let work = store.add_folder("Work").unwrap();
        let home = store.add_folder("Home").unwrap();
        assert_eq!(work.order, 1);
        assert_eq!(home.order, 2);
        assert_ne!(work.id, home.id);
    }

    #[rstest]
    fn test_update_folder(mut store: BookmarkStore) {
        let work = store.add_folder("Work").unwrap();
        let updated = store
            .update_folder(&work.id, &FolderPatch::rename("Office"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Office");
        assert_eq!(updated.order, work.order);
        assert_eq!(store.folder(&work.id).unwrap().name, "Office");

        assert!(store
            .update_folder("missing", &FolderPatch::rename("x"))
            .unwrap()
            .is_none());
    }

    #[rstest]
    fn test_delete_default_folder_is_refused(mut store: BookmarkStore) {
        add(&mut store, "default", "http://a.example");
        let before = store.all_data();

        assert!(!store.delete_folder("default").unwrap());
        assert_eq!(store.all_data(), before);
    }

    #[rstest]
    fn test_delete_folder_moves_bookmarks_to_default(mut store: BookmarkStore) {
        let work = store.add_folder("Work").unwrap();
        let bm = add(&mut store, &work.id, "http://a.example");

        assert!(store.delete_folder(&work.id).unwrap());
        assert!(store.folder(&work.id).is_none());
        assert_eq!(store.bookmark(&bm.id).unwrap().folder_id, "default");
        assert!(!store.delete_folder(&work.id).unwrap());
    }

    #[rstest]
    fn test_add_bookmark_order_is_prior_count(mut store: BookmarkStore) {
        let work = store.add_folder("Work").unwrap();
        add(&mut store, "default", "http://a.example");
        add(&mut store, &work.id, "http://b.example");
        add(&mut store, &work.id, "http://c.example");

        let prior = store.bookmarks(Some(&work.id)).len() as i64;
        let bm = add(&mut store, &work.id, "http://d.example");
        assert_eq!(bm.order, prior);
        assert_eq!(bm.order, 2);
    }

    #[rstest]
    fn test_add_bookmark_defaults(mut store: BookmarkStore) {
        let bm = store
            .add_bookmark(NewBookmark::new("Example", "https://example.com"))
            .unwrap();
        assert_eq!(bm.folder_id, "default");
        assert_eq!(bm.icon, "");
        assert!(bm.created_at > 0);
        assert!(bm.updated_at.is_none());
    }

    #[rstest]
    fn test_add_bookmark_unknown_folder_rejected(mut store: BookmarkStore) {
        let result = store.add_bookmark(NewBookmark::new("x", "http://x.example").in_folder("nope"));
        assert!(matches!(result, Err(WebmarksError::NotFound { .. })));
        assert!(store.all_bookmarks().is_empty());
    }

    #[rstest]
    fn test_update_bookmark_stamps_updated_at(mut store: BookmarkStore) {
        let bm = add(&mut store, "default", "http://a.example");
        let patch = BookmarkPatch {
            name: Some("A".to_string()),
            ..Default::default()
        };
        let updated = store.update_bookmark(&bm.id, &patch).unwrap().unwrap();

        assert_eq!(updated.name, "A");
        assert_eq!(updated.url, "http://a.example");
        assert!(updated.updated_at.is_some());
        assert!(store.update_bookmark("missing", &patch).unwrap().is_none());
    }

    #[rstest]
    fn test_delete_bookmark_always_true(mut store: BookmarkStore) {
        let bm = add(&mut store, "default", "http://a.example");
        assert!(store.delete_bookmark(&bm.id).unwrap());
        assert!(store.all_bookmarks().is_empty());
        assert!(store.delete_bookmark("never-existed").unwrap());
    }

    #[rstest]
    fn test_bookmarks_filtered_by_folder(mut store: BookmarkStore) {
        let work = store.add_folder("Work").unwrap();
        add(&mut store, "default", "http://a.example");
        add(&mut store, &work.id, "http://b.example");

        assert_eq!(store.bookmarks(Some(&work.id)).len(), 1);
        assert_eq!(store.bookmarks(Some("default")).len(), 1);
        assert_eq!(store.bookmarks(None).len(), 2);
    }

    #[rstest]
    fn test_reorder_only_touches_listed_ids(mut store: BookmarkStore) {
        let a = add(&mut store, "default", "http://a.example");
        let b = add(&mut store, "default", "http://b.example");
        let c = add(&mut store, "default", "http://c.example");

        store
            .reorder_bookmarks(&[c.id.clone(), a.id.clone(), "ghost".to_string()])
            .unwrap();

        assert_eq!(store.bookmark(&c.id).unwrap().order, 0);
        assert_eq!(store.bookmark(&a.id).unwrap().order, 1);
        // b was not listed and keeps its old position, overlapping with a
        assert_eq!(store.bookmark(&b.id).unwrap().order, 1);
    }

    #[rstest]
    fn test_normalize_renumbers_folder(mut store: BookmarkStore) {
        let a = add(&mut store, "default", "http://a.example");
        let b = add(&mut store, "default", "http://b.example");
        let c = add(&mut store, "default", "http://c.example");
        store.reorder_bookmarks(&[c.id.clone()]).unwrap();

        let renumbered = store.normalize_bookmark_order("default").unwrap();
        let orders: Vec<i64> = renumbered.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(store.bookmark(&b.id).unwrap().order, 2);
        assert!(store.bookmark(&a.id).unwrap().order < store.bookmark(&b.id).unwrap().order);
    }

    #[rstest]
    fn test_find_by_url(mut store: BookmarkStore) {
        let bm = add(&mut store, "default", "http://a.example");
        assert_eq!(store.find_by_url("http://a.example").unwrap().id, bm.id);
        assert!(store.find_by_url("http://b.example").is_none());
    }

    #[rstest]
    fn test_update_settings_merges(mut store: BookmarkStore) {
        let patch = json!({ "defaultUrl": "https://www.bing.com", "extra": [1, 2] });
        let merged = store
            .update_settings(patch.as_object().unwrap())
            .unwrap();

        assert_eq!(merged["defaultUrl"], "https://www.bing.com");
        assert_eq!(merged["extra"], json!([1, 2]));
        assert_eq!(merged["autoHidePanel"], true);
        assert_eq!(store.settings(), &merged);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bookmarks.json");

        let mut store = BookmarkStore::open(&path).unwrap();
        let work = store.add_folder("Work").unwrap();
        let bm = store
            .add_bookmark(NewBookmark::new("A", "http://a.example").in_folder(&work.id))
            .unwrap();

        let reopened = BookmarkStore::open(&path).unwrap();
        assert_eq!(reopened.folders().len(), 2);
        assert_eq!(reopened.bookmark(&bm.id).unwrap().folder_id, work.id);
        assert_eq!(reopened.all_data(), store.all_data());
    }

    #[test]
    fn test_hydrate_restores_default_folder_and_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(
            &path,
            r#"{"folders":[{"id":"w","name":"Work","order":1}],
                "bookmarks":[{"id":"b","folderId":"w","name":"A","url":"http://a.example","order":0,"createdAt":1}],
                "settings":{"defaultUrl":"https://example.com"}}"#,
        )
        .unwrap();

        let store = BookmarkStore::open(&path).unwrap();
        assert!(store.folder("default").is_some());
        assert!(store.folder("w").is_some());
        assert_eq!(store.settings()["defaultUrl"], "https://example.com");
        assert_eq!(store.settings()["debugLogs"], true);
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            BookmarkStore::open(&path),
            Err(WebmarksError::Json(_))
        ));
    }

    #[test]
    fn test_null_fields_survive_open_and_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(
            &path,
            r#"{"folders":[{"id":"default","name":"默认收藏","order":0}],
                "bookmarks":[{"id":"b","folderId":"default","name":null,"url":"http://a.example","icon":null,"order":0,"createdAt":1}],
                "settings":{}}"#,
        )
        .unwrap();

        let mut store = BookmarkStore::open(&path).unwrap();
        assert_eq!(store.all_bookmarks().len(), 1);
        store.add_folder("Work").unwrap();

        let reopened = BookmarkStore::open(&path).unwrap();
        assert_eq!(reopened.bookmark("b").unwrap().url, "http://a.example");
    }

    #[test]
    fn test_unreadable_entries_refuse_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        let original = r#"{"folders":[],"bookmarks":[{"id":"b","name":"no url"}],"settings":{}}"#;
        std::fs::write(&path, original).unwrap();

        assert!(matches!(
            BookmarkStore::open(&path),
            Err(WebmarksError::CorruptStore { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_failed_write_is_surfaced_and_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        let path = blocker.join("bookmarks.json");

        let mut store = BookmarkStore::open(&path).unwrap().with_write_retries(1);
        // the data dir is now a plain file, so every write attempt fails
        std::fs::write(&blocker, "").unwrap();
        let result = store.add_folder("Work");

        assert!(matches!(
            result,
            Err(WebmarksError::PersistenceWrite { .. })
        ));
        assert_eq!(store.folders().len(), 1);
    }

    #[test]
    fn test_batch_writes_once_at_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        let mut store = BookmarkStore::open(&path).unwrap();

        store
            .batch(|store| {
                let work = store.add_folder("Work")?;
                store.add_bookmark(NewBookmark::new("A", "http://a.example").in_folder(&work.id))?;
                assert!(!path.exists());
                Ok(())
            })
            .unwrap();

        let reopened = BookmarkStore::open(&path).unwrap();
        assert_eq!(reopened.all_data(), store.all_data());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[rstest]
    fn test_batch_error_restores_state(mut store: BookmarkStore) {
        let result: Result<()> = store.batch(|store| {
            store.add_folder("Work")?;
            store.add_bookmark(NewBookmark::new("A", "http://a.example").in_folder("ghost"))?;
            Ok(())
        });

        assert!(matches!(result, Err(WebmarksError::NotFound { .. })));
        assert_eq!(store.folders().len(), 1);
    }
}
