use super::{AppContext, WebmarksCommand};
use crate::output::{write_bookmarks, write_json};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use webmarks::error::{Result, WebmarksError};
use webmarks::models::{Bookmark, BookmarkPatch, NewBookmark};

#[derive(Debug, Clone)]
pub struct ListCommand {
    pub folder: Option<String>,
}

impl WebmarksCommand for ListCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if let Some(folder) = &self.folder {
            if ctx.store.folder(folder).is_none() {
                return Err(WebmarksError::folder_not_found(folder));
            }
        }

        // folder order first, then position inside the folder
        let folder_rank: HashMap<&str, i64> = ctx
            .store
            .folders()
            .iter()
            .map(|f| (f.id.as_str(), f.order))
            .collect();
        let mut records: Vec<Bookmark> = ctx.store.bookmarks(self.folder.as_deref());
        records.sort_by_key(|b| {
            (
                folder_rank.get(b.folder_id.as_str()).copied().unwrap_or(i64::MAX),
                b.order,
            )
        });

        if records.is_empty() && !ctx.mode.json {
            eprintln!("No bookmarks to display.");
            return Ok(());
        }
        write_bookmarks(ctx.out, ctx.mode, &records)
    }
}

#[derive(Debug, Clone)]
pub struct AddCommand {
    pub url: String,
    pub name: Option<String>,
    pub folder: Option<String>,
    pub icon: Option<String>,
}

impl WebmarksCommand for AddCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(WebmarksError::InvalidInput("URL must not be empty".to_string()));
        }
        if let Some(existing) = ctx.store.find_by_url(url) {
            log::info!("{} is already bookmarked as {}", url, existing.id);
        }

        let name = self.name.as_deref().unwrap_or(url);
        let mut new = NewBookmark::new(name, url);
        if let Some(folder) = &self.folder {
            new = new.in_folder(folder);
        }
        if let Some(icon) = &self.icon {
            new = new.with_icon(icon);
        }

        let bookmark = ctx.store.add_bookmark(new)?;
        if ctx.mode.json {
            return write_json(ctx.out, &bookmark);
        }
        writeln!(ctx.out, "Added bookmark {}", bookmark.id)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCommand {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub folder: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i64>,
}

impl WebmarksCommand for UpdateCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let patch = BookmarkPatch {
            folder_id: self.folder.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
            order: self.order,
        };
        if patch.is_empty() {
            return Err(WebmarksError::InvalidInput(
                "Nothing to update; pass at least one of --name, --url, --folder, --icon or --order".to_string(),
            ));
        }

        let bookmark = ctx
            .store
            .update_bookmark(&self.id, &patch)?
            .ok_or_else(|| WebmarksError::bookmark_not_found(&self.id))?;
        if ctx.mode.json {
            return write_json(ctx.out, &bookmark);
        }
        writeln!(ctx.out, "Updated bookmark {}", bookmark.id)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCommand {
    pub ids: Vec<String>,
}

impl WebmarksCommand for DeleteCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        // Resolve every id before touching the store
        if let Some(missing) = self.ids.iter().find(|id| ctx.store.bookmark(id).is_none()) {
            return Err(WebmarksError::bookmark_not_found(missing));
        }
        ctx.store.batch(|store| {
            for id in &self.ids {
                store.delete_bookmark(id)?;
            }
            Ok(())
        })?;
        writeln!(ctx.out, "Deleted {} bookmark(s)", self.ids.len())?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReorderCommand {
    pub ids: Vec<String>,
}

impl WebmarksCommand for ReorderCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        for id in &self.ids {
            if ctx.store.bookmark(id).is_none() {
                log::warn!("reorder: unknown bookmark {} ignored", id);
            }
        }
        let bookmarks = ctx.store.reorder_bookmarks(&self.ids)?;
        if ctx.mode.json {
            return write_json(ctx.out, &bookmarks);
        }
        writeln!(ctx.out, "Reordered {} bookmark(s)", self.ids.len())?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NormalizeCommand {
    pub folder: String,
}

impl WebmarksCommand for NormalizeCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let bookmarks = ctx.store.normalize_bookmark_order(&self.folder)?;
        if ctx.mode.json {
            return write_json(ctx.out, &bookmarks);
        }
        writeln!(
            ctx.out,
            "Renumbered {} bookmark(s) in {}",
            bookmarks.len(),
            self.folder
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CheckCommand {
    pub url: String,
}

impl WebmarksCommand for CheckCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let found = ctx.store.find_by_url(self.url.trim()).cloned();
        if ctx.mode.json {
            return write_json(
                ctx.out,
                &json!({ "bookmarked": found.is_some(), "bookmark": found }),
            );
        }
        match found {
            Some(bookmark) => writeln!(ctx.out, "Bookmarked as {} in {}", bookmark.id, bookmark.folder_id)?,
            None => writeln!(ctx.out, "Not bookmarked")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;
    use rstest::rstest;
    use webmarks::models::DEFAULT_FOLDER_ID;

    fn add(h: &mut Harness, name: &str, url: &str) -> Bookmark {
        h.store.add_bookmark(NewBookmark::new(name, url)).unwrap()
    }

    #[test]
    fn test_add_defaults_name_to_url() {
        let mut h = Harness::json();
        let out = h
            .run(&AddCommand {
                url: " http://a.example ".to_string(),
                name: None,
                folder: None,
                icon: None,
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["name"], "http://a.example");
        assert_eq!(value["folderId"], DEFAULT_FOLDER_ID);
        assert_eq!(value["order"], 0);
    }

    #[test]
    fn test_add_into_unknown_folder() {
        let mut h = Harness::new();
        let result = h.run(&AddCommand {
            url: "http://a.example".to_string(),
            name: None,
            folder: Some("ghost".to_string()),
            icon: None,
        });
        assert!(matches!(result, Err(WebmarksError::NotFound { .. })));
        assert!(h.store.all_bookmarks().is_empty());
    }

    #[test]
    fn test_list_sorted_by_folder_then_order() {
        let mut h = Harness::new();
        let work = h.store.add_folder("Work").unwrap();
        h.store
            .add_bookmark(NewBookmark::new("W", "http://w.example").in_folder(&work.id))
            .unwrap();
        let first = add(&mut h, "First", "http://1.example");
        let second = add(&mut h, "Second", "http://2.example");
        h.store
            .reorder_bookmarks(&[second.id.clone(), first.id.clone()])
            .unwrap();

        let out = h.run(&ListCommand { folder: None }).unwrap();
        let titles: Vec<&str> = out
            .lines()
            .filter(|l| !l.trim_start().starts_with('>') && !l.is_empty())
            .collect();
        assert_eq!(titles.len(), 3);
        assert!(titles[0].ends_with("Second"));
        assert!(titles[1].ends_with("First"));
        assert!(titles[2].ends_with("W"));

        let only_work = h
            .run(&ListCommand {
                folder: Some(work.id.clone()),
            })
            .unwrap();
        assert!(only_work.contains("http://w.example"));
        assert!(!only_work.contains("http://1.example"));
    }

    #[test]
    fn test_update() {
        let mut h = Harness::new();
        let b = add(&mut h, "A", "http://a.example");

        h.run(&UpdateCommand {
            id: b.id.clone(),
            name: Some("Renamed".to_string()),
            url: None,
            folder: None,
            icon: None,
            order: None,
        })
        .unwrap();
        let updated = h.store.bookmark(&b.id).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(updated.updated_at.is_some());
    }

    #[rstest]
    #[case("missing", Some("x"), true)]
    #[case("any", None, false)]
    fn test_update_errors(#[case] id: &str, #[case] name: Option<&str>, #[case] not_found: bool) {
        let mut h = Harness::new();
        let result = h.run(&UpdateCommand {
            id: id.to_string(),
            name: name.map(str::to_string),
            url: None,
            folder: None,
            icon: None,
            order: None,
        });
        if not_found {
            assert!(matches!(result, Err(WebmarksError::NotFound { .. })));
        } else {
            assert!(matches!(result, Err(WebmarksError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_delete_is_all_or_nothing() {
        let mut h = Harness::new();
        let a = add(&mut h, "A", "http://a.example");

        let result = h.run(&DeleteCommand {
            ids: vec![a.id.clone(), "ghost".to_string()],
        });
        assert!(matches!(result, Err(WebmarksError::NotFound { .. })));
        assert_eq!(h.store.all_bookmarks().len(), 1);

        h.run(&DeleteCommand { ids: vec![a.id] }).unwrap();
        assert!(h.store.all_bookmarks().is_empty());
    }

    #[test]
    fn test_delete_many() {
        let mut h = Harness::new();
        let a = add(&mut h, "A", "http://a.example");
        let b = add(&mut h, "B", "http://b.example");
        let c = add(&mut h, "C", "http://c.example");

        let out = h.run(&DeleteCommand { ids: vec![a.id, b.id] }).unwrap();
        assert_eq!(out, "Deleted 2 bookmark(s)\n");
        assert_eq!(h.store.all_bookmarks().len(), 1);
        assert_eq!(h.store.all_bookmarks()[0].id, c.id);
    }

    #[test]
    fn test_reorder_then_normalize() {
        let mut h = Harness::new();
        let a = add(&mut h, "A", "http://a.example");
        let b = add(&mut h, "B", "http://b.example");
        let c = add(&mut h, "C", "http://c.example");

        h.run(&ReorderCommand {
            ids: vec![c.id.clone(), a.id.clone()],
        })
        .unwrap();
        assert_eq!(h.store.bookmark(&c.id).unwrap().order, 0);
        assert_eq!(h.store.bookmark(&a.id).unwrap().order, 1);
        assert_eq!(h.store.bookmark(&b.id).unwrap().order, 1);

        h.run(&NormalizeCommand {
            folder: DEFAULT_FOLDER_ID.to_string(),
        })
        .unwrap();
        let mut orders: Vec<i64> = h.store.all_bookmarks().iter().map(|b| b.order).collect();
        orders.sort();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(h.store.bookmark(&c.id).unwrap().order, 0);
    }

    #[rstest]
    #[case("http://a.example", true)]
    #[case("http://other.example", false)]
    fn test_check(#[case] url: &str, #[case] bookmarked: bool) {
        let mut h = Harness::json();
        add(&mut h, "A", "http://a.example");

        let out = h.run(&CheckCommand { url: url.to_string() }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["bookmarked"], bookmarked);
        assert_eq!(value["bookmark"].is_null(), !bookmarked);
    }
}
