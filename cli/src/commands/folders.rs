use super::{AppContext, WebmarksCommand};
use crate::output::{write_folders, write_json};
use std::io::Write;
use webmarks::error::{Result, WebmarksError};
use webmarks::models::{FolderPatch, DEFAULT_FOLDER_ID};

#[derive(Debug, Clone)]
pub struct FoldersCommand;

impl WebmarksCommand for FoldersCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        write_folders(
            ctx.out,
            ctx.mode,
            ctx.store.folders(),
            ctx.store.all_bookmarks(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct FolderAddCommand {
    pub name: String,
}

impl WebmarksCommand for FolderAddCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WebmarksError::InvalidInput(
                "Folder name must not be empty".to_string(),
            ));
        }
        let folder = ctx.store.add_folder(name)?;
        if ctx.mode.json {
            return write_json(ctx.out, &folder);
        }
        writeln!(ctx.out, "Added folder {} ({})", folder.name, folder.id)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FolderRenameCommand {
    pub id: String,
    pub name: String,
}

impl WebmarksCommand for FolderRenameCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WebmarksError::InvalidInput(
                "Folder name must not be empty".to_string(),
            ));
        }
        let patch = FolderPatch::rename(name);
        let folder = ctx
            .store
            .update_folder(&self.id, &patch)?
            .ok_or_else(|| WebmarksError::folder_not_found(&self.id))?;
        if ctx.mode.json {
            return write_json(ctx.out, &folder);
        }
        writeln!(ctx.out, "Renamed folder {} to {}", folder.id, folder.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FolderDeleteCommand {
    pub id: String,
}

impl WebmarksCommand for FolderDeleteCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if self.id == DEFAULT_FOLDER_ID {
            return Err(WebmarksError::InvalidInput(
                "The default folder cannot be deleted".to_string(),
            ));
        }
        if !ctx.store.delete_folder(&self.id)? {
            return Err(WebmarksError::folder_not_found(&self.id));
        }
        writeln!(ctx.out, "Deleted folder {}", self.id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;
    use rstest::rstest;
    use webmarks::models::NewBookmark;

    #[test]
    fn test_add_and_list() {
        let mut h = Harness::new();
        let added = h
            .run(&FolderAddCommand {
                name: "  Work ".to_string(),
            })
            .unwrap();
        assert!(added.starts_with("Added folder Work ("));

        let listing = h.run(&FoldersCommand).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("* default."));
        assert!(lines[1].contains("Work (0)"));
    }

    #[test]
    fn test_list_json() {
        let mut h = Harness::json();
        let listing = h.run(&FoldersCommand).unwrap();
        let value: serde_json::Value = serde_json::from_str(&listing).unwrap();
        assert_eq!(value[0]["id"], "default");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_blank_name_rejected(#[case] name: &str) {
        let mut h = Harness::new();
        let result = h.run(&FolderAddCommand {
            name: name.to_string(),
        });
        assert!(matches!(result, Err(WebmarksError::InvalidInput(_))));
        assert_eq!(h.store.folders().len(), 1);
    }

    #[test]
    fn test_rename() {
        let mut h = Harness::new();
        let folder = h.store.add_folder("Old").unwrap();
        h.run(&FolderRenameCommand {
            id: folder.id.clone(),
            name: "New".to_string(),
        })
        .unwrap();
        assert_eq!(h.store.folder(&folder.id).unwrap().name, "New");

        let missing = h.run(&FolderRenameCommand {
            id: "nope".to_string(),
            name: "x".to_string(),
        });
        assert!(matches!(missing, Err(WebmarksError::NotFound { .. })));
    }

    #[test]
    fn test_delete_moves_bookmarks() {
        let mut h = Harness::new();
        let folder = h.store.add_folder("Tmp").unwrap();
        h.store
            .add_bookmark(NewBookmark::new("A", "http://a.example").in_folder(&folder.id))
            .unwrap();

        h.run(&FolderDeleteCommand {
            id: folder.id.clone(),
        })
        .unwrap();
        assert!(h.store.folder(&folder.id).is_none());
        assert_eq!(h.store.all_bookmarks()[0].folder_id, DEFAULT_FOLDER_ID);
    }

    #[rstest]
    #[case("default", true)]
    #[case("missing", false)]
    fn test_delete_refused(#[case] id: &str, #[case] invalid_input: bool) {
        let mut h = Harness::new();
        let result = h.run(&FolderDeleteCommand { id: id.to_string() });
        match result {
            Err(WebmarksError::InvalidInput(_)) => assert!(invalid_input),
            Err(WebmarksError::NotFound { .. }) => assert!(!invalid_input),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(h.store.folders().len(), 1);
    }
}
