use super::{AppContext, WebmarksCommand};
use crate::output::write_json;
use std::io::Write;
use std::path::PathBuf;
use webmarks::error::{Result, WebmarksError};
use webmarks::import_export::{self, ExportFormat};

#[derive(Debug, Clone)]
pub struct ImportCommand {
    pub file: PathBuf,
    pub root: Option<String>,
}

impl WebmarksCommand for ImportCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let root = match self.root.as_deref().map(str::trim) {
            Some("") => {
                return Err(WebmarksError::InvalidInput(
                    "Root folder name must not be empty".to_string(),
                ))
            }
            Some(root) => root.to_string(),
            None => ctx.config.import_root_folder.clone(),
        };

        let report = import_export::import_bookmarks(ctx.store, &self.file, &root)?;
        if ctx.mode.json {
            return write_json(ctx.out, &report);
        }
        writeln!(
            ctx.out,
            "✓ Imported {} as {}: {} folder(s) added, {} bookmark(s) added, {} duplicate(s) skipped",
            self.file.display(),
            report.format.as_str(),
            report.stats.added_folders,
            report.stats.added_bookmarks,
            report.stats.skipped_bookmarks
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExportCommand {
    pub file: PathBuf,
    pub format: Option<String>,
    pub title: Option<String>,
}

impl WebmarksCommand for ExportCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let format = self
            .format
            .as_deref()
            .map(str::parse::<ExportFormat>)
            .transpose()?;
        let format = import_export::export_bookmarks(ctx.store, &self.file, format, self.title.as_deref())?;
        if ctx.mode.json {
            return write_json(
                ctx.out,
                &serde_json::json!({ "file": self.file, "format": format }),
            );
        }
        writeln!(ctx.out, "Exported bookmarks to {}", self.file.display())?;
        Ok(())
    }
}

/// Print the store document as JSON, regardless of `--json`
#[derive(Debug, Clone)]
pub struct DumpCommand;

impl WebmarksCommand for DumpCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        write_json(ctx.out, &ctx.store.all_data())
    }
}
