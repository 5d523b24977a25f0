use crate::output::OutputMode;
use std::io::Write;
use webmarks::config::Config;
use webmarks::error::Result;
use webmarks::BookmarkStore;

pub struct AppContext<'a> {
    pub store: &'a mut BookmarkStore,
    pub config: &'a Config,
    pub out: &'a mut dyn Write,
    pub mode: OutputMode,
}

pub mod bookmarks;
pub mod folders;
pub mod import_export;
pub mod settings;

pub trait WebmarksCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn WebmarksCommand>)
#[derive(Debug)]
pub enum CommandEnum {
    Folders(folders::FoldersCommand),
    FolderAdd(folders::FolderAddCommand),
    FolderRename(folders::FolderRenameCommand),
    FolderDelete(folders::FolderDeleteCommand),
    List(bookmarks::ListCommand),
    Add(bookmarks::AddCommand),
    Update(bookmarks::UpdateCommand),
    Delete(bookmarks::DeleteCommand),
    Reorder(bookmarks::ReorderCommand),
    Normalize(bookmarks::NormalizeCommand),
    Check(bookmarks::CheckCommand),
    Settings(settings::SettingsCommand),
    SettingsSet(settings::SettingsSetCommand),
    Import(import_export::ImportCommand),
    Export(import_export::ExportCommand),
    Dump(import_export::DumpCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        match self {
            Self::Folders(cmd) => cmd.execute(ctx),
            Self::FolderAdd(cmd) => cmd.execute(ctx),
            Self::FolderRename(cmd) => cmd.execute(ctx),
            Self::FolderDelete(cmd) => cmd.execute(ctx),
            Self::List(cmd) => cmd.execute(ctx),
            Self::Add(cmd) => cmd.execute(ctx),
            Self::Update(cmd) => cmd.execute(ctx),
            Self::Delete(cmd) => cmd.execute(ctx),
            Self::Reorder(cmd) => cmd.execute(ctx),
            Self::Normalize(cmd) => cmd.execute(ctx),
            Self::Check(cmd) => cmd.execute(ctx),
            Self::Settings(cmd) => cmd.execute(ctx),
            Self::SettingsSet(cmd) => cmd.execute(ctx),
            Self::Import(cmd) => cmd.execute(ctx),
            Self::Export(cmd) => cmd.execute(ctx),
            Self::Dump(cmd) => cmd.execute(ctx),
        }
    }
}
