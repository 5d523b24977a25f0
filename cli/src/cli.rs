use crate::commands::{bookmarks, folders, import_export, settings, CommandEnum};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage a folder-organized bookmark collection", long_about = None)]
pub struct Cli {
    /// Optional custom configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding bookmarks.json (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true)]
    pub nc: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Show debug information
    #[arg(short = 'g', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List folders
    Folders,

    /// Create a folder
    FolderAdd {
        /// Folder name
        name: String,
    },

    /// Rename a folder
    FolderRename {
        /// Folder id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a folder, moving its bookmarks to the default folder
    FolderDelete {
        /// Folder id
        id: String,
    },

    /// List bookmarks
    List {
        /// Only bookmarks of this folder
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Add a bookmark
    Add {
        /// URL to bookmark
        url: String,

        /// Bookmark name (defaults to the URL)
        #[arg(short, long)]
        name: Option<String>,

        /// Destination folder id
        #[arg(short, long)]
        folder: Option<String>,

        /// Icon URL
        #[arg(long)]
        icon: Option<String>,
    },

    /// Update an existing bookmark
    Update {
        /// Bookmark id
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Move to this folder
        #[arg(short, long)]
        folder: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        order: Option<i64>,
    },

    /// Delete bookmark(s)
    Delete {
        /// Bookmark ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Assign order 0, 1, 2, ... to the given bookmarks
    Reorder {
        /// Bookmark ids in their new order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Renumber one folder's bookmarks contiguously
    Normalize {
        /// Folder id
        #[arg(default_value = webmarks::models::DEFAULT_FOLDER_ID)]
        folder: String,
    },

    /// Check whether a URL is bookmarked
    Check {
        url: String,
    },

    /// Show settings
    Settings,

    /// Set one setting; the value is read as JSON, falling back to a string
    SettingsSet {
        key: String,
        value: String,
    },

    /// Import bookmarks from a Netscape HTML file or a backup
    Import {
        /// File path to import from
        file: PathBuf,

        /// Folder HTML imports are placed under
        #[arg(long)]
        root: Option<String>,
    },

    /// Export bookmarks to a file
    Export {
        /// File path to export to
        file: PathBuf,

        /// html or json; defaults to the file extension
        #[arg(short, long)]
        format: Option<String>,

        /// Title of the HTML document
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the whole store document
    Dump,
}

impl Commands {
    pub fn into_command(self) -> CommandEnum {
        match self {
            Commands::Folders => CommandEnum::Folders(folders::FoldersCommand),
            Commands::FolderAdd { name } => CommandEnum::FolderAdd(folders::FolderAddCommand { name }),
            Commands::FolderRename { id, name } => {
                CommandEnum::FolderRename(folders::FolderRenameCommand { id, name })
            }
            Commands::FolderDelete { id } => CommandEnum::FolderDelete(folders::FolderDeleteCommand { id }),
            Commands::List { folder } => CommandEnum::List(bookmarks::ListCommand { folder }),
            Commands::Add {
                url,
                name,
                folder,
                icon,
            } => CommandEnum::Add(bookmarks::AddCommand {
                url,
                name,
                folder,
                icon,
            }),
            Commands::Update {
                id,
                name,
                url,
                folder,
                icon,
                order,
            } => CommandEnum::Update(bookmarks::UpdateCommand {
                id,
                name,
                url,
                folder,
                icon,
                order,
            }),
            Commands::Delete { ids } => CommandEnum::Delete(bookmarks::DeleteCommand { ids }),
            Commands::Reorder { ids } => CommandEnum::Reorder(bookmarks::ReorderCommand { ids }),
            Commands::Normalize { folder } => CommandEnum::Normalize(bookmarks::NormalizeCommand { folder }),
            Commands::Check { url } => CommandEnum::Check(bookmarks::CheckCommand { url }),
            Commands::Settings => CommandEnum::Settings(settings::SettingsCommand),
            Commands::SettingsSet { key, value } => {
                CommandEnum::SettingsSet(settings::SettingsSetCommand { key, value })
            }
            Commands::Import { file, root } => CommandEnum::Import(import_export::ImportCommand { file, root }),
            Commands::Export { file, format, title } => {
                CommandEnum::Export(import_export::ExportCommand { file, format, title })
            }
            Commands::Dump => CommandEnum::Dump(import_export::DumpCommand),
        }
    }
}
