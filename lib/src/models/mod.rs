pub mod bookmark;
pub mod folder;
pub mod settings;

pub use bookmark::{Bookmark, BookmarkPatch, NewBookmark};
pub use folder::{Folder, FolderPatch, DEFAULT_FOLDER_ID, DEFAULT_FOLDER_NAME};
pub use settings::Settings;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Full snapshot of the store: the on-disk document and the `data` section of a backup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreData {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            folders: vec![Folder::default_folder()],
            bookmarks: Vec::new(),
            settings: settings::default_settings(),
        }
    }
}

impl StoreData {
    /// Decode a `{folders, bookmarks, settings}` object, keeping whatever is usable.
    ///
    /// Sections of the wrong shape become empty, entries that fail to decode
    /// are dropped. Each degradation is described in the returned list.
    pub fn from_value_lenient(value: &Value) -> (Self, Vec<String>) {
        let mut issues = Vec::new();
        let folders = decode_list::<Folder>(value.get("folders"), "folders", &mut issues);
        let bookmarks = decode_list::<Bookmark>(value.get("bookmarks"), "bookmarks", &mut issues);
        let settings = match value.get("settings") {
            Some(Value::Object(map)) => map.clone(),
            None | Some(Value::Null) => Settings::new(),
            Some(_) => {
                issues.push("settings is not an object".to_string());
                Settings::new()
            }
        };

        (
            Self {
                folders,
                bookmarks,
                settings,
            },
            issues,
        )
    }
}

/// Read JSON `null` as the type's default, so `"name": null` decodes like a missing name
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn decode_list<T: DeserializeOwned>(
    value: Option<&Value>,
    section: &str,
    issues: &mut Vec<String>,
) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    issues.push(format!("{}[{}] skipped: {}", section, index, e));
                    None
                }
            })
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            issues.push(format!("{} is not a list", section));
            Vec::new()
        }
    }
}
