use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Id of the folder that can never be deleted
pub const DEFAULT_FOLDER_ID: &str = "default";

/// Display name the default folder is created with
pub const DEFAULT_FOLDER_NAME: &str = "默认收藏";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
}

impl Folder {
    pub fn new(id: String, name: String, order: i64) -> Self {
        Self { id, name, order }
    }

    pub fn default_folder() -> Self {
        Self::new(
            DEFAULT_FOLDER_ID.to_string(),
            DEFAULT_FOLDER_NAME.to_string(),
            0,
        )
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_FOLDER_ID
    }

    /// Shallow merge: only the fields present in the patch are replaced
    pub fn apply(&mut self, patch: &FolderPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl FolderPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            order: None,
        }
    }
}
