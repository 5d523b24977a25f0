use super::folder::DEFAULT_FOLDER_ID;
use super::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};

/// A bookmark as stored on disk and exchanged in backups
///
/// Field names follow the camelCase layout of the store document so files
/// written by earlier versions load unchanged. Everything except `url` has a
/// default, which lets hand-edited or older backups decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default = "default_folder_id", deserialize_with = "folder_id_or_default")]
    pub folder_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn default_folder_id() -> String {
    DEFAULT_FOLDER_ID.to_string()
}

fn folder_id_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_folder_id))
}

impl Bookmark {
    /// Name to show for this bookmark, falling back to the URL
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }

    pub fn apply(&mut self, patch: &BookmarkPatch) {
        if let Some(folder_id) = &patch.folder_id {
            self.folder_id = folder_id.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Input for `BookmarkStore::add_bookmark`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl NewBookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            folder_id: None,
            name: name.into(),
            url: url.into(),
            icon: String::new(),
        }
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
