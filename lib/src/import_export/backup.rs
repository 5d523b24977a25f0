use crate::error::{Result, WebmarksError};
use crate::models::{Bookmark, Folder, Settings, StoreData};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `format` tag written into every backup
pub const BACKUP_FORMAT: &str = "web-viewer-bookmarks";
pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub format: String,
    pub version: u32,
    pub exported_at: String,
    pub data: StoreData,
}

/// Outcome of decoding a backup: the usable data plus every problem that was papered over
#[derive(Debug)]
pub struct DecodedBackup {
    pub data: StoreData,
    pub issues: Vec<WebmarksError>,
}

impl DecodedBackup {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn encode_backup(folders: &[Folder], bookmarks: &[Bookmark], settings: &Settings) -> Result<String> {
    let envelope = BackupEnvelope {
        format: BACKUP_FORMAT.to_string(),
        version: BACKUP_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        data: StoreData {
            folders: folders.to_vec(),
            bookmarks: bookmarks.to_vec(),
            settings: settings.clone(),
        },
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Decode either a full envelope or a bare `{folders, bookmarks, settings}` object.
///
/// Never fails on shape problems: they are collected as `InvalidBackup`
/// issues and the affected parts come back empty.
pub fn decode_backup(value: &Value) -> DecodedBackup {
    let mut issues = Vec::new();

    if !value.is_object() {
        log::warn!("Backup: not a JSON object, nothing to import");
        issues.push(WebmarksError::InvalidBackup(
            "backup is not a JSON object".to_string(),
        ));
        return DecodedBackup {
            data: StoreData {
                folders: Vec::new(),
                bookmarks: Vec::new(),
                settings: Settings::new(),
            },
            issues,
        };
    }

    let payload = match value.get("data") {
        Some(data) if data.is_object() => {
            check_envelope(value);
            data
        }
        _ => value,
    };

    let (data, problems) = StoreData::from_value_lenient(payload);
    for problem in problems {
        log::warn!("Backup: {}", problem);
        issues.push(WebmarksError::InvalidBackup(problem));
    }

    log::debug!(
        "Decoded backup: {} folders, {} bookmarks, {} issue(s)",
        data.folders.len(),
        data.bookmarks.len(),
        issues.len()
    );
    DecodedBackup { data, issues }
}

pub fn decode_backup_str(text: &str) -> Result<DecodedBackup> {
    let value: Value = serde_json::from_str(text)?;
    Ok(decode_backup(&value))
}

fn check_envelope(value: &Value) {
    match value.get("format").and_then(Value::as_str) {
        Some(BACKUP_FORMAT) | None => {}
        Some(other) => log::warn!("Backup format tag is {:?}, expected {:?}", other, BACKUP_FORMAT),
    }
    if let Some(version) = value.get("version").and_then(Value::as_u64) {
        if version > BACKUP_VERSION as u64 {
            log::warn!(
                "Backup version {} is newer than {}, reading what is understood",
                version,
                BACKUP_VERSION
            );
        }
    }
}
