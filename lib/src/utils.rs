use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File name of the store document inside the data directory
pub const STORE_FILE_NAME: &str = "bookmarks.json";

pub fn get_default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("WEBMARKS_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(path).join("webmarks");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/share/webmarks");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("webmarks");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("webmarks");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/webmarks");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("webmarks");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Time-prefixed id with a random suffix.
///
/// Unique in practice, not by construction: two ids minted in the same
/// millisecond collide only if the 11-character suffix does too.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..11)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", to_base36(now_millis().max(0) as u64), suffix)
}

/// Directory name earlier releases kept `bookmarks.json` in
pub const LEGACY_DIR_NAME: &str = "web-viewer-data";

/// Places a store document may have been left by earlier releases, most likely first
pub fn legacy_data_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(parent) = get_default_data_dir().parent() {
        dirs.push(parent.join(LEGACY_DIR_NAME));
    }
    dirs.push(get_config_dir().join(LEGACY_DIR_NAME));
    dirs.push(std::env::temp_dir().join(LEGACY_DIR_NAME));
    dirs
}

/// Copy the first legacy store file found into `target` when `target` does not exist yet.
///
/// Returns the directory the file was migrated from.
pub fn migrate_legacy_store(target: &Path, legacy_dirs: &[PathBuf]) -> std::io::Result<Option<PathBuf>> {
    if target.exists() {
        return Ok(None);
    }
    let target_dir = target.parent();

    for dir in legacy_dirs {
        if Some(dir.as_path()) == target_dir {
            continue;
        }
        let candidate = dir.join(STORE_FILE_NAME);
        if candidate.is_file() {
            if let Some(parent) = target_dir {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&candidate, target)?;
            log::info!("Migrated {:?} to {:?}", candidate, target);
            return Ok(Some(dir.clone()));
        }
    }

    Ok(None)
}
