use serde_json::{json, Map, Value};

/// Free-form settings document, merged key by key
pub type Settings = Map<String, Value>;

/// Settings a fresh store starts with
pub fn default_settings() -> Settings {
    let value = json!({
        "floatingBallPosition": { "x": 100, "y": 100 },
        "defaultOpacity": 1.0,
        "autoHidePanel": true,
        "defaultUrl": "",
        "debugLogs": true
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Shallow merge: top-level keys of `patch` replace those in `base`
pub fn merge(base: &mut Settings, patch: &Settings) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

/// Whether the `debugLogs` switch is on; absent means on
pub fn debug_logs_enabled(settings: &Settings) -> bool {
    settings
        .get("debugLogs")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}
