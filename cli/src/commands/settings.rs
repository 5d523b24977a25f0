use super::{AppContext, WebmarksCommand};
use crate::output::write_json;
use serde_json::Value;
use std::io::Write;
use webmarks::error::{Result, WebmarksError};
use webmarks::models::Settings;

#[derive(Debug, Clone)]
pub struct SettingsCommand;

impl WebmarksCommand for SettingsCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if ctx.mode.json {
            return write_json(ctx.out, ctx.store.settings());
        }
        for (key, value) in ctx.store.settings() {
            writeln!(ctx.out, "{} = {}", key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SettingsSetCommand {
    pub key: String,
    pub value: String,
}

/// `true`, `0.5` and `{"x":1}` keep their JSON type; anything else is a string
fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

impl WebmarksCommand for SettingsSetCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(WebmarksError::InvalidInput(
                "Setting key must not be empty".to_string(),
            ));
        }
        let mut patch = Settings::new();
        patch.insert(key.to_string(), parse_setting_value(&self.value));

        let merged = ctx.store.update_settings(&patch)?;
        if ctx.mode.json {
            return write_json(ctx.out, &merged);
        }
        writeln!(ctx.out, "{} = {}", key, merged[key])?;
        Ok(())
    }
}
