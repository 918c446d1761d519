//! Output helpers shared by the command handlers.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime};
use colored::Colorize;
use hps_core::catalog::sort_by_type_preference;
use hps_core::preset::Preset;
use serde_json::Value;

use crate::context::AppContext;

/// Turns an `HpsError` into the message a user should see, keeping the
/// underlying error as the cause.
pub trait OrReport<T> {
    fn or_report(self, message: &str) -> Result<T>;
}

impl<T> OrReport<T> for hps_core::Result<T> {
    fn or_report(self, message: &str) -> Result<T> {
        self.map_err(|e| {
            let summary = e.user_message(message).to_string();
            anyhow::Error::new(e).context(summary)
        })
    }
}

/// Fails unless someone is signed in.
pub fn require_login(ctx: &AppContext) -> Result<()> {
    if ctx.auth.is_authenticated() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} Run `hps login` first.",
            hps_application::messages::LOGIN_REQUIRED
        ))
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `2024-03-01T12:00:00Z` → `2024-03-01`. Unknown formats are shown as-is.
pub fn format_date(raw: &str) -> String {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// One-line summary of a search hit.
pub fn print_preset_line(preset: &Preset) {
    let mut line = format!("{} {}", format!("[{}]", preset.id).dimmed(), preset.name.bold());
    if let Some(author) = preset.author.as_deref().filter(|a| !a.is_empty()) {
        line.push_str(&format!(" by {}", author.cyan()));
    }
    if let Some(created) = preset.created_at.as_deref() {
        line.push_str(&format!("  {}", format_date(created).dimmed()));
    }
    println!("{}", line);

    let tags = preset.tag_list();
    if !tags.is_empty() {
        println!("    tags: {}", tags.join(", "));
    }

    let mut details = preset.model_details.clone();
    if !details.is_empty() {
        sort_by_type_preference(&mut details);
        let names: Vec<&str> = details
            .iter()
            .filter_map(|d| d.model_name.as_deref())
            .collect();
        println!("    models: {}", names.join(", "));
    }
}
