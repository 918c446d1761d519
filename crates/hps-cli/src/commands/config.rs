//! config show | init | set

use std::path::PathBuf;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::context::AppContext;

pub fn show(ctx: &AppContext) -> Result<()> {
    println!("{} {}", "# file:".dimmed(), ctx.config_service.path().display());
    if let Ok(session_file) = ctx.paths.session_file() {
        println!("{} {}", "# session:".dimmed(), session_file.display());
    }
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

pub fn init(ctx: &AppContext) -> Result<()> {
    let path = ctx.config_service.path().display();
    if ctx.config_service.ensure_config_file()? {
        println!("{} {}", "Created".green(), path);
    } else {
        println!("{} already exists", path);
    }
    Ok(())
}

pub fn set(ctx: &AppContext, key: &str, value: &str) -> Result<()> {
    // Edit the file contents, not the effective config with overrides
    let mut config = ctx.config_service.load_file()?;
    let value = value.trim();

    match key {
        "api_base_url" if value.is_empty() => bail!("api_base_url cannot be empty"),
        "api_base_url" => config.api_base_url = value.to_string(),
        "download_dir" => {
            config.download_dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        "log_level" => config.log_level = (!value.is_empty()).then(|| value.to_string()),
        other => bail!(
            "Unknown key '{}' (expected api_base_url, download_dir or log_level)",
            other
        ),
    }

    ctx.config_service.save(&config)?;
    println!("{} {} = {}", "Set".green(), key, value);
    Ok(())
}
