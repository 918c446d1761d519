//! Preset search commands.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use hps_application::SearchQuery;
use hps_application::messages::SEARCH_FAILED;
use hps_core::catalog::display_name;
use hps_core::preset::{ModelSelection, SearchParams};

use super::utils::{OrReport, format_date, print_json, print_preset_line};
use crate::context::AppContext;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free text matched against preset names and descriptions
    #[arg(short, long, default_value = "")]
    pub query: String,

    #[arg(long, default_value = "")]
    pub author: String,

    /// Comma separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Model filter as TYPE=ID[,ID...], repeatable (e.g. --model amp=12,14)
    #[arg(short, long = "model", value_name = "TYPE=IDS")]
    pub models: Vec<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long)]
    pub page_size: Option<u32>,
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            query: self.query.clone(),
            author: self.author.clone(),
            tags: self.tags.clone(),
            page_size: self.page_size,
        }
    }

    pub fn selection(&self) -> Result<ModelSelection> {
        parse_model_filters(&self.models)
    }

    pub fn to_params(&self) -> Result<SearchParams> {
        Ok(self.to_query().to_params(&self.selection()?, self.page))
    }
}

/// Parses `amp=12,14` style filters. Repeated types accumulate.
pub fn parse_model_filters(raw: &[String]) -> Result<ModelSelection> {
    let mut selection = ModelSelection::new();
    for filter in raw {
        let Some((model_type, ids)) = filter.split_once('=') else {
            bail!("Invalid model filter '{}', expected TYPE=ID[,ID...]", filter);
        };
        let model_type = model_type.trim();
        if model_type.is_empty() {
            bail!("Invalid model filter '{}': missing type", filter);
        }
        for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            let id: i64 = id
                .parse()
                .with_context(|| format!("Invalid model id '{}' in '{}'", id, filter))?;
            selection.add(model_type, id);
        }
    }
    Ok(selection)
}

pub async fn search(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let query = args.to_query();
    let selection = args.selection()?;
    let params = query.to_params(&selection, args.page);

    let response = ctx
        .search
        .search(&query, &selection, args.page)
        .await
        .or_report(SEARCH_FAILED)?;

    if response.results.is_empty() {
        println!("No presets found.");
        return Ok(());
    }

    for preset in &response.results {
        print_preset_line(preset);
    }

    let pages = response.total_pages(params.page_size);
    println!(
        "\n{}",
        format!(
            "Page {} of {} ({} presets)",
            params.page, pages, response.total_count
        )
        .dimmed()
    );
    Ok(())
}

pub async fn filters(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.search.filters().await.or_report(SEARCH_FAILED)?)
}

pub async fn preset(ctx: &AppContext, id: i64) -> Result<()> {
    let preset = ctx.search.preset(id).await.or_report(SEARCH_FAILED)?;

    println!("{}", preset.name.bold());
    if let Some(author) = preset.author.as_deref() {
        println!("by {}", author.cyan());
    }
    if let Some(created) = preset.created_at.as_deref() {
        println!("created {}", format_date(created));
    }
    let tags = preset.tag_list();
    if !tags.is_empty() {
        println!("tags: {}", tags.join(", "));
    }
    if let Some(description) = preset.description.as_deref().filter(|d| !d.is_empty()) {
        println!("\n{}", description);
    }

    if !preset.model_details.is_empty() {
        println!("\n{}", "Signal chain".bold());
    }
    for detail in &preset.model_details {
        let position = format!(
            "dsp {} pos {}",
            detail.dsp_number.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
            detail.position.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
        );
        let kind = display_name(detail.model_type.as_deref().unwrap_or_default());
        let mut line = format!(
            "  {}  {:<28} {}",
            position.dimmed(),
            detail.model_name.as_deref().unwrap_or("?"),
            kind
        );
        if detail.is_enabled == Some(false) {
            line.push_str(&format!("  {}", "(bypassed)".yellow()));
        }
        println!("{}", line);
    }
    Ok(())
}
