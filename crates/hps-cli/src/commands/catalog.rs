//! Model catalog and statistics commands.

use anyhow::Result;
use colored::Colorize;
use hps_application::messages::{CATALOG_FAILED, STATS_FAILED};
use hps_core::catalog::{ModelSummary, display_name};

use super::utils::{OrReport, print_json};
use crate::context::AppContext;

pub async fn models(ctx: &AppContext, model_type: Option<&str>, remote: bool) -> Result<()> {
    match (model_type, remote) {
        (Some(model_type), true) => {
            let models = ctx
                .catalog
                .models_by_type_remote(model_type)
                .await
                .or_report(CATALOG_FAILED)?;
            let summaries: Vec<ModelSummary> = models.iter().map(ModelSummary::from).collect();
            print_bucket(model_type, &summaries);
        }
        (Some(model_type), false) => {
            let bucket = ctx
                .catalog
                .models_for_type(model_type)
                .await
                .or_report(CATALOG_FAILED)?;
            print_bucket(model_type, &bucket);
        }
        (None, _) => {
            let grouped = ctx.catalog.models_by_type().await.or_report(CATALOG_FAILED)?;
            for model_type in ctx.catalog.type_order().await.or_report(CATALOG_FAILED)? {
                if let Some(bucket) = grouped.get(&model_type) {
                    print_bucket(&model_type, bucket);
                    println!();
                }
            }
        }
    }
    Ok(())
}

pub async fn types(ctx: &AppContext, remote: bool) -> Result<()> {
    if remote {
        return print_json(&ctx.catalog.types().await.or_report(CATALOG_FAILED)?);
    }

    let grouped = ctx.catalog.models_by_type().await.or_report(CATALOG_FAILED)?;
    for model_type in ctx.catalog.type_order().await.or_report(CATALOG_FAILED)? {
        let count = grouped.get(&model_type).map(Vec::len).unwrap_or(0);
        println!(
            "{:<14} {:<24} {}",
            model_type,
            ctx.catalog.display_name(&model_type),
            count.to_string().dimmed()
        );
    }
    Ok(())
}

pub async fn model(ctx: &AppContext, id: i64, parameters: bool, devices: bool) -> Result<()> {
    print_json(&ctx.catalog.model(id).await.or_report(CATALOG_FAILED)?)?;

    if parameters {
        println!("\n{}", "Parameters".bold());
        print_json(&ctx.catalog.model_parameters(id).await.or_report(CATALOG_FAILED)?)?;
    }
    if devices {
        println!("\n{}", "Devices".bold());
        print_json(&ctx.catalog.model_devices(id).await.or_report(CATALOG_FAILED)?)?;
    }
    Ok(())
}

pub async fn categories(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.catalog.categories().await.or_report(CATALOG_FAILED)?)
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.stats.stats().await.or_report(STATS_FAILED)?;

    if let Some(total) = stats.total_models {
        println!("{:<24} {}", "Models", total.to_string().bold());
    }
    if let Some(total) = stats.total_presets {
        println!("{:<24} {}", "Presets", total.to_string().bold());
    }
    if let Some(avg) = stats.avg_models_per_preset {
        println!("{:<24} {}", "Models per preset", format!("{:.1}", avg).bold());
    }
    for (key, value) in &stats.extra {
        println!("{:<24} {}", key, value);
    }
    Ok(())
}

pub async fn health(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.stats.health().await?)
}

fn print_bucket(model_type: &str, models: &[ModelSummary]) {
    println!(
        "{} {}",
        display_name(model_type).bold(),
        format!("({})", models.len()).dimmed()
    );
    for model in models {
        let mut line = format!("  {:>6}  {}", model.id, model.label());
        if let Some(category) = model.category.as_deref().filter(|c| !c.is_empty()) {
            line.push_str(&format!("  {}", category.dimmed()));
        }
        println!("{}", line);
    }
}
