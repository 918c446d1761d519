//! Downloads and uploads.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use colored::Colorize;
use hps_application::messages::{BULK_DOWNLOAD_FAILED, DOWNLOAD_FAILED, SEARCH_FAILED};
use hps_application::{UploadOutcome, UploadService};

use super::search::SearchArgs;
use super::utils::{OrReport, require_login};
use crate::context::AppContext;

pub async fn download(ctx: &AppContext, id: i64) -> Result<()> {
    require_login(ctx)?;
    let preset = ctx.search.preset(id).await.or_report(DOWNLOAD_FAILED)?;
    let path = ctx
        .downloads
        .download_preset(&preset)
        .await
        .or_report(DOWNLOAD_FAILED)?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}

pub async fn download_bulk(ctx: &AppContext, ids: &[i64]) -> Result<()> {
    require_login(ctx)?;
    match ctx
        .downloads
        .download_bulk(ids)
        .await
        .or_report(BULK_DOWNLOAD_FAILED)?
    {
        Some(path) => println!("{} {}", "Saved".green(), path.display()),
        None => println!("No presets selected."),
    }
    Ok(())
}

pub async fn download_search(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    require_login(ctx)?;
    let params = args.to_params()?;
    let path = ctx
        .downloads
        .download_search(&params)
        .await
        .or_report(SEARCH_FAILED)?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}

pub async fn upload(ctx: &AppContext, paths: &[PathBuf]) -> Result<()> {
    let files = UploadService::collect(paths);
    let skipped = paths.len() - files.len();
    if skipped > 0 {
        eprintln!(
            "{}",
            format!("Skipping {} file(s) without .hlx extension", skipped).yellow()
        );
    }
    if files.is_empty() {
        bail!("No .hlx files to upload");
    }
    require_login(ctx)?;

    let results = ctx
        .uploads
        .upload_all(&files, |percent| {
            eprint!("\rUploading... {:>3.0}% complete", percent);
            let _ = io::stderr().flush();
        })
        .await?;
    eprintln!();

    let mut failed = 0;
    for result in &results {
        match &result.outcome {
            UploadOutcome::Succeeded { preset_id, message } => println!(
                "{} {} {}",
                "✓".green(),
                result.file,
                format!(
                    "(preset {}{})",
                    preset_id,
                    message
                        .as_deref()
                        .map(|m| format!(", {}", m))
                        .unwrap_or_default()
                )
                .dimmed()
            ),
            UploadOutcome::Failed { error } => {
                failed += 1;
                println!("{} {} {}", "✗".red(), result.file, error.red());
            }
        }
    }

    println!(
        "\n{} uploaded, {} failed",
        results.len() - failed,
        failed
    );
    if failed > 0 {
        bail!("{} of {} uploads failed", failed, results.len());
    }
    Ok(())
}
