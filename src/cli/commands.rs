use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::app::{AppContext, EstuaryError, Result};
use crate::config::Config;
use crate::domain::WindowRule;
use crate::pipeline::{CategoryBuild, SourceStatus};
use crate::store::ArtifactWriter;

/// One category's build and where (or whether) it was written.
pub struct BuiltCategory {
    pub build: CategoryBuild,
    pub written: Result<PathBuf>,
}

/// Build the selected categories and write every artifact, including empty
/// ones. A failed write doesn't stop the remaining categories.
pub async fn run_build(ctx: &AppContext, names: &[String]) -> Result<Vec<BuiltCategory>> {
    let categories = ctx.select(names)?;
    let started_at = Utc::now();

    let builds = ctx.builder.build_all(&categories, started_at).await;

    Ok(builds
        .into_iter()
        .map(|build| {
            let written = ctx.writer.write(&build.artifact);
            if let Err(e) = &written {
                tracing::error!(category = %build.artifact.category, error = %e, "failed to write artifact");
            }
            BuiltCategory { build, written }
        })
        .collect())
}

pub async fn build(ctx: &AppContext, names: &[String]) -> Result<()> {
    if ctx.categories.is_empty() {
        println!("No categories configured");
        return Ok(());
    }

    let results = run_build(ctx, names).await?;

    let mut total_items = 0;
    let mut write_errors = 0;

    for BuiltCategory { build, written } in &results {
        let artifact = &build.artifact;
        let ok_sources = build.sources.len() - build.failed_sources();

        match written {
            Ok(path) => {
                total_items += artifact.len();
                println!(
                    "  {}: {} items ({}/{} sources ok) -> {}",
                    artifact.category,
                    artifact.len(),
                    ok_sources,
                    build.sources.len(),
                    path.display()
                );
            }
            Err(e) => {
                write_errors += 1;
                eprintln!("  Error writing {}: {}", artifact.category, e);
            }
        }

        for report in &build.sources {
            if let SourceStatus::Failed { reason } = &report.status {
                eprintln!("    ! {} - {}", report.label, reason);
            }
        }
    }

    println!(
        "Build complete: {} categories, {} items, {} write errors",
        results.len(),
        total_items,
        write_errors
    );

    if write_errors > 0 {
        return Err(EstuaryError::Other(format!(
            "{} artifact(s) could not be written",
            write_errors
        )));
    }

    Ok(())
}

pub fn list_categories(config: &Config) -> Result<()> {
    let categories = config.categories()?;

    if categories.is_empty() {
        println!("No categories configured");
        return Ok(());
    }

    for category in categories {
        let window = match category.window {
            Some(WindowRule::PreviousDay) => ", previous day only",
            None => "",
        };
        println!(
            "{} (max {} items{})",
            category.name, category.max_items, window
        );
        for query in &category.queries {
            println!("  {}", query.label());
        }
    }

    Ok(())
}

pub fn show_window(config: &Config, at: Option<&str>) -> Result<()> {
    let zone = config.pipeline.zone()?;
    let now = match at {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map_err(|e| EstuaryError::Other(format!("Invalid instant {:?}: {}", text, e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let window = WindowRule::PreviousDay.bounds(now, zone);
    println!("Reference zone: {}", zone.name());
    println!("Build instant:  {}", now.to_rfc3339());
    println!("Window start:   {} ({})", window.start.to_rfc3339(), window.start.with_timezone(&zone));
    println!("Window end:     {} ({})", window.end.to_rfc3339(), window.end.with_timezone(&zone));

    Ok(())
}
