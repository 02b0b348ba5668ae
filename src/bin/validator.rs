use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pageforge::{validate_dir, ValidationReport, ValidatorConfig};

#[derive(Parser, Debug)]
#[command(
    name = "pageforge-validator",
    about = "Audit a generated batch for thin content, duplicates, and boilerplate"
)]
struct ValidatorCli {
    /// Batch directory to audit.
    #[arg(long, env = "PAGEFORGE_FOLDER")]
    folder: PathBuf,

    /// Minimum acceptable word count per page.
    #[arg(long, env = "PAGEFORGE_MIN_WORDS", default_value_t = 1500)]
    min_words: usize,

    /// Maximum percentage of sentences allowed to be boilerplate.
    #[arg(long, env = "PAGEFORGE_MAX_BOILERPLATE", default_value_t = 60.0)]
    max_boilerplate: f64,

    /// Optional JSON file with custom boilerplate phrases.
    #[arg(long, env = "PAGEFORGE_PHRASES")]
    phrases: Option<PathBuf>,

    /// Optional path to write the report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = ValidatorCli::parse();

    let mut config = ValidatorConfig {
        min_words: cli.min_words,
        max_boilerplate_pct: cli.max_boilerplate,
        ..ValidatorConfig::default()
    };
    if let Some(path) = &cli.phrases {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read phrases {:?}", path))?;
        config.boilerplate_phrases = serde_json::from_str(&raw)
            .with_context(|| format!("invalid phrase list {:?}", path))?;
    }

    println!("validating {:?}", cli.folder);
    println!("minimum word count: {}", config.min_words);
    println!("boilerplate ceiling: {}%", config.max_boilerplate_pct);

    let report = validate_dir(&cli.folder, &config)?;
    render_report(&report, &config);

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("failed to write report {:?}", path))?;
        println!("report written to {:?}", path);
    }

    anyhow::ensure!(
        report.is_clean(),
        "validation failed: {} thin, {} duplicate pairs, {} boilerplate-heavy",
        report.thin.len(),
        report.duplicates.len(),
        report.boilerplate.len()
    );
    println!("validation passed: all quality checks clean");
    Ok(())
}

fn render_report(report: &ValidationReport, config: &ValidatorConfig) {
    println!("--- Content Audit ---");
    println!("pages scanned: {}", report.scanned);

    if report.thin.is_empty() {
        println!("word counts: all pages at or above {}", config.min_words);
    } else {
        println!("thin content ({} pages):", report.thin.len());
        for page in &report.thin {
            println!("  - {}: {} words", page.slug, page.words);
        }
    }

    if report.duplicates.is_empty() {
        println!("duplicates: none");
    } else {
        println!("exact duplicates ({} pairs):", report.duplicates.len());
        for pair in &report.duplicates {
            println!("  - {} <-> {}", pair.first, pair.second);
        }
    }

    if report.boilerplate.is_empty() {
        println!("boilerplate: within limits");
    } else {
        println!("boilerplate-heavy ({} pages):", report.boilerplate.len());
        for page in &report.boilerplate {
            println!("  - {}: {:.1}% boilerplate", page.slug, page.pct);
        }
    }
}
