use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use pageforge::{write_sitemaps, PageMap, MAX_URLS_PER_SITEMAP};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "pageforge-sitemap",
    about = "Emit batched XML sitemaps plus an index from the page map"
)]
struct SitemapCli {
    /// Directory holding generated batches and the page map.
    #[arg(long, env = "PAGEFORGE_GENERATED", default_value = "generated")]
    generated: PathBuf,

    /// Public base URL the slugs are served under.
    #[arg(long, env = "PAGEFORGE_BASE_URL")]
    base_url: String,

    /// Output directory for sitemap files.
    #[arg(long, env = "PAGEFORGE_SITEMAP_OUT", default_value = "public")]
    out: PathBuf,

    /// Maximum URLs per sitemap batch file.
    #[arg(long, default_value_t = MAX_URLS_PER_SITEMAP)]
    max_urls: usize,

    /// Report existing sitemap files instead of writing.
    #[arg(long, default_value_t = false)]
    status: bool,
}

fn main() -> Result<()> {
    let cli = SitemapCli::parse();

    if cli.status {
        return render_status(&cli.out);
    }

    let base = Url::parse(&cli.base_url)
        .with_context(|| format!("invalid base url '{}'", cli.base_url))?;
    anyhow::ensure!(
        base.host_str().is_some_and(|host| host != "localhost"),
        "refusing to publish sitemap URLs for '{}'; set a public base url",
        cli.base_url
    );

    let page_map = PageMap::load(&cli.generated)
        .with_context(|| format!("failed to load page map from {:?}", cli.generated))?;
    anyhow::ensure!(
        !page_map.is_empty(),
        "page map in {:?} is empty; generate a batch first",
        cli.generated
    );

    let trimmed = cli.base_url.trim_end_matches('/');
    let urls: Vec<String> = page_map
        .slugs()
        .map(|slug| format!("{trimmed}/{slug}"))
        .collect();

    let lastmod = Utc::now().format("%Y-%m-%d").to_string();
    let summary = write_sitemaps(&urls, trimmed, &cli.out, cli.max_urls, &lastmod)?;

    println!(
        "generated {} sitemap batches ({} unique URLs)",
        summary.files.len(),
        summary.urls
    );
    println!("index written to {:?}", summary.index);
    Ok(())
}

fn render_status(out: &Path) -> Result<()> {
    let sitemaps_dir = out.join("sitemaps");
    let mut files: Vec<PathBuf> = match fs::read_dir(&sitemaps_dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("sitemap-batch-"))
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();

    println!("sitemaps found: {}", files.len());
    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read sitemap {:?}", path))?;
        let count = content.matches("<loc>").count();
        println!("{:?}: {} URLs", path.file_name().unwrap_or_default(), count);
    }

    let index = out.join("sitemap-index.xml");
    if index.exists() {
        println!("index file present: {:?}", index);
    } else {
        println!("index file missing: {:?}", index);
    }
    Ok(())
}
