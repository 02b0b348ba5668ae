use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pageforge::{
    generate_batch, write_batch, BatchConfig, GateConfig, PageMap, PoolSet, Template,
};

#[derive(Parser, Debug)]
#[command(
    name = "pageforge-generator",
    about = "Assemble a batch of unique landing pages from content pools"
)]
struct GeneratorCli {
    /// Batch number; namespaces seeds and the output directory.
    #[arg(long, env = "PAGEFORGE_BATCH")]
    batch: u32,

    /// Number of pages that must be accepted.
    #[arg(long, env = "PAGEFORGE_COUNT")]
    count: usize,

    /// Directory holding the content pool JSON files.
    #[arg(long, env = "PAGEFORGE_POOLS", default_value = "data/pools")]
    pools: PathBuf,

    /// Page template file.
    #[arg(
        long,
        env = "PAGEFORGE_TEMPLATE",
        default_value = "templates/integration-page.md"
    )]
    template: PathBuf,

    /// Root directory for generated batches and the page map.
    #[arg(long, env = "PAGEFORGE_OUT", default_value = "generated")]
    out: PathBuf,

    /// Jaccard similarity above which a candidate is rejected as a
    /// near-duplicate. No default: 1.0 effectively disables the guard and
    /// must be requested explicitly.
    #[arg(long, env = "PAGEFORGE_SIMILARITY")]
    similarity: f64,

    /// Minimum rendered word count per page.
    #[arg(long, env = "PAGEFORGE_MIN_WORDS", default_value_t = 1500)]
    min_words: usize,

    /// Attempt ceiling; defaults to count * 20.
    #[arg(long, env = "PAGEFORGE_MAX_ATTEMPTS")]
    max_attempts: Option<usize>,
}

fn main() -> Result<()> {
    let cli = GeneratorCli::parse();

    let pools = PoolSet::load(&cli.pools)
        .with_context(|| format!("failed to load pools from {:?}", cli.pools))?;
    let template_text = fs::read_to_string(&cli.template)
        .with_context(|| format!("failed to read template {:?}", cli.template))?;
    let template = Template::parse(&template_text)
        .with_context(|| format!("invalid template {:?}", cli.template))?;

    let mut gates = GateConfig::new(cli.similarity);
    gates.min_words = cli.min_words;
    let config = BatchConfig {
        batch: cli.batch,
        target: cli.count,
        max_attempts: cli.max_attempts,
    };

    println!(
        "generating batch {} ({} pages, {} combinations available, threshold {})",
        cli.batch,
        cli.count,
        pools.combination_count(),
        cli.similarity
    );

    let batch = generate_batch(&pools, &template, &gates, &config)?;
    let batch_dir = write_batch(&batch, &cli.out)
        .with_context(|| format!("failed to write batch under {:?}", cli.out))?;

    let mut page_map = PageMap::load(&cli.out).context("failed to load page map")?;
    page_map.merge_batch(&batch);
    let map_path = page_map.save(&cli.out).context("failed to write page map")?;

    render_stats(&batch);
    println!("wrote {} pages to {:?}", batch.pages.len(), batch_dir);
    println!("page map updated at {:?} ({} total slugs)", map_path, page_map.len());
    Ok(())
}

fn render_stats(batch: &pageforge::Batch) {
    let rejections = &batch.rejections;
    println!("--- Batch Assembly ---");
    println!("accepted pages: {}", batch.pages.len());
    println!("candidates examined: {}", batch.attempts);
    println!("candidates rejected: {}", rejections.total());
    println!("rejected (repeat combination): {}", rejections.repeat_combination);
    println!("rejected (leaked placeholders): {}", rejections.leaked_placeholders);
    println!("rejected (thin content): {}", rejections.thin_content);
    println!("rejected (missing markers): {}", rejections.missing_markers);
    println!("rejected (sparse sections): {}", rejections.sparse_sections);
    println!("rejected (exact duplicate): {}", rejections.exact_duplicate);
    println!("rejected (near duplicate): {}", rejections.near_duplicate);
}
