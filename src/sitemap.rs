//! Page map artifact and XML sitemap emission for accepted slugs.

use crate::assembler::Batch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum URLs per sitemap batch file.
pub const MAX_URLS_PER_SITEMAP: usize = 50;

/// File name of the page map artifact.
pub const PAGE_MAP_FILE: &str = "page-map.json";

/// Digest entry describing one accepted page for downstream routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMapEntry {
    /// Page slug (also the file stem).
    pub slug: String,
    /// Batch directory holding the page.
    pub batch: u32,
    /// CRC32 checksum of the rendered body.
    pub checksum: u32,
    /// Word count of the rendered body.
    pub word_count: usize,
}

/// Slug-keyed inventory of every generated page across batches.
///
/// Kept sorted by slug so regeneration produces stable diffs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageMap {
    entries: BTreeMap<String, PageMapEntry>,
}

impl PageMap {
    /// Creates an empty page map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the page map from `dir`, or returns an empty map when the
    /// artifact does not exist yet.
    pub fn load(dir: &Path) -> Result<Self, SitemapError> {
        let path = dir.join(PAGE_MAP_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(&path).map_err(|source| SitemapError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SitemapError::Parse { path, source })
    }

    /// Merges a generated batch into the map; a slug regenerated in a later
    /// batch replaces its previous entry.
    pub fn merge_batch(&mut self, batch: &Batch) {
        for page in &batch.pages {
            self.entries.insert(
                page.slug.clone(),
                PageMapEntry {
                    slug: page.slug.clone(),
                    batch: batch.batch,
                    checksum: page.checksum,
                    word_count: page.word_count,
                },
            );
        }
    }

    /// Writes the artifact into `dir`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, SitemapError> {
        let path = dir.join(PAGE_MAP_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| SitemapError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| SitemapError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Number of pages tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no page is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slugs in sorted order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entry for a slug, when present.
    pub fn get(&self, slug: &str) -> Option<&PageMapEntry> {
        self.entries.get(slug)
    }
}

/// Errors surfaced while writing sitemaps or the page map.
#[derive(Debug)]
pub enum SitemapError {
    /// Reading or writing an artifact failed.
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// An artifact held malformed JSON.
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// No slugs were available to publish.
    NoRoutes,
}

impl fmt::Display for SitemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "sitemap io error at {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid sitemap artifact {}: {source}", path.display())
            }
            Self::NoRoutes => write!(f, "no routes available for sitemap generation"),
        }
    }
}

impl std::error::Error for SitemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NoRoutes => None,
        }
    }
}

fn xml_escape(value: &str) -> String {
    html_escape::encode_quoted_attribute(value).into_owned()
}

/// Renders one `<urlset>` document.
pub fn build_urlset(urls: &[String], lastmod: &str) -> String {
    let items = urls
        .iter()
        .map(|loc| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </url>",
                xml_escape(loc)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{items}\n</urlset>"
    )
}

/// Renders the `<sitemapindex>` document referencing every batch file.
pub fn build_index(entries: &[String], lastmod: &str) -> String {
    let items = entries
        .iter()
        .map(|loc| {
            format!(
                "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>",
                xml_escape(loc)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{items}\n</sitemapindex>"
    )
}

/// Summary of an emitted sitemap set.
#[derive(Debug)]
pub struct SitemapSummary {
    /// Batch files written, in order.
    pub files: Vec<PathBuf>,
    /// Path of the index file.
    pub index: PathBuf,
    /// Total URLs across all batch files.
    pub urls: usize,
}

/// Splits `urls` into ≤ `max_per_file` chunks, writes
/// `sitemaps/sitemap-batch-NN.xml` files plus `sitemap-index.xml` under
/// `out_dir`, removing stale batch files first.
pub fn write_sitemaps(
    urls: &[String],
    base_url: &str,
    out_dir: &Path,
    max_per_file: usize,
    lastmod: &str,
) -> Result<SitemapSummary, SitemapError> {
    if urls.is_empty() {
        return Err(SitemapError::NoRoutes);
    }
    let base = base_url.trim_end_matches('/');
    let sitemaps_dir = out_dir.join("sitemaps");
    fs::create_dir_all(&sitemaps_dir).map_err(|source| SitemapError::Io {
        path: sitemaps_dir.clone(),
        source,
    })?;

    // Stale batch files from a previous, larger run would otherwise survive.
    let existing = fs::read_dir(&sitemaps_dir).map_err(|source| SitemapError::Io {
        path: sitemaps_dir.clone(),
        source,
    })?;
    for entry in existing.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with("sitemap-batch-") {
            fs::remove_file(entry.path()).map_err(|source| SitemapError::Io {
                path: entry.path(),
                source,
            })?;
        }
    }

    let chunk_size = max_per_file.max(1);
    let mut files = Vec::new();
    let mut index_entries = Vec::new();
    for (chunk_index, chunk) in urls.chunks(chunk_size).enumerate() {
        let filename = format!("sitemap-batch-{:02}.xml", chunk_index + 1);
        let path = sitemaps_dir.join(&filename);
        fs::write(&path, build_urlset(chunk, lastmod)).map_err(|source| SitemapError::Io {
            path: path.clone(),
            source,
        })?;
        index_entries.push(format!("{base}/sitemaps/{filename}"));
        files.push(path);
    }

    let index = out_dir.join("sitemap-index.xml");
    fs::write(&index, build_index(&index_entries, lastmod)).map_err(|source| SitemapError::Io {
        path: index.clone(),
        source,
    })?;

    Ok(SitemapSummary {
        files,
        index,
        urls: urls.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::PageRecord;
    use crate::template::TemplateContext;

    fn record(slug: &str, batch: u32) -> PageRecord {
        PageRecord {
            slug: slug.into(),
            batch,
            body: "body".into(),
            variables: TemplateContext::default(),
            word_count: 4,
            checksum: 7,
            content_hash: "hash".into(),
        }
    }

    #[test]
    fn page_map_merges_and_round_trips() {
        let mut map = PageMap::new();
        map.merge_batch(&Batch {
            batch: 1,
            pages: vec![record("antwerp-cargowise", 1), record("rotterdam-sap", 1)],
            attempts: 2,
            rejections: Default::default(),
        });
        map.merge_batch(&Batch {
            batch: 2,
            pages: vec![record("antwerp-cargowise", 2)],
            attempts: 1,
            rejections: Default::default(),
        });

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("antwerp-cargowise").unwrap().batch, 2);

        let temp = tempfile::tempdir().expect("tempdir");
        map.save(temp.path()).expect("save");
        let reloaded = PageMap::load(temp.path()).expect("load");
        assert_eq!(reloaded.len(), 2);
        let slugs: Vec<&str> = reloaded.slugs().collect();
        assert_eq!(slugs, ["antwerp-cargowise", "rotterdam-sap"]);
    }

    #[test]
    fn loading_absent_map_yields_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let map = PageMap::load(temp.path()).expect("load");
        assert!(map.is_empty());
    }

    #[test]
    fn urlset_escapes_and_dates() {
        let urls = vec!["https://example.com/a?b=1&c=2".to_string()];
        let xml = build_urlset(&urls, "2026-08-07");
        assert!(xml.contains("&amp;"));
        assert!(!xml.contains("b=1&c"));
        assert!(xml.contains("<lastmod>2026-08-07</lastmod>"));
    }

    #[test]
    fn sitemaps_chunk_at_the_limit() {
        let temp = tempfile::tempdir().expect("tempdir");
        let urls: Vec<String> = (0..120)
            .map(|i| format!("https://example.com/page-{i}"))
            .collect();
        let summary =
            write_sitemaps(&urls, "https://example.com/", temp.path(), 50, "2026-08-07")
                .expect("write");

        assert_eq!(summary.urls, 120);
        assert_eq!(summary.files.len(), 3);
        assert!(summary.files[0].ends_with("sitemap-batch-01.xml"));

        let index = fs::read_to_string(&summary.index).expect("index");
        assert!(index.contains("https://example.com/sitemaps/sitemap-batch-03.xml"));

        let last = fs::read_to_string(&summary.files[2]).expect("last batch");
        assert_eq!(last.matches("<loc>").count(), 20);
    }

    #[test]
    fn rerun_removes_stale_batches() {
        let temp = tempfile::tempdir().expect("tempdir");
        let many: Vec<String> = (0..120)
            .map(|i| format!("https://example.com/page-{i}"))
            .collect();
        write_sitemaps(&many, "https://example.com", temp.path(), 50, "2026-08-07").unwrap();

        let few: Vec<String> = (0..10)
            .map(|i| format!("https://example.com/page-{i}"))
            .collect();
        write_sitemaps(&few, "https://example.com", temp.path(), 50, "2026-08-07").unwrap();

        let left: Vec<String> = fs::read_dir(temp.path().join("sitemaps"))
            .unwrap()
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(left, ["sitemap-batch-01.xml"]);
    }

    #[test]
    fn empty_url_set_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        match write_sitemaps(&[], "https://example.com", temp.path(), 50, "2026-08-07") {
            Err(SitemapError::NoRoutes) => {}
            other => panic!("expected no-routes error, got {other:?}"),
        }
    }
}
