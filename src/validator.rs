//! Independent post-hoc audit of a generated batch.
//!
//! Deliberately decoupled from the assembler: it re-derives word counts and
//! content hashes from the files on disk, so it can be re-run standalone
//! against any batch directory as a deploy gate, catching assembler bugs and
//! manual edits alike.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Boilerplate phrases recognized by default, carried from the marketing
/// copy the generated pages share.
pub const DEFAULT_BOILERPLATE_PHRASES: [&str; 4] = [
    "transforms messy business documents",
    "expert document processing services",
    "clean structured system-ready files",
    "flat fee of $799",
];

/// Thresholds and phrase list for one validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Minimum acceptable word count per page.
    pub min_words: usize,
    /// Maximum percentage of sentences allowed to be boilerplate.
    pub max_boilerplate_pct: f64,
    /// Phrases counted as boilerplate (matched case-insensitively).
    pub boilerplate_phrases: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_words: 1500,
            max_boilerplate_pct: 60.0,
            boilerplate_phrases: DEFAULT_BOILERPLATE_PHRASES
                .iter()
                .map(|phrase| (*phrase).to_string())
                .collect(),
        }
    }
}

/// A page below the minimum word count.
#[derive(Debug, Clone, Serialize)]
pub struct ThinPage {
    /// Page identifier (file stem).
    pub slug: String,
    /// Re-derived word count.
    pub words: usize,
}

/// Two pages with identical normalized content.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    /// First page seen with this content.
    pub first: String,
    /// Later page with the same content.
    pub second: String,
}

/// A page dominated by boilerplate phrases.
#[derive(Debug, Clone, Serialize)]
pub struct BoilerplatePage {
    /// Page identifier (file stem).
    pub slug: String,
    /// Boilerplate share of sentences, in percent.
    pub pct: f64,
}

/// Findings of one validation run.
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Number of pages examined.
    pub scanned: usize,
    /// Pages below the word-count floor.
    pub thin: Vec<ThinPage>,
    /// Exact-duplicate pairs across the whole set.
    pub duplicates: Vec<DuplicatePair>,
    /// Pages over the boilerplate ratio.
    pub boilerplate: Vec<BoilerplatePage>,
}

impl ValidationReport {
    /// True when no findings were recorded.
    pub fn is_clean(&self) -> bool {
        self.thin.is_empty() && self.duplicates.is_empty() && self.boilerplate.is_empty()
    }
}

/// Errors surfaced while validating a batch directory.
#[derive(Debug)]
pub enum ValidateError {
    /// The batch directory does not exist.
    MissingDir {
        /// The directory that was requested.
        path: PathBuf,
    },
    /// A page file could not be read.
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDir { path } => write!(f, "batch directory not found: {}", path.display()),
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ValidateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingDir { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

fn normalized_hash(content: &str) -> String {
    let mut normalized = String::with_capacity(content.len());
    let mut last_space = false;
    for ch in content.chars() {
        if ch.is_whitespace() {
            if !last_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            last_space = true;
        } else {
            normalized.push(ch.to_ascii_lowercase());
            last_space = false;
        }
    }
    let digest = Sha256::digest(normalized.trim_end().as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

fn boilerplate_pct(content: &str, phrases: &[String]) -> f64 {
    let lowered = content.to_lowercase();
    let matched = phrases
        .iter()
        .filter(|phrase| lowered.contains(&phrase.to_lowercase()))
        .count();
    let sentences = content
        .split(['.', '!', '?'])
        .filter(|sentence| sentence.trim().len() > 20)
        .count();
    if sentences == 0 {
        0.0
    } else {
        matched as f64 / sentences as f64 * 100.0
    }
}

/// Validates already-rendered pages given as `(slug, content)` pairs.
pub fn validate_pages(pages: &[(String, String)], config: &ValidatorConfig) -> ValidationReport {
    let mut report = ValidationReport {
        scanned: pages.len(),
        ..ValidationReport::default()
    };

    for (slug, content) in pages {
        let words = content.split_whitespace().count();
        if words < config.min_words {
            report.thin.push(ThinPage {
                slug: slug.clone(),
                words,
            });
        }
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    for (slug, content) in pages {
        let hash = normalized_hash(content);
        match seen.get(&hash) {
            Some(first) => report.duplicates.push(DuplicatePair {
                first: (*first).to_string(),
                second: slug.clone(),
            }),
            None => {
                seen.insert(hash, slug);
            }
        }
    }

    for (slug, content) in pages {
        let pct = boilerplate_pct(content, &config.boilerplate_phrases);
        if pct > config.max_boilerplate_pct {
            report.boilerplate.push(BoilerplatePage {
                slug: slug.clone(),
                pct,
            });
        }
    }

    report
}

/// Reads every `.md` page in `dir` and validates the full set.
pub fn validate_dir(dir: &Path, config: &ValidatorConfig) -> Result<ValidationReport, ValidateError> {
    if !dir.is_dir() {
        return Err(ValidateError::MissingDir {
            path: dir.to_path_buf(),
        });
    }
    let entries = fs::read_dir(dir).map_err(|source| ValidateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ValidateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        let content = fs::read_to_string(&path).map_err(|source| ValidateError::Io {
            path: path.clone(),
            source,
        })?;
        pages.push((slug, content));
    }
    pages.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(validate_pages(&pages, config))
}
