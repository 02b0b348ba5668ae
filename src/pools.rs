//! Content pool schemas, JSON loading, and startup validation.
//!
//! Pools are loaded once per batch run into an explicit [`PoolSet`] that is
//! passed by reference through the assembler and selector. The loaders are
//! tolerant of the loose JSON shapes seen in real pool files (bare strings,
//! mixed key spellings) and normalize everything up front, so the assembly
//! loop only ever sees clean records.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Carriers used when a location record does not name one.
pub const DEFAULT_CARRIERS: [&str; 7] = [
    "Maersk",
    "MSC",
    "CMA CGM",
    "Hapag-Lloyd",
    "ONE",
    "Evergreen",
    "COSCO",
];

/// Hero image pool used when `hero-images.json` is absent.
pub const DEFAULT_HERO_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1554224154-26032ffc0d07?auto=format&fit=crop&q=80&w=1200",
    "https://images.unsplash.com/photo-1494412651409-8963ce7935a7?auto=format&fit=crop&q=80&w=1200",
    "https://images.unsplash.com/photo-1586528116311-ad8dd3c8310d?auto=format&fit=crop&q=80&w=1200",
    "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?auto=format&fit=crop&q=80&w=1200",
    "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?auto=format&fit=crop&q=80&w=1200",
    "https://images.unsplash.com/photo-1566576721346-d4a3b4eaeb55?auto=format&fit=crop&q=80&w=1200",
];

/// Layout variant pool used when `layouts.json` is absent.
pub const DEFAULT_LAYOUTS: [&str; 3] = ["standard", "technical-first", "roi-first"];

/// One geographic record: a city plus optional logistics metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    /// City name, the anchor for every location-derived template variable.
    #[serde(alias = "name", alias = "location")]
    pub city: String,
    /// Logistics hub label; defaults to "{city} Logistics Hub" downstream.
    #[serde(default, alias = "hub_name", alias = "hubName", alias = "logisticsHub")]
    pub hub: Option<String>,
    /// Port label; defaults to "{city} Port" downstream.
    #[serde(default, alias = "port_name", alias = "portName")]
    pub port: Option<String>,
    /// Dominant carrier; falls back to the carrier pool downstream.
    #[serde(default, alias = "carrier_1", alias = "carrier1", alias = "majorCarrier")]
    pub carrier: Option<String>,
    /// Manual-effort override for the ROI section.
    #[serde(
        default,
        alias = "roi_manual",
        alias = "manualEffort",
        alias = "manual_hours"
    )]
    pub roi_manual: Option<String>,
    /// Annual-savings override for the ROI section.
    #[serde(default, alias = "roi_savings", alias = "annualSavings")]
    pub roi_savings: Option<String>,
}

impl Location {
    fn from_name(city: String) -> Self {
        Self {
            city,
            hub: None,
            port: None,
            carrier: None,
            roi_manual: None,
            roi_savings: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocationEntry {
    Name(String),
    Record(Location),
}

/// A source/destination software pairing.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemPair {
    /// Source system name.
    #[serde(alias = "source", alias = "systemA")]
    pub system_a: String,
    /// Destination system name.
    #[serde(alias = "target", alias = "destination", alias = "systemB")]
    pub system_b: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SystemEntry {
    Text(String),
    Record(SystemPair),
}

fn pair_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\s*(?:->|\bto\b|/|&|\bvs\b|:|\|)\s*").expect("pair separator pattern")
    })
}

impl SystemEntry {
    fn normalize(self) -> SystemPair {
        match self {
            Self::Record(pair) => pair,
            Self::Text(text) => {
                let parts: Vec<String> = pair_separator()
                    .split(&text)
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect();
                match parts.as_slice() {
                    [a, b, ..] => SystemPair {
                        system_a: a.clone(),
                        system_b: b.clone(),
                    },
                    _ => SystemPair {
                        system_a: text.clone(),
                        system_b: text,
                    },
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringEntry {
    Text(String),
    Record {
        #[serde(alias = "name", alias = "label")]
        value: String,
    },
}

impl StringEntry {
    fn normalize(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Record { value } => value,
        }
    }
}

/// One question/answer pair for the FAQ section.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    /// Question text; may contain template placeholders.
    pub question: String,
    /// Answer text; may contain template placeholders.
    pub answer: String,
}

/// One customer quote for the testimonials section.
#[derive(Debug, Clone, Deserialize)]
pub struct Testimonial {
    /// Quote body; may contain template placeholders.
    pub quote: String,
    /// Person credited with the quote.
    pub author: String,
    /// Their role.
    pub role: String,
    /// Their company, when disclosed.
    #[serde(default)]
    pub company: Option<String>,
}

/// Every pool one batch run draws from, loaded once and then immutable.
#[derive(Debug, Clone)]
pub struct PoolSet {
    /// Location records.
    pub locations: Vec<Location>,
    /// Software system pairs.
    pub systems: Vec<SystemPair>,
    /// Pain point phrasings.
    pub pains: Vec<String>,
    /// Benefit phrasings.
    pub benefits: Vec<String>,
    /// Intro paragraph variations.
    pub intros: Vec<String>,
    /// Field-mapping narrative variations.
    pub mappings: Vec<String>,
    /// FAQ pairs.
    pub faqs: Vec<FaqEntry>,
    /// Testimonial records.
    pub testimonials: Vec<Testimonial>,
    /// Carrier names.
    pub carriers: Vec<String>,
    /// Hero image URLs.
    pub hero_images: Vec<String>,
    /// Layout variant names.
    pub layouts: Vec<String>,
}

/// Errors surfaced while loading or validating pools.
#[derive(Debug)]
pub enum PoolError {
    /// A pool file could not be read.
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A pool file held malformed JSON or an unexpected shape.
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// A required pool ended up empty after normalization.
    Empty {
        /// Pool name as loaded from disk.
        pool: &'static str,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read pool {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid pool file {}: {source}", path.display())
            }
            Self::Empty { pool } => write!(f, "pool '{pool}' is empty"),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Empty { .. } => None,
        }
    }
}

fn read_pool<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, PoolError> {
    let raw = fs::read_to_string(path).map_err(|source| PoolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PoolError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_pool(path: &Path, defaults: &[&str]) -> Result<Vec<String>, PoolError> {
    if !path.exists() {
        return Ok(defaults.iter().map(|item| (*item).to_string()).collect());
    }
    let entries: Vec<StringEntry> = read_pool(path)?;
    Ok(entries.into_iter().map(StringEntry::normalize).collect())
}

impl PoolSet {
    /// Loads every pool from `dir`.
    ///
    /// `locations.json`, `systems.json`, `pain-points.json`, `benefits.json`,
    /// `intros.json`, `mappings.json`, `faqs.json`, and `testimonials.json`
    /// are required; `carriers.json`, `hero-images.json`, and `layouts.json`
    /// fall back to built-in pools when absent. Empty pools are rejected.
    pub fn load(dir: &Path) -> Result<Self, PoolError> {
        let locations: Vec<LocationEntry> = read_pool(&dir.join("locations.json"))?;
        let systems: Vec<SystemEntry> = read_pool(&dir.join("systems.json"))?;
        let pains: Vec<StringEntry> = read_pool(&dir.join("pain-points.json"))?;
        let benefits: Vec<StringEntry> = read_pool(&dir.join("benefits.json"))?;
        let intros: Vec<StringEntry> = read_pool(&dir.join("intros.json"))?;
        let mappings: Vec<StringEntry> = read_pool(&dir.join("mappings.json"))?;
        let faqs: Vec<FaqEntry> = read_pool(&dir.join("faqs.json"))?;
        let testimonials: Vec<Testimonial> = read_pool(&dir.join("testimonials.json"))?;

        let pools = Self {
            locations: locations
                .into_iter()
                .map(|entry| match entry {
                    LocationEntry::Name(city) => Location::from_name(city),
                    LocationEntry::Record(record) => record,
                })
                .collect(),
            systems: systems.into_iter().map(SystemEntry::normalize).collect(),
            pains: pains.into_iter().map(StringEntry::normalize).collect(),
            benefits: benefits.into_iter().map(StringEntry::normalize).collect(),
            intros: intros.into_iter().map(StringEntry::normalize).collect(),
            mappings: mappings.into_iter().map(StringEntry::normalize).collect(),
            faqs,
            testimonials,
            carriers: read_optional_pool(&dir.join("carriers.json"), &DEFAULT_CARRIERS)?,
            hero_images: read_optional_pool(&dir.join("hero-images.json"), &DEFAULT_HERO_IMAGES)?,
            layouts: read_optional_pool(&dir.join("layouts.json"), &DEFAULT_LAYOUTS)?,
        };
        pools.ensure_non_empty()?;
        Ok(pools)
    }

    /// Fails fast when any pool is empty; assembling from an empty pool can
    /// only produce broken pages.
    pub fn ensure_non_empty(&self) -> Result<(), PoolError> {
        let checks: [(&'static str, bool); 11] = [
            ("locations", self.locations.is_empty()),
            ("systems", self.systems.is_empty()),
            ("pain-points", self.pains.is_empty()),
            ("benefits", self.benefits.is_empty()),
            ("intros", self.intros.is_empty()),
            ("mappings", self.mappings.is_empty()),
            ("faqs", self.faqs.is_empty()),
            ("testimonials", self.testimonials.is_empty()),
            ("carriers", self.carriers.is_empty()),
            ("hero-images", self.hero_images.is_empty()),
            ("layouts", self.layouts.is_empty()),
        ];
        for (pool, empty) in checks {
            if empty {
                return Err(PoolError::Empty { pool });
            }
        }
        Ok(())
    }

    /// Size of the location × system × pain × benefit product space: the
    /// number of distinct candidate combinations one batch can draw from.
    pub fn combination_count(&self) -> usize {
        self.locations.len() * self.systems.len() * self.pains.len() * self.benefits.len()
    }
}
