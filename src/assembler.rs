//! Candidate enumeration, quality gates, and batch assembly.
//!
//! The generation loop walks the location × system × pain × benefit product
//! space with a deterministic cursor, resolves every template variable
//! through the seed-driven selector, and only accepts candidates that clear
//! every quality gate. Rejections are cheap and expected; the loop simply
//! advances to the next candidate. The only fatal outcomes are empty pools
//! up front and an exhausted attempt ceiling at the end.

use crate::debug_log;
use crate::pools::{FaqEntry, PoolError, PoolSet, Testimonial};
use crate::selector::{select_distinct, select_in_range, select_item, SelectError};
use crate::similarity::{Fingerprint, SimilarityGuard, DEFAULT_SHINGLE_SIZE};
use crate::slug::{build_slug, initials, slugify, truncate_slug, SlugRegistry, MAX_SLUG_LEN};
use crate::template::{leaked_placeholders, Template, TemplateContext};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Structural sections every accepted page must carry.
pub const DEFAULT_REQUIRED_MARKERS: [&str; 8] = [
    "Hero",
    "RiskSection",
    "PainSection",
    "TechnicalGuide",
    "ROISection",
    "BenefitsGrid",
    "FAQSection",
    "TestimonialsSection",
];

/// Pass/fail thresholds applied to every candidate page.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Minimum rendered word count.
    pub min_words: usize,
    /// Minimum number of FAQ pairs.
    pub min_faqs: usize,
    /// Minimum number of testimonials.
    pub min_testimonials: usize,
    /// Section markers that must appear in the rendered page.
    pub required_markers: Vec<String>,
    /// Jaccard similarity above which a candidate is rejected as a
    /// near-duplicate. Explicit by design: 1.0 disables everything but
    /// shingle-set equality.
    pub similarity_threshold: f64,
}

impl GateConfig {
    /// Gate configuration with production thresholds and an explicit
    /// similarity threshold.
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            min_words: 1500,
            min_faqs: 4,
            min_testimonials: 3,
            required_markers: DEFAULT_REQUIRED_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
            similarity_threshold,
        }
    }
}

/// Identity and sizing of one generation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Batch number; namespaces candidate seeds and the output directory.
    pub batch: u32,
    /// Number of pages that must be accepted.
    pub target: usize,
    /// Attempt ceiling; defaults to `target * 20` when `None`.
    pub max_attempts: Option<usize>,
}

impl BatchConfig {
    /// Batch config with the default attempt ceiling.
    pub fn new(batch: u32, target: usize) -> Self {
        Self {
            batch,
            target,
            max_attempts: None,
        }
    }

    fn ceiling(&self) -> usize {
        self.max_attempts.unwrap_or(self.target.saturating_mul(20))
    }
}

/// One accepted, fully rendered page.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Unique URL-safe identifier, ≤ 72 characters.
    pub slug: String,
    /// Batch the page belongs to.
    pub batch: u32,
    /// Rendered page text.
    pub body: String,
    /// The resolved template variables the body was rendered from.
    pub variables: TemplateContext,
    /// Word count of the rendered body.
    pub word_count: usize,
    /// CRC32 checksum of the body, recorded in the page map.
    pub checksum: u32,
    /// SHA-256 of the body, used for exact-duplicate rejection.
    pub content_hash: String,
}

/// Per-gate rejection tallies for operator diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    /// Combination already accepted earlier in the batch.
    pub repeat_combination: usize,
    /// Rendered text still contained `{{...}}` placeholders.
    pub leaked_placeholders: usize,
    /// Word count below the minimum.
    pub thin_content: usize,
    /// A required structural marker was missing.
    pub missing_markers: usize,
    /// Too few FAQs or testimonials.
    pub sparse_sections: usize,
    /// Exact content-hash duplicate.
    pub exact_duplicate: usize,
    /// Shingle fingerprint too close to an accepted page.
    pub near_duplicate: usize,
}

impl RejectionCounts {
    /// Total rejected candidates.
    pub fn total(&self) -> usize {
        self.repeat_combination
            + self.leaked_placeholders
            + self.thin_content
            + self.missing_markers
            + self.sparse_sections
            + self.exact_duplicate
            + self.near_duplicate
    }
}

/// Result of one generation run.
#[derive(Debug)]
pub struct Batch {
    /// Batch number.
    pub batch: u32,
    /// Accepted pages, in acceptance order.
    pub pages: Vec<PageRecord>,
    /// Candidates examined.
    pub attempts: usize,
    /// Rejection tallies.
    pub rejections: RejectionCounts,
}

/// Errors surfaced while assembling a batch.
#[derive(Debug)]
pub enum AssembleError {
    /// A pool failed startup validation.
    Pool(PoolError),
    /// A selection failed; indicates a pool shrank below a hard minimum.
    Select(SelectError),
    /// The attempt ceiling was reached before the target count.
    Underfilled {
        /// Pages requested.
        requested: usize,
        /// Pages actually accepted.
        accepted: usize,
        /// Candidates examined before giving up.
        attempts: usize,
    },
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(err) => write!(f, "pool validation failed: {err}"),
            Self::Select(err) => write!(f, "selection failed: {err}"),
            Self::Underfilled {
                requested,
                accepted,
                attempts,
            } => write!(
                f,
                "batch underfilled: accepted {accepted}/{requested} pages after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for AssembleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pool(err) => Some(err),
            Self::Select(err) => Some(err),
            Self::Underfilled { .. } => None,
        }
    }
}

impl From<PoolError> for AssembleError {
    fn from(err: PoolError) -> Self {
        Self::Pool(err)
    }
}

impl From<SelectError> for AssembleError {
    fn from(err: SelectError) -> Self {
        Self::Select(err)
    }
}

/// Batch-scoped uniqueness state: content hashes, fingerprints, slugs, and
/// accepted combinations.
struct AcceptedPageSet {
    hashes: HashSet<String>,
    guard: SimilarityGuard,
    slugs: SlugRegistry,
    combinations: HashSet<(usize, usize, usize, usize)>,
}

impl AcceptedPageSet {
    fn new(threshold: f64) -> Self {
        Self {
            hashes: HashSet::new(),
            guard: SimilarityGuard::new(threshold),
            slugs: SlugRegistry::new(),
            combinations: HashSet::new(),
        }
    }
}

struct Candidate {
    combination: (usize, usize, usize, usize),
    slug_base: String,
    body: String,
    context: TemplateContext,
    faq_count: usize,
    testimonial_count: usize,
}

/// Formats an integer with comma-grouped thousands.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, ch) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Word count over whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn render_faq_block(faqs: &[&FaqEntry], context: &TemplateContext) -> String {
    faqs.iter()
        .map(|faq| {
            format!(
                "### {}\n\n{}",
                context.substitute(&faq.question),
                context.substitute(&faq.answer)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_testimonial_block(testimonials: &[&Testimonial], context: &TemplateContext) -> String {
    testimonials
        .iter()
        .map(|t| {
            let company = t.company.as_deref().unwrap_or("Verified client");
            format!(
                "> \"{}\"\n> - {}, {}, {}",
                context.substitute(&t.quote),
                t.author,
                t.role,
                company
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn content_hash(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

fn body_checksum(body: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(body.as_bytes());
    hasher.finalize()
}

fn marker_patterns(markers: &[String]) -> Vec<Regex> {
    markers
        .iter()
        .map(|marker| {
            Regex::new(&format!(r"\b{}\b", regex::escape(marker))).expect("marker pattern")
        })
        .collect()
}

fn build_candidate(
    pools: &PoolSet,
    template: &Template,
    gates: &GateConfig,
    batch: u32,
    attempt: usize,
) -> Result<Candidate, SelectError> {
    let location_count = pools.locations.len();
    let system_count = pools.systems.len();
    let pain_count = pools.pains.len();
    let benefit_count = pools.benefits.len();

    let index = attempt + batch as usize * 100_000;
    let location_index = index % location_count;
    let system_index = (index / location_count) % system_count;
    let pain_index = (index / (location_count * system_count)) % pain_count;
    let benefit_index = (index / (location_count * system_count * pain_count)) % benefit_count;

    let location = &pools.locations[location_index];
    let system = &pools.systems[system_index];
    let pain = &pools.pains[pain_index];
    let benefit = &pools.benefits[benefit_index];

    let seed = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        location.city, system.system_a, system.system_b, pain, benefit, batch, attempt
    );

    let hub = location
        .hub
        .clone()
        .unwrap_or_else(|| format!("{} Logistics Hub", location.city));
    let port = location
        .port
        .clone()
        .unwrap_or_else(|| format!("{} Port", location.city));
    let carrier = match &location.carrier {
        Some(carrier) => carrier.clone(),
        None => select_item(&format!("{seed}|carrier"), &pools.carriers)?.clone(),
    };

    let roi_hours = select_in_range(&format!("{seed}|hours"), 6, 28);
    let roi_dollars = select_in_range(&format!("{seed}|savings"), 25_000, 180_000);
    let roi_manual = location
        .roi_manual
        .clone()
        .unwrap_or_else(|| format!("{roi_hours} hours/week"));
    let roi_savings = location
        .roi_savings
        .clone()
        .unwrap_or_else(|| format!("${}/year", format_thousands(roi_dollars)));

    let mut context = TemplateContext {
        city: location.city.clone(),
        system_a: system.system_a.clone(),
        system_b: system.system_b.clone(),
        hub,
        port,
        carrier,
        pain_point: pain.clone(),
        benefit: benefit.clone(),
        roi_manual,
        roi_savings,
        layout: select_item(&format!("{seed}|layout"), &pools.layouts)?.clone(),
        hero_image: select_item(&format!("{seed}|image"), &pools.hero_images)?.clone(),
        robots: "noindex, nofollow".to_string(),
        ..TemplateContext::default()
    };

    // Snippets can reference scalar variables, so resolve them against the
    // partially built context before they land in the page.
    let intro = select_item(&format!("{seed}|intro"), &pools.intros)?;
    context.intro = context.substitute(intro);
    let mapping = select_item(&format!("{seed}|mapping"), &pools.mappings)?;
    context.mapping = context.substitute(mapping);

    let faq_target = 4 + select_in_range(&format!("{seed}|faq-count"), 0, 2) as usize;
    let faq_draw = faq_target.min(pools.faqs.len());
    let faqs = select_distinct(&format!("{seed}|faq"), &pools.faqs, faq_draw)?;
    context.faqs = render_faq_block(&faqs, &context);

    let testimonial_draw = gates.min_testimonials.min(pools.testimonials.len());
    let testimonials = select_distinct(
        &format!("{seed}|testimonial"),
        &pools.testimonials,
        testimonial_draw,
    )?;
    context.testimonials = render_testimonial_block(&testimonials, &context);

    let body = template.render(&context);

    let slug_base = build_slug(
        &[
            &truncate_slug(&slugify(&location.city), 15),
            &truncate_slug(&slugify(&system.system_a), 10),
            &truncate_slug(&slugify(&system.system_b), 10),
            &initials(pain, 4),
            &initials(benefit, 4),
        ],
        MAX_SLUG_LEN,
        "page",
    );

    let faq_count = faqs.len();
    let testimonial_count = testimonials.len();
    Ok(Candidate {
        combination: (location_index, system_index, pain_index, benefit_index),
        slug_base,
        body,
        context,
        faq_count,
        testimonial_count,
    })
}

/// Generates one batch of pages, or fails when the pools cannot support the
/// requested count within the attempt ceiling.
///
/// Same pools, template, gates, and batch config always produce the same
/// pages with the same slugs: every selection is a pure function of the
/// candidate seed.
pub fn generate_batch(
    pools: &PoolSet,
    template: &Template,
    gates: &GateConfig,
    config: &BatchConfig,
) -> Result<Batch, AssembleError> {
    pools.ensure_non_empty()?;

    let markers = marker_patterns(&gates.required_markers);
    let mut accepted = AcceptedPageSet::new(gates.similarity_threshold);
    let mut pages = Vec::with_capacity(config.target);
    let mut rejections = RejectionCounts::default();
    let ceiling = config.ceiling();
    let mut attempts = 0usize;

    while pages.len() < config.target && attempts < ceiling {
        let attempt = attempts;
        attempts += 1;

        let candidate = build_candidate(pools, template, gates, config.batch, attempt)?;

        if accepted.combinations.contains(&candidate.combination) {
            rejections.repeat_combination += 1;
            continue;
        }

        let leaked = leaked_placeholders(&candidate.body);
        if !leaked.is_empty() {
            debug_log!("attempt {attempt}: leaked placeholders {leaked:?}");
            rejections.leaked_placeholders += 1;
            continue;
        }

        let words = word_count(&candidate.body);
        if words < gates.min_words {
            debug_log!("attempt {attempt}: {words} words below minimum");
            rejections.thin_content += 1;
            continue;
        }

        if markers.iter().any(|marker| !marker.is_match(&candidate.body)) {
            rejections.missing_markers += 1;
            continue;
        }

        if candidate.faq_count < gates.min_faqs
            || candidate.testimonial_count < gates.min_testimonials
        {
            rejections.sparse_sections += 1;
            continue;
        }

        let hash = content_hash(&candidate.body);
        if accepted.hashes.contains(&hash) {
            rejections.exact_duplicate += 1;
            continue;
        }

        let fingerprint = Fingerprint::of_text(&candidate.body, DEFAULT_SHINGLE_SIZE);
        if accepted.guard.is_too_similar(&fingerprint) {
            debug_log!("attempt {attempt}: near-duplicate fingerprint");
            rejections.near_duplicate += 1;
            continue;
        }

        let collision_seed = format!("{}|{}", candidate.slug_base, attempt);
        let slug = accepted.slugs.claim(&candidate.slug_base, &collision_seed);

        accepted.hashes.insert(hash.clone());
        accepted.guard.admit(fingerprint);
        accepted.combinations.insert(candidate.combination);

        debug_log!("attempt {attempt}: accepted '{slug}'");
        pages.push(PageRecord {
            slug,
            batch: config.batch,
            word_count: words,
            checksum: body_checksum(&candidate.body),
            content_hash: hash,
            variables: candidate.context,
            body: candidate.body,
        });
    }

    if pages.len() < config.target {
        return Err(AssembleError::Underfilled {
            requested: config.target,
            accepted: pages.len(),
            attempts,
        });
    }

    Ok(Batch {
        batch: config.batch,
        pages,
        attempts,
        rejections,
    })
}

/// Writes one file per page under `out_dir/batch{N}/`, returning the batch
/// directory. Files are keyed by slug, so regenerating a batch overwrites
/// page by page.
pub fn write_batch(batch: &Batch, out_dir: &Path) -> io::Result<PathBuf> {
    let batch_dir = out_dir.join(format!("batch{}", batch.batch));
    fs::create_dir_all(&batch_dir)?;
    for page in &batch.pages {
        fs::write(batch_dir.join(format!("{}.md", page.slug)), &page.body)?;
    }
    Ok(batch_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::{FaqEntry, Location, SystemPair};

    fn pool_location(city: &str) -> Location {
        Location {
            city: city.into(),
            hub: None,
            port: None,
            carrier: None,
            roi_manual: None,
            roi_savings: None,
        }
    }

    fn test_pools() -> PoolSet {
        PoolSet {
            locations: vec![pool_location("Antwerp"), pool_location("Rotterdam")],
            systems: vec![
                SystemPair {
                    system_a: "CargoWise".into(),
                    system_b: "NetSuite".into(),
                },
                SystemPair {
                    system_a: "Magaya".into(),
                    system_b: "SAP".into(),
                },
            ],
            pains: vec![
                "manual data entry causes costly delays".into(),
                "duplicate shipment records break reconciliation".into(),
            ],
            benefits: vec![
                "automated extraction".into(),
                "clean audit-ready files".into(),
            ],
            intros: vec![
                "Freight teams in {{CITY}} export from {{SYSTEM_A}} daily and re-key \
                 everything into {{SYSTEM_B}} by hand, losing hours to avoidable \
                 cleanup on every single shipment file they touch."
                    .into(),
            ],
            mappings: vec![
                "Every {{SYSTEM_A}} reference code is normalized, validated against \
                 {{SYSTEM_B}} master data, and delivered import-ready with a field \
                 mapping reference included for your records."
                    .into(),
            ],
            faqs: (0..6)
                .map(|i| FaqEntry {
                    question: format!("Question {i} about {{{{SYSTEM_A}}}} exports?"),
                    answer: format!(
                        "Answer {i}: we normalize {{{{SYSTEM_A}}}} documents so they \
                         import into {{{{SYSTEM_B}}}} without manual rework, with \
                         validation reports on every single delivered batch file."
                    ),
                })
                .collect(),
            testimonials: (0..4)
                .map(|i| Testimonial {
                    quote: format!(
                        "Testimonial {i}: our {{{{SYSTEM_A}}}} to {{{{SYSTEM_B}}}} flow \
                         finally runs clean month after month with zero rework."
                    ),
                    author: format!("Author {i}"),
                    role: "Operations Lead".into(),
                    company: Some(format!("Company {i}")),
                })
                .collect(),
            carriers: vec!["Maersk".into(), "MSC".into()],
            hero_images: vec!["https://example.com/hero-a.jpg".into()],
            layouts: vec!["standard".into(), "roi-first".into()],
        }
    }

    fn test_template() -> Template {
        let text = "\
layout: {{LAYOUT}}\nrobots: {{ROBOTS}}\nimage: {{HERO_IMAGE}}\n\n\
<!-- Hero -->\n# {{SYSTEM_A}} to {{SYSTEM_B}} in {{CITY}}\n\n{{INTRO}}\n\n\
<!-- RiskSection -->\nShipments through {{PORT}} and {{HUB}} carried by \
{{CARRIER_1}} stall when exports fail validation.\n\n\
<!-- PainSection -->\nThe problem: {{PAIN_POINT}}.\n\n\
<!-- TechnicalGuide -->\n{{MAPPING}}\n\n\
<!-- ROISection -->\nManual effort today: {{ROI_MANUAL}}. Projected savings: \
{{ROI_SAVINGS}}.\n\n\
<!-- BenefitsGrid -->\nWhat you get: {{BENEFIT}}.\n\n\
<!-- FAQSection -->\n{{FAQS}}\n\n\
<!-- TestimonialsSection -->\n{{TESTIMONIALS}}\n";
        Template::parse(text).expect("test template parses")
    }

    fn relaxed_gates() -> GateConfig {
        let mut gates = GateConfig::new(1.0);
        gates.min_words = 60;
        gates
    }

    #[test]
    fn batches_are_reproducible() {
        let pools = test_pools();
        let template = test_template();
        let gates = relaxed_gates();
        let config = BatchConfig::new(1, 8);

        let first = generate_batch(&pools, &template, &gates, &config).expect("first run");
        let second = generate_batch(&pools, &template, &gates, &config).expect("second run");

        assert_eq!(first.pages.len(), second.pages.len());
        for (a, b) in first.pages.iter().zip(&second.pages) {
            assert_eq!(a.slug, b.slug);
            assert_eq!(a.body, b.body);
            assert_eq!(a.content_hash, b.content_hash);
        }
    }

    #[test]
    fn accepted_pages_clear_every_gate() {
        let pools = test_pools();
        let template = test_template();
        let gates = relaxed_gates();
        let batch =
            generate_batch(&pools, &template, &gates, &BatchConfig::new(1, 10)).expect("batch");

        assert_eq!(batch.pages.len(), 10);
        let mut slugs = HashSet::new();
        let mut hashes = HashSet::new();
        for page in &batch.pages {
            assert!(leaked_placeholders(&page.body).is_empty(), "{}", page.slug);
            assert!(page.word_count >= gates.min_words);
            assert!(page.slug.len() <= MAX_SLUG_LEN);
            assert!(slugs.insert(page.slug.clone()), "slug reused: {}", page.slug);
            assert!(hashes.insert(page.content_hash.clone()), "hash reused");
            for marker in &gates.required_markers {
                assert!(page.body.contains(marker), "missing {marker} in {}", page.slug);
            }
        }
    }

    #[test]
    fn target_beyond_combination_space_underfills() {
        let pools = test_pools();
        let template = test_template();
        let gates = relaxed_gates();
        let combinations = pools.combination_count();
        assert_eq!(combinations, 16);

        match generate_batch(&pools, &template, &gates, &BatchConfig::new(1, 40)) {
            Err(AssembleError::Underfilled {
                requested,
                accepted,
                attempts,
            }) => {
                assert_eq!(requested, 40);
                assert!(accepted <= combinations);
                assert_eq!(attempts, 40 * 20);
            }
            other => panic!("expected underfill, got {other:?}"),
        }
    }

    #[test]
    fn empty_pool_fails_before_the_loop() {
        let mut pools = test_pools();
        pools.intros.clear();
        let template = test_template();
        let gates = relaxed_gates();
        match generate_batch(&pools, &template, &gates, &BatchConfig::new(1, 1)) {
            Err(AssembleError::Pool(PoolError::Empty { pool })) => assert_eq!(pool, "intros"),
            other => panic!("expected pool error, got {other:?}"),
        }
    }

    #[test]
    fn strict_threshold_rejects_near_duplicates() {
        // Pin every seeded selection to a single outcome (one location with
        // all overrides set, one system, one benefit, uniform FAQ and
        // testimonial text, one layout and image) so the two candidate
        // bodies differ in exactly one pain-point token. That pair sits far
        // above a 0.8 Jaccard threshold, so the guard must reject the
        // second page and the batch must underfill.
        let mut pools = test_pools();
        pools.locations = vec![Location {
            city: "Antwerp".into(),
            hub: Some("Antwerp Gateway".into()),
            port: Some("Port of Antwerp".into()),
            carrier: Some("MSC".into()),
            roi_manual: Some("14 hours/week".into()),
            roi_savings: Some("$86,000/year".into()),
        }];
        pools.systems.truncate(1);
        pools.benefits.truncate(1);
        pools.layouts = vec!["standard".into()];
        pools.pains = vec![
            "manual data entry causes costly delays".into(),
            "manual data entry causes costly mistakes".into(),
        ];
        pools.faqs = (0..4)
            .map(|_| FaqEntry {
                question: "How fast is a normalized batch delivered?".into(),
                answer: "Standard turnaround is two business days for batches up \
                         to ten thousand records, with expedited handling \
                         available for urgent operations."
                    .into(),
            })
            .collect();
        pools.testimonials = (0..3)
            .map(|_| Testimonial {
                quote: "The first delivered batch imported without a single \
                        validation error and month-end close went smoothly."
                    .into(),
                author: "Jordan Miles".into(),
                role: "Operations Lead".into(),
                company: Some("North River Logistics".into()),
            })
            .collect();

        let template = test_template();
        let mut gates = relaxed_gates();
        gates.similarity_threshold = 0.8;

        match generate_batch(&pools, &template, &gates, &BatchConfig::new(1, 2)) {
            Err(AssembleError::Underfilled { accepted, .. }) => {
                assert_eq!(accepted, 1);
            }
            Ok(batch) => panic!(
                "strict threshold should reject the sibling page, accepted {}",
                batch.pages.len()
            ),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn thousands_formatting_groups_digits() {
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(25_000), "25,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn write_batch_emits_one_file_per_slug() {
        let pools = test_pools();
        let template = test_template();
        let gates = relaxed_gates();
        let batch =
            generate_batch(&pools, &template, &gates, &BatchConfig::new(3, 4)).expect("batch");

        let temp = tempfile::tempdir().expect("tempdir");
        let dir = write_batch(&batch, temp.path()).expect("write");
        assert!(dir.ends_with("batch3"));
        for page in &batch.pages {
            let path = dir.join(format!("{}.md", page.slug));
            let written = fs::read_to_string(&path).expect("page file");
            assert_eq!(written, page.body);
        }
    }
}
