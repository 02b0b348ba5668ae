//! Placeholder-checked page template rendering.
//!
//! Placeholders use the `{{KEY}}` syntax. A template is validated against the
//! known key set when parsed, so a typo'd or unsupported placeholder is a
//! startup error instead of a leaked `{{...}}` in published pages.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Placeholder pattern: upper-snake key wrapped in double braces.
pub fn placeholder_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([A-Z][A-Z0-9_]*)\}\}").expect("placeholder pattern"))
}

/// Every placeholder key a template may use, in render order.
pub const TEMPLATE_KEYS: [&str; 17] = [
    "CITY",
    "SYSTEM_A",
    "SYSTEM_B",
    "HUB",
    "PORT",
    "CARRIER_1",
    "PAIN_POINT",
    "BENEFIT",
    "ROI_MANUAL",
    "ROI_SAVINGS",
    "INTRO",
    "MAPPING",
    "LAYOUT",
    "HERO_IMAGE",
    "FAQS",
    "TESTIMONIALS",
    "ROBOTS",
];

/// Errors surfaced while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template names a placeholder with no corresponding context field.
    UnknownPlaceholder {
        /// The unrecognized key.
        key: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlaceholder { key } => {
                write!(f, "template uses unknown placeholder {{{{{key}}}}}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Fully resolved values for one candidate page.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// City name.
    pub city: String,
    /// Source system name.
    pub system_a: String,
    /// Destination system name.
    pub system_b: String,
    /// Logistics hub label.
    pub hub: String,
    /// Port label.
    pub port: String,
    /// Carrier name.
    pub carrier: String,
    /// Pain point phrasing.
    pub pain_point: String,
    /// Benefit phrasing.
    pub benefit: String,
    /// Manual-effort ROI figure, e.g. "14 hours/week".
    pub roi_manual: String,
    /// Annual-savings ROI figure, e.g. "$86,000/year".
    pub roi_savings: String,
    /// Intro paragraph, already variable-substituted.
    pub intro: String,
    /// Mapping narrative, already variable-substituted.
    pub mapping: String,
    /// Layout variant name.
    pub layout: String,
    /// Hero image URL.
    pub hero_image: String,
    /// Rendered FAQ block.
    pub faqs: String,
    /// Rendered testimonials block.
    pub testimonials: String,
    /// Robots directive, e.g. "noindex, nofollow".
    pub robots: String,
}

impl TemplateContext {
    /// Value for a placeholder key, or `None` for an unknown key.
    pub fn value(&self, key: &str) -> Option<&str> {
        let value = match key {
            "CITY" => &self.city,
            "SYSTEM_A" => &self.system_a,
            "SYSTEM_B" => &self.system_b,
            "HUB" => &self.hub,
            "PORT" => &self.port,
            "CARRIER_1" => &self.carrier,
            "PAIN_POINT" => &self.pain_point,
            "BENEFIT" => &self.benefit,
            "ROI_MANUAL" => &self.roi_manual,
            "ROI_SAVINGS" => &self.roi_savings,
            "INTRO" => &self.intro,
            "MAPPING" => &self.mapping,
            "LAYOUT" => &self.layout,
            "HERO_IMAGE" => &self.hero_image,
            "FAQS" => &self.faqs,
            "TESTIMONIALS" => &self.testimonials,
            "ROBOTS" => &self.robots,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Substitutes every known placeholder occurrence in `text`.
    ///
    /// Snippet pools (intros, mappings, FAQ text, quotes) run through this
    /// before being inserted into the page template, so nested placeholders
    /// resolve with the same context.
    pub fn substitute(&self, text: &str) -> String {
        placeholder_pattern()
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.value(&caps[1])
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// A parsed template whose placeholders are all known keys.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    placeholders: Vec<String>,
}

impl Template {
    /// Parses template text, rejecting any placeholder without a context
    /// field.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut placeholders = Vec::new();
        for caps in placeholder_pattern().captures_iter(text) {
            let key = caps[1].to_string();
            if !TEMPLATE_KEYS.contains(&key.as_str()) {
                return Err(TemplateError::UnknownPlaceholder { key });
            }
            if !placeholders.contains(&key) {
                placeholders.push(key);
            }
        }
        Ok(Self {
            text: text.to_string(),
            placeholders,
        })
    }

    /// Distinct placeholder keys the template uses.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the template against a context. Parsing guaranteed every
    /// placeholder resolves, so the output carries no `{{...}}` residue.
    pub fn render(&self, context: &TemplateContext) -> String {
        context.substitute(&self.text)
    }
}

/// Residual `{{KEY}}` occurrences in rendered text, in document order.
pub fn leaked_placeholders(text: &str) -> Vec<String> {
    placeholder_pattern()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
