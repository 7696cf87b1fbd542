//! The draft aggregate.
//!
//! A [`Draft`] owns everything about one secret prompt template. Fields are
//! read through accessors; mutation goes through the editor so that caps,
//! field limits and `updated_at` stay consistent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::category::Category;
use super::image::ImageSet;
use super::ordered::OrderedList;
use super::slug::{follow_rename, slugify};

/// Highest persisted record layout this build understands
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    1
}

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Draft => write!(f, "draft"),
            Status::Published => write!(f, "published"),
            Status::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Status::Draft),
            "published" | "live" => Ok(Status::Published),
            "archived" => Ok(Status::Archived),
            _ => anyhow::bail!("Unknown status: {}", s),
        }
    }
}

/// Per-generation prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(with = "rust_decimal::serde::float")]
    pub base: Decimal,

    /// Price when the end user uploads their own image
    #[serde(with = "rust_decimal::serde::float")]
    pub with_upload: Decimal,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            base: Decimal::new(50, 2),
            with_upload: Decimal::new(75, 2),
        }
    }
}

impl Pricing {
    pub fn is_valid(&self) -> bool {
        self.base > Decimal::ZERO && self.with_upload > Decimal::ZERO
    }
}

/// Behaviour switches. `allow_randomizer` and `allow_text_description` are
/// consumed by the generation side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub allow_randomizer: bool,
    pub allow_text_description: bool,
    pub status: Status,
    pub show_on_browse_page: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_randomizer: true,
            allow_text_description: true,
            status: Status::Draft,
            show_on_browse_page: true,
        }
    }
}

/// How a meta description length reads to search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaLength {
    Good,
    Optimal,
    TooLong,
}

/// Social links and SEO text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marketing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linktree_url: Option<String>,

    #[serde(default)]
    pub meta_description: String,
}

impl Marketing {
    pub fn meta_length(&self) -> MetaLength {
        match self.meta_description.chars().count() {
            n if n < 120 => MetaLength::Good,
            n if n <= 160 => MetaLength::Optimal,
            _ => MetaLength::TooLong,
        }
    }
}

/// Usage counters, written only by usage reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    views: u64,

    #[serde(default)]
    generations: u64,

    #[serde(default, with = "rust_decimal::serde::float")]
    revenue: Decimal,

    #[serde(default)]
    conversion_rate: f64,
}

impl Analytics {
    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn revenue(&self) -> Decimal {
        self.revenue
    }

    /// Generations per hundred views
    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    fn absorb(&mut self, report: &UsageReport) {
        self.views = self.views.saturating_add(report.views);
        self.generations = self.generations.saturating_add(report.generations);
        self.revenue = self
            .revenue
            .checked_add(report.revenue)
            .unwrap_or(if report.revenue.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            });
        self.conversion_rate = if self.views == 0 {
            0.0
        } else {
            self.generations as f64 * 100.0 / self.views as f64
        };
    }
}

/// Usage deltas delivered by the reporting side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageReport {
    pub views: u64,
    pub generations: u64,
    pub revenue: Decimal,
}

/// A persisted record could not be turned into a [`Draft`]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Unsupported schema version {found} (max {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// One secret prompt template under construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(default = "default_schema_version")]
    schema_version: u32,

    id: Uuid,

    /// Internal name
    #[serde(default)]
    name: String,

    #[serde(default)]
    display_title: String,

    #[serde(default)]
    url_slug: String,

    #[serde(default)]
    tagline: String,

    /// Hidden template body
    #[serde(default, rename = "baseSystemPrompt", alias = "baseInstructionText")]
    base_instruction: String,

    #[serde(default)]
    categories: OrderedList<Category>,

    #[serde(default)]
    example_images: ImageSet,

    #[serde(default)]
    pricing: Pricing,

    #[serde(default)]
    settings: Settings,

    #[serde(default)]
    marketing: Marketing,

    #[serde(default)]
    analytics: Analytics,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// Create an empty draft
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            schema_version: SCHEMA_VERSION,
            id: Uuid::new_v4(),
            name: String::new(),
            display_title: String::new(),
            url_slug: String::new(),
            tagline: String::new(),
            base_instruction: String::new(),
            categories: OrderedList::new(),
            example_images: ImageSet::new(),
            pricing: Pricing::default(),
            settings: Settings::default(),
            marketing: Marketing::default(),
            analytics: Analytics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Decode a persisted record.
    ///
    /// Collections are renormalized on the way in; records that break an
    /// aggregate invariant are rejected.
    pub fn decode(value: serde_json::Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

        if let Some(version) = object.get("schemaVersion") {
            let found = version
                .as_u64()
                .ok_or_else(|| DecodeError::Invalid("schemaVersion is not a number".into()))?;
            if found > u64::from(SCHEMA_VERSION) {
                return Err(DecodeError::UnsupportedVersion {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
        }

        let mut draft: Draft = serde_json::from_value(value)?;

        if !draft.pricing.is_valid() {
            return Err(DecodeError::Invalid("prices must be positive".into()));
        }
        if draft.settings.status == Status::Published && draft.url_slug.is_empty() {
            return Err(DecodeError::Invalid("published draft has no URL slug".into()));
        }
        if draft.updated_at < draft.created_at {
            draft.updated_at = draft.created_at;
        }
        draft.schema_version = SCHEMA_VERSION;

        Ok(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    pub fn url_slug(&self) -> &str {
        &self.url_slug
    }

    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    pub fn base_instruction(&self) -> &str {
        &self.base_instruction
    }

    pub fn categories(&self) -> &OrderedList<Category> {
        &self.categories
    }

    pub fn example_images(&self) -> &ImageSet {
        &self.example_images
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> Status {
        self.settings.status
    }

    pub fn marketing(&self) -> &Marketing {
        &self.marketing
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Slug a rename to `name` would produce, if the slug is still following
    pub fn slug_after_rename(&self, name: &str) -> Option<String> {
        follow_rename(&self.url_slug, &self.name, name)
    }

    /// Fold usage deltas into the analytics counters. Does not count as an
    /// edit, so `updated_at` is left alone.
    pub fn absorb_usage(&mut self, report: &UsageReport) {
        self.analytics.absorb(report);
    }

    // ------------------------------------------------------------------
    // Crate-internal mutation, driven by the editor
    // ------------------------------------------------------------------

    pub(crate) fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }

    pub(crate) fn rename(&mut self, name: String) {
        if name == self.name {
            return;
        }
        if let Some(slug) = self.slug_after_rename(&name) {
            self.url_slug = slug;
        }
        self.name = name;
        self.touch();
    }

    pub(crate) fn set_display_title(&mut self, title: String) {
        if assign(&mut self.display_title, title) {
            self.touch();
        }
    }

    pub(crate) fn set_url_slug(&mut self, raw: &str) {
        if assign(&mut self.url_slug, slugify(raw)) {
            self.touch();
        }
    }

    pub(crate) fn set_tagline(&mut self, tagline: String) {
        if assign(&mut self.tagline, tagline) {
            self.touch();
        }
    }

    pub(crate) fn set_base_instruction(&mut self, text: String) {
        if assign(&mut self.base_instruction, text) {
            self.touch();
        }
    }

    pub(crate) fn set_pricing(&mut self, pricing: Pricing) {
        if assign(&mut self.pricing, pricing) {
            self.touch();
        }
    }

    /// Apply `f` to the settings; returns whether anything changed
    pub(crate) fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) -> bool {
        let mut settings = self.settings.clone();
        f(&mut settings);
        let changed = assign(&mut self.settings, settings);
        if changed {
            self.touch();
        }
        changed
    }

    /// Apply `f` to the marketing fields; returns whether anything changed
    pub(crate) fn update_marketing(&mut self, f: impl FnOnce(&mut Marketing)) -> bool {
        let mut marketing = self.marketing.clone();
        f(&mut marketing);
        let changed = assign(&mut self.marketing, marketing);
        if changed {
            self.touch();
        }
        changed
    }

    pub(crate) fn categories_mut(&mut self) -> &mut OrderedList<Category> {
        &mut self.categories
    }

    pub(crate) fn images_mut(&mut self) -> &mut ImageSet {
        &mut self.example_images
    }
}

/// Store `value` in `slot` if it differs; returns whether it did
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_draft_defaults() {
        let draft = Draft::new();
        assert_eq!(draft.status(), Status::Draft);
        assert!(draft.categories().is_empty());
        assert!(draft.example_images().is_empty());
        assert_eq!(draft.pricing().base, Decimal::new(50, 2));
        assert!(draft.settings().allow_randomizer);
        assert!(draft.updated_at() >= draft.created_at());
    }

    #[test]
    fn test_rename_follows_until_diverged() {
        let mut draft = Draft::new();
        draft.rename("Cuddly Monster".to_string());
        assert_eq!(draft.url_slug(), "cuddly-monster");

        draft.rename("Big Monster".to_string());
        assert_eq!(draft.url_slug(), "big-monster");

        draft.set_url_slug("custom");
        draft.rename("Other Monster".to_string());
        assert_eq!(draft.url_slug(), "custom");
    }

    #[test]
    fn test_unchanged_values_do_not_touch() {
        let mut draft = Draft::new();
        draft.rename("Same".to_string());
        draft.set_display_title("Title".to_string());
        let before = draft.updated_at();

        draft.rename("Same".to_string());
        draft.set_display_title("Title".to_string());
        draft.set_url_slug("same");
        draft.set_pricing(Pricing::default());
        assert!(!draft.update_settings(|s| s.allow_randomizer = true));
        assert!(!draft.update_marketing(|m| m.meta_description = String::new()));
        assert_eq!(draft.updated_at(), before);

        assert!(draft.update_settings(|s| s.allow_randomizer = false));
        assert!(draft.updated_at() >= before);
        assert!(!draft.settings().allow_randomizer);
    }

    #[test]
    fn test_manual_slug_is_slugified() {
        let mut draft = Draft::new();
        draft.set_url_slug("My Custom Slug!");
        assert_eq!(draft.url_slug(), "my-custom-slug");
    }

    #[test]
    fn test_absorb_usage() {
        let mut draft = Draft::new();
        let before = draft.updated_at();
        draft.absorb_usage(&UsageReport {
            views: 200,
            generations: 10,
            revenue: Decimal::new(500, 2),
        });
        assert_eq!(draft.analytics().views(), 200);
        assert_eq!(draft.analytics().conversion_rate(), 5.0);
        assert_eq!(draft.updated_at(), before);
    }

    #[test]
    fn test_absorb_usage_saturates() {
        let mut draft = Draft::new();
        draft.absorb_usage(&UsageReport {
            views: u64::MAX - 1,
            generations: u64::MAX,
            revenue: Decimal::MAX,
        });
        draft.absorb_usage(&UsageReport {
            views: 10,
            generations: 1,
            revenue: Decimal::ONE,
        });

        assert_eq!(draft.analytics().views(), u64::MAX);
        assert_eq!(draft.analytics().generations(), u64::MAX);
        assert_eq!(draft.analytics().revenue(), Decimal::MAX);
    }

    #[test]
    fn test_meta_length_advisory() {
        let mut marketing = Marketing::default();
        assert_eq!(marketing.meta_length(), MetaLength::Good);
        marketing.meta_description = "x".repeat(140);
        assert_eq!(marketing.meta_length(), MetaLength::Optimal);
        marketing.meta_description = "x".repeat(161);
        assert_eq!(marketing.meta_length(), MetaLength::TooLong);
    }

    #[test]
    fn test_decode_legacy_record() {
        let value = json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Cuddly",
            "displayTitle": "Cuddly Monsters",
            "urlSlug": "cuddly",
            "tagline": "",
            "baseSystemPrompt": "Make a monster.",
            "categories": [],
            "exampleImages": [],
            "pricing": {"base": 0.5, "withUpload": 0.75},
            "settings": {
                "allowRandomizer": true,
                "allowTextDescription": false,
                "status": "published",
                "showOnBrowsePage": true
            },
            "marketing": {"tiktok": "@cuddly", "metaDescription": ""},
            "analytics": {"views": 3, "generations": 1, "revenue": 0.5, "conversionRate": 33.3},
            "createdAt": "2025-01-02T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });

        let draft = Draft::decode(value).unwrap();
        assert_eq!(draft.base_instruction(), "Make a monster.");
        assert_eq!(draft.status(), Status::Published);
        assert_eq!(draft.marketing().tiktok.as_deref(), Some("@cuddly"));
        assert_eq!(draft.updated_at(), draft.created_at());
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let mut value = serde_json::to_value(Draft::new()).unwrap();
        value["schemaVersion"] = json!(7);
        assert!(matches!(
            Draft::decode(value),
            Err(DecodeError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_published_without_slug() {
        let mut value = serde_json::to_value(Draft::new()).unwrap();
        value["settings"]["status"] = json!("published");
        assert!(matches!(Draft::decode(value), Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            Draft::decode(json!([1, 2])),
            Err(DecodeError::NotAnObject)
        ));
        assert!(matches!(
            Draft::decode(json!({"name": "no id"})),
            Err(DecodeError::Malformed(_))
        ));
    }
}
