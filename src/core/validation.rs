//! Publish gate.
//!
//! Computes, fresh on every call, which completeness requirements a draft
//! still misses. A draft is publishable exactly when none are missing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Draft;

/// Thresholds for the publish gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRules {
    /// Minimum length of the hidden instruction, in characters (default: 100)
    #[serde(default = "default_min_base_chars")]
    pub min_base_instruction_chars: usize,

    /// Minimum number of categories (default: 3)
    #[serde(default = "default_min_categories")]
    pub min_categories: usize,

    /// Minimum number of example images (default: 3)
    #[serde(default = "default_min_images")]
    pub min_images: usize,
}

fn default_min_base_chars() -> usize {
    100
}
fn default_min_categories() -> usize {
    3
}
fn default_min_images() -> usize {
    3
}

impl Default for PublishRules {
    fn default() -> Self {
        Self {
            min_base_instruction_chars: default_min_base_chars(),
            min_categories: default_min_categories(),
            min_images: default_min_images(),
        }
    }
}

/// One unmet publish requirement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Requirement {
    #[error("Prompt name is required")]
    Name,

    #[error("Display title is required")]
    DisplayTitle,

    #[error("URL slug is required")]
    UrlSlug,

    #[error("Base system prompt must be at least {required} characters (currently {actual})")]
    BaseInstructionLength { actual: usize, required: usize },

    #[error("At least {required} categories required (currently {actual})")]
    Categories { actual: usize, required: usize },

    #[error("At least {required} example images required (currently {actual})")]
    ExampleImages { actual: usize, required: usize },
}

/// Result of checking a draft against the publish gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub unmet: Vec<Requirement>,
}

impl PublishReport {
    pub fn is_publishable(&self) -> bool {
        self.unmet.is_empty()
    }

    /// User-facing reasons, one per unmet requirement
    pub fn reasons(&self) -> Vec<String> {
        self.unmet.iter().map(ToString::to_string).collect()
    }
}

impl PublishRules {
    /// List every requirement `draft` does not meet
    pub fn check(&self, draft: &Draft) -> PublishReport {
        let mut unmet = Vec::new();

        if draft.name().is_empty() {
            unmet.push(Requirement::Name);
        }
        if draft.display_title().is_empty() {
            unmet.push(Requirement::DisplayTitle);
        }
        if draft.url_slug().is_empty() {
            unmet.push(Requirement::UrlSlug);
        }

        let base_chars = draft.base_instruction().chars().count();
        if base_chars < self.min_base_instruction_chars {
            unmet.push(Requirement::BaseInstructionLength {
                actual: base_chars,
                required: self.min_base_instruction_chars,
            });
        }

        let categories = draft.categories().len();
        if categories < self.min_categories {
            unmet.push(Requirement::Categories {
                actual: categories,
                required: self.min_categories,
            });
        }

        let images = draft.example_images().len();
        if images < self.min_images {
            unmet.push(Requirement::ExampleImages {
                actual: images,
                required: self.min_images,
            });
        }

        PublishReport { unmet }
    }
}

/// Check with the default thresholds
pub fn check(draft: &Draft) -> PublishReport {
    PublishRules::default().check(draft)
}

/// Whether `draft` passes the default publish gate
pub fn is_publishable(draft: &Draft) -> bool {
    check(draft).is_publishable()
}
