//! Categories and the tags users pick from them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ordered::{Ordered, OrderedList};

/// Display colour of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Red,
}

impl std::fmt::Display for ColorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorCode::Blue => write!(f, "blue"),
            ColorCode::Green => write!(f, "green"),
            ColorCode::Orange => write!(f, "orange"),
            ColorCode::Purple => write!(f, "purple"),
            ColorCode::Red => write!(f, "red"),
        }
    }
}

impl std::str::FromStr for ColorCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(ColorCode::Blue),
            "green" => Ok(ColorCode::Green),
            "orange" => Ok(ColorCode::Orange),
            "purple" => Ok(ColorCode::Purple),
            "red" => Ok(ColorCode::Red),
            _ => anyhow::bail!("Unknown color: {}", s),
        }
    }
}

/// How many tags an end user may pick from a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    #[default]
    Single,
    Multi,
}

impl std::str::FromStr for SelectionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "single" => Ok(SelectionType::Single),
            "multi" | "multiple" => Ok(SelectionType::Multi),
            _ => anyhow::bail!("Unknown selection type: {}", s),
        }
    }
}

/// One selectable option within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,

    /// Label shown to end users
    pub label: String,

    /// Text injected into the generation prompt when selected
    #[serde(default)]
    pub prompt_injection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_image_url: Option<String>,

    #[serde(default)]
    order: usize,
}

impl Tag {
    /// Create a tag. Its order is assigned when it joins a category.
    pub fn new(label: impl Into<String>, prompt_injection: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            prompt_injection: prompt_injection.into(),
            example_image_url: None,
            order: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether the tag may be saved into a category
    pub fn is_savable(&self) -> bool {
        !self.label.trim().is_empty()
    }

    /// Whether selecting this tag changes the generated prompt
    pub fn has_injection(&self) -> bool {
        !self.prompt_injection.trim().is_empty()
    }
}

impl Ordered for Tag {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

/// Why a category cannot be saved yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryIssue {
    MissingName,
    NoTags,
}

impl std::fmt::Display for CategoryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryIssue::MissingName => write!(f, "Category name is required"),
            CategoryIssue::NoTags => write!(f, "Add at least one tag"),
        }
    }
}

/// A named, ordered group of tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub color_code: ColorCode,

    #[serde(default)]
    pub selection_type: SelectionType,

    #[serde(default)]
    pub allow_upload: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_placeholder: Option<String>,

    #[serde(default)]
    order: usize,

    #[serde(default)]
    tags: OrderedList<Tag>,
}

impl Category {
    /// Create an empty category with default colour and selection type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            color_code: ColorCode::default(),
            selection_type: SelectionType::default(),
            allow_upload: false,
            upload_placeholder: None,
            order: 0,
            tags: OrderedList::new(),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn tags(&self) -> &OrderedList<Tag> {
        &self.tags
    }

    pub(crate) fn tags_mut(&mut self) -> &mut OrderedList<Tag> {
        &mut self.tags
    }

    /// Reasons this category is not yet savable (empty when savable)
    pub fn issues(&self) -> Vec<CategoryIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(CategoryIssue::MissingName);
        }
        if self.tags.is_empty() {
            issues.push(CategoryIssue::NoTags);
        }
        issues
    }

    pub fn is_savable(&self) -> bool {
        self.issues().is_empty()
    }

    /// Builder-style tag insertion, used when assembling a category before
    /// it joins a draft
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.upsert(tag);
        self
    }

    pub(crate) fn apply(&mut self, edit: CategoryEdit) {
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(description) = edit.description {
            self.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(color) = edit.color_code {
            self.color_code = color;
        }
        if let Some(selection) = edit.selection_type {
            self.selection_type = selection;
        }
        if let Some(allow) = edit.allow_upload {
            self.allow_upload = allow;
        }
        if let Some(placeholder) = edit.upload_placeholder {
            self.upload_placeholder = Some(placeholder).filter(|p| !p.is_empty());
        }
    }
}

impl Ordered for Category {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

/// Field-level category update; `None` leaves a field untouched and an
/// empty string clears an optional text field
#[derive(Debug, Clone, Default)]
pub struct CategoryEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color_code: Option<ColorCode>,
    pub selection_type: Option<SelectionType>,
    pub allow_upload: Option<bool>,
    pub upload_placeholder: Option<String>,
}

impl CategoryEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color_code.is_none()
            && self.selection_type.is_none()
            && self.allow_upload.is_none()
            && self.upload_placeholder.is_none()
    }
}
