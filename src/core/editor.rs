//! Mutation boundary for a draft.
//!
//! [`DraftEditor`] is the single entry point for edits. It enforces the
//! soft caps and field limits, keeps ordered collections dense, tracks the
//! image drag gesture and advances `updated_at` on every effective change.
//! Out-of-range reorder requests are ignored rather than reported.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryEdit, CategoryIssue, Direction, DragState, Draft, ImageRef, Ordered,
    Pricing, Status, Tag,
};

/// Caps and field limits applied at the edit boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorLimits {
    pub max_categories: usize,
    pub max_tags_per_category: usize,
    pub max_name_chars: usize,
    pub max_display_title_chars: usize,
    pub max_slug_chars: usize,
    pub max_tagline_chars: usize,
    pub max_base_instruction_chars: usize,
    pub max_category_name_chars: usize,
    pub max_category_description_chars: usize,
    pub max_upload_placeholder_chars: usize,
    pub max_tag_label_chars: usize,
    pub max_prompt_injection_chars: usize,
    pub max_meta_description_chars: usize,
}

impl Default for EditorLimits {
    fn default() -> Self {
        Self {
            max_categories: 10,
            max_tags_per_category: 15,
            max_name_chars: 50,
            max_display_title_chars: 100,
            max_slug_chars: 50,
            max_tagline_chars: 200,
            max_base_instruction_chars: 2000,
            max_category_name_chars: 50,
            max_category_description_chars: 100,
            max_upload_placeholder_chars: 100,
            max_tag_label_chars: 30,
            max_prompt_injection_chars: 200,
            max_meta_description_chars: 160,
        }
    }
}

/// An edit rejected at the boundary. The draft is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("A draft can have at most {limit} categories")]
    CategoryLimit { limit: usize },

    #[error("A category can have at most {limit} tags")]
    TagLimit { limit: usize },

    #[error("{field} is too long: {actual} > {max} characters")]
    TooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("Category cannot be saved: {}", describe_issues(.0))]
    CategoryNotSavable(Vec<CategoryIssue>),

    #[error("Tag label is required")]
    TagLabelRequired,

    #[error("Prices must be positive")]
    NonPositivePrice,

    #[error("A published draft must keep a URL slug")]
    SlugRequired,

    #[error("Category not found: {0}")]
    UnknownCategory(Uuid),

    #[error("Tag not found: {0}")]
    UnknownTag(Uuid),
}

fn describe_issues(issues: &[CategoryIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), EditError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(EditError::TooLong { field, actual, max });
    }
    Ok(())
}

/// Whether saving `candidate` over `existing` would leave it unchanged.
/// Saving keeps the stored position, so a differing `order` is ignored.
fn same_apart_from_order<T: Ordered + Clone + PartialEq>(existing: &T, candidate: &T) -> bool {
    let mut candidate = candidate.clone();
    candidate.set_order(existing.order());
    &candidate == existing
}

/// Editing session over one draft
#[derive(Debug, Clone)]
pub struct DraftEditor {
    draft: Draft,
    limits: EditorLimits,
    drag: DragState,
}

impl Default for DraftEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftEditor {
    /// Start editing a fresh, empty draft
    pub fn new() -> Self {
        Self::open(Draft::new(), EditorLimits::default())
    }

    /// Continue editing an existing draft
    pub fn open(draft: Draft, limits: EditorLimits) -> Self {
        Self {
            draft,
            limits,
            drag: DragState::Idle,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn limits(&self) -> &EditorLimits {
        &self.limits
    }

    pub fn into_draft(self) -> Draft {
        self.draft
    }

    /// Independent copy of the current state, for persisting
    pub fn snapshot(&self) -> Draft {
        self.draft.clone()
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.draft.update_settings(|s| s.status = status);
    }

    // ------------------------------------------------------------------
    // Basic fields
    // ------------------------------------------------------------------

    /// Rename. The slug follows the name until it has been customised.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), EditError> {
        let name = name.into();
        check_len("Name", &name, self.limits.max_name_chars)?;

        if let Some(slug) = self.draft.slug_after_rename(&name) {
            check_len("URL slug", &slug, self.limits.max_slug_chars)?;
            if slug.is_empty() && self.draft.status() == Status::Published {
                return Err(EditError::SlugRequired);
            }
        }

        self.draft.rename(name);
        Ok(())
    }

    pub fn set_display_title(&mut self, title: impl Into<String>) -> Result<(), EditError> {
        let title = title.into();
        check_len("Display title", &title, self.limits.max_display_title_chars)?;
        self.draft.set_display_title(title);
        Ok(())
    }

    /// Set the slug by hand. The input is slugified before it is stored.
    pub fn set_url_slug(&mut self, raw: &str) -> Result<(), EditError> {
        let slug = crate::domain::slugify(raw);
        check_len("URL slug", &slug, self.limits.max_slug_chars)?;
        if slug.is_empty() && self.draft.status() == Status::Published {
            return Err(EditError::SlugRequired);
        }
        self.draft.set_url_slug(&slug);
        Ok(())
    }

    pub fn set_tagline(&mut self, tagline: impl Into<String>) -> Result<(), EditError> {
        let tagline = tagline.into();
        check_len("Tagline", &tagline, self.limits.max_tagline_chars)?;
        self.draft.set_tagline(tagline);
        Ok(())
    }

    pub fn set_base_instruction(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        let text = text.into();
        check_len(
            "Base system prompt",
            &text,
            self.limits.max_base_instruction_chars,
        )?;
        self.draft.set_base_instruction(text);
        Ok(())
    }

    pub fn set_pricing(&mut self, base: Decimal, with_upload: Decimal) -> Result<(), EditError> {
        let pricing = Pricing { base, with_upload };
        if !pricing.is_valid() {
            return Err(EditError::NonPositivePrice);
        }
        self.draft.set_pricing(pricing);
        Ok(())
    }

    pub fn set_allow_randomizer(&mut self, allow: bool) {
        self.draft.update_settings(|s| s.allow_randomizer = allow);
    }

    pub fn set_allow_text_description(&mut self, allow: bool) {
        self.draft.update_settings(|s| s.allow_text_description = allow);
    }

    pub fn set_show_on_browse_page(&mut self, show: bool) {
        self.draft.update_settings(|s| s.show_on_browse_page = show);
    }

    // ------------------------------------------------------------------
    // Marketing
    // ------------------------------------------------------------------

    pub fn set_tiktok(&mut self, handle: Option<String>) {
        self.draft
            .update_marketing(|m| m.tiktok = handle.filter(|h| !h.is_empty()));
    }

    pub fn set_instagram(&mut self, handle: Option<String>) {
        self.draft
            .update_marketing(|m| m.instagram = handle.filter(|h| !h.is_empty()));
    }

    pub fn set_linktree_url(&mut self, url: Option<String>) {
        self.draft
            .update_marketing(|m| m.linktree_url = url.filter(|u| !u.is_empty()));
    }

    pub fn set_meta_description(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        let text = text.into();
        check_len(
            "Meta description",
            &text,
            self.limits.max_meta_description_chars,
        )?;
        self.draft.update_marketing(|m| m.meta_description = text);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    /// Blank category positioned after the existing ones. Not part of the
    /// draft until passed to [`save_category`](Self::save_category).
    pub fn new_category(&self) -> Category {
        let mut category = Category::new("");
        category.set_order(self.draft.categories().next_order());
        category
    }

    /// Insert or replace a category by id.
    ///
    /// Returns `true` when an existing category was replaced.
    pub fn save_category(&mut self, category: Category) -> Result<bool, EditError> {
        self.validate_category(&category)?;

        if let Some(existing) = self.draft.categories().get(&category.id) {
            if same_apart_from_order(existing, &category) {
                return Ok(true);
            }
        } else if self.draft.categories().len() >= self.limits.max_categories {
            return Err(EditError::CategoryLimit {
                limit: self.limits.max_categories,
            });
        }

        let replaced = self.draft.categories_mut().upsert(category);
        self.draft.touch();
        Ok(replaced)
    }

    /// Apply a field-level update to a saved category
    pub fn edit_category(&mut self, id: Uuid, edit: CategoryEdit) -> Result<(), EditError> {
        let mut updated = self
            .draft
            .categories()
            .get(&id)
            .cloned()
            .ok_or(EditError::UnknownCategory(id))?;

        if edit.is_empty() {
            return Ok(());
        }

        updated.apply(edit);
        self.validate_category(&updated)?;
        if self.draft.categories().get(&id) == Some(&updated) {
            return Ok(());
        }
        self.draft.categories_mut().upsert(updated);
        self.draft.touch();
        Ok(())
    }

    pub fn move_category(&mut self, index: usize, direction: Direction) -> bool {
        let moved = self.draft.categories_mut().move_adjacent(index, direction);
        if moved {
            self.draft.touch();
        }
        moved
    }

    /// Delete a category together with its tags
    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let removed = self.draft.categories_mut().remove(&id);
        if removed.is_some() {
            self.draft.touch();
        }
        removed
    }

    fn validate_category(&self, category: &Category) -> Result<(), EditError> {
        let issues = category.issues();
        if !issues.is_empty() {
            return Err(EditError::CategoryNotSavable(issues));
        }

        check_len(
            "Category name",
            &category.name,
            self.limits.max_category_name_chars,
        )?;
        if let Some(description) = &category.description {
            check_len(
                "Category description",
                description,
                self.limits.max_category_description_chars,
            )?;
        }
        if let Some(placeholder) = &category.upload_placeholder {
            check_len(
                "Upload placeholder",
                placeholder,
                self.limits.max_upload_placeholder_chars,
            )?;
        }

        if category.tags().len() > self.limits.max_tags_per_category {
            return Err(EditError::TagLimit {
                limit: self.limits.max_tags_per_category,
            });
        }
        for tag in category.tags() {
            self.validate_tag(tag)?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Blank tag positioned after the category's existing tags
    pub fn new_tag(&self, category_id: Uuid) -> Result<Tag, EditError> {
        let category = self
            .draft
            .categories()
            .get(&category_id)
            .ok_or(EditError::UnknownCategory(category_id))?;

        let mut tag = Tag::new("", "");
        tag.set_order(category.tags().next_order());
        Ok(tag)
    }

    /// Insert or replace a tag within a saved category
    pub fn save_tag(&mut self, category_id: Uuid, tag: Tag) -> Result<bool, EditError> {
        self.validate_tag(&tag)?;

        let max_tags = self.limits.max_tags_per_category;
        let category = self
            .draft
            .categories()
            .get(&category_id)
            .ok_or(EditError::UnknownCategory(category_id))?;

        if let Some(existing) = category.tags().get(&tag.id) {
            if same_apart_from_order(existing, &tag) {
                return Ok(true);
            }
        } else if category.tags().len() >= max_tags {
            return Err(EditError::TagLimit { limit: max_tags });
        }

        let replaced = self
            .draft
            .categories_mut()
            .update(&category_id, |category| category.tags_mut().upsert(tag))
            .ok_or(EditError::UnknownCategory(category_id))?;
        self.draft.touch();
        Ok(replaced)
    }

    pub fn move_tag(
        &mut self,
        category_id: Uuid,
        index: usize,
        direction: Direction,
    ) -> Result<bool, EditError> {
        let moved = self
            .draft
            .categories_mut()
            .update(&category_id, |category| {
                category.tags_mut().move_adjacent(index, direction)
            })
            .ok_or(EditError::UnknownCategory(category_id))?;

        if moved {
            self.draft.touch();
        }
        Ok(moved)
    }

    /// Delete a tag. A saved category keeps at least one tag.
    pub fn remove_tag(&mut self, category_id: Uuid, tag_id: Uuid) -> Result<Tag, EditError> {
        let category = self
            .draft
            .categories()
            .get(&category_id)
            .ok_or(EditError::UnknownCategory(category_id))?;

        if category.tags().get(&tag_id).is_none() {
            return Err(EditError::UnknownTag(tag_id));
        }
        if category.tags().len() == 1 {
            return Err(EditError::CategoryNotSavable(vec![CategoryIssue::NoTags]));
        }

        let removed = self
            .draft
            .categories_mut()
            .update(&category_id, |category| category.tags_mut().remove(&tag_id))
            .flatten()
            .ok_or(EditError::UnknownTag(tag_id))?;
        self.draft.touch();
        Ok(removed)
    }

    fn validate_tag(&self, tag: &Tag) -> Result<(), EditError> {
        if !tag.is_savable() {
            return Err(EditError::TagLabelRequired);
        }
        check_len("Tag label", &tag.label, self.limits.max_tag_label_chars)?;
        check_len(
            "Prompt injection",
            &tag.prompt_injection,
            self.limits.max_prompt_injection_chars,
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Example images
    // ------------------------------------------------------------------

    /// Append images in the given sequence after the existing ones.
    ///
    /// Returns the ids assigned to the new images.
    pub fn add_images<I, S>(&mut self, contents: I) -> Vec<Uuid>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images = self.draft.images_mut();
        let ids: Vec<Uuid> = contents
            .into_iter()
            .map(|content| {
                let image = ImageRef::new(content);
                let id = image.id;
                images.append(image);
                id
            })
            .collect();

        if !ids.is_empty() {
            self.draft.touch();
        }
        ids
    }

    pub fn remove_image(&mut self, id: Uuid) -> Option<ImageRef> {
        let removed = self.draft.images_mut().remove(&id);
        if removed.is_some() {
            self.draft.touch();
        }
        removed
    }

    pub fn move_image(&mut self, index: usize, direction: Direction) -> bool {
        let moved = self.draft.images_mut().move_adjacent(index, direction);
        if moved {
            self.draft.touch();
        }
        moved
    }

    /// Drag gesture: pick up the image at `index`
    pub fn drag_start(&mut self, index: usize) {
        self.drag.start(self.draft.example_images(), index);
    }

    /// Drag gesture: hover over `target`, moving the dragged image there
    pub fn drag_over(&mut self, target: usize) -> bool {
        let moved = self.drag.over(self.draft.images_mut(), target);
        if moved {
            self.draft.touch();
        }
        moved
    }

    /// Drag gesture: release
    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name).with_tag(Tag::new("Default", "default look"))
    }

    #[test]
    fn test_category_cap() {
        let mut editor = DraftEditor::new();
        for i in 0..10 {
            editor.save_category(category(&format!("C{}", i))).unwrap();
        }
        let result = editor.save_category(category("Eleventh"));
        assert_eq!(result, Err(EditError::CategoryLimit { limit: 10 }));
        assert_eq!(editor.draft().categories().len(), 10);
    }

    #[test]
    fn test_replacing_at_cap_is_allowed() {
        let mut editor = DraftEditor::new();
        for i in 0..10 {
            editor.save_category(category(&format!("C{}", i))).unwrap();
        }
        let mut existing = editor.draft().categories().at(3).unwrap().clone();
        existing.name = "Renamed".to_string();
        assert_eq!(editor.save_category(existing), Ok(true));
        assert_eq!(editor.draft().categories().at(3).unwrap().name, "Renamed");
    }

    #[test]
    fn test_unsavable_category_rejected() {
        let mut editor = DraftEditor::new();
        let blank = editor.new_category();
        assert_eq!(
            editor.save_category(blank),
            Err(EditError::CategoryNotSavable(vec![
                CategoryIssue::MissingName,
                CategoryIssue::NoTags
            ]))
        );
        assert!(editor.draft().categories().is_empty());
    }

    #[test]
    fn test_tag_cap_and_label() {
        let mut editor = DraftEditor::new();
        let c = category("Color");
        let id = c.id;
        editor.save_category(c).unwrap();

        assert_eq!(
            editor.save_tag(id, Tag::new("   ", "x")),
            Err(EditError::TagLabelRequired)
        );

        for i in 1..15 {
            editor.save_tag(id, Tag::new(format!("T{}", i), "")).unwrap();
        }
        assert_eq!(
            editor.save_tag(id, Tag::new("Sixteenth", "")),
            Err(EditError::TagLimit { limit: 15 })
        );
        let tags = editor.draft().categories().get(&id).unwrap().tags();
        assert_eq!(tags.len(), 15);
        assert_eq!(tags.at(14).unwrap().order(), 14);
    }

    #[test]
    fn test_remove_last_tag_rejected() {
        let mut editor = DraftEditor::new();
        let c = category("Color");
        let (cid, tid) = (c.id, c.tags().at(0).unwrap().id);
        editor.save_category(c).unwrap();
        assert!(matches!(
            editor.remove_tag(cid, tid),
            Err(EditError::CategoryNotSavable(_))
        ));

        editor.save_tag(cid, Tag::new("Second", "")).unwrap();
        let removed = editor.remove_tag(cid, tid).unwrap();
        assert_eq!(removed.label, "Default");
        let remaining = editor.draft().categories().get(&cid).unwrap().tags();
        assert_eq!(remaining.at(0).unwrap().order(), 0);
    }

    #[test]
    fn test_edit_category_fields() {
        let mut editor = DraftEditor::new();
        let c = category("Color");
        let id = c.id;
        editor.save_category(c).unwrap();

        editor
            .edit_category(
                id,
                CategoryEdit {
                    allow_upload: Some(true),
                    upload_placeholder: Some("Upload your pet".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let saved = editor.draft().categories().get(&id).unwrap();
        assert!(saved.allow_upload);

        let clear_name = CategoryEdit {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(editor.edit_category(id, clear_name).is_err());
        assert_eq!(editor.draft().categories().get(&id).unwrap().name, "Color");

        let unknown = Uuid::new_v4();
        assert_eq!(
            editor.edit_category(unknown, CategoryEdit::default()),
            Err(EditError::UnknownCategory(unknown))
        );
    }

    #[test]
    fn test_field_limits() {
        let mut editor = DraftEditor::new();
        assert!(matches!(
            editor.rename("x".repeat(51)),
            Err(EditError::TooLong { max: 50, .. })
        ));
        assert!(editor.set_base_instruction("x".repeat(2000)).is_ok());
        assert!(editor.set_base_instruction("x".repeat(2001)).is_err());
        assert!(editor.set_meta_description("x".repeat(161)).is_err());
    }

    #[test]
    fn test_pricing_must_be_positive() {
        let mut editor = DraftEditor::new();
        assert_eq!(
            editor.set_pricing(Decimal::ZERO, Decimal::ONE),
            Err(EditError::NonPositivePrice)
        );
        editor
            .set_pricing(Decimal::new(100, 2), Decimal::new(150, 2))
            .unwrap();
        assert_eq!(editor.draft().pricing().with_upload, Decimal::new(150, 2));
    }

    #[test]
    fn test_noop_move_does_not_touch() {
        let mut editor = DraftEditor::new();
        editor.save_category(category("Only")).unwrap();
        let before = editor.draft().updated_at();
        assert!(!editor.move_category(0, Direction::Up));
        assert_eq!(editor.draft().updated_at(), before);
    }

    #[test]
    fn test_published_slug_cannot_be_cleared() {
        let mut editor = DraftEditor::new();
        editor.rename("Monster").unwrap();
        editor.set_status(Status::Published);

        assert_eq!(editor.set_url_slug("!!!"), Err(EditError::SlugRequired));
        assert_eq!(editor.rename("???"), Err(EditError::SlugRequired));
        assert_eq!(editor.draft().url_slug(), "monster");
    }

    #[test]
    fn test_drag_through_editor() {
        let mut editor = DraftEditor::new();
        let ids = editor.add_images(["a", "b", "c"]);
        editor.drag_start(0);
        assert!(editor.drag_over(2));
        editor.drag_end();

        let images = editor.draft().example_images();
        assert_eq!(images.at(2).unwrap().id, ids[0]);
        assert_eq!(editor.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drag_moves_dragged_image_after_removal() {
        let mut editor = DraftEditor::new();
        let ids = editor.add_images(["a", "b", "c", "d"]);

        editor.drag_start(1);
        editor.remove_image(ids[0]);
        assert!(editor.drag_over(2));
        editor.drag_end();

        let contents: Vec<_> = editor
            .draft()
            .example_images()
            .iter()
            .map(|i| i.content.as_str())
            .collect();
        assert_eq!(contents, ["c", "d", "b"]);
    }

    #[test]
    fn test_rename_rejects_overlong_following_slug() {
        let mut editor = DraftEditor::new();
        let name = "\u{130}".repeat(40);

        assert!(matches!(
            editor.rename(name),
            Err(EditError::TooLong {
                field: "URL slug",
                max: 50,
                ..
            })
        ));
        assert_eq!(editor.draft().name(), "");
        assert_eq!(editor.draft().url_slug(), "");

        editor.set_url_slug("custom").unwrap();
        editor.rename("\u{130}".repeat(40)).unwrap();
        assert_eq!(editor.draft().url_slug(), "custom");
    }

    #[test]
    fn test_unchanged_edits_do_not_touch() {
        let mut editor = DraftEditor::new();
        editor.rename("Same").unwrap();
        let saved = category("Color");
        editor.save_category(saved.clone()).unwrap();
        let before = editor.snapshot();

        editor.rename("Same").unwrap();
        editor.set_allow_randomizer(true);
        editor.set_tiktok(None);
        assert_eq!(editor.save_category(saved.clone()), Ok(true));
        editor
            .edit_category(
                saved.id,
                CategoryEdit {
                    name: Some("Color".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let tag = saved.tags().at(0).unwrap().clone();
        assert_eq!(editor.save_tag(saved.id, tag), Ok(true));

        assert_eq!(editor.draft(), &before);
    }

    /// Editor over a populated draft whose timestamps lie in the past
    fn stale_editor() -> DraftEditor {
        let mut editor = DraftEditor::new();
        editor.rename("Base").unwrap();
        editor
            .save_category(category("Color").with_tag(Tag::new("Second", "")))
            .unwrap();
        editor.add_images(["a", "b", "c"]);

        let mut value = serde_json::to_value(editor.draft()).unwrap();
        value["createdAt"] = serde_json::json!("2020-01-01T00:00:00Z");
        value["updatedAt"] = serde_json::json!("2020-01-02T00:00:00Z");
        DraftEditor::open(Draft::decode(value).unwrap(), EditorLimits::default())
    }

    #[test]
    fn test_successful_edits_advance_updated_at() {
        let mutations: [(&str, fn(&mut DraftEditor)); 12] = [
            ("rename", |e| e.rename("Fresh").unwrap()),
            ("display title", |e| e.set_display_title("Fresh").unwrap()),
            ("slug", |e| e.set_url_slug("fresh").unwrap()),
            ("base instruction", |e| e.set_base_instruction("Draw.").unwrap()),
            ("pricing", |e| {
                e.set_pricing(Decimal::ONE, Decimal::new(2, 0)).unwrap()
            }),
            ("randomizer", |e| e.set_allow_randomizer(false)),
            ("meta description", |e| e.set_meta_description("Meta").unwrap()),
            ("category save", |e| {
                e.save_category(category("Size")).unwrap();
            }),
            ("category move", |e| {
                e.save_category(category("Size")).unwrap();
                assert!(e.move_category(1, Direction::Up));
            }),
            ("tag move", |e| {
                let id = e.draft().categories().at(0).unwrap().id;
                assert!(e.move_tag(id, 0, Direction::Down).unwrap());
            }),
            ("image add", |e| {
                e.add_images(["d"]);
            }),
            ("image drag", |e| {
                e.drag_start(0);
                assert!(e.drag_over(2));
                e.drag_end();
            }),
        ];

        for (name, mutate) in mutations {
            let mut editor = stale_editor();
            let before = editor.draft().updated_at();

            mutate(&mut editor);

            let draft = editor.draft();
            assert!(draft.updated_at() > before, "{} did not advance updated_at", name);
            assert!(draft.updated_at() >= draft.created_at(), "{}", name);
        }
    }
}
