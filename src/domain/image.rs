//! Example images and the drag gesture that reorders them.
//!
//! The first [`HERO_COUNT`] images by order are hero images. The hero flag
//! is derived inside [`Ordered::set_order`], so every renumbering of the set
//! refreshes it for all images at once.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ordered::{Ordered, OrderedList};

/// Number of leading images shown with visual prominence
pub const HERO_COUNT: usize = 6;

/// An example image attached to a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub id: Uuid,

    /// Content reference supplied by the ingestion side (URL or data URI)
    #[serde(rename = "url")]
    pub content: String,

    #[serde(default)]
    order: usize,

    // Stored for readers of the persisted document; recomputed on decode.
    #[serde(default)]
    is_hero: bool,
}

impl ImageRef {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            order: 0,
            is_hero: false,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn is_hero(&self) -> bool {
        self.is_hero
    }
}

impl Ordered for ImageRef {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
        self.is_hero = order < HERO_COUNT;
    }
}

/// Ordered image set owned by a draft
pub type ImageSet = OrderedList<ImageRef>;

/// Split an image set into its hero and remaining images
pub fn partition(images: &ImageSet) -> (&[ImageRef], &[ImageRef]) {
    let all = images.as_slice();
    all.split_at(all.len().min(HERO_COUNT))
}

/// State of a reorder drag gesture: idle, or dragging one image.
///
/// The dragged image is tracked by id, so changes to the set made in the
/// middle of a gesture never redirect it to a different image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { id: Uuid },
}

impl DragState {
    /// Begin dragging the image at `index`. Out-of-range indices leave the
    /// gesture idle.
    pub fn start(&mut self, images: &ImageSet, index: usize) {
        *self = match images.at(index) {
            Some(image) => DragState::Dragging { id: image.id },
            None => DragState::Idle,
        };
    }

    /// Dragged over `target`: move the dragged image there.
    ///
    /// Returns `true` when the set changed. Ignored while idle, when hovering
    /// the dragged image itself, or for out-of-range indices. A gesture whose
    /// image has been removed falls back to idle.
    pub fn over(&mut self, images: &mut ImageSet, target: usize) -> bool {
        let DragState::Dragging { id } = *self else {
            return false;
        };

        match images.position(&id) {
            Some(source) => images.move_to(source, target),
            None => {
                *self = DragState::Idle;
                false
            }
        }
    }

    /// Finish the gesture
    pub fn end(&mut self) {
        *self = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Current position of the dragged image
    pub fn source(&self, images: &ImageSet) -> Option<usize> {
        match self {
            DragState::Dragging { id } => images.position(id),
            DragState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize) -> ImageSet {
        let mut images = ImageSet::new();
        for i in 0..n {
            images.append(ImageRef::new(format!("img-{}", i)));
        }
        images
    }

    fn contents(images: &ImageSet) -> Vec<&str> {
        images.iter().map(|i| i.content.as_str()).collect()
    }

    fn assert_hero_consistent(images: &ImageSet) {
        for image in images {
            assert_eq!(image.is_hero(), image.order() < HERO_COUNT);
        }
    }

    #[test]
    fn test_hero_flags_on_append() {
        let images = set_of(8);
        assert_hero_consistent(&images);
        let (hero, rest) = partition(&images);
        assert_eq!(hero.len(), 6);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_hero_flags_after_remove() {
        let mut images = set_of(7);
        let first = images.at(0).unwrap().id;
        images.remove(&first);
        assert_hero_consistent(&images);
        assert!(images.at(5).unwrap().is_hero());
    }

    #[test]
    fn test_drag_composes_moves() {
        let mut images = set_of(8);
        let mut drag = DragState::default();

        drag.start(&images, 7);
        assert!(drag.over(&mut images, 6));
        assert!(drag.over(&mut images, 2));
        assert!(!drag.over(&mut images, 2));
        drag.end();

        assert_eq!(
            contents(&images),
            vec!["img-0", "img-1", "img-7", "img-2", "img-3", "img-4", "img-5", "img-6"]
        );
        assert!(images.at(2).unwrap().is_hero());
        assert!(!images.at(7).unwrap().is_hero());
        assert_hero_consistent(&images);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_over_while_idle_is_ignored() {
        let mut images = set_of(3);
        let mut drag = DragState::Idle;
        assert!(!drag.over(&mut images, 0));
        assert_eq!(contents(&images), vec!["img-0", "img-1", "img-2"]);

        drag.start(&images, 3);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_follows_image_when_set_changes() {
        let mut images = set_of(4);
        let mut drag = DragState::default();
        drag.start(&images, 1);

        let first = images.at(0).unwrap().id;
        images.remove(&first);
        assert_eq!(drag.source(&images), Some(0));

        assert!(drag.over(&mut images, 2));
        assert_eq!(contents(&images), vec!["img-2", "img-3", "img-1"]);
        assert_eq!(drag.source(&images), Some(2));
    }

    #[test]
    fn test_drag_of_removed_image_goes_idle() {
        let mut images = set_of(3);
        let mut drag = DragState::default();
        drag.start(&images, 1);

        let dragged = images.at(1).unwrap().id;
        images.remove(&dragged);

        assert!(!drag.over(&mut images, 0));
        assert!(!drag.is_dragging());
        assert_eq!(contents(&images), vec!["img-0", "img-2"]);
    }

    #[test]
    fn test_decode_recomputes_hero() {
        let json = r#"[
            {"id": "550e8400-e29b-41d4-a716-446655440000", "url": "a", "order": 9, "isHero": true},
            {"id": "550e8400-e29b-41d4-a716-446655440001", "url": "b", "order": 2, "isHero": false}
        ]"#;
        let images: ImageSet = serde_json::from_str(json).unwrap();
        assert_eq!(contents(&images), vec!["b", "a"]);
        assert_eq!(images.at(1).unwrap().order(), 1);
        assert_hero_consistent(&images);
    }
}
