//! Data model for secret prompt drafts.
//!
//! - `slug`: URL slug generation and the rename-follow rule
//! - `ordered`: dense explicitly-ordered collections
//! - `category`: categories and their tags
//! - `image`: example images, hero partition and drag reordering
//! - `draft`: the draft aggregate and its persisted form

pub mod category;
pub mod draft;
pub mod image;
pub mod ordered;
pub mod slug;

pub use category::{Category, CategoryEdit, CategoryIssue, ColorCode, SelectionType, Tag};
pub use draft::{
    Analytics, DecodeError, Draft, Marketing, MetaLength, Pricing, Settings, Status, UsageReport,
    SCHEMA_VERSION,
};
pub use image::{DragState, ImageRef, ImageSet, HERO_COUNT};
pub use ordered::{Direction, Ordered, OrderedList};
pub use slug::slugify;
