//! Behaviour over the draft model.
//!
//! This module contains:
//! - Editor: the mutation boundary (caps, field limits, drag gesture)
//! - Assembler: the full-prompt preview
//! - Validation: the publish gate
//! - Lifecycle: status transitions and the single-in-flight save path

pub mod assembler;
pub mod editor;
pub mod lifecycle;
pub mod validation;

// Re-export commonly used types
pub use assembler::assemble;
pub use editor::{DraftEditor, EditError, EditorLimits};
pub use lifecycle::{check_transition, PublishError, SaveCoordinator, SaveError};
pub use validation::{is_publishable, PublishReport, PublishRules, Requirement};
