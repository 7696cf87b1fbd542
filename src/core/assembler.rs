//! Full-prompt preview.
//!
//! Shows the creator where end-user selections will land. The real tag
//! injection happens on the generation side; this text is never sent there.

use crate::domain::Draft;

/// Line separating the hidden instruction from the selection placeholders
pub const SELECTIONS_MARKER: &str = "--- USER SELECTIONS WILL BE INJECTED HERE ---";

/// Placeholder shown in place of the tags a user will pick
pub const SELECTION_PLACEHOLDER: &str = "[User's selected tags]";

/// Assemble the preview text for a draft
pub fn assemble(draft: &Draft) -> String {
    let mut full = draft.base_instruction().to_string();

    if !draft.categories().is_empty() {
        full.push_str("\n\n");
        full.push_str(SELECTIONS_MARKER);
        full.push('\n');

        for category in draft.categories() {
            full.push('\n');
            full.push_str(&category.name);
            full.push_str(": ");
            full.push_str(SELECTION_PLACEHOLDER);
        }
    }

    full
}
