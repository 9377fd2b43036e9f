//! Construction-time validation errors.
//!
//! The running engine never surfaces errors: focus misses are silent
//! no-ops by design. What *can* fail is the declaration — a section with
//! nothing in it, or a jump cycle naming a widget no section contains —
//! and those fail loudly when the dialog is built, not at keypress time.

use thiserror::Error;

use crate::widget::WidgetId;

/// A declared section or jump table that cannot work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    /// A grouped section resolved to zero focusable members.
    #[error("section {index} ({label}) has no focusable members")]
    EmptySection {
        /// Position of the section in the dialog order.
        index: usize,
        /// The section's declared label.
        label: String,
    },

    /// A jump-cycle entry names a widget outside every declared section.
    #[error("jump target {0:?} is not part of any declared section")]
    UnknownJumpTarget(WidgetId),

    /// The same widget appears twice in the jump cycle.
    #[error("jump target {0:?} appears more than once in the jump cycle")]
    DuplicateJumpTarget(WidgetId),
}
