//! Focus containers that present many controls as few tab stops.
//!
//! Two container shapes cover every grouped region of the dialog:
//!
//! - [`RovingGroup`] - one logical tab stop over N children with
//!   arrow-key movement inside (toolbars, button rows).
//! - [`NestedGroup`] - a single collapsed tab stop that activates on
//!   Enter/Space into an internal Tab-wraparound region (the fader bank).
//!
//! Both own an explicit member list rebuilt on demand from the widget
//! arena via [`rebuild_members`](RovingGroup::rebuild_members), so the
//! key path never re-walks a live tree.

mod nested;
mod roving;

pub use nested::NestedGroup;
pub use roving::{ArrowDirection, RovingGroup};
