//! Keyboard focus-order engine for a graphic-EQ dialog.
//!
//! faderdeck models the dialog a channel-strip EQ pops up: a preset
//! toolbar, a bank of 32 frequency-band faders, a pair of curve buttons,
//! and a footer row. Getting the keyboard through that surface without
//! 40 consecutive Tab stops takes four cooperating mechanisms, and this
//! crate is those mechanisms with the rendering left to the host:
//!
//! - [`group::RovingGroup`]: one tab stop per toolbar, arrow keys inside.
//! - [`group::NestedGroup`]: the fader bank collapses to a single stop
//!   that Enter opens and Escape closes.
//! - [`sequencer::Sequencer`]: circular dialog Tab order, Escape policy,
//!   and the F6 jump cycle for coarse region hopping.
//! - [`fader::Fader`]: bounded dB values with step keys and a transient
//!   readout that follows the last keypress.
//!
//! [`dialog::EqDialog`] wires all four together into the concrete EQ
//! dialog and routes every keypress through one explicit priority chain.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use faderdeck::dialog::EqDialog;
//! use faderdeck::events::{KeyCode, KeyEvent};
//! use faderdeck::sequencer::Dispatch;
//!
//! let mut dialog = EqDialog::new().unwrap();
//! dialog.mounted();
//!
//! // F6 hops straight to the fader bank; Escape backs out of the dialog.
//! let now = Instant::now();
//! dialog.handle_key(&KeyEvent::plain(KeyCode::F(6)), now);
//! assert_eq!(dialog.focus().focused(), Some(dialog.widgets().bank_handle));
//!
//! let out = dialog.handle_key(&KeyEvent::plain(KeyCode::Esc), now);
//! assert_eq!(out, Dispatch::CloseRequested);
//! ```
//!
//! Runtime focus misses are silent no-ops; only a malformed declaration
//! fails, and it fails at build time with an [`error::DialogError`].
//! Enable the `tracing` feature to watch focus transitions.

pub mod dialog;
pub mod error;
pub mod events;
pub mod fader;
pub mod focus;
pub mod group;
pub mod sequencer;
pub mod widget;

pub use dialog::EqDialog;
pub use error::DialogError;
pub use events::{EventResult, KeyCode, KeyEvent, KeyModifiers};
pub use fader::Fader;
pub use focus::FocusContext;
pub use group::{NestedGroup, RovingGroup};
pub use sequencer::{Dispatch, Section, Sequencer};
pub use widget::{WidgetArena, WidgetDecl, WidgetId};

/// Everything a host event loop typically needs.
pub mod prelude {
    pub use crate::dialog::{Action, EqDialog, EqDialogBuilder, JumpTarget};
    pub use crate::error::DialogError;
    pub use crate::events::{EventResult, KeyCode, KeyEvent, KeyModifiers};
    pub use crate::fader::{Fader, ReadoutHandle};
    pub use crate::focus::FocusContext;
    pub use crate::group::{ArrowDirection, NestedGroup, RovingGroup};
    pub use crate::sequencer::{Dispatch, Section, Sequencer};
    pub use crate::widget::{WidgetArena, WidgetDecl, WidgetId};
}
