//! The graphic-EQ dialog: declared widget tree, section order, and the
//! dispatch chain that routes every keypress.
//!
//! The dialog owns one [`FocusContext`], one [`Sequencer`] over six
//! sections, and one [`Fader`] per frequency band:
//!
//! 1. Preset toolbar (roving): dropdown, save, reset, more-options.
//! 2. Fader bank (nested activatable): 32 faders, one collapsed stop.
//! 3. EQ controls (roving): Flatten, Invert.
//! 4. Preview button.
//! 5. Cancel button.
//! 6. Apply button.
//!
//! Tab wraps between Apply and the preset dropdown; F6 cycles through
//! preset dropdown, bank handle, Invert, and Preview. Initial focus goes
//! to the preset dropdown, deferred until the host reports the dialog
//! mounted.
//!
//! Dispatch is an explicit priority chain, not event bubbling: the
//! sequencer gets first refusal on structural keys, then the focused
//! widget's activation semantics, then its owning container, then the
//! host-default sequential advance for whatever Tab remains.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use faderdeck::dialog::EqDialog;
//! use faderdeck::events::{KeyCode, KeyEvent};
//!
//! let mut dialog = EqDialog::new().unwrap();
//! dialog.mounted();
//!
//! // Enter opens the fader bank; ArrowUp nudges the first band.
//! let now = Instant::now();
//! dialog.handle_key(&KeyEvent::plain(KeyCode::Tab), now);
//! dialog.handle_key(&KeyEvent::plain(KeyCode::Enter), now);
//! dialog.handle_key(&KeyEvent::plain(KeyCode::Up), now);
//! assert_eq!(dialog.fader_values()[0], 1);
//! ```

use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::error::DialogError;
use crate::events::{EventResult, KeyCode, KeyEvent};
use crate::fader::Fader;
use crate::focus::FocusContext;
use crate::group::{NestedGroup, RovingGroup};
use crate::sequencer::{Dispatch, Section, Sequencer};
use crate::widget::{WidgetArena, WidgetDecl, WidgetId};

/// Frequency-band labels, low to high, one per fader.
pub const FREQUENCY_BANDS: [&str; 32] = [
    "20", "25", "31", "40", "50", "63", "80", "100", "125", "160", "200", "250", "315", "400",
    "500", "630", "800", "1K", "1.25K", "1.6K", "2K", "2.5K", "3.15K", "4K", "5K", "6.3K", "8K",
    "10K", "12.5K", "16K", "20K", "25K",
];

/// Preset names offered by the dropdown.
pub const PRESETS: [&str; 5] = ["Default", "Rock", "Pop", "Jazz", "Classical"];

/// Gain bounds in dB, shared by every band.
pub const FADER_MIN: i32 = -20;
/// Upper gain bound in dB.
pub const FADER_MAX: i32 = 20;

/// Side effects the dialog asks the host to perform.
///
/// Drained through [`EqDialog::take_actions`]; the engine itself only
/// moves focus and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open the preset dropdown's option list.
    OpenPresetDropdown,
    /// Persist the current values as a preset.
    SavePreset,
    /// Restore the selected preset's stored values.
    ResetPreset,
    /// Show the overflow menu.
    MoreOptions,
    /// Audition the current curve.
    Preview,
    /// Commit the current curve.
    Apply,
}

/// Named landing targets for a declared jump cycle.
///
/// The builder accepts targets by name because the widget handles do not
/// exist until the dialog is built; resolution to [`WidgetId`]s and
/// validation happen inside [`EqDialogBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    /// The preset dropdown.
    PresetDropdown,
    /// The fader bank's collapsed handle.
    FaderBank,
    /// The Flatten button.
    Flatten,
    /// The Invert button.
    Invert,
    /// The Preview button.
    Preview,
    /// The Cancel button.
    Cancel,
    /// The Apply button.
    Apply,
}

/// Builder for [`EqDialog`].
///
/// # Example
///
/// ```
/// use faderdeck::dialog::{EqDialog, JumpTarget};
///
/// let dialog = EqDialog::builder()
///     .preset("Rock")
///     .fader_bounds(-12, 12)
///     .jump_cycle(vec![JumpTarget::PresetDropdown, JumpTarget::FaderBank])
///     .build()
///     .unwrap();
/// assert_eq!(dialog.selected_preset(), "Rock");
/// ```
#[derive(Debug, Clone)]
pub struct EqDialogBuilder {
    preset: usize,
    fader_min: i32,
    fader_max: i32,
    jump_cycle: Vec<JumpTarget>,
}

impl Default for EqDialogBuilder {
    fn default() -> Self {
        Self {
            preset: 0,
            fader_min: FADER_MIN,
            fader_max: FADER_MAX,
            jump_cycle: vec![
                JumpTarget::PresetDropdown,
                JumpTarget::FaderBank,
                JumpTarget::Invert,
                JumpTarget::Preview,
            ],
        }
    }
}

impl EqDialogBuilder {
    /// Start from the stock dialog layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initially selected preset. Unknown names keep the default.
    pub fn preset(mut self, name: &str) -> Self {
        if let Some(i) = PRESETS.iter().position(|p| *p == name) {
            self.preset = i;
        }
        self
    }

    /// Gain bounds shared by every band.
    pub fn fader_bounds(mut self, min: i32, max: i32) -> Self {
        self.fader_min = min;
        self.fader_max = max;
        self
    }

    /// Replace the declared jump cycle. Duplicates fail at build time.
    pub fn jump_cycle(mut self, cycle: Vec<JumpTarget>) -> Self {
        self.jump_cycle = cycle;
        self
    }

    /// Build the dialog, validating sections and the jump cycle.
    pub fn build(self) -> Result<EqDialog, DialogError> {
        EqDialog::from_builder(self)
    }
}

/// Stable handles for every focusable control in the dialog.
#[derive(Debug, Clone, Copy)]
pub struct DialogWidgets {
    /// Preset selection dropdown (initial focus, jump target 1).
    pub preset_dropdown: WidgetId,
    /// Save-preset toolbar button.
    pub save_preset: WidgetId,
    /// Reset-preset toolbar button.
    pub reset_preset: WidgetId,
    /// Overflow-menu toolbar button.
    pub more_options: WidgetId,
    /// The fader bank's collapsed handle (jump target 2).
    pub bank_handle: WidgetId,
    /// Flatten button (sets every band to 0).
    pub flatten: WidgetId,
    /// Invert button (negates every band; jump target 3).
    pub invert: WidgetId,
    /// Preview button (jump target 4).
    pub preview: WidgetId,
    /// Cancel button.
    pub cancel: WidgetId,
    /// Apply button (last position in the Tab order).
    pub apply: WidgetId,
}

/// One open graphic-EQ dialog instance.
#[derive(Debug)]
pub struct EqDialog {
    ctx: FocusContext,
    seq: Sequencer,
    widgets: DialogWidgets,
    faders: Vec<Fader>,
    fader_index: FxHashMap<WidgetId, usize>,
    selected_preset: usize,
    actions: Vec<Action>,
    open: bool,
}

impl EqDialog {
    /// Build the stock dialog: default jump cycle, [-20, 20] bounds.
    ///
    /// Fails only on declaration bugs (an empty grouped section or a bad
    /// jump table); a successfully built dialog never errors at runtime.
    pub fn new() -> Result<Self, DialogError> {
        Self::builder().build()
    }

    /// Start building a dialog with non-default declarations.
    pub fn builder() -> EqDialogBuilder {
        EqDialogBuilder::new()
    }

    fn from_builder(builder: EqDialogBuilder) -> Result<Self, DialogError> {
        let mut arena = WidgetArena::new();

        // Window chrome is pointer-only; it never joins any traversal.
        let header = arena.attach(None, WidgetDecl::container("header"));
        arena.attach(Some(header), WidgetDecl::inert("minimize"));
        arena.attach(Some(header), WidgetDecl::inert("maximize"));
        arena.attach(Some(header), WidgetDecl::inert("close"));

        let preset_bar = arena.attach(None, WidgetDecl::container("preset-toolbar"));
        let preset_dropdown = arena.attach(Some(preset_bar), WidgetDecl::control("preset"));
        let save_preset = arena.attach(Some(preset_bar), WidgetDecl::control("save-preset"));
        let reset_preset = arena.attach(Some(preset_bar), WidgetDecl::control("reset-preset"));
        let more_options = arena.attach(Some(preset_bar), WidgetDecl::control("more-options"));

        let bank_handle = arena.attach(None, WidgetDecl::focusable_container("fader-bank"));
        let faders: Vec<Fader> = FREQUENCY_BANDS
            .iter()
            .map(|band| {
                let id = arena.attach(Some(bank_handle), WidgetDecl::control(*band));
                Fader::new(id, *band, builder.fader_min, builder.fader_max)
            })
            .collect();

        let eq_controls = arena.attach(None, WidgetDecl::container("eq-controls"));
        let flatten = arena.attach(Some(eq_controls), WidgetDecl::control("flatten"));
        let invert = arena.attach(Some(eq_controls), WidgetDecl::control("invert"));

        let preview = arena.attach(None, WidgetDecl::control("preview"));
        let cancel = arena.attach(None, WidgetDecl::control("cancel"));
        let apply = arena.attach(None, WidgetDecl::control("apply"));

        let mut ctx = FocusContext::new(arena);

        let sections = vec![
            Section::Roving(RovingGroup::new(preset_bar, &ctx)),
            Section::Nested(NestedGroup::new(bank_handle, &ctx)),
            Section::Roving(RovingGroup::new(eq_controls, &ctx)),
            Section::Single(preview),
            Section::Single(cancel),
            Section::Single(apply),
        ];
        for (index, section) in sections.iter().enumerate() {
            if section.first_position().is_none() {
                let label = match section {
                    Section::Roving(g) => ctx.arena().label(g.container()),
                    Section::Nested(g) => ctx.arena().label(g.handle()),
                    Section::Single(w) => ctx.arena().label(*w),
                };
                return Err(DialogError::EmptySection {
                    index,
                    label: label.unwrap_or("?").to_owned(),
                });
            }
        }

        let cycle: Vec<WidgetId> = builder
            .jump_cycle
            .iter()
            .map(|target| match target {
                JumpTarget::PresetDropdown => preset_dropdown,
                JumpTarget::FaderBank => bank_handle,
                JumpTarget::Flatten => flatten,
                JumpTarget::Invert => invert,
                JumpTarget::Preview => preview,
                JumpTarget::Cancel => cancel,
                JumpTarget::Apply => apply,
            })
            .collect();

        let mut seq = Sequencer::new(sections);
        seq.set_jump_cycle(cycle)?;

        let fader_index: FxHashMap<WidgetId, usize> = faders
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id(), i))
            .collect();

        // A focus miss retries once against the dropdown before giving up.
        ctx.set_fallback(preset_dropdown);
        // Initial focus is deferred; the control does not exist on screen
        // until the host finishes mounting.
        ctx.request_focus(preset_dropdown);

        Ok(Self {
            ctx,
            seq,
            widgets: DialogWidgets {
                preset_dropdown,
                save_preset,
                reset_preset,
                more_options,
                bank_handle,
                flatten,
                invert,
                preview,
                cancel,
                apply,
            },
            faders,
            fader_index,
            selected_preset: builder.preset,
            actions: Vec::new(),
            open: true,
        })
    }

    /// Host signal that the dialog finished mounting; applies the
    /// deferred initial focus.
    pub fn mounted(&mut self) -> bool {
        self.ctx.flush_pending()
    }

    /// True until [`close`](EqDialog::close) runs.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The focus state, for host-side queries.
    pub fn focus(&self) -> &FocusContext {
        &self.ctx
    }

    /// Handles for every focusable control.
    pub fn widgets(&self) -> &DialogWidgets {
        &self.widgets
    }

    /// All band values in band order.
    pub fn fader_values(&self) -> Vec<i32> {
        self.faders.iter().map(Fader::value).collect()
    }

    /// The faders in band order.
    pub fn faders(&self) -> &[Fader] {
        &self.faders
    }

    /// Set one band's value (clamped). Host-driven, e.g. preset load.
    pub fn set_fader_value(&mut self, band: usize, value: i32) -> Option<i32> {
        self.faders.get_mut(band).map(|f| f.set_value(value))
    }

    /// Set one band from a normalized pointer position in `[0, 1]`.
    pub fn set_fader_from_normalized(&mut self, band: usize, p: f64) -> Option<i32> {
        self.faders
            .get_mut(band)
            .map(|f| f.set_value_from_normalized(p))
    }

    /// Zero every band.
    pub fn flatten(&mut self) {
        for fader in &mut self.faders {
            fader.set_value(0);
        }
    }

    /// Negate every band.
    pub fn invert(&mut self) {
        for fader in &mut self.faders {
            let v = fader.value();
            fader.set_value(-v);
        }
    }

    /// The selected preset's name.
    pub fn selected_preset(&self) -> &'static str {
        PRESETS[self.selected_preset]
    }

    /// Select a preset by name. Unknown names are ignored.
    pub fn select_preset(&mut self, name: &str) -> bool {
        match PRESETS.iter().position(|p| *p == name) {
            Some(i) => {
                self.selected_preset = i;
                true
            }
            None => false,
        }
    }

    /// Drain the side effects queued since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Route one keypress through the dispatch chain.
    ///
    /// `now` timestamps fader readout arming. Returns
    /// [`Dispatch::CloseRequested`] after Escape with nothing activated or
    /// Enter on Cancel; the dialog has already torn itself down by then.
    pub fn handle_key(&mut self, event: &KeyEvent, now: Instant) -> Dispatch {
        if !self.open {
            return Dispatch::Ignored;
        }
        let before = self.ctx.focused();

        let dispatch = self.dispatch(event, now);

        if let Dispatch::CloseRequested = dispatch {
            self.close();
            return Dispatch::CloseRequested;
        }

        // A fader that lost focus by any route hides its readout at once.
        let after = self.ctx.focused();
        if before != after {
            if let Some(fader) = before
                .and_then(|prev| self.fader_index.get(&prev))
                .and_then(|i| self.faders.get(*i))
            {
                fader.on_blur();
            }
        }
        self.seq.sync_nested(&self.ctx);

        dispatch
    }

    fn dispatch(&mut self, event: &KeyEvent, now: Instant) -> Dispatch {
        // 1. Structural keys: Escape, F6, the two Tab wraparound edges,
        //    and Tab inside an activated bank.
        match self.seq.handle_key(event, &mut self.ctx) {
            Dispatch::Ignored => {}
            decided => return decided,
        }

        // 2. Activation semantics of the focused control.
        if matches!(event.code, KeyCode::Enter | KeyCode::Char(' ')) {
            match self.activate_focused() {
                Dispatch::Ignored => {}
                decided => return decided,
            }
        }

        // 3. Value keys on a focused fader.
        if let Some(fader) = self
            .ctx
            .focused()
            .and_then(|focused| self.fader_index.get(&focused))
            .and_then(|i| self.faders.get_mut(*i))
        {
            if fader.on_key(event, now).is_consumed() {
                return Dispatch::Consumed;
            }
        }

        // 4. The owning container (roving arrows).
        for section in self.seq.sections_mut() {
            let result = match section {
                Section::Roving(g) => g.on_key(event, &mut self.ctx),
                Section::Nested(g) => g.on_key(event, &mut self.ctx),
                Section::Single(_) => EventResult::Ignored,
            };
            if result.is_consumed() {
                return Dispatch::Consumed;
            }
        }

        // 5. Whatever Tab the sequencer declined advances one section.
        if event.is_tab() && self.seq.default_advance(event.is_shift_tab(), &mut self.ctx) {
            return Dispatch::Consumed;
        }

        Dispatch::Ignored
    }

    /// Enter/Space on the focused control.
    fn activate_focused(&mut self) -> Dispatch {
        let Some(focused) = self.ctx.focused() else {
            return Dispatch::Ignored;
        };
        let w = self.widgets;

        if focused == w.preset_dropdown {
            self.actions.push(Action::OpenPresetDropdown);
            Dispatch::Consumed
        } else if focused == w.save_preset {
            self.actions.push(Action::SavePreset);
            Dispatch::Consumed
        } else if focused == w.reset_preset {
            self.actions.push(Action::ResetPreset);
            Dispatch::Consumed
        } else if focused == w.more_options {
            self.actions.push(Action::MoreOptions);
            Dispatch::Consumed
        } else if focused == w.flatten {
            self.flatten();
            Dispatch::Consumed
        } else if focused == w.invert {
            self.invert();
            Dispatch::Consumed
        } else if focused == w.preview {
            self.actions.push(Action::Preview);
            Dispatch::Consumed
        } else if focused == w.apply {
            self.actions.push(Action::Apply);
            Dispatch::Consumed
        } else if focused == w.cancel {
            Dispatch::CloseRequested
        } else {
            // Bank-handle activation belongs to the nested group, reached
            // through the container pass.
            Dispatch::Ignored
        }
    }

    /// Tear the dialog down: drops focus, collapses state, and detaches
    /// the widget tree. No focus transition can fire afterwards.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        for section in self.seq.sections_mut() {
            if let Section::Nested(g) = section {
                g.force_collapse();
            }
        }
        for fader in &self.faders {
            fader.on_blur();
        }
        self.ctx.teardown();

        #[cfg(feature = "tracing")]
        tracing::debug!("dialog closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn open_dialog() -> EqDialog {
        let mut dialog = EqDialog::new().unwrap();
        assert!(dialog.mounted());
        dialog
    }

    fn press(dialog: &mut EqDialog, code: KeyCode) -> Dispatch {
        dialog.handle_key(&KeyEvent::plain(code), Instant::now())
    }

    #[test]
    fn test_initial_focus_is_deferred_to_mount() {
        let mut dialog = EqDialog::new().unwrap();
        assert_eq!(dialog.focus().focused(), None);

        dialog.mounted();
        assert_eq!(
            dialog.focus().focused(),
            Some(dialog.widgets().preset_dropdown)
        );
    }

    #[test]
    fn test_tab_wraps_apply_to_dropdown() {
        let mut dialog = open_dialog();
        let apply = dialog.widgets().apply;
        dialog.ctx.focus(apply);

        assert_eq!(press(&mut dialog, KeyCode::Tab), Dispatch::Consumed);
        assert_eq!(
            dialog.focus().focused(),
            Some(dialog.widgets().preset_dropdown)
        );
    }

    #[test]
    fn test_shift_tab_wraps_dropdown_to_apply() {
        let mut dialog = open_dialog();
        assert_eq!(press(&mut dialog, KeyCode::BackTab), Dispatch::Consumed);
        assert_eq!(dialog.focus().focused(), Some(dialog.widgets().apply));
    }

    #[test]
    fn test_tab_walks_sections_forward() {
        let mut dialog = open_dialog();
        let w = *dialog.widgets();

        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(w.bank_handle));
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(w.flatten));
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(w.preview));
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(w.cancel));
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(w.apply));
    }

    #[test]
    fn test_toolbar_arrows_rove() {
        let mut dialog = open_dialog();
        let w = *dialog.widgets();

        press(&mut dialog, KeyCode::Right);
        assert_eq!(dialog.focus().focused(), Some(w.save_preset));
        press(&mut dialog, KeyCode::Left);
        press(&mut dialog, KeyCode::Left);
        assert_eq!(dialog.focus().focused(), Some(w.more_options));
    }

    #[test]
    fn test_bank_activation_and_value_editing() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab); // bank handle

        press(&mut dialog, KeyCode::Enter);
        let first = dialog.faders()[0].id();
        assert_eq!(dialog.focus().focused(), Some(first));

        press(&mut dialog, KeyCode::Up);
        press(&mut dialog, KeyCode::Up);
        press(&mut dialog, KeyCode::Up);
        assert_eq!(dialog.fader_values()[0], 3);
        assert!(dialog.faders()[0].readout().is_visible(Instant::now()));
    }

    #[test]
    fn test_escape_in_bank_collapses_then_closes() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);
        press(&mut dialog, KeyCode::Up);

        assert_eq!(press(&mut dialog, KeyCode::Esc), Dispatch::Consumed);
        assert_eq!(dialog.focus().focused(), Some(dialog.widgets().bank_handle));
        // Leaving the fader killed its readout.
        assert!(!dialog.faders()[0].readout().is_visible(Instant::now()));

        assert_eq!(press(&mut dialog, KeyCode::Esc), Dispatch::CloseRequested);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_tab_inside_bank_wraps_internally() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);

        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().focused(), Some(dialog.faders()[1].id()));

        press(&mut dialog, KeyCode::BackTab);
        press(&mut dialog, KeyCode::BackTab);
        let last = dialog.faders().last().unwrap().id();
        assert_eq!(dialog.focus().focused(), Some(last));
    }

    #[test]
    fn test_jump_cycle_forward_returns_to_start() {
        let mut dialog = open_dialog();
        let w = *dialog.widgets();
        let f6 = KeyEvent::plain(KeyCode::F(6));
        let now = Instant::now();

        dialog.handle_key(&f6, now);
        assert_eq!(dialog.focus().focused(), Some(w.bank_handle));
        dialog.handle_key(&f6, now);
        assert_eq!(dialog.focus().focused(), Some(w.invert));
        dialog.handle_key(&f6, now);
        assert_eq!(dialog.focus().focused(), Some(w.preview));
        dialog.handle_key(&f6, now);
        assert_eq!(dialog.focus().focused(), Some(w.preset_dropdown));
    }

    #[test]
    fn test_shift_jump_cycles_backward() {
        let mut dialog = open_dialog();
        let w = *dialog.widgets();

        dialog.handle_key(&KeyEvent::shifted(KeyCode::F(6)), Instant::now());
        assert_eq!(dialog.focus().focused(), Some(w.preview));
    }

    #[test]
    fn test_jump_out_of_activated_bank_collapses_it() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);

        dialog.handle_key(&KeyEvent::plain(KeyCode::F(6)), Instant::now());
        assert_eq!(dialog.focus().focused(), Some(dialog.widgets().invert));

        // Coming back lands on the collapsed handle, not a fader.
        dialog.handle_key(&KeyEvent::shifted(KeyCode::F(6)), Instant::now());
        assert_eq!(dialog.focus().focused(), Some(dialog.widgets().bank_handle));
        press(&mut dialog, KeyCode::Esc);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_flatten_and_invert() {
        let mut dialog = open_dialog();
        dialog.set_fader_value(0, 5);
        dialog.set_fader_value(31, -7);

        dialog.invert();
        assert_eq!(dialog.fader_values()[0], -5);
        assert_eq!(dialog.fader_values()[31], 7);

        dialog.flatten();
        assert!(dialog.fader_values().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_enter_on_invert_button_inverts() {
        let mut dialog = open_dialog();
        dialog.set_fader_value(3, 4);
        let invert = dialog.widgets().invert;
        dialog.ctx.focus(invert);

        press(&mut dialog, KeyCode::Enter);
        assert_eq!(dialog.fader_values()[3], -4);
    }

    #[test]
    fn test_enter_on_dropdown_requests_open() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Enter);
        assert_eq!(dialog.take_actions(), vec![Action::OpenPresetDropdown]);
        // Drained.
        assert!(dialog.take_actions().is_empty());
    }

    #[test]
    fn test_enter_on_cancel_closes() {
        let mut dialog = open_dialog();
        let cancel = dialog.widgets().cancel;
        dialog.ctx.focus(cancel);

        assert_eq!(press(&mut dialog, KeyCode::Enter), Dispatch::CloseRequested);
        assert!(!dialog.is_open());
        assert_eq!(dialog.focus().focused(), None);
    }

    #[test]
    fn test_close_cancels_pending_readouts() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);
        let now = Instant::now();
        dialog.handle_key(&KeyEvent::plain(KeyCode::Up), now);
        let readout = dialog.faders()[0].readout();
        assert!(readout.is_visible(now));

        dialog.close();
        assert!(!readout.is_visible(now));
    }

    #[test]
    fn test_closed_dialog_ignores_keys() {
        let mut dialog = open_dialog();
        dialog.close();

        assert_eq!(press(&mut dialog, KeyCode::Tab), Dispatch::Ignored);
        assert_eq!(press(&mut dialog, KeyCode::F(6)), Dispatch::Ignored);
        assert_eq!(dialog.focus().focused(), None);
    }

    #[test]
    fn test_preset_selection() {
        let mut dialog = open_dialog();
        assert_eq!(dialog.selected_preset(), "Default");
        assert!(dialog.select_preset("Jazz"));
        assert_eq!(dialog.selected_preset(), "Jazz");
        assert!(!dialog.select_preset("Metal"));
        assert_eq!(dialog.selected_preset(), "Jazz");
    }

    #[test]
    fn test_pointer_sets_band_from_track_position() {
        let mut dialog = open_dialog();
        assert_eq!(dialog.set_fader_from_normalized(4, 1.0), Some(20));
        assert_eq!(dialog.set_fader_from_normalized(4, 0.5), Some(0));
        assert_eq!(dialog.set_fader_from_normalized(99, 0.5), None);
    }

    #[test]
    fn test_arrow_on_fader_edits_value_not_focus() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);
        let first = dialog.faders()[0].id();

        press(&mut dialog, KeyCode::Right);
        assert_eq!(dialog.focus().focused(), Some(first));
        assert_eq!(dialog.fader_values()[0], 1);
    }

    #[test]
    fn test_home_and_end_on_fader() {
        let mut dialog = open_dialog();
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Enter);

        press(&mut dialog, KeyCode::Home);
        assert_eq!(dialog.fader_values()[0], FADER_MAX);
        press(&mut dialog, KeyCode::End);
        assert_eq!(dialog.fader_values()[0], FADER_MIN);
    }

    #[test]
    fn test_builder_overrides() {
        let mut dialog = EqDialog::builder()
            .preset("Classical")
            .fader_bounds(-12, 12)
            .jump_cycle(vec![JumpTarget::PresetDropdown, JumpTarget::Apply])
            .build()
            .unwrap();
        dialog.mounted();

        assert_eq!(dialog.selected_preset(), "Classical");
        assert_eq!(dialog.faders()[0].max(), 12);

        dialog.handle_key(&KeyEvent::plain(KeyCode::F(6)), Instant::now());
        assert_eq!(dialog.focus().focused(), Some(dialog.widgets().apply));
    }

    #[test]
    fn test_builder_rejects_duplicate_jump_targets() {
        let err = EqDialog::builder()
            .jump_cycle(vec![JumpTarget::Preview, JumpTarget::Preview])
            .build()
            .unwrap_err();
        assert!(matches!(err, DialogError::DuplicateJumpTarget(_)));
    }

    #[test]
    fn test_disabled_toolbar_button_is_skipped() {
        let mut dialog = open_dialog();
        let w = *dialog.widgets();
        dialog.ctx.arena_mut().set_disabled(w.save_preset, true);
        if let Section::Roving(g) = &mut dialog.seq.sections_mut()[0] {
            g.rebuild_members(&dialog.ctx);
        }

        press(&mut dialog, KeyCode::Right);
        assert_eq!(dialog.focus().focused(), Some(w.reset_preset));
    }
}
