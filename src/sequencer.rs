//! Section sequencer: the dialog-level focus-order controller.
//!
//! The dialog's order is a sequence of *sections* — single widgets,
//! roving groups, and nested activatable groups. The sequencer gets
//! first refusal on structural keys (Tab, Escape, the F6 jump key) and
//! resolves them through an explicit decision table:
//!
//! | Event            | Condition                               | Action                                |
//! |------------------|-----------------------------------------|---------------------------------------|
//! | Tab / Shift+Tab  | focus inside an activated nested group  | group wraps internally, consumed      |
//! | Tab              | focus on last position of last section  | wrap to first position of section 0   |
//! | Shift+Tab        | focus on first position of section 0    | wrap to last position of last section |
//! | Tab / Shift+Tab  | anywhere else                           | declined (host default advance)       |
//! | Escape           | some nested group activated             | collapse that group only              |
//! | Escape           | nothing activated                       | request dialog close                  |
//! | F6 / Shift+F6    | always                                  | walk the declared jump cycle          |
//! | anything else    | —                                       | declined (not structural)             |
//!
//! The jump cycle is a second, coarser ordered loop layered over the
//! fine-grained Tab order: four or five declared landing targets for
//! fast cross-region movement that steps over the fader bank as a
//! single hop. Targets are declared widget handles validated when the
//! cycle is installed — never looked up by rendered text.
//!
//! Any computation that finds no live target leaves focus unchanged;
//! that is the expected outcome under normal UI churn, not an error.

use smallvec::SmallVec;

use crate::error::DialogError;
use crate::events::{EventResult, KeyBinding, KeyCode, KeyEvent};
use crate::focus::FocusContext;
use crate::group::{NestedGroup, RovingGroup};
use crate::widget::WidgetId;

/// The key that walks the jump cycle (Shift reverses direction).
pub const JUMP_KEY: KeyCode = KeyCode::F(6);

/// One top-level entry in the dialog's declared order.
#[derive(Debug)]
pub enum Section {
    /// A lone focusable widget.
    Single(WidgetId),
    /// A roving-focus group (one stop, arrow keys inside).
    Roving(RovingGroup),
    /// A nested activatable group (one stop until activated).
    Nested(NestedGroup),
}

impl Section {
    /// The first focusable position of this section.
    pub fn first_position(&self) -> Option<WidgetId> {
        match self {
            Self::Single(w) => Some(*w),
            Self::Roving(g) => g.members().first().copied(),
            Self::Nested(g) => Some(g.handle()),
        }
    }

    /// The last focusable position of this section as seen from the
    /// surrounding order (a collapsed nested group is its handle).
    pub fn last_position(&self) -> Option<WidgetId> {
        match self {
            Self::Single(w) => Some(*w),
            Self::Roving(g) => g.members().last().copied(),
            Self::Nested(g) => Some(g.handle()),
        }
    }

    /// True when `id` belongs to this section.
    pub fn contains(&self, id: WidgetId) -> bool {
        match self {
            Self::Single(w) => *w == id,
            Self::Roving(g) => g.contains(id),
            Self::Nested(g) => g.contains(id),
        }
    }
}

/// Outcome of offering a key to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The sequencer acted; stop dispatching.
    Consumed,
    /// Not a structural match; hand the event to the focused container.
    Ignored,
    /// Escape with nothing activated: the host should close the dialog.
    CloseRequested,
}

impl Dispatch {
    /// Collapse into the container-level result type.
    pub fn to_event_result(self) -> EventResult {
        match self {
            Self::Consumed | Self::CloseRequested => EventResult::Consumed,
            Self::Ignored => EventResult::Ignored,
        }
    }
}

/// Dialog-level controller over the ordered section list.
#[derive(Debug)]
pub struct Sequencer {
    sections: Vec<Section>,
    jump_cycle: SmallVec<[WidgetId; 4]>,
}

impl Sequencer {
    /// Create a sequencer over a declared section order.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            jump_cycle: SmallVec::new(),
        }
    }

    /// Install the declared jump cycle.
    ///
    /// Every target must belong to some declared section and appear only
    /// once; a bad table is a declaration bug and fails here rather than
    /// misbehaving at keypress time.
    pub fn set_jump_cycle(&mut self, cycle: Vec<WidgetId>) -> Result<(), DialogError> {
        for (i, target) in cycle.iter().enumerate() {
            if !self.sections.iter().any(|s| s.contains(*target)) {
                return Err(DialogError::UnknownJumpTarget(*target));
            }
            if cycle[..i].contains(target) {
                return Err(DialogError::DuplicateJumpTarget(*target));
            }
        }
        self.jump_cycle = cycle.into_iter().collect();
        Ok(())
    }

    /// The declared sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable access for routing container-level events.
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// The declared jump cycle.
    pub fn jump_cycle(&self) -> &[WidgetId] {
        &self.jump_cycle
    }

    /// Order index of the section holding the focused widget.
    pub fn active_section_order(&self, ctx: &FocusContext) -> Option<usize> {
        let focused = ctx.focused()?;
        self.sections.iter().position(|s| s.contains(focused))
    }

    /// Offer a structural key to the sequencer.
    pub fn handle_key(&mut self, event: &KeyEvent, ctx: &mut FocusContext) -> Dispatch {
        match event.code {
            KeyCode::Esc => self.handle_escape(ctx),
            KeyCode::Tab | KeyCode::BackTab => self.handle_tab(event.is_shift_tab(), ctx),
            _ if KeyBinding::key(JUMP_KEY).matches(event) => self.handle_jump(true, ctx),
            _ if KeyBinding::shift(JUMP_KEY).matches(event) => self.handle_jump(false, ctx),
            _ => Dispatch::Ignored,
        }
    }

    /// Tab handling: internal wrap inside an activated group, the two
    /// dialog wraparound edges, and nothing else.
    pub fn handle_tab(&mut self, shift: bool, ctx: &mut FocusContext) -> Dispatch {
        // Tab never escapes an activated nested group.
        for section in &mut self.sections {
            if let Section::Nested(group) = section {
                if group.is_activated() && ctx.focus_within(group.handle()) {
                    let key = if shift { KeyCode::BackTab } else { KeyCode::Tab };
                    return match group.on_key(&KeyEvent::plain(key), ctx) {
                        EventResult::Consumed => Dispatch::Consumed,
                        EventResult::Ignored => Dispatch::Ignored,
                    };
                }
            }
        }

        let Some(focused) = ctx.focused() else {
            return Dispatch::Ignored;
        };

        if !shift {
            let at_end = self
                .sections
                .last()
                .and_then(Section::last_position)
                .map(|w| w == focused)
                .unwrap_or(false);
            if at_end && self.enter_section_front(0, ctx) {
                self.sync_nested(ctx);
                return Dispatch::Consumed;
            }
        } else {
            let at_front = self
                .sections
                .first()
                .and_then(Section::first_position)
                .map(|w| w == focused)
                .unwrap_or(false);
            let last = self.sections.len().saturating_sub(1);
            if at_front && self.enter_section_back(last, ctx) {
                self.sync_nested(ctx);
                return Dispatch::Consumed;
            }
        }

        Dispatch::Ignored
    }

    /// Escape closes the innermost activated group, or asks the host to
    /// close the dialog when nothing is activated.
    pub fn handle_escape(&mut self, ctx: &mut FocusContext) -> Dispatch {
        for section in &mut self.sections {
            if let Section::Nested(group) = section {
                if group.is_activated() {
                    group.collapse(ctx);
                    return Dispatch::Consumed;
                }
            }
        }
        Dispatch::CloseRequested
    }

    /// Walk the declared jump cycle one step forward or backward.
    ///
    /// The current landing target is the cycle entry whose section holds
    /// the focused widget; an unrecognized position falls back to the
    /// first target (forward) or the last (backward). Landing on a nested
    /// group always lands on its collapsed handle, never a member.
    pub fn handle_jump(&mut self, forward: bool, ctx: &mut FocusContext) -> Dispatch {
        let n = self.jump_cycle.len();
        if n == 0 {
            return Dispatch::Ignored;
        }

        let current = ctx.focused().and_then(|focused| {
            self.jump_cycle.iter().position(|target| {
                self.sections
                    .iter()
                    .any(|s| s.contains(*target) && s.contains(focused))
            })
        });

        let destination = match (current, forward) {
            (Some(i), true) => self.jump_cycle[(i + 1) % n],
            (Some(i), false) => self.jump_cycle[(i + n - 1) % n],
            (None, true) => self.jump_cycle[0],
            (None, false) => self.jump_cycle[n - 1],
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(?destination, forward, "jump");

        self.land_on(destination, ctx);
        self.sync_nested(ctx);
        Dispatch::Consumed
    }

    /// Host-default sequential advance, applied when [`handle_tab`]
    /// declines: move one section forward or backward, entering groups at
    /// their single stop. Wraps defensively, though the edge cases are
    /// normally taken by `handle_tab` first.
    ///
    /// [`handle_tab`]: Sequencer::handle_tab
    pub fn default_advance(&mut self, shift: bool, ctx: &mut FocusContext) -> bool {
        let count = self.sections.len();
        if count == 0 {
            return false;
        }

        let active = self.active_section_order(ctx);
        let next = match (active, shift) {
            (Some(i), false) => (i + 1) % count,
            (Some(i), true) => (i + count - 1) % count,
            (None, false) => 0,
            (None, true) => count - 1,
        };

        let moved = self.enter_section_stop(next, ctx);
        if moved {
            self.sync_nested(ctx);
        }
        moved
    }

    /// Focus the first position of section `index`.
    fn enter_section_front(&mut self, index: usize, ctx: &mut FocusContext) -> bool {
        match self.sections.get_mut(index) {
            Some(Section::Single(w)) => ctx.focus(*w),
            Some(Section::Roving(g)) => g.focus_first(ctx),
            Some(Section::Nested(g)) => {
                g.force_collapse();
                ctx.focus(g.handle())
            }
            None => false,
        }
    }

    /// Focus the last position of section `index`.
    fn enter_section_back(&mut self, index: usize, ctx: &mut FocusContext) -> bool {
        match self.sections.get_mut(index) {
            Some(Section::Single(w)) => ctx.focus(*w),
            Some(Section::Roving(g)) => {
                let last = g.members().len() as isize - 1;
                last >= 0 && g.focus_member(last, ctx)
            }
            Some(Section::Nested(g)) => {
                g.force_collapse();
                ctx.focus(g.handle())
            }
            None => false,
        }
    }

    /// Focus section `index` at its single-stop entry point (a roving
    /// group's current member; a nested group's collapsed handle).
    fn enter_section_stop(&mut self, index: usize, ctx: &mut FocusContext) -> bool {
        match self.sections.get_mut(index) {
            Some(Section::Single(w)) => ctx.focus(*w),
            Some(Section::Roving(g)) => g.focus_current(ctx),
            Some(Section::Nested(g)) => {
                g.force_collapse();
                ctx.focus(g.handle())
            }
            None => false,
        }
    }

    /// Land on a jump target inside whichever section owns it.
    fn land_on(&mut self, target: WidgetId, ctx: &mut FocusContext) {
        for section in &mut self.sections {
            if !section.contains(target) {
                continue;
            }
            match section {
                Section::Single(w) => {
                    ctx.focus(*w);
                }
                Section::Roving(g) => {
                    g.focus_widget(target, ctx);
                }
                Section::Nested(g) => {
                    // The fader region is always entered collapsed.
                    g.force_collapse();
                    ctx.focus(g.handle());
                }
            }
            return;
        }
    }

    /// Restore the "never activated while focus is elsewhere" invariant
    /// after any focus move the groups did not make themselves.
    pub fn sync_nested(&mut self, ctx: &FocusContext) {
        for section in &mut self.sections {
            if let Section::Nested(group) = section {
                group.sync_with_focus(ctx);
            }
        }
    }
}
