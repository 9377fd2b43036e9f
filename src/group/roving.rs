//! Roving-focus group: one tab stop over N children.
//!
//! Only the current member is a tab stop from the surrounding order's
//! point of view; arrow keys move a `current_index` pointer with
//! wraparound. This is what lets a four-control toolbar behave as a
//! single unit in the dialog's coarse order while every control stays
//! reachable.

use smallvec::SmallVec;

use crate::events::{EventResult, KeyCode, KeyEvent};
use crate::focus::FocusContext;
use crate::widget::WidgetId;

/// Direction of an in-group arrow movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Right/Down: advance.
    Next,
    /// Left/Up: retreat.
    Prev,
}

impl ArrowDirection {
    /// Map an arrow key to a direction; `None` for non-arrow keys.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Right | KeyCode::Down => Some(Self::Next),
            KeyCode::Left | KeyCode::Up => Some(Self::Prev),
            _ => None,
        }
    }

    fn delta(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

/// A container imposing one logical tab stop over its children.
#[derive(Debug)]
pub struct RovingGroup {
    container: WidgetId,
    members: SmallVec<[WidgetId; 8]>,
    current: usize,
}

impl RovingGroup {
    /// Create a group over `container`, deriving the member list from the
    /// arena's current focusable descendants.
    pub fn new(container: WidgetId, ctx: &FocusContext) -> Self {
        let mut group = Self {
            container,
            members: SmallVec::new(),
            current: 0,
        };
        group.rebuild_members(ctx);
        group
    }

    /// The grouping container widget.
    pub fn container(&self) -> WidgetId {
        self.container
    }

    /// Members in declared order.
    pub fn members(&self) -> &[WidgetId] {
        &self.members
    }

    /// Index of the member that is currently the group's tab stop.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The member focus lands on when the group is entered from outside.
    pub fn current_member(&self) -> Option<WidgetId> {
        self.members.get(self.current).copied()
    }

    /// True when `id` is one of this group's members.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.members.contains(&id)
    }

    /// Re-derive the member list after a host structural change.
    ///
    /// `current_index` is clamped to the new length so the invariant
    /// `current < len` holds whenever the group is non-empty.
    pub fn rebuild_members(&mut self, ctx: &FocusContext) {
        self.members = ctx
            .arena()
            .focusable_descendants(self.container)
            .into_iter()
            .collect();
        if !self.members.is_empty() {
            self.current = self.current.min(self.members.len() - 1);
        } else {
            self.current = 0;
        }
    }

    /// Focus the first member.
    pub fn focus_first(&mut self, ctx: &mut FocusContext) -> bool {
        self.focus_member(0, ctx)
    }

    /// Focus the member at `index`, normalized modulo the member count.
    ///
    /// Always succeeds when the group is non-empty and the target is
    /// focusable; an empty group is a silent no-op.
    pub fn focus_member(&mut self, index: isize, ctx: &mut FocusContext) -> bool {
        let n = self.members.len();
        if n == 0 {
            return false;
        }
        let target = index.rem_euclid(n as isize) as usize;
        if ctx.focus(self.members[target]) {
            self.current = target;
            true
        } else {
            false
        }
    }

    /// Programmatic entry from outside the group: lands on the current
    /// member, not necessarily the first.
    pub fn focus_current(&mut self, ctx: &mut FocusContext) -> bool {
        self.focus_member(self.current as isize, ctx)
    }

    /// Focus a specific member by handle, keeping the pointer in step.
    /// No-op when `id` is not a member.
    pub fn focus_widget(&mut self, id: WidgetId, ctx: &mut FocusContext) -> bool {
        match self.members.iter().position(|m| *m == id) {
            Some(i) => self.focus_member(i as isize, ctx),
            None => false,
        }
    }

    /// Move the pointer by one in `direction`, with wraparound, and focus
    /// the new member.
    pub fn on_arrow(&mut self, direction: ArrowDirection, ctx: &mut FocusContext) -> bool {
        let n = self.members.len() as isize;
        if n == 0 {
            return false;
        }
        self.sync_from_focus(ctx);
        let next = (self.current as isize + direction.delta()).rem_euclid(n);
        self.focus_member(next, ctx)
    }

    /// Handle a key while focus is on one of this group's members.
    ///
    /// Arrow keys are consumed; everything else is left for outer layers.
    pub fn on_key(&mut self, event: &KeyEvent, ctx: &mut FocusContext) -> EventResult {
        if !ctx.focused().map(|f| self.contains(f)).unwrap_or(false) {
            return EventResult::Ignored;
        }
        match ArrowDirection::from_key(event.code) {
            Some(direction) => {
                self.on_arrow(direction, ctx);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    /// Keep `current_index` in step when focus landed on a member through
    /// some path other than the group's own methods.
    fn sync_from_focus(&mut self, ctx: &FocusContext) {
        if let Some(focused) = ctx.focused() {
            if let Some(i) = self.members.iter().position(|m| *m == focused) {
                self.current = i;
            }
        }
    }
}
