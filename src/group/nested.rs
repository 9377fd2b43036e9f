//! Nested activatable group: one collapsed tab stop that opens into an
//! internal roving region.
//!
//! Collapsed, the group handle is a single external tab stop and no
//! member is individually reachable by sequential navigation. Enter or
//! Space on the handle activates the group: focus drops to the first
//! member and Tab/Shift+Tab wrap *inside* the group until Escape returns
//! focus to the handle. A structural focus move out of the subtree (a
//! jump command, teardown) forces the group collapsed, so it never
//! reports activated while focus is elsewhere.
//!
//! This is how 32 near-identical faders cost a single keypress to step
//! over in the coarse order yet remain individually reachable on demand.

use smallvec::SmallVec;

use crate::events::{EventResult, KeyCode, KeyEvent};
use crate::focus::FocusContext;
use crate::widget::WidgetId;

/// A container that is one tab stop until activated.
#[derive(Debug)]
pub struct NestedGroup {
    handle: WidgetId,
    members: SmallVec<[WidgetId; 32]>,
    current: usize,
    activated: bool,
}

impl NestedGroup {
    /// Create a group whose focusable container widget is `handle`,
    /// deriving members from the arena.
    pub fn new(handle: WidgetId, ctx: &FocusContext) -> Self {
        let mut group = Self {
            handle,
            members: SmallVec::new(),
            current: 0,
            activated: false,
        };
        group.rebuild_members(ctx);
        group
    }

    /// The group's own focusable handle widget.
    pub fn handle(&self) -> WidgetId {
        self.handle
    }

    /// Members in declared order.
    pub fn members(&self) -> &[WidgetId] {
        &self.members
    }

    /// Index of the member focus is on (meaningful while activated).
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// True while the internal roving region is open.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// The member currently holding the internal position.
    pub fn current_member(&self) -> Option<WidgetId> {
        self.members.get(self.current).copied()
    }

    /// True when `id` is the handle or any member.
    pub fn contains(&self, id: WidgetId) -> bool {
        id == self.handle || self.members.contains(&id)
    }

    /// Re-derive the member list after a host structural change, clamping
    /// the internal position to the new length.
    pub fn rebuild_members(&mut self, ctx: &FocusContext) {
        self.members = ctx
            .arena()
            .focusable_descendants(self.handle)
            .into_iter()
            .collect();
        if !self.members.is_empty() {
            self.current = self.current.min(self.members.len() - 1);
        } else {
            self.current = 0;
        }
    }

    /// Open the internal region: position resets to the first member and
    /// focus moves there. A group with no members stays collapsed.
    pub fn activate(&mut self, ctx: &mut FocusContext) -> bool {
        let Some(first) = self.members.first().copied() else {
            return false;
        };
        if ctx.focus(first) {
            self.activated = true;
            self.current = 0;
            #[cfg(feature = "tracing")]
            tracing::debug!(handle = ?self.handle, "nested group activated");
            true
        } else {
            false
        }
    }

    /// Close the internal region and return focus to the handle itself,
    /// never to a member.
    pub fn collapse(&mut self, ctx: &mut FocusContext) -> bool {
        self.activated = false;
        #[cfg(feature = "tracing")]
        tracing::debug!(handle = ?self.handle, "nested group collapsed");
        ctx.focus(self.handle)
    }

    /// Collapse without touching focus. Used when a structural command
    /// already moved focus out of the subtree.
    pub fn force_collapse(&mut self) {
        self.activated = false;
    }

    /// Enforce the invariant that the group is never activated while
    /// focus is outside its subtree. Call after any focus move the group
    /// did not make itself.
    pub fn sync_with_focus(&mut self, ctx: &FocusContext) {
        if self.activated && !ctx.focus_within(self.handle) {
            self.force_collapse();
        }
    }

    /// Handle a key while focus is on the handle or inside the region.
    ///
    /// Collapsed + handle focused: Enter/Space activates. Activated with
    /// focus inside: Tab/Shift+Tab wrap through members (the event never
    /// escapes to the surrounding order), Escape collapses. Anything else
    /// is ignored.
    pub fn on_key(&mut self, event: &KeyEvent, ctx: &mut FocusContext) -> EventResult {
        if !self.activated {
            let on_handle = ctx.focused() == Some(self.handle);
            let is_activation =
                matches!(event.code, KeyCode::Enter | KeyCode::Char(' '));
            if on_handle && is_activation {
                self.activate(ctx);
                return EventResult::Consumed;
            }
            return EventResult::Ignored;
        }

        if !ctx.focus_within(self.handle) {
            // Stale activation; repair state and decline the event.
            self.force_collapse();
            return EventResult::Ignored;
        }

        match event.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let delta: isize = if event.is_shift_tab() { -1 } else { 1 };
                self.step(delta, ctx);
                EventResult::Consumed
            }
            KeyCode::Esc => {
                self.collapse(ctx);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn step(&mut self, delta: isize, ctx: &mut FocusContext) {
        let n = self.members.len() as isize;
        if n == 0 {
            return;
        }
        self.sync_from_focus(ctx);
        let next = (self.current as isize + delta).rem_euclid(n) as usize;
        if ctx.focus(self.members[next]) {
            self.current = next;
        }
    }

    fn sync_from_focus(&mut self, ctx: &FocusContext) {
        if let Some(focused) = ctx.focused() {
            if let Some(i) = self.members.iter().position(|m| *m == focused) {
                self.current = i;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::widget::{WidgetArena, WidgetDecl};

    fn bank(n: usize) -> (NestedGroup, FocusContext, Vec<WidgetId>) {
        let mut arena = WidgetArena::new();
        let handle = arena.attach(None, WidgetDecl::focusable_container("faders"));
        let members: Vec<WidgetId> = (0..n)
            .map(|i| arena.attach(Some(handle), WidgetDecl::control(format!("f{i}"))))
            .collect();
        let ctx = FocusContext::new(arena);
        let group = NestedGroup::new(handle, &ctx);
        (group, ctx, members)
    }

    #[test]
    fn test_starts_collapsed() {
        let (group, _, _) = bank(4);
        assert!(!group.is_activated());
    }

    #[test]
    fn test_enter_on_handle_activates_first_member() {
        let (mut group, mut ctx, members) = bank(4);
        ctx.focus(group.handle());

        let result = group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        assert_eq!(result, EventResult::Consumed);
        assert!(group.is_activated());
        assert_eq!(group.current_index(), 0);
        assert_eq!(ctx.focused(), Some(members[0]));
    }

    #[test]
    fn test_space_also_activates() {
        let (mut group, mut ctx, members) = bank(2);
        ctx.focus(group.handle());

        group.on_key(&KeyEvent::plain(KeyCode::Char(' ')), &mut ctx);
        assert!(group.is_activated());
        assert_eq!(ctx.focused(), Some(members[0]));
    }

    #[test]
    fn test_enter_elsewhere_ignored() {
        let (mut group, mut ctx, _) = bank(2);
        let outside = ctx.arena_mut().attach(None, WidgetDecl::control("out"));
        ctx.focus(outside);

        let result = group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        assert_eq!(result, EventResult::Ignored);
        assert!(!group.is_activated());
    }

    #[test]
    fn test_tab_wraps_inside_group() {
        let (mut group, mut ctx, members) = bank(3);
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);

        let tab = KeyEvent::plain(KeyCode::Tab);
        for expected in [1, 2, 0, 1] {
            assert_eq!(group.on_key(&tab, &mut ctx), EventResult::Consumed);
            assert_eq!(ctx.focused(), Some(members[expected]));
        }
    }

    #[test]
    fn test_shift_tab_wraps_backward() {
        let (mut group, mut ctx, members) = bank(3);
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);

        let back = KeyEvent::plain(KeyCode::BackTab);
        assert_eq!(group.on_key(&back, &mut ctx), EventResult::Consumed);
        assert_eq!(ctx.focused(), Some(members[2]));
    }

    #[test]
    fn test_escape_returns_to_handle_never_member() {
        let (mut group, mut ctx, _) = bank(3);
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        group.on_key(&KeyEvent::plain(KeyCode::Tab), &mut ctx);

        let result = group.on_key(&KeyEvent::plain(KeyCode::Esc), &mut ctx);
        assert_eq!(result, EventResult::Consumed);
        assert!(!group.is_activated());
        assert_eq!(ctx.focused(), Some(group.handle()));
    }

    #[test]
    fn test_focus_departure_forces_collapse() {
        let (mut group, mut ctx, _) = bank(3);
        let outside = ctx.arena_mut().attach(None, WidgetDecl::control("out"));
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        assert!(group.is_activated());

        ctx.focus(outside);
        group.sync_with_focus(&ctx);
        assert!(!group.is_activated());
    }

    #[test]
    fn test_empty_group_stays_collapsed_on_enter() {
        let (mut group, mut ctx, _) = bank(0);
        ctx.focus(group.handle());

        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        assert!(!group.is_activated());
        assert_eq!(ctx.focused(), Some(group.handle()));
    }

    #[test]
    fn test_activation_resets_position_to_first() {
        let (mut group, mut ctx, members) = bank(3);
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        group.on_key(&KeyEvent::plain(KeyCode::Tab), &mut ctx);
        group.on_key(&KeyEvent::plain(KeyCode::Esc), &mut ctx);

        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        assert_eq!(group.current_index(), 0);
        assert_eq!(ctx.focused(), Some(members[0]));
    }

    #[test]
    fn test_rebuild_clamps_position() {
        let (mut group, mut ctx, members) = bank(3);
        ctx.focus(group.handle());
        group.on_key(&KeyEvent::plain(KeyCode::Enter), &mut ctx);
        group.on_key(&KeyEvent::plain(KeyCode::Tab), &mut ctx);
        group.on_key(&KeyEvent::plain(KeyCode::Tab), &mut ctx);
        assert_eq!(group.current_index(), 2);

        ctx.arena_mut().detach(members[2]);
        group.rebuild_members(&ctx);
        assert_eq!(group.current_index(), 1);
    }
}
