//! Dialog-scoped focus state.
//!
//! [`FocusContext`] tracks the single "currently focused widget" for one
//! dialog instance. It is passed explicitly into every container
//! operation rather than living in process-global state, so multiple
//! dialogs coexist without cross-talk and tests can inject a fresh
//! context.
//!
//! Focus requests follow the crate's error policy: a request naming an
//! unattached or unfocusable widget does not fail, it simply leaves focus
//! where it was (with at most one retry against a declared fallback
//! target). Focus-order misses must never crash an interactive session.

use crate::widget::{WidgetArena, WidgetId};

/// Focus state for one open dialog.
///
/// Owns the dialog's [`WidgetArena`] so that every focus decision and
/// every member-list rebuild reads the same attached-widget tree.
#[derive(Debug)]
pub struct FocusContext {
    arena: WidgetArena,
    focused: Option<WidgetId>,
    pending: Option<WidgetId>,
    fallback: Option<WidgetId>,
}

impl FocusContext {
    /// Create a context over a declared widget tree.
    pub fn new(arena: WidgetArena) -> Self {
        Self {
            arena,
            focused: None,
            pending: None,
            fallback: None,
        }
    }

    /// The attached widget tree.
    pub fn arena(&self) -> &WidgetArena {
        &self.arena
    }

    /// Mutable access to the widget tree (host-driven structural changes).
    pub fn arena_mut(&mut self) -> &mut WidgetArena {
        &mut self.arena
    }

    /// The widget that currently holds focus, if any.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Declare the default target used when a focus request misses.
    ///
    /// The engine retries a rejected request against this target exactly
    /// once; if the fallback is itself unfocusable the request is dropped.
    pub fn set_fallback(&mut self, id: WidgetId) {
        self.fallback = Some(id);
    }

    /// Move focus to `id`.
    ///
    /// Returns `true` when focus moved (to `id` or, on a miss, to the
    /// declared fallback). Returns `false` and changes nothing when
    /// neither target is attached and focusable.
    pub fn focus(&mut self, id: WidgetId) -> bool {
        if self.arena.is_focusable(id) {
            #[cfg(feature = "tracing")]
            tracing::trace!(from = ?self.focused, to = ?id, "focus");
            self.focused = Some(id);
            return true;
        }

        // Single fallback attempt, never a retry loop.
        if let Some(fallback) = self.fallback {
            if fallback != id && self.arena.is_focusable(fallback) {
                #[cfg(feature = "tracing")]
                tracing::debug!(missed = ?id, fallback = ?fallback, "focus fell back");
                self.focused = Some(fallback);
                return true;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(missed = ?id, "focus request dropped");
        false
    }

    /// Clear focus entirely.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Schedule a deferred focus move.
    ///
    /// Used for initial-focus assignment on dialog open: focusing an
    /// element not yet attached is a no-op, so the dialog records the
    /// target and the host applies it after mount via [`flush_pending`].
    /// A second request before the flush replaces the first.
    ///
    /// [`flush_pending`]: FocusContext::flush_pending
    pub fn request_focus(&mut self, id: WidgetId) {
        self.pending = Some(id);
    }

    /// Apply a scheduled focus move, if one is pending.
    pub fn flush_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(id) => self.focus(id),
            None => false,
        }
    }

    /// True when the focused widget lies inside `container`'s subtree.
    pub fn focus_within(&self, container: WidgetId) -> bool {
        self.focused
            .map(|f| self.arena.is_within(container, f))
            .unwrap_or(false)
    }

    /// Tear down at dialog close: drops focus, pending moves, and the
    /// widget tree. No transition may fire after this.
    pub fn teardown(&mut self) {
        self.focused = None;
        self.pending = None;
        self.fallback = None;
        self.arena.clear();
    }
}
