//! Keyboard event types and handler results.
//!
//! The engine consumes a small, terminal-agnostic key vocabulary. Raw
//! [`crossterm`] events convert into [`KeyEvent`] at the edge so the focus
//! machinery never touches backend types directly.
//!
//! Handlers report back through [`EventResult`]: a `Consumed` event stops
//! the dispatch chain, an `Ignored` event falls through to the next layer.
//!
//! # Example
//!
//! ```
//! use faderdeck::events::{EventResult, KeyCode, KeyEvent, KeyModifiers};
//!
//! fn handle(event: &KeyEvent) -> EventResult {
//!     match event.code {
//!         KeyCode::Enter => EventResult::Consumed,
//!         _ => EventResult::Ignored,
//!     }
//! }
//!
//! assert_eq!(handle(&KeyEvent::plain(KeyCode::Enter)), EventResult::Consumed);
//! ```

/// Key codes the focus engine understands.
///
/// Anything else a terminal can produce maps to [`KeyCode::Other`] and is
/// ignored by every handler in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Esc,
    /// Tab (forward sequential navigation).
    Tab,
    /// Shift+Tab (backward sequential navigation).
    BackTab,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Function key (F1 = 1).
    F(u8),
    /// Any key the engine does not route.
    Other,
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Control key.
    pub ctrl: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt/Option key.
    pub alt: bool,
    /// Super/Command/Windows key.
    pub super_key: bool,
}

impl KeyModifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        super_key: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        super_key: false,
    };

    /// Control only.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
        super_key: false,
    };
}

/// A keyboard event: code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifiers held at the time.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create an event with no modifiers.
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create an event with Shift held.
    pub fn shifted(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    /// True for Tab without Shift, or BackTab with Shift-normalization:
    /// both spellings of "sequential forward/backward" collapse here.
    pub fn is_tab(&self) -> bool {
        matches!(self.code, KeyCode::Tab | KeyCode::BackTab)
    }

    /// True when this event means "move backward" for Tab-style keys.
    ///
    /// Terminals report Shift+Tab either as `BackTab` or as `Tab` with the
    /// shift modifier; both are accepted.
    pub fn is_shift_tab(&self) -> bool {
        self.code == KeyCode::BackTab || (self.code == KeyCode::Tab && self.modifiers.shift)
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode as Ct;

        let code = match event.code {
            Ct::Char(c) => KeyCode::Char(c),
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Esc,
            Ct::Tab => KeyCode::Tab,
            Ct::BackTab => KeyCode::BackTab,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::PageUp => KeyCode::PageUp,
            Ct::PageDown => KeyCode::PageDown,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::F(n) => KeyCode::F(n),
            _ => KeyCode::Other,
        };

        let m = event.modifiers;
        let modifiers = KeyModifiers {
            ctrl: m.contains(crossterm::event::KeyModifiers::CONTROL),
            shift: m.contains(crossterm::event::KeyModifiers::SHIFT),
            alt: m.contains(crossterm::event::KeyModifiers::ALT),
            super_key: m.contains(crossterm::event::KeyModifiers::SUPER),
        };

        Self { code, modifiers }
    }
}

/// Result of offering an event to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The handler acted on the event; stop dispatching.
    Consumed,
    /// The handler declined; offer the event to the next layer.
    Ignored,
}

impl EventResult {
    /// True if the event was consumed.
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

/// Key binding helper for matching shortcuts.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// Key code to match.
    pub code: KeyCode,
    /// Required modifier keys.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a binding for a simple key.
    pub fn key(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a binding with Shift modifier.
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    /// Check if this binding matches a key event.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.code == event.code && self.modifiers == event.modifiers
    }
}
