//! Fader value control.
//!
//! A fader is a focusable widget with a bounded integer value and
//! keyboard step semantics: arrows step by 1, Page keys by 5, Home jumps
//! to the maximum and End to the minimum (the fader is vertical; Home is
//! the top of the track). Pointer and touch input reach the fader only as
//! a normalized `[0, 1]` track position; the pixel-to-position mapping
//! belongs to the host.
//!
//! Every value-changing key arms a transient readout (the "+3 dB" bubble
//! next to the thumb). The readout stays visible for 1.5 s from the most
//! recent keypress and hides immediately on blur. Visibility is a
//! deadline the host polls at render time through a shared
//! [`ReadoutHandle`]; arming replaces any earlier deadline, so there is
//! never more than one pending timer per fader.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use faderdeck::events::{EventResult, KeyCode, KeyEvent};
//! use faderdeck::fader::Fader;
//! use faderdeck::widget::{WidgetArena, WidgetDecl};
//!
//! let mut arena = WidgetArena::new();
//! let id = arena.attach(None, WidgetDecl::control("1K"));
//!
//! let mut fader = Fader::new(id, "1K", -20, 20);
//! let now = Instant::now();
//! assert_eq!(fader.on_key(&KeyEvent::plain(KeyCode::Up), now), EventResult::Consumed);
//! assert_eq!(fader.value(), 1);
//! assert!(fader.readout().is_visible(now));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::events::{EventResult, KeyCode, KeyEvent};
use crate::widget::WidgetId;

/// Fine step for arrow keys.
const STEP: i32 = 1;

/// Coarse step for PageUp/PageDown.
const PAGE_STEP: i32 = 5;

/// How long the readout stays visible after the last keypress.
pub const READOUT_DURATION: Duration = Duration::from_millis(1500);

/// Shared visibility flag for a fader's transient value readout.
///
/// Cloneable; the host keeps one clone per fader and polls
/// [`is_visible`](ReadoutHandle::is_visible) when rendering.
#[derive(Debug, Clone, Default)]
pub struct ReadoutHandle {
    deadline: Arc<RwLock<Option<Instant>>>,
}

impl ReadoutHandle {
    /// Arm (or re-arm) the readout from `now`. Replaces any pending
    /// deadline.
    fn arm(&self, now: Instant) {
        *self.deadline.write() = Some(now + READOUT_DURATION);
    }

    /// Cancel the readout immediately.
    fn clear(&self) {
        *self.deadline.write() = None;
    }

    /// True while the readout should be drawn.
    pub fn is_visible(&self, now: Instant) -> bool {
        self.deadline.read().map(|d| now < d).unwrap_or(false)
    }
}

/// A bounded-value slider control (one EQ band).
#[derive(Debug)]
pub struct Fader {
    id: WidgetId,
    band: String,
    value: i32,
    min: i32,
    max: i32,
    readout: ReadoutHandle,
}

impl Fader {
    /// Create a fader for the widget `id` with the given bounds.
    ///
    /// The initial value is 0, clamped into `[min, max]`.
    pub fn new(id: WidgetId, band: impl Into<String>, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            id,
            band: band.into(),
            value: 0.clamp(min, max),
            min,
            max,
            readout: ReadoutHandle::default(),
        }
    }

    /// The widget handle this fader answers for.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The frequency-band label (e.g. `"1K"`).
    pub fn band(&self) -> &str {
        &self.band
    }

    /// Current value.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Lower bound.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Store `v` clamped to `[min, max]`; returns the stored value.
    pub fn set_value(&mut self, v: i32) -> i32 {
        self.value = v.clamp(self.min, self.max);
        self.value
    }

    /// Set the value from a normalized track position `p` in `[0, 1]`
    /// (0 = bottom of track = minimum). Out-of-range positions clamp.
    pub fn set_value_from_normalized(&mut self, p: f64) -> i32 {
        let p = p.clamp(0.0, 1.0);
        let span = f64::from(self.max - self.min);
        let v = f64::from(self.min) + p * span;
        self.set_value(v.round() as i32)
    }

    /// Handle a key while this fader holds focus.
    ///
    /// Value-changing keys adjust the value, arm the readout, and consume
    /// the event. Every other key is ignored and left for outer layers.
    pub fn on_key(&mut self, event: &KeyEvent, now: Instant) -> EventResult {
        let target = match event.code {
            KeyCode::Up | KeyCode::Right => self.value + STEP,
            KeyCode::Down | KeyCode::Left => self.value - STEP,
            KeyCode::PageUp => self.value + PAGE_STEP,
            KeyCode::PageDown => self.value - PAGE_STEP,
            KeyCode::Home => self.max,
            KeyCode::End => self.min,
            _ => return EventResult::Ignored,
        };

        self.set_value(target);
        self.readout.arm(now);

        #[cfg(feature = "tracing")]
        tracing::trace!(band = %self.band, value = self.value, "fader adjusted");

        EventResult::Consumed
    }

    /// Notify the fader it lost focus: the readout hides at once.
    pub fn on_blur(&self) {
        self.readout.clear();
    }

    /// Shared handle the host renders the readout from.
    pub fn readout(&self) -> ReadoutHandle {
        self.readout.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::widget::{WidgetArena, WidgetDecl};

    fn fader() -> Fader {
        let mut arena = WidgetArena::new();
        let id = arena.attach(None, WidgetDecl::control("1K"));
        Fader::new(id, "1K", -20, 20)
    }

    #[test]
    fn test_set_value_clamps() {
        let mut f = fader();
        assert_eq!(f.set_value(25), 20);
        assert_eq!(f.set_value(-100), -20);
        assert_eq!(f.set_value(7), 7);
    }

    #[test]
    fn test_clamping_is_idempotent() {
        let mut f = fader();
        for v in [-1000, -20, -3, 0, 19, 20, 99] {
            let once = f.set_value(v);
            let twice = f.set_value(once);
            assert_eq!(once, twice);
            assert!(twice >= f.min() && twice <= f.max());
        }
    }

    #[test]
    fn test_arrow_steps() {
        let mut f = fader();
        let now = Instant::now();
        f.on_key(&KeyEvent::plain(KeyCode::Up), now);
        f.on_key(&KeyEvent::plain(KeyCode::Right), now);
        assert_eq!(f.value(), 2);
        f.on_key(&KeyEvent::plain(KeyCode::Down), now);
        f.on_key(&KeyEvent::plain(KeyCode::Left), now);
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn test_page_home_end() {
        let mut f = fader();
        let now = Instant::now();
        f.on_key(&KeyEvent::plain(KeyCode::PageUp), now);
        assert_eq!(f.value(), 5);
        f.on_key(&KeyEvent::plain(KeyCode::PageDown), now);
        assert_eq!(f.value(), 0);
        f.on_key(&KeyEvent::plain(KeyCode::Home), now);
        assert_eq!(f.value(), 20);
        f.on_key(&KeyEvent::plain(KeyCode::End), now);
        assert_eq!(f.value(), -20);
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        let mut f = fader();
        let now = Instant::now();
        f.set_value(20);
        f.on_key(&KeyEvent::plain(KeyCode::Up), now);
        assert_eq!(f.value(), 20);
        f.on_key(&KeyEvent::plain(KeyCode::PageUp), now);
        assert_eq!(f.value(), 20);
    }

    #[test]
    fn test_unrelated_key_ignored_no_readout() {
        let mut f = fader();
        let now = Instant::now();
        let result = f.on_key(&KeyEvent::plain(KeyCode::Char('x')), now);
        assert_eq!(result, EventResult::Ignored);
        assert_eq!(f.value(), 0);
        assert!(!f.readout().is_visible(now));
    }

    #[test]
    fn test_readout_arms_and_expires() {
        let mut f = fader();
        let now = Instant::now();
        f.on_key(&KeyEvent::plain(KeyCode::Up), now);

        let readout = f.readout();
        assert!(readout.is_visible(now));
        assert!(readout.is_visible(now + Duration::from_millis(1400)));
        assert!(!readout.is_visible(now + READOUT_DURATION));
    }

    #[test]
    fn test_readout_reset_on_each_keypress() {
        let mut f = fader();
        let start = Instant::now();
        f.on_key(&KeyEvent::plain(KeyCode::Up), start);

        // A later keypress pushes the deadline out.
        let later = start + Duration::from_millis(1000);
        f.on_key(&KeyEvent::plain(KeyCode::Up), later);

        let readout = f.readout();
        assert!(readout.is_visible(start + Duration::from_millis(2000)));
        assert!(!readout.is_visible(later + READOUT_DURATION));
    }

    #[test]
    fn test_readout_hides_on_blur() {
        let mut f = fader();
        let now = Instant::now();
        f.on_key(&KeyEvent::plain(KeyCode::Up), now);
        assert!(f.readout().is_visible(now));

        f.on_blur();
        assert!(!f.readout().is_visible(now));
    }

    #[test]
    fn test_normalized_position() {
        let mut f = fader();
        assert_eq!(f.set_value_from_normalized(0.0), -20);
        assert_eq!(f.set_value_from_normalized(1.0), 20);
        assert_eq!(f.set_value_from_normalized(0.5), 0);
        // Out-of-range positions clamp instead of extrapolating.
        assert_eq!(f.set_value_from_normalized(1.5), 20);
        assert_eq!(f.set_value_from_normalized(-0.25), -20);
    }

    #[test]
    fn test_inverted_bounds_normalize() {
        let mut arena = WidgetArena::new();
        let id = arena.attach(None, WidgetDecl::control("x"));
        let f = Fader::new(id, "x", 20, -20);
        assert_eq!(f.min(), -20);
        assert_eq!(f.max(), 20);
    }
}
