/// Keyboard state tracker.
///
/// One key stream serves two kinds of reads:
///   - held keys for continuous motion (run, jump)
///   - fresh presses for one-shot actions (throw, menu picks)
///
/// A terminal normally reports presses and autorepeats but no releases,
/// so "held" is inferred: a key counts as down until its repeat stream
/// has been silent for HOLD_TIMEOUT. Under the kitty keyboard protocol
/// real Release events arrive and `honor_release` makes tracking exact.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, poll};

/// Silence on a key's repeat stream longer than this reads as release.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Last Press/Repeat instant per key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from up to down during the latest drain.
    fresh: Vec<KeyCode>,

    /// Ctrl+C arrived during the latest drain.
    ctrl_c: bool,

    /// Trust Release events instead of the timeout. Left off until a
    /// terminal is known to deliver them.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain every pending terminal event without blocking. Call once
    /// per poll iteration; fresh presses last until the next call.
    pub fn drain_events(&mut self) {
        self.fresh.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                _ => continue,
            };
            match key.kind {
                KeyEventKind::Release => {
                    if self.honor_release {
                        self.last_active.remove(&key.code);
                    }
                }
                _ => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                    {
                        self.ctrl_c = true;
                    }
                    if !self.held_now(key.code) {
                        self.fresh.push(key.code);
                    }
                    self.last_active.insert(key.code, Instant::now());
                }
            }
        }

        // Sweep keys whose repeat stream has gone quiet.
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is any of these keys currently down?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.held_now(*c))
    }

    /// Did any of these keys go down during the latest drain?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    fn held_now(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
