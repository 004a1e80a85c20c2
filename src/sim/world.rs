/// WorldState: the complete snapshot of a running session.
///
/// ## Session lifecycle
///
/// `Title` is idle. `start_game` builds a level and enters `Playing`.
/// `paused` freezes a running session without leaving `Playing`; since
/// every timer in the simulation is a tick countdown, freezing the
/// step freezes them all. Energy at zero moves through `Dying` (a short
/// on-screen collapse) into `Lost`; the boss's removal delay expiring
/// moves to `Won`. Both are terminal until restart or return to title.
///
/// All lifecycle methods are idempotent: calling one while already in
/// its target state is a no-op, never a double transition.
///
/// ## Camera / Viewport
///
/// World coordinates and screen cells are separate:
///   - `camera` — viewport into the world, in world units
///   - The renderer decides how many world units one terminal cell
///     spans and sets the view size each frame.
///   - Horizontally the camera trails the character with a fixed lead;
///     vertically it anchors to the bottom so the ground line never
///     leaves the screen and spare rows become sky.

use crate::config::TuningConfig;
use crate::domain::boss::Boss;
use crate::domain::entity::{
    Body, Bottle, Character, Chicken, Cloud, Coin, GroundBottle, WORLD_H, WORLD_W,
};

/// Coin meter step per pickup and its cap.
pub const COIN_STEP: u32 = 20;
pub const COIN_METER_MAX: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    Dying,
    Won,
    Lost,
}

/// All hostiles live in one list so collision passes and removal
/// sweeps see them uniformly; behavior dispatches on the variant.
#[derive(Clone, Debug)]
pub enum Enemy {
    Chicken(Chicken),
    Boss(Boss),
}

impl Enemy {
    pub fn body(&self) -> &Body {
        match self {
            Enemy::Chicken(c) => &c.body,
            Enemy::Boss(b) => &b.body,
        }
    }

    pub fn is_removed(&self) -> bool {
        match self {
            Enemy::Chicken(c) => c.remove,
            Enemy::Boss(b) => b.remove,
        }
    }
}

/// Camera: a viewport into the world, in world units.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World x of the left edge of the viewport.
    pub x: f32,
    /// World y of the top edge. Negative when the viewport is taller
    /// than the world; the renderer paints sky up there.
    pub y: f32,
    /// World units visible horizontally. Set during `render()` from
    /// the terminal size.
    pub view_w: f32,
    /// World units visible vertically.
    pub view_h: f32,
}

impl Camera {
    /// The character rides this many world units in from the left edge.
    pub const LEAD: f32 = 100.0;

    pub fn new() -> Self {
        Camera { x: 0.0, y: 0.0, view_w: 0.0, view_h: 0.0 }
    }

    /// Record the viewport size and re-anchor vertically to the world
    /// bottom.
    pub fn set_view(&mut self, view_w: f32, view_h: f32) {
        self.view_w = view_w;
        self.view_h = view_h;
        self.y = WORLD_H - view_h;
    }

    /// Trail the target horizontally, clamped to the world so the
    /// viewport never shows past either end.
    pub fn follow(&mut self, target_x: f32) {
        if self.view_w <= 0.0 {
            return;
        }
        let max_x = (WORLD_W - self.view_w).max(0.0);
        self.x = (target_x - Self::LEAD).clamp(0.0, max_x);
    }
}

pub struct WorldState {
    // ── Entities ──
    pub character: Character,
    /// Chickens and the boss, in one sweep-friendly list.
    pub enemies: Vec<Enemy>,
    /// Bottles in flight (and their lingering splashes).
    pub bottles: Vec<Bottle>,
    pub coins: Vec<Coin>,
    pub ground_bottles: Vec<GroundBottle>,
    pub clouds: Vec<Cloud>,

    // ── Meters ──
    /// Coin meter, 0..=100 in steps of 20.
    pub coin_meter: u32,
    /// Bottles the character is carrying.
    pub bottle_count: u32,

    // ── Tuning ──
    pub tuning: TuningConfig,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,

    // ── Animation ──
    /// Free-running counter for presentation-only animation (title
    /// blink, dying flash). Not the simulation tick.
    pub anim_tick: u32,

    // ── Pause ──
    pub paused: bool,

    // ── Camera / Viewport ──
    pub camera: Camera,
}

// ── Construction ──

impl WorldState {
    pub fn new(tuning: TuningConfig) -> Self {
        let character = Character::new(tuning.character_speed);
        WorldState {
            character,
            enemies: vec![],
            bottles: vec![],
            coins: vec![],
            ground_bottles: vec![],
            clouds: vec![],
            coin_meter: 0,
            bottle_count: 0,
            tuning,
            phase: Phase::Title,
            tick: 0,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
            paused: false,
            camera: Camera::new(),
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Session lifecycle ──

impl WorldState {
    /// Freeze a running session. No-op in any other phase or when
    /// already paused.
    pub fn pause_game(&mut self) {
        if self.phase == Phase::Playing && !self.paused {
            self.paused = true;
        }
    }

    /// Unfreeze. No-op when not paused.
    pub fn resume_game(&mut self) {
        if self.paused {
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume_game();
        } else {
            self.pause_game();
        }
    }
}

// ── Enemy queries ──

impl WorldState {
    pub fn boss(&self) -> Option<&Boss> {
        self.enemies.iter().find_map(|e| match e {
            Enemy::Boss(b) => Some(b),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_only_applies_to_a_running_session() {
        let mut w = WorldState::new(TuningConfig::default());
        w.pause_game();
        assert!(!w.paused);
        w.phase = Phase::Playing;
        w.pause_game();
        assert!(w.paused);
        // Second pause changes nothing; resume twice likewise.
        w.pause_game();
        assert!(w.paused);
        w.resume_game();
        assert!(!w.paused);
        w.resume_game();
        assert!(!w.paused);
    }

    #[test]
    fn camera_trails_with_lead_and_clamps_at_both_ends() {
        let mut cam = Camera::new();
        cam.set_view(720.0, 480.0);
        cam.follow(50.0);
        assert_eq!(cam.x, 0.0);
        cam.follow(600.0);
        assert_eq!(cam.x, 500.0);
        cam.follow(WORLD_W);
        assert_eq!(cam.x, WORLD_W - 720.0);
    }

    #[test]
    fn camera_anchors_to_the_world_bottom() {
        let mut cam = Camera::new();
        cam.set_view(720.0, 480.0);
        assert_eq!(cam.y, 0.0);
        // Taller viewport: top edge rises above the world into sky.
        cam.set_view(720.0, 600.0);
        assert_eq!(cam.y, -120.0);
        // Shorter viewport: ground stays visible, sky is cropped.
        cam.set_view(720.0, 320.0);
        assert_eq!(cam.y, 160.0);
    }
}
