//! Core entity types shared between the simulation and the UI.
//!
//! Everything here is plain data plus small lifecycle methods. Entities
//! never remove themselves or touch each other; the step function owns
//! all cross-entity decisions and the removal sweeps.
//!
//! Coordinates are world units with the origin at the top-left: x grows
//! rightward, y grows DOWNWARD. `velocity_y` is positive while rising,
//! which is why gravity subtracts from y (see `kinematics`).

/// World-unit y of the ground line. Entity bottoms rest here.
pub const GROUND_Y: f32 = 430.0;

/// The character cannot walk past this x; the boss arena lies beyond.
pub const LEVEL_END_X: f32 = 2200.0;

/// Horizontal extent of the scrollable world, camera clamp included.
pub const WORLD_W: f32 = 2876.0;

/// Vertical extent of the world. The camera anchors to the bottom edge.
pub const WORLD_H: f32 = 480.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Copy shrunk by `d` on every side, for tighter pickup hitboxes.
    /// Extents never go negative.
    pub fn inset(&self, d: f32) -> Body {
        Body {
            x: self.x + d,
            y: self.y + d,
            w: (self.w - 2.0 * d).max(0.0),
            h: (self.h - 2.0 * d).max(0.0),
        }
    }
}

/// Input snapshot consumed by one simulation tick.
///
/// Movement flags carry held state; `throw` is already edge-triggered
/// by the input layer, so one press yields exactly one bottle.
#[derive(Clone, Copy, Default, Debug)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub throw: bool,
}

/// The player character.
#[derive(Clone, Debug)]
pub struct Character {
    pub body: Body,
    pub facing: Facing,
    pub velocity_y: f32,
    pub speed: f32,
    pub energy: i32,
    /// Ticks left in the post-hit mercy window. Damage is a no-op
    /// while nonzero.
    pub invuln: u32,
    /// Walked this tick; drives the walk animation.
    pub moving: bool,
    pub frame: u32,
}

impl Character {
    pub const WIDTH: f32 = 100.0;
    pub const HEIGHT: f32 = 250.0;
    pub const SPAWN_X: f32 = 120.0;
    pub const SPAWN_Y: f32 = 60.0;
    pub const MAX_ENERGY: i32 = 100;
    pub const HIT_DAMAGE: i32 = 10;

    pub fn new(speed: f32) -> Self {
        Character {
            body: Body::new(Self::SPAWN_X, Self::SPAWN_Y, Self::WIDTH, Self::HEIGHT),
            facing: Facing::Right,
            velocity_y: 0.0,
            speed,
            energy: Self::MAX_ENERGY,
            invuln: 0,
            moving: false,
            frame: 0,
        }
    }

    /// Apply one hit. Returns false without effect while the mercy
    /// window from a previous hit is still open.
    pub fn hit(&mut self, invuln_ticks: u32) -> bool {
        if self.invuln > 0 || self.is_dead() {
            return false;
        }
        self.energy = (self.energy - Self::HIT_DAMAGE).max(0);
        self.invuln = invuln_ticks;
        true
    }

    pub fn heal(&mut self, amount: i32) {
        self.energy = (self.energy + amount).min(Self::MAX_ENERGY);
    }

    pub fn is_hurt(&self) -> bool {
        self.invuln > 0
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChickenKind {
    Normal,
    Small,
}

impl ChickenKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            ChickenKind::Normal => (80.0, 80.0),
            ChickenKind::Small => (50.0, 40.0),
        }
    }
}

/// Ground-bound walker. Marches left forever; the level is long enough
/// that none reach the character spawn before the session ends.
#[derive(Clone, Debug)]
pub struct Chicken {
    pub body: Body,
    pub kind: ChickenKind,
    pub speed: f32,
    pub dead: bool,
    /// Ticks until the corpse is swept, counted once dead.
    pub decay: u32,
    pub remove: bool,
    pub frame: u32,
}

impl Chicken {
    pub fn new(kind: ChickenKind, x: f32, speed: f32) -> Self {
        let (w, h) = kind.size();
        Chicken {
            body: Body::new(x, GROUND_Y - h, w, h),
            kind,
            speed,
            dead: false,
            decay: 0,
            remove: false,
            frame: 0,
        }
    }

    /// Kill and start the decay countdown. Idempotent: a second call
    /// neither restarts the countdown nor re-squashes the body.
    pub fn die(&mut self, decay_ticks: u32) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.decay = decay_ticks;
        // Squash the corpse against the ground.
        let drop = match self.kind {
            ChickenKind::Normal => 20.0,
            ChickenKind::Small => 10.0,
        };
        self.body.y += drop;
        self.body.h = (self.body.h - drop).max(0.0);
    }

    pub fn update(&mut self) {
        if self.dead {
            if self.decay > 0 {
                self.decay -= 1;
            }
            if self.decay == 0 {
                self.remove = true;
            }
            return;
        }
        self.body.x -= self.speed;
        self.frame = self.frame.wrapping_add(1);
    }
}

/// Thrown salsa bottle. Flies on a fixed arc until it breaks on an
/// enemy or the ground, then lingers as a splash for a few ticks.
#[derive(Clone, Debug)]
pub struct Bottle {
    pub body: Body,
    pub dir: Facing,
    pub speed: f32,
    pub velocity_y: f32,
    pub broken: bool,
    pub splash: u32,
    pub remove: bool,
    pub frame: u32,
}

impl Bottle {
    pub const WIDTH: f32 = 40.0;
    pub const HEIGHT: f32 = 60.0;
    pub const THROW_IMPULSE: f32 = 30.0;
    pub const SPLASH_TICKS: u32 = 18;

    pub fn new(x: f32, y: f32, dir: Facing, speed: f32) -> Self {
        Bottle {
            body: Body::new(x, y, Self::WIDTH, Self::HEIGHT),
            dir,
            speed,
            velocity_y: Self::THROW_IMPULSE,
            broken: false,
            splash: 0,
            remove: false,
            frame: 0,
        }
    }

    /// Break and start the splash countdown. Idempotent, so a bottle
    /// clipping two enemies in one tick still breaks exactly once.
    pub fn shatter(&mut self) {
        if self.broken {
            return;
        }
        self.broken = true;
        self.splash = Self::SPLASH_TICKS;
    }
}

/// Floating collectible. Raises the coin meter on pickup.
#[derive(Clone, Debug)]
pub struct Coin {
    pub body: Body,
    pub collected: bool,
}

impl Coin {
    pub const SIZE: f32 = 100.0;

    pub fn new(x: f32, y: f32) -> Self {
        Coin {
            body: Body::new(x, y, Self::SIZE, Self::SIZE),
            collected: false,
        }
    }

    /// Returns true on the first call only.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Bottle lying on the ground, waiting to be picked up as ammo.
#[derive(Clone, Debug)]
pub struct GroundBottle {
    pub body: Body,
    pub collected: bool,
    /// Tick counter; drives the idle sway.
    pub frame: u32,
}

impl GroundBottle {
    pub const WIDTH: f32 = 40.0;
    pub const HEIGHT: f32 = 70.0;
    /// Pickup uses a box shrunk by this much, so grazing the sprite
    /// edge does not collect.
    pub const PICKUP_INSET: f32 = 5.0;

    pub fn new(x: f32) -> Self {
        GroundBottle {
            body: Body::new(x, GROUND_Y - Self::HEIGHT, Self::WIDTH, Self::HEIGHT),
            collected: false,
            frame: 0,
        }
    }

    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Background decoration. Drifts left and wraps; never collides.
#[derive(Clone, Debug)]
pub struct Cloud {
    pub body: Body,
}

impl Cloud {
    pub const WIDTH: f32 = 500.0;
    pub const HEIGHT: f32 = 250.0;
    pub const Y: f32 = 50.0;
    pub const DRIFT: f32 = 0.15;

    pub fn new(x: f32) -> Self {
        Cloud {
            body: Body::new(x, Self::Y, Self::WIDTH, Self::HEIGHT),
        }
    }

    pub fn update(&mut self) {
        self.body.x -= Self::DRIFT;
        if self.body.right() < 0.0 {
            self.body.x = WORLD_W;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_opens_mercy_window() {
        let mut ch = Character::new(1.5);
        assert!(ch.hit(60));
        assert_eq!(ch.energy, 90);
        assert!(ch.is_hurt());
        // Second hit inside the window is swallowed.
        assert!(!ch.hit(60));
        assert_eq!(ch.energy, 90);
        // Window expired: damage lands again.
        ch.invuln = 0;
        assert!(ch.hit(60));
        assert_eq!(ch.energy, 80);
    }

    #[test]
    fn energy_floors_at_zero_and_dead_ignores_hits() {
        let mut ch = Character::new(1.5);
        ch.energy = 5;
        assert!(ch.hit(60));
        assert_eq!(ch.energy, 0);
        assert!(ch.is_dead());
        ch.invuln = 0;
        assert!(!ch.hit(60));
        assert_eq!(ch.energy, 0);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut ch = Character::new(1.5);
        ch.energy = 95;
        ch.heal(20);
        assert_eq!(ch.energy, Character::MAX_ENERGY);
    }

    #[test]
    fn chicken_die_is_idempotent() {
        let mut c = Chicken::new(ChickenKind::Normal, 800.0, 0.3);
        let alive_bottom = c.body.bottom();
        c.die(24);
        assert!(c.dead);
        assert_eq!(c.decay, 24);
        // Corpse still rests on the ground line.
        assert_eq!(c.body.bottom(), alive_bottom);
        let squashed = c.body;
        c.die(24);
        assert_eq!(c.body, squashed);

        // Corpse decays: 24 ticks to zero, then flagged for removal.
        for _ in 0..23 {
            c.update();
            assert!(!c.remove);
        }
        c.update();
        assert!(c.remove);
    }

    #[test]
    fn dead_chicken_stops_walking() {
        let mut c = Chicken::new(ChickenKind::Small, 800.0, 0.5);
        c.die(24);
        let x = c.body.x;
        c.update();
        assert_eq!(c.body.x, x);
    }

    #[test]
    fn squashed_bodies_keep_nonnegative_extents() {
        for kind in [ChickenKind::Normal, ChickenKind::Small] {
            let mut c = Chicken::new(kind, 700.0, 0.2);
            c.die(24);
            assert!(c.body.w >= 0.0 && c.body.h >= 0.0);
        }
    }

    #[test]
    fn bottle_shatters_once() {
        let mut b = Bottle::new(100.0, 100.0, Facing::Right, 10.0);
        b.shatter();
        assert!(b.broken);
        b.splash = 3;
        b.shatter();
        assert_eq!(b.splash, 3);
    }

    #[test]
    fn pickups_collect_once() {
        let mut coin = Coin::new(300.0, 60.0);
        assert!(coin.collect());
        assert!(!coin.collect());

        let mut gb = GroundBottle::new(400.0);
        assert!(gb.collect());
        assert!(!gb.collect());
    }

    #[test]
    fn inset_never_goes_negative() {
        let b = Body::new(0.0, 0.0, 6.0, 6.0);
        let shrunk = b.inset(4.0);
        assert_eq!(shrunk.w, 0.0);
        assert_eq!(shrunk.h, 0.0);
    }

    #[test]
    fn cloud_wraps_at_world_edge() {
        let mut cl = Cloud::new(-499.9);
        cl.update();
        assert_eq!(cl.body.x, WORLD_W);
    }
}
