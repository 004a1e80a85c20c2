//! The boss rooster: a five-state machine guarding the far end of the
//! level.
//!
//! State priority, re-derived from scratch every act:
//!   dead (health 0) > hurt (window open) > attack (close) >
//!   alert (near) > walking (patrol).
//!
//! Timers count every tick; state changes and movement only happen on
//! the act cadence, which is what gives the boss its deliberate,
//! stuttering menace. Only bottles hurt it. Contact with its body is
//! always a plain hit for the character, stomp geometry or not.

use crate::domain::entity::{Body, Facing};

pub const WIDTH: f32 = 250.0;
pub const HEIGHT: f32 = 400.0;
pub const SPAWN_X: f32 = 2500.0;
pub const SPAWN_Y: f32 = 55.0;

/// Patrol band while no one is near. Crossing either edge reverses
/// the walk direction.
pub const PATROL_MIN: f32 = 2000.0;
pub const PATROL_MAX: f32 = 2500.0;

/// Horizontal distance at which the boss notices the character.
pub const ALERT_RANGE: f32 = 400.0;
/// Horizontal distance at which it charges.
pub const ATTACK_RANGE: f32 = 200.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BossState {
    Walking,
    Alert,
    Attack,
    Hurt,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub body: Body,
    pub facing: Facing,
    /// Patrol speed; the sign encodes the current patrol direction.
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub state: BossState,
    /// Ticks left in the hurt window.
    pub hurt: u32,
    /// Ticks from death until removal, giving the fall animation room.
    pub death_delay: u32,
    /// Countdown to the next act.
    pub act_timer: u32,
    /// Set once the boss has ever left Walking; keeps the health bar
    /// on screen for the rest of the fight.
    pub engaged: bool,
    pub remove: bool,
    pub frame: u32,
}

impl Boss {
    pub fn new(health: i32, speed: f32) -> Self {
        Boss {
            body: Body::new(SPAWN_X, SPAWN_Y, WIDTH, HEIGHT),
            facing: Facing::Left,
            speed,
            health,
            max_health: health,
            state: BossState::Walking,
            hurt: 0,
            death_delay: 0,
            act_timer: 0,
            engaged: false,
            remove: false,
            frame: 0,
        }
    }

    fn distance_to(&self, character_x: f32) -> f32 {
        (self.body.x - character_x).abs()
    }

    /// One simulation tick. Returns true on the single tick where the
    /// death delay expires and the boss flags itself for removal; the
    /// caller turns that into the win.
    pub fn update(&mut self, character_x: f32, act_every: u32) -> bool {
        if self.hurt > 0 {
            self.hurt -= 1;
            if self.hurt == 0 && self.state == BossState::Hurt {
                self.state = BossState::Alert;
            }
        }
        if self.state == BossState::Dead {
            if self.death_delay > 0 {
                self.death_delay -= 1;
                if self.death_delay == 0 && !self.remove {
                    self.remove = true;
                    return true;
                }
            }
            return false;
        }
        if self.act_timer > 0 {
            self.act_timer -= 1;
            return false;
        }
        self.act_timer = act_every.max(1) - 1;
        self.update_state(character_x);
        self.advance(character_x);
        self.frame = self.frame.wrapping_add(1);
        false
    }

    fn update_state(&mut self, character_x: f32) {
        self.state = if self.health <= 0 {
            BossState::Dead
        } else if self.hurt > 0 {
            BossState::Hurt
        } else if self.distance_to(character_x) < ATTACK_RANGE {
            BossState::Attack
        } else if self.distance_to(character_x) < ALERT_RANGE {
            BossState::Alert
        } else {
            BossState::Walking
        };
        if self.state != BossState::Walking {
            self.engaged = true;
        }
    }

    fn advance(&mut self, character_x: f32) {
        match self.state {
            BossState::Walking => {
                self.body.x -= self.speed;
                self.facing = if self.speed > 0.0 {
                    Facing::Left
                } else {
                    Facing::Right
                };
                if self.body.x < PATROL_MIN || self.body.x > PATROL_MAX {
                    self.speed = -self.speed;
                }
            }
            BossState::Alert | BossState::Attack => {
                let pace = self.speed.abs();
                if self.body.x > character_x {
                    self.body.x -= pace;
                    self.facing = Facing::Left;
                } else {
                    self.body.x += pace;
                    self.facing = Facing::Right;
                }
            }
            BossState::Hurt | BossState::Dead => {}
        }
    }

    /// Take one bottle's worth of damage. Health clamps at zero, and
    /// the transition to Dead happens inside this same call; further
    /// hits on a dead boss are ignored.
    pub fn take_damage(&mut self, damage: i32, hurt_ticks: u32, death_ticks: u32) {
        if self.state == BossState::Dead {
            return;
        }
        self.health = (self.health - damage).max(0);
        self.engaged = true;
        if self.health == 0 {
            self.die(death_ticks);
        } else {
            self.hurt = hurt_ticks;
            self.state = BossState::Hurt;
        }
    }

    pub fn die(&mut self, death_ticks: u32) {
        if self.state == BossState::Dead {
            return;
        }
        self.state = BossState::Dead;
        self.health = 0;
        self.hurt = 0;
        self.death_delay = death_ticks;
    }
}
