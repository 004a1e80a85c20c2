//! Vertical kinematics: gravity, jumps, and the ground clamp.
//!
//! Sign convention: y grows downward but `velocity_y` is positive while
//! RISING, so integration subtracts velocity from y and gravity drains
//! velocity toward negative. Gravity applies while an entity is above
//! the ground, and also while velocity is still positive (the launch
//! tick, when the body has not left the ground line yet).

use crate::domain::entity::{Body, Bottle, Character, GROUND_Y};

/// Velocity lost per tick while gravity applies.
pub const GRAVITY: f32 = 2.5;

/// Upward velocity granted by a jump from the ground.
pub const JUMP_IMPULSE: f32 = 30.0;

/// Vertical velocity forced onto the character after a stomp kill.
pub const STOMP_REBOUND: f32 = -12.0;

/// Anything that falls. Projectiles opt out of the ground via
/// `always_airborne`; their flight ends by breaking, not landing.
pub trait Kinetic {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn velocity_y(&self) -> f32;
    fn set_velocity_y(&mut self, vy: f32);
    fn always_airborne(&self) -> bool {
        false
    }
}

impl Kinetic for Character {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
    fn velocity_y(&self) -> f32 {
        self.velocity_y
    }
    fn set_velocity_y(&mut self, vy: f32) {
        self.velocity_y = vy;
    }
}

impl Kinetic for Bottle {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
    fn velocity_y(&self) -> f32 {
        self.velocity_y
    }
    fn set_velocity_y(&mut self, vy: f32) {
        self.velocity_y = vy;
    }
    fn always_airborne(&self) -> bool {
        true
    }
}

pub fn above_ground(e: &impl Kinetic) -> bool {
    e.always_airborne() || e.body().bottom() < GROUND_Y
}

pub fn grounded(e: &impl Kinetic) -> bool {
    !above_ground(e)
}

/// One tick of vertical integration. Grounded bodies with no upward
/// velocity are untouched. Bodies that would sink past the ground are
/// snapped back onto it with velocity zeroed, so a deep fall can never
/// tunnel through the floor.
pub fn apply_gravity(e: &mut impl Kinetic) {
    if above_ground(e) || e.velocity_y() > 0.0 {
        let vy = e.velocity_y();
        e.body_mut().y -= vy;
        e.set_velocity_y(vy - GRAVITY);
    }
    if !e.always_airborne() && e.body().bottom() > GROUND_Y {
        let h = e.body().h;
        e.body_mut().y = GROUND_Y - h;
        e.set_velocity_y(0.0);
    }
}

/// Launch from the ground. Callers gate on `grounded`; there is no
/// double jump.
pub fn jump(e: &mut impl Kinetic) {
    e.set_velocity_y(JUMP_IMPULSE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_character() -> Character {
        let mut ch = Character::new(1.5);
        ch.body.y = GROUND_Y - ch.body.h;
        ch
    }

    #[test]
    fn grounded_body_stays_put() {
        let mut ch = grounded_character();
        let y = ch.body.y;
        for _ in 0..5 {
            apply_gravity(&mut ch);
        }
        assert_eq!(ch.body.y, y);
        assert_eq!(ch.velocity_y, 0.0);
    }

    #[test]
    fn jump_arc_rises_then_lands_on_ground_line() {
        let mut ch = grounded_character();
        let start_y = ch.body.y;
        jump(&mut ch);
        assert_eq!(ch.velocity_y, JUMP_IMPULSE);

        // Rising: y decreases tick over tick.
        apply_gravity(&mut ch);
        assert!(ch.body.y < start_y);
        let mut last_y = ch.body.y;
        let mut peak = ch.body.y;

        // Run the arc out; it must terminate back on the ground line.
        let mut landed = false;
        for _ in 0..60 {
            apply_gravity(&mut ch);
            peak = peak.min(ch.body.y);
            if ch.body.bottom() == GROUND_Y && ch.velocity_y == 0.0 {
                landed = true;
                break;
            }
            last_y = ch.body.y;
        }
        assert!(landed);
        assert!(peak < start_y);
        // Final motion was downward.
        assert!(ch.body.y >= last_y);
    }

    #[test]
    fn ground_clamp_zeroes_velocity() {
        let mut ch = grounded_character();
        // Force a state that would tunnel: low altitude, steep fall.
        ch.body.y = GROUND_Y - ch.body.h - 1.0;
        ch.velocity_y = -40.0;
        apply_gravity(&mut ch);
        assert_eq!(ch.body.bottom(), GROUND_Y);
        assert_eq!(ch.velocity_y, 0.0);
    }

    #[test]
    fn bottles_fall_past_the_ground_line() {
        use crate::domain::entity::Facing;
        let mut b = Bottle::new(100.0, 100.0, Facing::Right, 10.0);
        b.velocity_y = -10.0;
        let before = b.body.y;
        apply_gravity(&mut b);
        assert!(b.body.y > before);
        // No clamp for projectiles even below the line.
        b.body.y = GROUND_Y + 50.0;
        b.velocity_y = -5.0;
        apply_gravity(&mut b);
        assert!(b.body.y > GROUND_Y + 50.0);
    }

    #[test]
    fn launch_tick_applies_while_still_on_ground() {
        let mut ch = grounded_character();
        jump(&mut ch);
        // Bottom is exactly on the line, but positive velocity means
        // gravity integrates this tick.
        apply_gravity(&mut ch);
        assert_eq!(ch.body.bottom(), GROUND_Y - JUMP_IMPULSE);
        assert_eq!(ch.velocity_y, JUMP_IMPULSE - GRAVITY);
    }
}
