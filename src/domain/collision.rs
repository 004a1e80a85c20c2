//! Overlap predicates. Pure functions over bodies; the step function
//! decides what an overlap means.

use crate::domain::entity::Body;

/// A landing counts as a stomp while the attacker's bottom edge is
/// within this many units below the target's top edge.
pub const STOMP_BUFFER: f32 = 50.0;

/// Strict interval overlap on both axes. Strictness makes edge-touching
/// boxes miss, and a zero-extent box can never collide with anything.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.right() > b.x && a.bottom() > b.y && a.x < b.right() && a.y < b.bottom()
}

pub fn horizontal_overlap(a: &Body, b: &Body) -> bool {
    a.right() > b.x && a.x < b.right()
}

/// Attacker's feet are in the stomp band at the target's top edge.
/// Implies `overlaps`.
pub fn from_top(a: &Body, b: &Body) -> bool {
    overlaps(a, b) && a.bottom() >= b.y && a.bottom() <= b.y + STOMP_BUFFER
}

/// Fallback stomp detector for fast arcs that skip the top band in a
/// single tick: still rising over the target counts.
pub fn jump_kill(velocity_y: f32, a: &Body, b: &Body) -> bool {
    velocity_y > 0.0 && horizontal_overlap(a, b)
}

/// Combined stomp test, evaluated only for pairs that already overlap.
/// When both a stomp and a plain hit are arguable, the stomp wins.
pub fn stomps(velocity_y: f32, attacker: &Body, target: &Body) -> bool {
    from_top(attacker, target) || jump_kill(velocity_y, attacker, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(5.0, 5.0, 10.0, 10.0);
        let c = Body::new(30.0, 30.0, 10.0, 10.0);
        assert!(overlaps(&a, &b) && overlaps(&b, &a));
        assert!(!overlaps(&a, &c) && !overlaps(&c, &a));
    }

    #[test]
    fn edge_touching_boxes_do_not_overlap() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let flush_x = Body::new(10.0, 0.0, 10.0, 10.0);
        let flush_y = Body::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &flush_x));
        assert!(!overlaps(&a, &flush_y));
    }

    #[test]
    fn zero_extent_box_hits_nothing() {
        let point = Body::new(5.0, 5.0, 0.0, 0.0);
        let around = Body::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&point, &around));
        assert!(!overlaps(&around, &point));
    }

    #[test]
    fn from_top_respects_the_stomp_band() {
        let target = Body::new(0.0, 100.0, 80.0, 80.0);
        // Bottom 40 units into the band.
        let landing = Body::new(10.0, 40.0, 50.0, 100.0);
        assert!(from_top(&landing, &target));
        // Bottom below the band: deep side-overlap, not a landing.
        let deep = Body::new(10.0, 100.0, 50.0, 100.0);
        assert!(overlaps(&deep, &target));
        assert!(!from_top(&deep, &target));
        // In the band vertically but no overlap horizontally.
        let aside = Body::new(200.0, 40.0, 50.0, 100.0);
        assert!(!from_top(&aside, &target));
    }

    #[test]
    fn jump_kill_requires_upward_motion() {
        let target = Body::new(0.0, 100.0, 80.0, 80.0);
        let over = Body::new(10.0, 0.0, 50.0, 60.0);
        assert!(jump_kill(5.0, &over, &target));
        assert!(!jump_kill(0.0, &over, &target));
        assert!(!jump_kill(-5.0, &over, &target));
        let beside = Body::new(200.0, 0.0, 50.0, 60.0);
        assert!(!jump_kill(5.0, &beside, &target));
    }

    #[test]
    fn stomp_wins_over_plain_hit() {
        let target = Body::new(0.0, 100.0, 80.0, 80.0);
        // Falling onto the top band: overlap and from_top both hold,
        // so the pair resolves as a stomp.
        let landing = Body::new(10.0, 50.0, 50.0, 100.0);
        assert!(overlaps(&landing, &target));
        assert!(stomps(-3.0, &landing, &target));
        // Deep side contact while falling is a plain hit.
        let deep = Body::new(10.0, 110.0, 50.0, 100.0);
        assert!(overlaps(&deep, &target));
        assert!(!stomps(-3.0, &deep, &target));
    }
}
