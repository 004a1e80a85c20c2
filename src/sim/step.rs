/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Character input + vertical kinematics
///   2. Cloud drift
///   3. Enemy updates (chicken walk/decay, boss state machine + win)
///   4. Bottle flight
///   5. Character/enemy contact (stomp vs hit)
///   6. Pickups (coins, ground bottles)
///   7. Bottle impacts + throw request
///   8. Removal sweep, camera, death check
///
/// Collision passes snapshot the character's box once, mark outcomes on
/// the entities, and leave all removal to the sweep at the end, so no
/// entity is skipped or processed twice within a tick. When the boss's
/// removal ends the session mid-tick, the rest of the tick is skipped:
/// a win and a death in the same tick resolves as a win.

use crate::domain::boss::BossState;
use crate::domain::collision;
use crate::domain::entity::{Bottle, Facing, FrameInput, GroundBottle, GROUND_Y, LEVEL_END_X, WORLD_W};
use crate::domain::kinematics;
use super::event::GameEvent;
use super::world::{Enemy, Phase, WorldState, COIN_METER_MAX, COIN_STEP};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    resolve_character(world, input, &mut events);
    resolve_clouds(world);
    if resolve_enemies(world, &mut events) {
        return events;
    }
    resolve_bottles(world);
    resolve_enemy_contact(world, &mut events);
    resolve_coins(world, &mut events);
    resolve_ground_bottles(world);
    resolve_bottle_hits(world, &mut events);
    resolve_throw(world, input, &mut events);
    sweep_removed(world);
    world.camera.follow(world.character.body.x);
    resolve_death(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Character
// ══════════════════════════════════════════════════════════════

fn resolve_character(world: &mut WorldState, input: FrameInput, events: &mut Vec<GameEvent>) {
    let ch = &mut world.character;
    ch.moving = false;
    if !ch.is_dead() {
        if input.right && ch.body.x < LEVEL_END_X {
            ch.body.x += ch.speed;
            ch.facing = Facing::Right;
            ch.moving = true;
        }
        if input.left && ch.body.x > 0.0 {
            ch.body.x -= ch.speed;
            ch.facing = Facing::Left;
            ch.moving = true;
        }
        if input.jump && kinematics::grounded(ch) {
            kinematics::jump(ch);
            events.push(GameEvent::Jump);
        }
    }
    kinematics::apply_gravity(ch);
    if ch.invuln > 0 {
        ch.invuln -= 1;
    }
    ch.frame = ch.frame.wrapping_add(1);
}

fn resolve_clouds(world: &mut WorldState) {
    for cloud in world.clouds.iter_mut() {
        cloud.update();
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

/// Walk chickens, decay corpses, run the boss. Returns true when the
/// boss's removal delay expired this tick: the session is won and the
/// caller must stop processing.
fn resolve_enemies(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    let character_x = world.character.body.x;
    let act = world.tuning.boss_act_ticks;
    let mut won = false;
    for enemy in world.enemies.iter_mut() {
        match enemy {
            Enemy::Chicken(c) => c.update(),
            Enemy::Boss(b) => {
                if b.update(character_x, act) {
                    won = true;
                }
            }
        }
    }
    if won {
        events.push(GameEvent::BossDead);
        world.enemies.retain(|e| !e.is_removed());
        world.phase = Phase::Won;
    }
    won
}

// ══════════════════════════════════════════════════════════════
// Bottles in flight
// ══════════════════════════════════════════════════════════════

fn resolve_bottles(world: &mut WorldState) {
    for b in world.bottles.iter_mut() {
        if b.broken {
            if b.splash > 0 {
                b.splash -= 1;
            }
            if b.splash == 0 {
                b.remove = true;
            }
            continue;
        }
        match b.dir {
            Facing::Right => b.body.x += b.speed,
            Facing::Left => b.body.x -= b.speed,
        }
        kinematics::apply_gravity(b);
        b.frame = b.frame.wrapping_add(1);
        if b.body.bottom() >= GROUND_Y {
            b.shatter();
        }
        if b.body.right() < -200.0 || b.body.x > WORLD_W + 200.0 {
            b.remove = true;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Character ↔ enemy contact
// ══════════════════════════════════════════════════════════════

/// Stomp or get hurt. A landing on a chicken's top band (or a rising
/// arc across it) kills the chicken; any other overlap is a plain hit,
/// swallowed while the mercy window is open. The boss is special-cased:
/// its body is never stompable, so every contact is a plain hit.
fn resolve_enemy_contact(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.character.is_dead() {
        return;
    }
    let cb = world.character.body;
    let vy = world.character.velocity_y;
    let decay = world.tuning.chicken_decay_ticks;
    let mut kills: i32 = 0;
    let mut contact = false;

    for enemy in world.enemies.iter_mut() {
        match enemy {
            Enemy::Chicken(c) => {
                if c.dead || !collision::overlaps(&cb, &c.body) {
                    continue;
                }
                if collision::stomps(vy, &cb, &c.body) {
                    c.die(decay);
                    events.push(GameEvent::EnemyKilled);
                    kills += 1;
                } else {
                    contact = true;
                }
            }
            Enemy::Boss(b) => {
                if b.state != BossState::Dead && collision::overlaps(&cb, &b.body) {
                    contact = true;
                }
            }
        }
    }

    if kills > 0 {
        // Bounce off the corpse and recover a little energy per kill.
        world.character.velocity_y = kinematics::STOMP_REBOUND;
        world.character.heal(20 * kills);
    }
    if contact {
        world.character.hit(world.tuning.invuln_ticks);
    }
}

// ══════════════════════════════════════════════════════════════
// Pickups
// ══════════════════════════════════════════════════════════════

fn resolve_coins(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let cb = world.character.body;
    for coin in world.coins.iter_mut() {
        if collision::overlaps(&cb, &coin.body) && coin.collect() {
            world.coin_meter = (world.coin_meter + COIN_STEP).min(COIN_METER_MAX);
            events.push(GameEvent::CoinCollected);
        }
    }
    world.coins.retain(|c| !c.collected);
}

fn resolve_ground_bottles(world: &mut WorldState) {
    let cb = world.character.body;
    let cap = world.tuning.max_bottles;
    for gb in world.ground_bottles.iter_mut() {
        gb.frame = gb.frame.wrapping_add(1);
        // At the carry cap, bottles stay on the ground for later.
        if world.bottle_count < cap
            && collision::overlaps(&cb, &gb.body.inset(GroundBottle::PICKUP_INSET))
            && gb.collect()
        {
            world.bottle_count += 1;
        }
    }
    world.ground_bottles.retain(|g| !g.collected);
}

// ══════════════════════════════════════════════════════════════
// Bottle impacts & throwing
// ══════════════════════════════════════════════════════════════

/// Bottles break on the first enemy they touch. Only the boss takes
/// damage from them; chickens just get splashed.
fn resolve_bottle_hits(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let hurt = world.tuning.boss_hurt_ticks;
    let death = world.tuning.boss_death_ticks;
    for bottle in world.bottles.iter_mut() {
        if bottle.broken {
            continue;
        }
        for enemy in world.enemies.iter_mut() {
            let hit = match enemy {
                Enemy::Chicken(c) => !c.dead && collision::overlaps(&bottle.body, &c.body),
                Enemy::Boss(b) => {
                    b.state != BossState::Dead && collision::overlaps(&bottle.body, &b.body)
                }
            };
            if !hit {
                continue;
            }
            bottle.shatter();
            if let Enemy::Boss(b) = enemy {
                b.take_damage(1, hurt, death);
                events.push(GameEvent::BossHurt);
            }
            break;
        }
    }
}

fn resolve_throw(world: &mut WorldState, input: FrameInput, events: &mut Vec<GameEvent>) {
    if !input.throw || world.bottle_count == 0 || world.character.is_dead() {
        return;
    }
    let ch = &world.character;
    let (x, dir) = match ch.facing {
        Facing::Right => (ch.body.x + 100.0, Facing::Right),
        Facing::Left => (ch.body.x - Bottle::WIDTH, Facing::Left),
    };
    let bottle = Bottle::new(x, ch.body.y + 100.0, dir, world.tuning.bottle_speed);
    world.bottles.push(bottle);
    world.bottle_count -= 1;
    events.push(GameEvent::BottleThrown);
}

// ══════════════════════════════════════════════════════════════
// Sweep & endings
// ══════════════════════════════════════════════════════════════

fn sweep_removed(world: &mut WorldState) {
    world.enemies.retain(|e| !e.is_removed());
    world.bottles.retain(|b| !b.remove);
}

fn resolve_death(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.character.is_dead() {
        events.push(GameEvent::CharacterDead);
        world.phase = Phase::Dying;
        world.anim_tick = 0;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;
    use crate::domain::boss::Boss;
    use crate::domain::entity::{Chicken, ChickenKind, Coin};

    fn playing_world() -> WorldState {
        let mut w = WorldState::new(TuningConfig::default());
        w.phase = Phase::Playing;
        w
    }

    /// Stand the character on the ground line at `x`.
    fn place_on_ground(w: &mut WorldState, x: f32) {
        w.character.body.x = x;
        w.character.body.y = GROUND_Y - w.character.body.h;
        w.character.velocity_y = 0.0;
    }

    fn still_chicken(x: f32) -> Chicken {
        Chicken::new(ChickenKind::Normal, x, 0.0)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn held_right() -> FrameInput {
        FrameInput { right: true, ..FrameInput::default() }
    }

    // ── Movement & kinematics ──

    #[test]
    fn walking_right_advances_at_speed() {
        let mut w = playing_world();
        place_on_ground(&mut w, 120.0);
        for _ in 0..10 {
            step(&mut w, held_right());
        }
        assert_eq!(w.character.body.x, 135.0);
        assert_eq!(w.character.facing, Facing::Right);
        assert!(w.character.moving);
    }

    #[test]
    fn walking_stops_at_the_level_end() {
        let mut w = playing_world();
        place_on_ground(&mut w, LEVEL_END_X - 10.0);
        for _ in 0..20 {
            step(&mut w, held_right());
        }
        // Last allowed step is taken from 2199.0; the guard then holds.
        assert_eq!(w.character.body.x, LEVEL_END_X + 0.5);
    }

    #[test]
    fn walking_left_stops_at_the_world_edge() {
        let mut w = playing_world();
        place_on_ground(&mut w, 2.0);
        let left = FrameInput { left: true, ..FrameInput::default() };
        for _ in 0..10 {
            step(&mut w, left);
        }
        assert_eq!(w.character.body.x, -1.0);
        assert_eq!(w.character.facing, Facing::Left);
    }

    #[test]
    fn jump_fires_once_from_the_ground() {
        let mut w = playing_world();
        place_on_ground(&mut w, 300.0);
        let hold_jump = FrameInput { jump: true, ..FrameInput::default() };
        let ev = step(&mut w, hold_jump);
        assert!(ev.contains(&GameEvent::Jump));
        assert_eq!(w.character.velocity_y, 27.5);
        // Still holding jump while airborne: no double jump.
        let ev = step(&mut w, hold_jump);
        assert!(!ev.contains(&GameEvent::Jump));
    }

    #[test]
    fn bottle_flies_100_units_in_10_ticks() {
        let mut w = playing_world();
        w.bottles.push(Bottle::new(100.0, 100.0, Facing::Right, 10.0));
        for _ in 0..10 {
            step(&mut w, idle());
        }
        assert_eq!(w.bottles[0].body.x, 200.0);
        assert!(!w.bottles[0].broken);
    }

    // ── Stomp & contact ──

    #[test]
    fn stomp_kills_heals_and_rebounds() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Chicken(still_chicken(700.0)));
        w.character.energy = 50;
        w.character.body.x = 690.0;
        w.character.body.y = 140.0;
        w.character.velocity_y = -5.0; // falling onto the top band
        let ev = step(&mut w, idle());
        assert!(ev.contains(&GameEvent::EnemyKilled));
        assert!(matches!(&w.enemies[0], Enemy::Chicken(c) if c.dead));
        assert_eq!(w.character.energy, 70);
        assert_eq!(w.character.velocity_y, kinematics::STOMP_REBOUND);
    }

    #[test]
    fn side_contact_damages_once_per_mercy_window() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Chicken(still_chicken(700.0)));
        place_on_ground(&mut w, 650.0);
        step(&mut w, idle());
        assert_eq!(w.character.energy, 90);
        // The rest of the window: contact continues, damage doesn't.
        for _ in 0..59 {
            step(&mut w, idle());
        }
        assert_eq!(w.character.energy, 90);
        // Window expired: the standing contact bites again.
        step(&mut w, idle());
        assert_eq!(w.character.energy, 80);
    }

    #[test]
    fn boss_contact_is_never_stompable() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Boss(Boss::new(12, 2.0)));
        // Falling straight onto the boss's top band.
        w.character.body.x = 2550.0;
        w.character.body.y = -150.0;
        w.character.velocity_y = -5.0;
        let ev = step(&mut w, idle());
        assert!(!ev.contains(&GameEvent::EnemyKilled));
        assert_eq!(w.character.energy, 90);
        assert_eq!(w.boss().unwrap().health, 12);
    }

    #[test]
    fn ten_hits_end_the_session_exactly_once() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Chicken(still_chicken(700.0)));
        place_on_ground(&mut w, 650.0);
        let mut deaths = 0;
        for _ in 0..12 {
            for e in step(&mut w, idle()) {
                if e == GameEvent::CharacterDead {
                    deaths += 1;
                }
            }
            // Collapse the mercy window so every tick can land a hit.
            w.character.invuln = 0;
        }
        assert_eq!(deaths, 1);
        assert_eq!(w.phase, Phase::Dying);
        assert_eq!(w.character.energy, 0);
    }

    #[test]
    fn stomped_chicken_is_swept_after_decay() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Chicken(still_chicken(700.0)));
        w.character.body.x = 690.0;
        w.character.body.y = 140.0;
        w.character.velocity_y = -5.0;
        step(&mut w, idle());
        assert_eq!(w.enemies.len(), 1);
        for _ in 0..24 {
            step(&mut w, idle());
        }
        assert!(w.enemies.is_empty());
    }

    // ── Bottles & the boss ──

    #[test]
    fn throw_consumes_ammo_and_spawns_ahead() {
        let mut w = playing_world();
        place_on_ground(&mut w, 400.0);
        w.bottle_count = 3;
        let throw = FrameInput { throw: true, ..FrameInput::default() };
        let ev = step(&mut w, throw);
        assert!(ev.contains(&GameEvent::BottleThrown));
        assert_eq!(w.bottle_count, 2);
        assert_eq!(w.bottles.len(), 1);
        assert_eq!(w.bottles[0].body.x, 500.0);
        assert_eq!(w.bottles[0].body.y, 280.0);
        // The flag is a per-press pulse: a quiet tick adds nothing.
        step(&mut w, idle());
        assert_eq!(w.bottles.len(), 1);
    }

    #[test]
    fn throw_without_ammo_is_a_noop() {
        let mut w = playing_world();
        place_on_ground(&mut w, 400.0);
        let ev = step(&mut w, FrameInput { throw: true, ..FrameInput::default() });
        assert!(!ev.contains(&GameEvent::BottleThrown));
        assert!(w.bottles.is_empty());
    }

    #[test]
    fn bottle_breaks_on_the_boss_and_staggers_it() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Boss(Boss::new(12, 2.0)));
        place_on_ground(&mut w, 120.0);
        w.bottles.push(Bottle::new(2600.0, 200.0, Facing::Right, 10.0));
        let ev = step(&mut w, idle());
        assert!(ev.contains(&GameEvent::BossHurt));
        let boss = w.boss().unwrap();
        assert_eq!(boss.health, 11);
        assert_eq!(boss.state, BossState::Hurt);
        assert!(w.bottles[0].broken);
    }

    #[test]
    fn final_bottle_wins_after_the_death_delay() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Boss(Boss::new(1, 2.0)));
        place_on_ground(&mut w, 120.0);
        w.bottles.push(Bottle::new(2600.0, 200.0, Facing::Right, 10.0));
        let ev = step(&mut w, idle());
        assert!(ev.contains(&GameEvent::BossHurt));
        assert_eq!(w.boss().unwrap().state, BossState::Dead);

        let mut wins = 0;
        for _ in 0..120 {
            for e in step(&mut w, idle()) {
                if e == GameEvent::BossDead {
                    wins += 1;
                }
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(w.phase, Phase::Won);
        assert!(w.boss().is_none());
        // A finished session never steps again.
        assert!(step(&mut w, idle()).is_empty());
    }

    #[test]
    fn bottle_smashes_on_the_ground_and_drains_away() {
        let mut w = playing_world();
        let mut b = Bottle::new(500.0, 360.0, Facing::Right, 10.0);
        b.velocity_y = -20.0;
        w.bottles.push(b);
        step(&mut w, idle());
        assert!(w.bottles[0].broken);
        for _ in 0..Bottle::SPLASH_TICKS {
            step(&mut w, idle());
        }
        assert!(w.bottles.is_empty());
    }

    // ── Pickups ──

    #[test]
    fn coin_meter_steps_by_20_and_caps() {
        let mut w = playing_world();
        place_on_ground(&mut w, 400.0);
        for _ in 0..6 {
            w.coins.push(Coin::new(420.0, 300.0));
        }
        let ev = step(&mut w, idle());
        let picked = ev.iter().filter(|e| **e == GameEvent::CoinCollected).count();
        assert_eq!(picked, 6);
        assert_eq!(w.coin_meter, 100);
        assert!(w.coins.is_empty());
    }

    #[test]
    fn ground_bottle_pickup_honors_cap_and_inset() {
        let mut w = playing_world();
        place_on_ground(&mut w, 120.0);
        w.bottle_count = 9;
        w.ground_bottles.push(GroundBottle::new(150.0)); // underfoot
        w.ground_bottles.push(GroundBottle::new(150.0)); // one over the cap
        w.ground_bottles.push(GroundBottle::new(216.0)); // grazing inside the inset
        step(&mut w, idle());
        assert_eq!(w.bottle_count, 10);
        // The over-cap bottle and the grazed one stay on the ground.
        assert_eq!(w.ground_bottles.len(), 2);
    }

    #[test]
    fn ground_bottle_sway_counter_runs_until_pickup() {
        let mut w = playing_world();
        place_on_ground(&mut w, 120.0);
        w.ground_bottles.push(GroundBottle::new(1500.0)); // far away
        for _ in 0..45 {
            step(&mut w, idle());
        }
        // Past one sway half-period (30 ticks) the bottle leans the other way.
        assert_eq!(w.ground_bottles[0].frame, 45);
        let sway = w.tuning.sway_anim_ticks;
        assert_eq!((w.ground_bottles[0].frame / sway) % 2, 1);
    }

    // ── Session control ──

    #[test]
    fn pause_freezes_the_whole_simulation() {
        let mut w = playing_world();
        w.enemies.push(Enemy::Chicken(Chicken::new(ChickenKind::Normal, 800.0, 0.4)));
        w.enemies.push(Enemy::Boss(Boss::new(12, 2.0)));
        place_on_ground(&mut w, 120.0);
        for _ in 0..3 {
            step(&mut w, idle());
        }
        w.pause_game();
        w.pause_game(); // double pause is still one pause
        let tick = w.tick;
        let chicken_x = w.enemies[0].body().x;
        let boss_x = w.enemies[1].body().x;
        for _ in 0..5 {
            assert!(step(&mut w, held_right()).is_empty());
        }
        assert_eq!(w.tick, tick);
        assert_eq!(w.character.body.x, 120.0);
        assert_eq!(w.enemies[0].body().x, chicken_x);
        assert_eq!(w.enemies[1].body().x, boss_x);
        w.resume_game();
        w.resume_game();
        step(&mut w, idle());
        assert_eq!(w.tick, tick + 1);
    }

    #[test]
    fn step_only_runs_while_playing() {
        let mut w = WorldState::new(TuningConfig::default());
        assert!(step(&mut w, held_right()).is_empty()); // Title
        assert_eq!(w.tick, 0);
        w.phase = Phase::Won;
        assert!(step(&mut w, held_right()).is_empty());
        assert_eq!(w.tick, 0);
    }
}
