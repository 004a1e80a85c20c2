//! Level construction and session (re)start.
//!
//! The level is procedural within fixed bands: population counts come
//! from config, exact placements from the injected rng. A restart
//! rebuilds the whole population from scratch; nothing of the previous
//! run survives it.

use rand::Rng;

use crate::domain::boss::Boss;
use crate::domain::entity::{Character, Chicken, ChickenKind, Cloud, Coin, GroundBottle};
use crate::sim::world::{Enemy, Phase, WorldState};

/// Begin a session. No-op while one is already running, so a held
/// start button cannot rebuild the level mid-game.
pub fn start_game(world: &mut WorldState, rng: &mut impl Rng) {
    if world.phase == Phase::Playing {
        return;
    }
    build_level(world, rng);
    world.phase = Phase::Playing;
}

/// Tear down and rebuild, whatever the current phase.
pub fn restart_game(world: &mut WorldState, rng: &mut impl Rng) {
    build_level(world, rng);
    world.phase = Phase::Playing;
}

/// Drop the session and go back to the title screen. The measured
/// viewport survives so the next frame renders at the right size.
pub fn return_to_title(world: &mut WorldState) {
    let tuning = world.tuning.clone();
    let camera = world.camera.clone();
    *world = WorldState::new(tuning);
    world.camera = camera;
    world.camera.x = 0.0;
}

fn build_level(world: &mut WorldState, rng: &mut impl Rng) {
    let t = world.tuning.clone();

    world.character = Character::new(t.character_speed);

    world.enemies.clear();
    for _ in 0..t.chicken_count {
        let mut c = Chicken::new(
            ChickenKind::Normal,
            rng.gen_range(700.0..1200.0),
            rng.gen_range(0.15..0.65),
        );
        // Desync the walk cycles so the flock doesn't march in step.
        c.frame = rng.gen_range(0..24);
        world.enemies.push(Enemy::Chicken(c));
    }
    for _ in 0..t.small_chicken_count {
        let mut c = Chicken::new(
            ChickenKind::Small,
            rng.gen_range(720.0..920.0),
            rng.gen_range(0.2..0.7),
        );
        c.frame = rng.gen_range(0..24);
        world.enemies.push(Enemy::Chicken(c));
    }
    world.enemies.push(Enemy::Boss(Boss::new(t.boss_health, t.boss_speed)));

    world.coins = (0..t.coin_count)
        .map(|_| Coin::new(rng.gen_range(200.0..2200.0), rng.gen_range(50.0..90.0)))
        .collect();
    world.ground_bottles = (0..t.ground_bottle_count)
        .map(|_| GroundBottle::new(rng.gen_range(300.0..2100.0)))
        .collect();
    world.clouds = (0..t.cloud_count)
        .map(|i| Cloud::new(i as f32 * 900.0 + rng.gen_range(0.0..500.0)))
        .collect();

    world.bottles.clear();
    world.coin_meter = 0;
    world.bottle_count = 0;
    world.tick = 0;
    world.anim_tick = 0;
    world.paused = false;
    world.message.clear();
    world.message_timer = 0;
    world.camera.x = 0.0;
    world.camera.follow(world.character.body.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;
    use crate::domain::entity::GROUND_Y;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn start_populates_from_config_counts() {
        let mut w = WorldState::new(TuningConfig::default());
        start_game(&mut w, &mut rng());
        let chickens = w
            .enemies
            .iter()
            .filter(|e| matches!(e, Enemy::Chicken(_)))
            .count();
        let bosses = w
            .enemies
            .iter()
            .filter(|e| matches!(e, Enemy::Boss(_)))
            .count();
        assert_eq!(chickens, 7); // 4 normal + 3 small
        assert_eq!(bosses, 1);
        assert_eq!(w.coins.len(), 5);
        assert_eq!(w.ground_bottles.len(), 6);
        assert_eq!(w.clouds.len(), 2);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.character.energy, 100);
        assert_eq!(w.coin_meter, 0);
        assert_eq!(w.bottle_count, 0);
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut w = WorldState::new(TuningConfig::default());
        let mut r = rng();
        start_game(&mut w, &mut r);
        w.character.body.x = 999.0;
        w.tick = 77;
        start_game(&mut w, &mut r);
        assert_eq!(w.character.body.x, 999.0);
        assert_eq!(w.tick, 77);
    }

    #[test]
    fn placements_stay_inside_their_bands() {
        let mut w = WorldState::new(TuningConfig::default());
        start_game(&mut w, &mut rng());
        for e in &w.enemies {
            match e {
                Enemy::Chicken(c) => {
                    match c.kind {
                        ChickenKind::Normal => {
                            assert!(c.body.x >= 700.0 && c.body.x < 1200.0);
                            assert!(c.speed >= 0.15 && c.speed < 0.65);
                        }
                        ChickenKind::Small => {
                            assert!(c.body.x >= 720.0 && c.body.x < 920.0);
                            assert!(c.speed >= 0.2 && c.speed < 0.7);
                        }
                    }
                    assert_eq!(c.body.bottom(), GROUND_Y);
                }
                Enemy::Boss(b) => {
                    assert_eq!(b.body.x, crate::domain::boss::SPAWN_X);
                    assert_eq!(b.health, 12);
                }
            }
        }
        for coin in &w.coins {
            assert!(coin.body.x >= 200.0 && coin.body.x < 2200.0);
            assert!(coin.body.y >= 50.0 && coin.body.y < 90.0);
        }
        for gb in &w.ground_bottles {
            assert!(gb.body.x >= 300.0 && gb.body.x < 2100.0);
            assert_eq!(gb.body.bottom(), GROUND_Y);
        }
    }

    #[test]
    fn restart_rebuilds_a_full_population() {
        let tuning = TuningConfig {
            chicken_count: 2,
            small_chicken_count: 1,
            coin_count: 3,
            ground_bottle_count: 4,
            ..TuningConfig::default()
        };
        let mut w = WorldState::new(tuning);
        let mut r = rng();
        start_game(&mut w, &mut r);
        // Wreck the session.
        w.enemies.clear();
        w.coins.clear();
        w.character.energy = 10;
        w.coin_meter = 60;
        w.bottle_count = 9;
        w.paused = true;
        w.tick = 500;

        restart_game(&mut w, &mut r);
        let chickens = w
            .enemies
            .iter()
            .filter(|e| matches!(e, Enemy::Chicken(_)))
            .count();
        assert_eq!(chickens, 3);
        assert!(w.boss().is_some());
        assert_eq!(w.coins.len(), 3);
        assert_eq!(w.ground_bottles.len(), 4);
        assert_eq!(w.character.energy, 100);
        assert_eq!(w.coin_meter, 0);
        assert_eq!(w.bottle_count, 0);
        assert_eq!(w.tick, 0);
        assert!(!w.paused);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn return_to_title_keeps_tuning_and_viewport() {
        let tuning = TuningConfig {
            boss_health: 20,
            ..TuningConfig::default()
        };
        let mut w = WorldState::new(tuning);
        start_game(&mut w, &mut rng());
        w.camera.set_view(800.0, 480.0);
        return_to_title(&mut w);
        assert_eq!(w.phase, Phase::Title);
        assert!(w.enemies.is_empty());
        assert_eq!(w.tuning.boss_health, 20);
        assert_eq!(w.camera.view_w, 800.0);
        assert_eq!(w.camera.x, 0.0);
    }
}
