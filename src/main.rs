//! Process entry, terminal lifecycle, and the frame/tick loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::level;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new(config.tuning.clone());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Could not set up the terminal: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = run(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal restore failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Fatal: {e}");
    }

    println!();
    println!("Thanks for playing Cluckshot!");
}

fn run(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut rng = StdRng::from_entropy();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tuning.tick_rate_ms);

    // A throw press between simulation ticks is latched here so the
    // faster poll loop cannot swallow it.
    let mut pending_throw = false;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, &gp, &mut rng) {
            break;
        }

        if world.phase == Phase::Playing && !world.paused {
            if kb.any_pressed(KEYS_THROW) || gp.throw_pressed() {
                pending_throw = true;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            // While paused only the blink counter advances.
            if world.paused {
                world.anim_tick = world.anim_tick.wrapping_add(1);
                tick_message(world);
                last_tick = Instant::now();
            } else {
                match world.phase {
                    Phase::Playing => {
                        let frame_input = FrameInput {
                            left: kb.any_held(KEYS_LEFT) || gp.left_held(),
                            right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
                            jump: kb.any_held(KEYS_JUMP) || gp.jump_held(),
                            throw: std::mem::take(&mut pending_throw),
                        };
                        let events = step::step(world, frame_input);
                        route_sfx(sound, &events);
                    }
                    Phase::Dying => {
                        tick_dying(world);
                    }
                    Phase::Title | Phase::Won | Phase::Lost => {
                        world.anim_tick = world.anim_tick.wrapping_add(1);
                    }
                }

                // During play the sim decrements the message timer itself.
                if world.phase != Phase::Playing {
                    tick_message(world);
                }

                last_tick = Instant::now();
            }
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn tick_message(world: &mut WorldState) {
    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }
}

fn route_sfx(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for ev in events {
        match ev {
            GameEvent::Jump => sfx.play_jump(),
            GameEvent::CoinCollected => sfx.play_coin(),
            GameEvent::BottleThrown => sfx.play_throw(),
            GameEvent::EnemyKilled => sfx.play_squash(),
            GameEvent::BossHurt => sfx.play_boss_hurt(),
            GameEvent::BossDead => sfx.play_boss_dead(),
            GameEvent::CharacterDead => sfx.play_char_dead(),
        }
    }
}

// ── Key bindings ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
    KeyCode::Char(' '),
];
const KEYS_THROW: &[KeyCode] = &[
    KeyCode::Char('f'),
    KeyCode::Char('F'),
    KeyCode::Char('x'),
    KeyCode::Char('X'),
];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Phase-level input: menus, pause, restart. Returns true to quit.
fn handle_meta(world: &mut WorldState, kb: &InputState, gp: &GamepadState, rng: &mut StdRng) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    if world.phase == Phase::Playing {
        // Toggle pause before the paused-input gate.
        if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
            world.toggle_pause();
            if world.paused {
                world.set_message("PAUSED  [P] Resume", 0);
            } else {
                world.message.clear();
                world.message_timer = 0;
            }
            return false;
        }

        if world.paused {
            if kb.any_pressed(KEYS_RESTART) {
                level::restart_game(world, rng);
            } else if esc {
                level::return_to_title(world);
            }
            // Everything else is ignored until resume.
            return false;
        }

        if kb.any_pressed(KEYS_RESTART) {
            level::restart_game(world, rng);
            world.set_message("Fresh start!", 40);
        } else if esc {
            level::return_to_title(world);
        }
        return false;
    }

    match world.phase {
        Phase::Title => {
            if confirm {
                level::start_game(world, rng);
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }

        Phase::Won | Phase::Lost => {
            if confirm || kb.any_pressed(KEYS_RESTART) {
                level::restart_game(world, rng);
            } else if esc || kb.any_pressed(KEYS_QUIT) {
                level::return_to_title(world);
            }
        }

        // No skipping the collapse.
        Phase::Dying => {}

        // Handled above.
        Phase::Playing => {}
    }

    false
}

// ── Death collapse ──

/// Ticks the dying collapse runs before the session settles on Lost.
const DYING_TICKS: u32 = 50;

fn tick_dying(world: &mut WorldState) {
    world.anim_tick += 1;
    if world.anim_tick >= DYING_TICKS {
        world.phase = Phase::Lost;
        world.anim_tick = 0;
        world.set_message("The rooster reigns supreme", 0);
    }
}
