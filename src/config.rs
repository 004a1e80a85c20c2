/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
}

/// Pacing and population knobs for the simulation. Every `*_ticks`
/// window counts simulation ticks, one per `tick_rate_ms`.
#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub tick_rate_ms: u64,
    pub character_speed: f32,
    pub boss_speed: f32,
    pub bottle_speed: f32,
    pub invuln_ticks: u32,       // mercy window after a hit
    pub boss_hurt_ticks: u32,    // boss stagger after a bottle
    pub boss_death_ticks: u32,   // fall animation before the win fires
    pub boss_act_ticks: u32,     // the boss thinks/moves every Nth tick
    pub chicken_decay_ticks: u32, // how long a squashed chicken lingers
    pub walk_anim_ticks: u32,    // ticks per walk animation frame
    pub sway_anim_ticks: u32,    // ground-bottle sway half-period
    pub boss_health: i32,
    pub chicken_count: u32,
    pub small_chicken_count: u32,
    pub coin_count: u32,
    pub ground_bottle_count: u32,
    pub cloud_count: u32,
    pub max_bottles: u32,        // ammo the character can carry
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub throw: Vec<String>,
    pub pause: Vec<String>,
    pub confirm: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    tuning: TomlTuning,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTuning {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_character_speed")]
    character_speed: f32,
    #[serde(default = "default_boss_speed")]
    boss_speed: f32,
    #[serde(default = "default_bottle_speed")]
    bottle_speed: f32,
    #[serde(default = "default_invuln")]
    invuln_ticks: u32,
    #[serde(default = "default_boss_hurt")]
    boss_hurt_ticks: u32,
    #[serde(default = "default_boss_death")]
    boss_death_ticks: u32,
    #[serde(default = "default_boss_act")]
    boss_act_ticks: u32,
    #[serde(default = "default_chicken_decay")]
    chicken_decay_ticks: u32,
    #[serde(default = "default_walk_anim")]
    walk_anim_ticks: u32,
    #[serde(default = "default_sway_anim")]
    sway_anim_ticks: u32,
    #[serde(default = "default_boss_health")]
    boss_health: i32,
    #[serde(default = "default_chicken_count")]
    chicken_count: u32,
    #[serde(default = "default_small_chicken_count")]
    small_chicken_count: u32,
    #[serde(default = "default_coin_count")]
    coin_count: u32,
    #[serde(default = "default_ground_bottle_count")]
    ground_bottle_count: u32,
    #[serde(default = "default_cloud_count")]
    cloud_count: u32,
    #[serde(default = "default_max_bottles")]
    max_bottles: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_throw")]
    throw: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }     // ~60 simulation ticks per second
fn default_character_speed() -> f32 { 1.5 }
fn default_boss_speed() -> f32 { 2.0 }
fn default_bottle_speed() -> f32 { 10.0 }
fn default_invuln() -> u32 { 60 }        // ~1s at the default tick rate
fn default_boss_hurt() -> u32 { 30 }
fn default_boss_death() -> u32 { 120 }   // ~2s fall before removal + win
fn default_boss_act() -> u32 { 6 }
fn default_chicken_decay() -> u32 { 24 }
fn default_walk_anim() -> u32 { 12 }
fn default_sway_anim() -> u32 { 30 }     // ~0.5s lean per side
fn default_boss_health() -> i32 { 12 }   // bottle hits to bring it down
fn default_chicken_count() -> u32 { 4 }
fn default_small_chicken_count() -> u32 { 3 }
fn default_coin_count() -> u32 { 5 }
fn default_ground_bottle_count() -> u32 { 6 }
fn default_cloud_count() -> u32 { 2 }
fn default_max_bottles() -> u32 { 10 }

fn default_jump() -> Vec<String> { vec!["A".into()] }
fn default_throw() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }

impl Default for TomlTuning {
    fn default() -> Self {
        TomlTuning {
            tick_rate_ms: default_tick_rate(),
            character_speed: default_character_speed(),
            boss_speed: default_boss_speed(),
            bottle_speed: default_bottle_speed(),
            invuln_ticks: default_invuln(),
            boss_hurt_ticks: default_boss_hurt(),
            boss_death_ticks: default_boss_death(),
            boss_act_ticks: default_boss_act(),
            chicken_decay_ticks: default_chicken_decay(),
            walk_anim_ticks: default_walk_anim(),
            sway_anim_ticks: default_sway_anim(),
            boss_health: default_boss_health(),
            chicken_count: default_chicken_count(),
            small_chicken_count: default_small_chicken_count(),
            coin_count: default_coin_count(),
            ground_bottle_count: default_ground_bottle_count(),
            cloud_count: default_cloud_count(),
            max_bottles: default_max_bottles(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            throw: default_throw(),
            pause: default_pause(),
            confirm: default_confirm(),
        }
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        TomlTuning::default().into()
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        TomlGamepad::default().into()
    }
}

impl From<TomlTuning> for TuningConfig {
    fn from(t: TomlTuning) -> Self {
        TuningConfig {
            tick_rate_ms: t.tick_rate_ms.max(1),
            character_speed: t.character_speed,
            boss_speed: t.boss_speed,
            bottle_speed: t.bottle_speed,
            invuln_ticks: t.invuln_ticks,
            boss_hurt_ticks: t.boss_hurt_ticks,
            boss_death_ticks: t.boss_death_ticks,
            boss_act_ticks: t.boss_act_ticks.max(1), // zero would stall the boss forever
            chicken_decay_ticks: t.chicken_decay_ticks,
            walk_anim_ticks: t.walk_anim_ticks.max(1),
            sway_anim_ticks: t.sway_anim_ticks.max(1),
            boss_health: t.boss_health.max(1),
            chicken_count: t.chicken_count,
            small_chicken_count: t.small_chicken_count,
            coin_count: t.coin_count,
            ground_bottle_count: t.ground_bottle_count,
            cloud_count: t.cloud_count,
            max_bottles: t.max_bottles,
        }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(t: TomlGamepad) -> Self {
        GamepadConfig {
            jump: t.jump,
            throw: t.throw,
            pause: t.pause,
            confirm: t.confirm,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            tuning: toml_cfg.tuning.into(),
            gamepad: toml_cfg.gamepad.into(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tuning: TuningConfig::default(),
            gamepad: GamepadConfig::default(),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/cluckshot → /usr/games/cluckshot
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/cluckshot)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/cluckshot");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/cluckshot)
    let sys = PathBuf::from("/usr/share/cluckshot");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
