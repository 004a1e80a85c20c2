/// Gamepad input via gilrs.
///
/// The tracker mirrors the keyboard's two-read model: held state for
/// continuous actions, a fresh-press list for one-shot ones. D-pad and
/// left stick feed the same logical directions, so either device can
/// drive the character.
///
/// Default mapping:
///   D-pad / Left stick    Run left / right
///   A or D-pad Up         Jump
///   X or B                Throw bottle
///   Start                 Pause / Confirm

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

/// Stick deflection below this is treated as noise.
const STICK_DEADZONE: f32 = 0.25;

/// Face and shoulder buttons an action can bind to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    /// Config names: the pad letter or the gilrs compass alias.
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Buttons bound to each game action, loaded from config.
struct Bindings {
    jump: Vec<Btn>,
    throw: Vec<Btn>,
    pause: Vec<Btn>,
    confirm: Vec<Btn>,
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings {
            jump: vec![Btn::A],
            throw: vec![Btn::X, Btn::B],
            pause: vec![Btn::Start],
            confirm: vec![Btn::A, Btn::Start],
        }
    }
}

/// Movement directions, merged from D-pad booleans and the analog
/// stick. No game action edge-triggers on a direction, so these carry
/// held state only.
#[derive(Default)]
struct Directions {
    dpad_left: bool,
    dpad_right: bool,
    dpad_up: bool,
    stick_x: f32,
    stick_y: f32,
}

impl Directions {
    fn left(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }
    fn right(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }
    fn up(&self) -> bool {
        self.dpad_up || self.stick_y > STICK_DEADZONE
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    /// Held state per `Btn`, indexed by discriminant.
    held: [bool; BTN_COUNT],
    /// Buttons that went down during the latest update.
    fresh: Vec<Btn>,
    dirs: Directions,
    bindings: Bindings,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            held: [false; BTN_COUNT],
            fresh: Vec::with_capacity(4),
            dirs: Directions::default(),
            bindings: Bindings::default(),
            connected,
        }
    }

    /// Overlay configured bindings. Unknown names are skipped; an
    /// action whose list parses to nothing keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|n| Btn::from_name(n)).collect()
        }
        let jump = parse(&cfg.jump);
        if !jump.is_empty() {
            self.bindings.jump = jump;
        }
        let throw = parse(&cfg.throw);
        if !throw.is_empty() {
            self.bindings.throw = throw;
        }
        let pause = parse(&cfg.pause);
        if !pause.is_empty() {
            self.bindings.pause = pause;
        }
        let confirm = parse(&cfg.confirm);
        if !confirm.is_empty() {
            self.bindings.confirm = confirm;
        }
    }

    /// Pump pending pad events. Call once per poll iteration, right
    /// after the keyboard drain; fresh presses last until the next call.
    pub fn update(&mut self) {
        self.fresh.clear();
        #[cfg(feature = "gamepad")]
        self.pump();
    }

    #[cfg(feature = "gamepad")]
    fn pump(&mut self) {
        // Destructure so the event loop can hold `gilrs` mutably while
        // the handlers write the sibling fields.
        let GamepadState { gilrs, held, fresh, dirs, connected, .. } = self;
        let gilrs = match gilrs {
            Some(g) => g,
            None => return,
        };

        while let Some(ev) = gilrs.next_event() {
            match ev.event {
                EventType::ButtonPressed(b, _) => {
                    *connected = true;
                    match b {
                        Button::DPadLeft => dirs.dpad_left = true,
                        Button::DPadRight => dirs.dpad_right = true,
                        Button::DPadUp => dirs.dpad_up = true,
                        _ => {
                            if let Some(btn) = Btn::from_gilrs(b) {
                                if !held[btn as usize] {
                                    fresh.push(btn);
                                }
                                held[btn as usize] = true;
                            }
                        }
                    }
                }
                EventType::ButtonReleased(b, _) => {
                    *connected = true;
                    match b {
                        Button::DPadLeft => dirs.dpad_left = false,
                        Button::DPadRight => dirs.dpad_right = false,
                        Button::DPadUp => dirs.dpad_up = false,
                        _ => {
                            if let Some(btn) = Btn::from_gilrs(b) {
                                held[btn as usize] = false;
                            }
                        }
                    }
                }
                EventType::AxisChanged(axis, v, _) => {
                    *connected = true;
                    match axis {
                        Axis::LeftStickX => dirs.stick_x = v,
                        Axis::LeftStickY => dirs.stick_y = v,
                        _ => {}
                    }
                }
                EventType::Connected => *connected = true,
                EventType::Disconnected => {
                    // Nothing will ever send the releases; drop all state.
                    *connected = false;
                    *held = [false; BTN_COUNT];
                    fresh.clear();
                    *dirs = Directions::default();
                }
                _ => {}
            }
        }
    }

    // ── Action queries ──

    fn bound_fresh(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.fresh.contains(b))
    }

    fn bound_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.held[b as usize])
    }

    /// Jump reads as held, like the keyboard: the sim only launches a
    /// grounded character, so holding the button cannot bunny-hop.
    pub fn jump_held(&self) -> bool {
        self.bound_held(&self.bindings.jump) || self.dirs.up()
    }

    pub fn throw_pressed(&self) -> bool {
        self.bound_fresh(&self.bindings.throw)
    }

    pub fn pause_pressed(&self) -> bool {
        self.bound_fresh(&self.bindings.pause)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.bound_fresh(&self.bindings.confirm)
    }

    pub fn left_held(&self) -> bool {
        self.dirs.left()
    }

    pub fn right_held(&self) -> bool {
        self.dirs.right()
    }
}
