/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed off-screen into `front`, compared cell by
/// cell against `back` (the frame already on the terminal), and only
/// the differing cells are queued as commands and flushed in a single
/// write; the buffers then swap roles. Full repaints happen only on
/// init, resize, and phase changes, which is what keeps the terminal
/// from flickering.
///
/// World mapping: one terminal cell covers SCALE_X × SCALE_Y world
/// units. Terminal glyphs are roughly twice as tall as wide, so the
/// 8 × 16 split keeps world proportions on screen. Entities are drawn
/// as colored boxes from their world-space bodies with a few accent
/// bands (hat, comb, feet) carved out of the same rectangle.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::boss::{Boss, BossState};
use crate::domain::entity::{
    Body, Bottle, Chicken, ChickenKind, Coin, Facing, GroundBottle, GROUND_Y, WORLD_H, WORLD_W,
};
use crate::domain::kinematics;
use crate::sim::world::{Enemy, Phase, WorldState, COIN_METER_MAX, COIN_STEP};

// ── World-to-cell scale ──

/// World units per terminal column.
const SCALE_X: f32 = 8.0;
/// World units per terminal row.
const SCALE_Y: f32 = 16.0;

/// Row of the HUD bar.
const HUD_ROW: usize = 0;
/// First row of the world viewport.
const VIEW_TOP: usize = 2;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Dark navy painted behind every "empty" cell.
    ///
    /// `Clear(ClearType::All)` and the per-cell backgrounds use the SAME
    /// explicit RGB; on VTE terminals that keeps the gap pixels between
    /// rows the same color as the cells, so no horizontal seams.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 34 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Poison value for the back buffer: matches no real cell, so the
    /// next diff repaints every position.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// `Color::Reset` never reaches the writer; it folds into BASE_BG
    /// here so every cell carries an explicit background.
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y * self.width + x] = cell;
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// One column per char; text past the right edge is dropped.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    /// Columns and rows of the world viewport this frame.
    view_cols: usize,
    view_rows: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            view_cols: 0,
            view_rows: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if (tw, th) != (self.term_w, self.term_h) {
            self.term_w = tw;
            self.term_h = th;
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            // A resize garbles the screen; repaint everything.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Viewport dimensions from terminal size, capped to the world.
        let reserved_rows = VIEW_TOP + 4; // HUD rows plus message and help lines
        let max_rows = (WORLD_H / SCALE_Y).ceil() as usize;
        let max_cols = (WORLD_W / SCALE_X).ceil() as usize;
        self.view_rows = if self.term_h > reserved_rows {
            (self.term_h - reserved_rows).min(max_rows)
        } else {
            1
        };
        self.view_cols = self.term_w.min(max_cols);
        world
            .camera
            .set_view(self.view_cols as f32 * SCALE_X, self.view_rows as f32 * SCALE_Y);

        // Phase transitions repaint from scratch.
        if self.last_phase != Some(world.phase) {
            self.last_phase = Some(world.phase);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Re-follow now that view_w is up to date (a resize moves the clamp).
        if matches!(world.phase, Phase::Playing | Phase::Dying) {
            world.camera.follow(world.character.body.x);
        }

        self.front.clear();
        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::Playing | Phase::Dying => self.compose_game(world),
            Phase::Won => self.compose_won(world),
            Phase::Lost => self.compose_lost(world),
        }

        // The pause veil sits over whatever the phase drew.
        if world.paused {
            self.compose_pause_overlay(world);
        }

        self.flush_diff()?;

        // What was just drawn becomes the reference frame.
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_stale = true;
        let (mut last_x, mut last_y) = (0_usize, 0_usize);

        // Seed known colors. ResetColor here would select the terminal's
        // native defaults instead of BASE_BG and leave stripe artifacts.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    cursor_stale = true;
                    continue;
                }

                // MoveTo only when the run of changed cells breaks.
                if cursor_stale || (x, y) != (last_x + 1, last_y) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    cursor_stale = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── World-space helpers ──

    /// Map a world point to a front-buffer cell, if visible.
    fn view_cell(&self, cam_x: f32, cam_y: f32, wx: f32, wy: f32) -> Option<(usize, usize)> {
        let col = ((wx - cam_x) / SCALE_X).floor() as i32;
        let row = ((wy - cam_y) / SCALE_Y).floor() as i32;
        if col < 0 || row < 0 || col >= self.view_cols as i32 || row >= self.view_rows as i32 {
            return None;
        }
        Some((col as usize, VIEW_TOP + row as usize))
    }

    /// Fill the cells covered by a world-space box.
    fn fill_body(&mut self, cam_x: f32, cam_y: f32, b: &Body, ch: char, fg: Color, bg: Color) {
        if b.w <= 0.0 || b.h <= 0.0 {
            return;
        }
        let x0 = ((b.x - cam_x) / SCALE_X).floor() as i32;
        let x1 = ((b.right() - cam_x) / SCALE_X).ceil() as i32;
        let y0 = ((b.y - cam_y) / SCALE_Y).floor() as i32;
        let y1 = ((b.bottom() - cam_y) / SCALE_Y).ceil() as i32;
        for row in y0.max(0)..y1.min(self.view_rows as i32) {
            for col in x0.max(0)..x1.min(self.view_cols as i32) {
                self.front
                    .set(col as usize, VIEW_TOP + row as usize, Cell::from_char(ch, fg, bg));
            }
        }
    }

    /// Horizontal slice of a body between two height fractions.
    fn band(b: &Body, from: f32, to: f32) -> Body {
        Body::new(b.x, b.y + b.h * from, b.w, b.h * (to - from))
    }

    fn sky_color(wy: f32) -> Color {
        // Pale blue overhead shading into a dusty horizon.
        let t = (wy / GROUND_Y).clamp(0.0, 1.0);
        let r = (110.0 + t * 130.0) as u8;
        let g = (170.0 + t * 44.0) as u8;
        let b = (225.0 - t * 65.0) as u8;
        Color::Rgb { r, g, b }
    }

    fn ground_color(wy: f32) -> Color {
        // Sand darkens with depth below the ground line.
        let t = ((wy - GROUND_Y) / (WORLD_H - GROUND_Y)).clamp(0.0, 1.0);
        let r = (212.0 - t * 60.0) as u8;
        let g = (172.0 - t * 58.0) as u8;
        let b = (104.0 - t * 40.0) as u8;
        Color::Rgb { r, g, b }
    }

    // ── Compose: in-game view ──

    fn compose_game(&mut self, w: &WorldState) {
        let cam_x = w.camera.x;
        let cam_y = w.camera.y;

        self.compose_hud(w);

        // ── Backdrop: sky, clouds, sand ──
        for row in 0..self.view_rows {
            let wy = cam_y + (row as f32 + 0.5) * SCALE_Y;
            let buf_row = VIEW_TOP + row;
            if wy >= GROUND_Y {
                let bg = Self::ground_color(wy);
                let fg = Color::Rgb { r: 170, g: 130, b: 65 };
                for col in 0..self.view_cols {
                    self.front.set(col, buf_row, Cell::from_char('▒', fg, bg));
                }
            } else {
                let bg = Self::sky_color(wy);
                for col in 0..self.view_cols {
                    let wx = cam_x + (col as f32 + 0.5) * SCALE_X;
                    let in_cloud = w.clouds.iter().any(|c| {
                        wx >= c.body.x && wx < c.body.right() && wy >= c.body.y && wy < c.body.bottom()
                    });
                    let cell = if in_cloud {
                        Cell::from_char('░', Color::Rgb { r: 252, g: 252, b: 254 }, bg)
                    } else {
                        Cell::from_char(' ', Color::White, bg)
                    };
                    self.front.set(col, buf_row, cell);
                }
            }
        }

        // ── Pickups ──
        for coin in &w.coins {
            self.draw_coin(cam_x, cam_y, coin);
        }
        let sway_ticks = w.tuning.sway_anim_ticks;
        for gb in &w.ground_bottles {
            self.draw_ground_bottle(cam_x, cam_y, gb, sway_ticks);
        }

        // ── Enemies ──
        let walk_ticks = w.tuning.walk_anim_ticks;
        for enemy in &w.enemies {
            match enemy {
                Enemy::Chicken(c) => self.draw_chicken(cam_x, cam_y, c, walk_ticks),
                Enemy::Boss(b) => self.draw_boss(cam_x, cam_y, b),
            }
        }

        // ── Character ──
        self.draw_character(w, cam_x, cam_y);

        // ── Bottles in flight (over everything) ──
        for bottle in &w.bottles {
            self.draw_bottle(cam_x, cam_y, bottle);
        }

        // ── Message bar ──
        let msg_row = VIEW_TOP + self.view_rows + 1;
        if msg_row < self.front.height && !w.message.is_empty() {
            let msg = format!(" ◈ {} ", w.message);
            let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
            for x in 0..self.front.width {
                self.front.set(x, msg_row, Cell::from_char(' ', Color::Black, bar_bg));
            }
            self.front.put_str(0, msg_row, &msg, Color::Black, bar_bg);
        }

        // ── Help bar ──
        let help_row = VIEW_TOP + self.view_rows + 3;
        if help_row < self.front.height {
            let help = " ←→/AD:Run  ↑/W/SPACE:Jump  F/X:Throw  P:Pause  ESC:Title │ Pad: A:Jump X:Throw";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let hud_bg = Color::Rgb { r: 48, g: 26, b: 16 };
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, hud_bg));
        }

        // Energy: 10 segments, colored by how low it is
        let energy = w.character.energy.max(0);
        let filled = ((energy + 9) / 10) as usize;
        let mut bar = String::with_capacity(10);
        for i in 0..10 {
            bar.push(if i < filled { '█' } else { '·' });
        }
        let heart_fg = if energy > 60 {
            Color::Rgb { r: 90, g: 220, b: 90 }
        } else if energy > 30 {
            Color::Rgb { r: 240, g: 200, b: 60 }
        } else {
            Color::Rgb { r: 235, g: 70, b: 50 }
        };
        self.front.put_str(1, HUD_ROW, &format!("♥ {:>3} ", energy), Color::White, hud_bg);
        self.front.put_str(7, HUD_ROW, &bar, heart_fg, hud_bg);

        // Coin meter: 5 segments of 20
        let coin_segs = (w.coin_meter / COIN_STEP) as usize;
        let max_segs = (COIN_METER_MAX / COIN_STEP) as usize;
        let mut coin_bar = String::with_capacity(max_segs);
        for i in 0..max_segs {
            coin_bar.push(if i < coin_segs { '▰' } else { '▱' });
        }
        self.front.put_str(20, HUD_ROW, "$ ", Color::Rgb { r: 235, g: 185, b: 45 }, hud_bg);
        self.front
            .put_str(22, HUD_ROW, &coin_bar, Color::Rgb { r: 235, g: 185, b: 45 }, hud_bg);

        // Ammo
        let ammo = format!("SALSA ×{:<2}", w.bottle_count);
        self.front.put_str(31, HUD_ROW, &ammo, Color::Rgb { r: 140, g: 210, b: 110 }, hud_bg);

        // Boss bar appears once the fight has started and stays up
        if let Some(boss) = w.boss() {
            if boss.engaged {
                let segs = 12_usize;
                let hp = boss.health.max(0) as f32 / boss.max_health.max(1) as f32;
                let boss_filled = (hp * segs as f32).ceil() as usize;
                let mut boss_bar = String::with_capacity(segs);
                for i in 0..segs {
                    boss_bar.push(if i < boss_filled { '█' } else { '▒' });
                }
                let label = format!("ROOSTER {}", boss_bar);
                let x = self.front.width.saturating_sub(label.chars().count() + 2);
                self.front
                    .put_str(x, HUD_ROW, &label, Color::Rgb { r: 250, g: 90, b: 60 }, hud_bg);
            }
        }
    }

    // ── Entity sprites ──

    fn draw_character(&mut self, w: &WorldState, cam_x: f32, cam_y: f32) {
        let ch = &w.character;

        // Dying collapse blinks fast; the mercy window flickers slower.
        if w.phase == Phase::Dying && (w.anim_tick / 2) % 2 == 1 {
            return;
        }
        if w.phase == Phase::Playing && ch.is_hurt() && (ch.invuln / 3) % 2 == 1 {
            return;
        }

        let b = &ch.body;
        let hat = Color::Rgb { r: 130, g: 70, b: 35 };
        let face = Color::Rgb { r: 235, g: 195, b: 160 };
        let shirt = Color::Rgb { r: 200, g: 60, b: 50 };
        let jeans = Color::Rgb { r: 70, g: 95, b: 165 };
        let boots = Color::Rgb { r: 60, g: 40, b: 25 };

        self.fill_body(cam_x, cam_y, &Self::band(b, 0.0, 0.12), ' ', Color::White, hat);
        self.fill_body(cam_x, cam_y, &Self::band(b, 0.12, 0.24), ' ', Color::White, face);
        self.fill_body(cam_x, cam_y, &Self::band(b, 0.24, 0.55), ' ', Color::White, shirt);
        self.fill_body(cam_x, cam_y, &Self::band(b, 0.55, 0.92), ' ', Color::White, jeans);
        self.fill_body(cam_x, cam_y, &Self::band(b, 0.92, 1.0), ' ', Color::White, boots);

        // Eye on the facing edge
        let eye_x = match ch.facing {
            Facing::Right => b.right() - SCALE_X,
            Facing::Left => b.x + SCALE_X * 0.5,
        };
        if let Some((col, row)) = self.view_cell(cam_x, cam_y, eye_x, b.y + b.h * 0.17) {
            self.front.set(col, row, Cell::from_char('•', Color::Black, face));
        }

        if !kinematics::grounded(ch) {
            // Airborne: both legs tuck up.
            for fx in [b.x, b.right() - SCALE_X] {
                if let Some((col, row)) = self.view_cell(cam_x, cam_y, fx, b.bottom() - 1.0) {
                    self.front.set(col, row, Cell::from_char(' ', Color::White, jeans));
                }
            }
        } else if ch.moving && (ch.frame / w.tuning.walk_anim_ticks.max(1)) % 2 == 1 {
            // Walk cycle: boots alternate.
            let foot = match ch.facing {
                Facing::Right => b.x,
                Facing::Left => b.right() - SCALE_X,
            };
            if let Some((col, row)) = self.view_cell(cam_x, cam_y, foot, b.bottom() - 1.0) {
                self.front.set(col, row, Cell::from_char(' ', Color::White, jeans));
            }
        }
    }

    fn draw_chicken(&mut self, cam_x: f32, cam_y: f32, c: &Chicken, walk_ticks: u32) {
        let b = &c.body;
        if c.dead {
            let corpse = Color::Rgb { r: 150, g: 145, b: 135 };
            self.fill_body(cam_x, cam_y, b, ' ', Color::White, corpse);
            return;
        }

        let feathers = match c.kind {
            ChickenKind::Normal => Color::Rgb { r: 225, g: 218, b: 205 },
            ChickenKind::Small => Color::Rgb { r: 240, g: 215, b: 130 },
        };
        let feet = Color::Rgb { r: 228, g: 142, b: 40 };

        self.fill_body(cam_x, cam_y, &Self::band(b, 0.0, 0.85), ' ', Color::White, feathers);
        self.fill_body(cam_x, cam_y, &Self::band(b, 0.85, 1.0), ' ', Color::White, feet);

        // Three-step walk cycle: both feet planted, then the leading
        // foot lifts, then the trailing one.
        let lifted = match (c.frame / walk_ticks.max(1)) % 3 {
            1 => Some(b.x + 1.0),
            2 => Some(b.right() - SCALE_X),
            _ => None,
        };
        if let Some(fx) = lifted {
            if let Some((col, row)) = self.view_cell(cam_x, cam_y, fx, b.bottom() - 1.0) {
                self.front.set(col, row, Cell::from_char(' ', Color::White, feathers));
            }
        }

        // Chickens march left; eye and beak on the left edge.
        if let Some((col, row)) = self.view_cell(cam_x, cam_y, b.x + 1.0, b.y + b.h * 0.25) {
            self.front.set(col, row, Cell::from_char('•', Color::Black, feathers));
        }
    }

    fn draw_boss(&mut self, cam_x: f32, cam_y: f32, boss: &Boss) {
        let b = &boss.body;
        let plumage = match boss.state {
            BossState::Walking => Color::Rgb { r: 150, g: 55, b: 40 },
            BossState::Alert => Color::Rgb { r: 185, g: 70, b: 30 },
            BossState::Attack => Color::Rgb { r: 220, g: 60, b: 25 },
            BossState::Hurt => {
                if (boss.hurt / 3) % 2 == 0 {
                    Color::Rgb { r: 245, g: 245, b: 245 }
                } else {
                    Color::Rgb { r: 220, g: 60, b: 25 }
                }
            }
            BossState::Dead => Color::Rgb { r: 110, g: 105, b: 100 },
        };

        self.fill_body(cam_x, cam_y, b, ' ', Color::White, plumage);

        if boss.state != BossState::Dead {
            // Comb, legs, and a beak on the facing edge
            let comb = Color::Rgb { r: 230, g: 40, b: 30 };
            let legs = Color::Rgb { r: 205, g: 165, b: 60 };
            self.fill_body(cam_x, cam_y, &Self::band(b, 0.0, 0.07), ' ', Color::White, comb);
            self.fill_body(cam_x, cam_y, &Self::band(b, 0.93, 1.0), ' ', Color::White, legs);

            // Wing stripe beats on the act cadence.
            if boss.frame % 2 == 1 && boss.state != BossState::Hurt {
                let wing = Color::Rgb { r: 120, g: 40, b: 28 };
                self.fill_body(cam_x, cam_y, &Self::band(b, 0.42, 0.58), ' ', Color::White, wing);
            }

            let beak_x = match boss.facing {
                Facing::Left => b.x + 1.0,
                Facing::Right => b.right() - SCALE_X,
            };
            if let Some((col, row)) = self.view_cell(cam_x, cam_y, beak_x, b.y + b.h * 0.18) {
                self.front
                    .set(col, row, Cell::from_char('◣', Color::Rgb { r: 240, g: 180, b: 40 }, plumage));
            }
        }
    }

    fn draw_coin(&mut self, cam_x: f32, cam_y: f32, coin: &Coin) {
        // The hitbox carries generous margins; draw the disc inside it.
        let disc = coin.body.inset(25.0);
        let gold = Color::Rgb { r: 235, g: 185, b: 45 };
        self.fill_body(cam_x, cam_y, &disc, ' ', Color::White, gold);
        if let Some((col, row)) =
            self.view_cell(cam_x, cam_y, disc.center_x(), disc.y + disc.h / 2.0)
        {
            self.front
                .set(col, row, Cell::from_char('$', Color::Rgb { r: 120, g: 85, b: 10 }, gold));
        }
    }

    fn draw_ground_bottle(&mut self, cam_x: f32, cam_y: f32, gb: &GroundBottle, sway_ticks: u32) {
        let glass = Color::Rgb { r: 95, g: 165, b: 70 };
        let cork = Color::Rgb { r: 130, g: 85, b: 45 };
        self.fill_body(cam_x, cam_y, &Self::band(&gb.body, 0.25, 1.0), ' ', Color::White, glass);
        // Idle sway: the neck leans one column to either side.
        let mut neck = Self::band(&gb.body, 0.0, 0.25);
        if (gb.frame / sway_ticks.max(1)) % 2 == 0 {
            neck.x -= SCALE_X;
        } else {
            neck.x += SCALE_X;
        }
        self.fill_body(cam_x, cam_y, &neck, ' ', Color::White, cork);
    }

    fn draw_bottle(&mut self, cam_x: f32, cam_y: f32, bottle: &Bottle) {
        if bottle.broken {
            // Splash: three sparks above the impact point, fading out.
            let fg = if bottle.splash > 6 {
                Color::Rgb { r: 250, g: 150, b: 60 }
            } else {
                Color::Rgb { r: 180, g: 100, b: 50 }
            };
            let cy = bottle.body.y + bottle.body.h / 2.0;
            for dx in [-20.0, 0.0, 20.0] {
                if let Some((col, row)) =
                    self.view_cell(cam_x, cam_y, bottle.body.center_x() + dx, cy)
                {
                    let under = self.front.get(col, row);
                    self.front.set(col, row, Cell::from_char('✶', fg, under.bg));
                }
            }
            return;
        }

        let glass = Color::Rgb { r: 95, g: 165, b: 70 };
        self.fill_body(cam_x, cam_y, &bottle.body, ' ', Color::White, glass);
        // Tumble: the glyph cycles as the bottle flies.
        let spin = ['|', '/', '─', '\\'][(bottle.frame as usize / 3) % 4];
        if let Some((col, row)) = self.view_cell(
            cam_x,
            cam_y,
            bottle.body.center_x(),
            bottle.body.y + bottle.body.h / 2.0,
        ) {
            self.front
                .set(col, row, Cell::from_char(spin, Color::Rgb { r: 225, g: 240, b: 215 }, glass));
        }
    }

    // ── Static screens ──

    fn compose_title(&mut self, w: &WorldState) {
        let title = [
            r"  ___  _    _   _  ___  _  __ ___  _  _  ___  _____ ",
            r" / __|| |  | | | |/ __|| |/ // __|| || |/ _ \|_   _|",
            r"| (__ | |__| |_| | (__ |   < \__ \| __ | (_) | | |  ",
            r" \___||____|\___/ \___||_|\_\|___/|_||_|\___/  |_|  ",
        ];

        for (i, line) in title.iter().enumerate() {
            self.front
                .put_str(2, 2 + i, line, Color::Rgb { r: 255, g: 200, b: 50 }, Color::Reset);
        }

        let subtitle = "◈◈  Salsa versus Poultry  ◈◈";
        let sx = 2 + (title[1].len().saturating_sub(subtitle.chars().count())) / 2;
        self.front
            .put_str(sx, 7, subtitle, Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);

        let tagline = "━━━ A Desert Showdown ━━━";
        let tx = 2 + (title[1].len().saturating_sub(tagline.chars().count())) / 2;
        self.front
            .put_str(tx, 9, tagline, Color::Rgb { r: 200, g: 140, b: 60 }, Color::Reset);

        let menu_row = 12;
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };

        self.front.put_str(8, menu_row, "ENTER   New Game", hi, Color::Reset);
        self.front.put_str(8, menu_row + 1, "  Q     Quit", Color::White, Color::Reset);

        // Key reference
        let help = [
            "Controls",
            "  ←→ / A D       Run            ↑ / W / SPACE  Jump",
            "  F / X          Throw bottle   P / F1         Pause",
            "  R  Restart     ESC  Title",
            "  Pad: Stick/D-pad Run   A Jump   X/B Throw   Start Pause",
        ];

        let help_base = menu_row + 3;
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 {
                Color::Rgb { r: 255, g: 200, b: 50 }
            } else {
                Color::White
            };
            self.front.put_str(8, help_base + i, line, color, Color::Reset);
        }

        let goal = "Stomp the hens, gather salsa, and bring down the giant rooster.";
        self.front
            .put_str(8, help_base + help.len() + 1, goal, Color::DarkGrey, Color::Reset);

        // Message bar
        if !w.message.is_empty() {
            let msg_row = self.front.height.saturating_sub(1);
            let msg = format!(" ◈ {} ", w.message);
            let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
            for x in 0..self.front.width {
                self.front.set(x, msg_row, Cell::from_char(' ', Color::Black, bar_bg));
            }
            self.front.put_str(0, msg_row, &msg, Color::Black, bar_bg);
        }
    }

    fn compose_won(&mut self, w: &WorldState) {
        let banner = [
            "╔═══════════════════════════════════╗",
            "║    ★  THE ROOSTER IS DOWN!  ★     ║",
            "╚═══════════════════════════════════╝",
        ];
        for (i, l) in banner.iter().enumerate() {
            self.front
                .put_str(6, 4 + i, l, Color::Rgb { r: 255, g: 220, b: 50 }, Color::Reset);
        }
        let coins = format!("◈ Coin meter: {}%", w.coin_meter);
        let salsa = format!("◈ Salsa left: {}", w.bottle_count);
        self.front.put_str(8, 9, &coins, Color::White, Color::Reset);
        self.front.put_str(8, 10, &salsa, Color::White, Color::Reset);

        let blink = (w.anim_tick / 5) % 2 == 0;
        if blink {
            self.front.put_str(
                8,
                12,
                "▸ ENTER: Play Again",
                Color::Rgb { r: 80, g: 255, b: 80 },
                Color::Reset,
            );
        }
        self.front
            .put_str(8, 13, "▸ ESC:   Back to Title", Color::DarkGrey, Color::Reset);
    }

    fn compose_lost(&mut self, w: &WorldState) {
        let banner = [
            "╔═══════════════════════════════════╗",
            "║        ✕  YOU GOT COOKED  ✕       ║",
            "╚═══════════════════════════════════╝",
        ];
        for (i, l) in banner.iter().enumerate() {
            self.front
                .put_str(6, 4 + i, l, Color::Rgb { r: 255, g: 60, b: 60 }, Color::Reset);
        }
        let coins = format!("◈ Coin meter: {}%", w.coin_meter);
        self.front.put_str(8, 9, &coins, Color::White, Color::Reset);

        let blink = (w.anim_tick / 5) % 2 == 0;
        if blink {
            self.front.put_str(
                8,
                11,
                "▸ ENTER: Try Again",
                Color::Rgb { r: 80, g: 255, b: 80 },
                Color::Reset,
            );
        }
        self.front
            .put_str(8, 12, "▸ ESC:   Back to Title", Color::DarkGrey, Color::Reset);
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let blink = (w.anim_tick / 8) % 2 == 0;

        let box_w = 26_usize.min(self.view_cols);
        let box_h = 8_usize.min(self.view_rows);
        let box_x = self.view_cols.saturating_sub(box_w) / 2;
        let box_y = VIEW_TOP + self.view_rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::Reset, dim));
            }
        }

        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let key_c = Color::Rgb { r: 100, g: 200, b: 255 };

        let pause_label = if blink { "║  ▶  PAUSED  ◀  ║" } else { "║     PAUSED     ║" };
        self.front.put_str(box_x + 4, box_y, "╔════════════════╗", hdr, dim);
        self.front.put_str(box_x + 4, box_y + 1, pause_label, hdr, dim);
        self.front.put_str(box_x + 4, box_y + 2, "╚════════════════╝", hdr, dim);

        let key_row = box_y + 4;
        self.front.put_str(box_x + 3, key_row, "P    Resume", key_c, dim);
        self.front.put_str(box_x + 3, key_row + 1, "R    Restart", key_c, dim);
        self.front.put_str(box_x + 3, key_row + 2, "ESC  Back to Title", key_c, dim);
    }
}
