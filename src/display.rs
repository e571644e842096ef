//! Terminal front end: all crossterm drawing lives here.
//!
//! The simulation's view (1920×1080 world units by default) is squeezed
//! onto whatever grid of cells the terminal offers. The scene is drawn into
//! an off-screen cell buffer through the core's `Renderer` trait, then
//! flushed row by row with one colour change per run of same-coloured cells.

use std::io::Write;

use bevy_math::Vec2;
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use cubanoid::effects::Rgb;
use cubanoid::entities::{EnemyKind, GameState, GameStatus, Loadout, PlayerState, WeaponKind};
use cubanoid::geometry::Aabb;
use cubanoid::render::{draw_scene, Renderer, SpriteKind};
use cubanoid::world::{TileVariant, TILE_SIZE};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TILE_TOP: Color = Color::Grey;
const C_TILE_FILL: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_PLAYER_DASH: Color = Color::Cyan;
const C_PLAYER_DEAD: Color = Color::DarkRed;
const C_GROUND_ENEMY: Color = Color::Red;
const C_FLYING_ENEMY: Color = Color::Magenta;
const C_SHOTGUN: Color = Color::Yellow;
const C_RIFLE: Color = Color::Cyan;
const C_RETICLE: Color = Color::White;
const C_HP_FULL: Color = Color::Green;
const C_HP_EMPTY: Color = Color::DarkGrey;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Mapping between view space and the terminal's cell grid.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    pub fn new(term_w: u16, term_h: u16, view_w: f32, view_h: f32) -> Self {
        let cols = term_w.max(1);
        let rows = term_h.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
        Self {
            cols,
            rows,
            scale_x: f32::from(cols) / view_w.max(1.0),
            scale_y: f32::from(rows) / view_h.max(1.0),
        }
    }

    fn to_cell(self, p: Vec2) -> (i32, i32) {
        (
            (p.x * self.scale_x).floor() as i32,
            (p.y * self.scale_y).floor() as i32,
        )
    }

    /// View-space point under a terminal cell, for mouse aiming.
    pub fn cell_to_view(self, col: u16, row: u16) -> Option<Vec2> {
        let row = row.checked_sub(HUD_ROWS)?;
        if row >= self.rows {
            return None;
        }
        Some(Vec2::new(
            (f32::from(col) + 0.5) / self.scale_x,
            (f32::from(row) + 0.5) / self.scale_y,
        ))
    }
}

// ── Cell buffer ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

struct CellBuffer {
    viewport: Viewport,
    cells: Vec<Cell>,
}

impl CellBuffer {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            cells: vec![BLANK; usize::from(viewport.cols) * usize::from(viewport.rows)],
        }
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        let (cols, rows) = (i32::from(self.viewport.cols), i32::from(self.viewport.rows));
        if col < 0 || row < 0 || col >= cols || row >= rows {
            return;
        }
        self.cells[(row * cols + col) as usize] = Cell { ch, fg };
    }

    /// Cell span covered by `rect`; always at least one cell.
    fn span(&self, rect: Aabb) -> (i32, i32, i32, i32) {
        let (c0, r0) = self.viewport.to_cell(Vec2::new(rect.left(), rect.top()));
        let c1 = ((rect.right() * self.viewport.scale_x).ceil() as i32 - 1).max(c0);
        let r1 = ((rect.bottom() * self.viewport.scale_y).ceil() as i32 - 1).max(r0);
        (c0, r0, c1, r1)
    }

    fn fill(&mut self, rect: Aabb, ch: char, fg: Color) {
        let (c0, r0, c1, r1) = self.span(rect);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put(col, row, ch, fg);
            }
        }
    }

    fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let cols = usize::from(self.viewport.cols);
        for (row, line) in self.cells.chunks(cols).enumerate() {
            out.queue(cursor::MoveTo(0, HUD_ROWS + row as u16))?;
            let mut run = String::with_capacity(cols);
            let mut run_fg = Color::Reset;
            for cell in line {
                if cell.fg != run_fg && !run.is_empty() {
                    out.queue(style::SetForegroundColor(run_fg))?;
                    out.queue(Print(&run))?;
                    run.clear();
                }
                run_fg = cell.fg;
                run.push(cell.ch);
            }
            out.queue(style::SetForegroundColor(run_fg))?;
            out.queue(Print(&run))?;
        }
        Ok(())
    }
}

impl Renderer for CellBuffer {
    fn draw_tile(&mut self, pos: Vec2, variant: TileVariant) {
        let rect = Aabb::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE);
        if variant == TileVariant::Fill {
            self.fill(rect, '▓', C_TILE_FILL);
            return;
        }
        self.fill(rect, '█', C_TILE_FILL);
        let (c0, r0, c1, _) = self.span(rect);
        for col in c0..=c1 {
            self.put(col, r0, '▀', C_TILE_TOP);
        }
        if matches!(variant, TileVariant::SurfaceLeftEdge | TileVariant::Island) {
            self.put(c0, r0, '▞', C_TILE_TOP);
        }
        if matches!(variant, TileVariant::SurfaceRightEdge | TileVariant::Island) {
            self.put(c1, r0, '▚', C_TILE_TOP);
        }
    }

    fn draw_entity_sprite(&mut self, kind: SpriteKind, rect: Aabb, facing_right: bool, anim_frame: u32) {
        match kind {
            SpriteKind::Player(state) => {
                let (body, fg) = match state {
                    PlayerState::Dashing => ('▒', C_PLAYER_DASH),
                    PlayerState::Dead => ('x', C_PLAYER_DEAD),
                    PlayerState::WallContact => ('▌', C_PLAYER),
                    PlayerState::Grounded | PlayerState::Airborne => ('█', C_PLAYER),
                };
                self.fill(rect, body, fg);
                if state != PlayerState::Dead {
                    let (c0, r0, c1, _) = self.span(rect);
                    let (col, eye) = if facing_right { (c1, '>') } else { (c0, '<') };
                    self.put(col, r0, eye, fg);
                }
            }
            SpriteKind::Enemy(EnemyKind::Ground) => {
                self.fill(rect, '▓', C_GROUND_ENEMY);
                let (c0, r0, c1, _) = self.span(rect);
                self.put(if facing_right { c1 } else { c0 }, r0, 'o', Color::White);
            }
            SpriteKind::Enemy(EnemyKind::Flying) => {
                let wing = if anim_frame % 2 == 0 { '^' } else { 'v' };
                self.fill(rect, '▒', C_FLYING_ENEMY);
                let (c0, r0, c1, _) = self.span(rect);
                self.put(c0, r0, wing, C_FLYING_ENEMY);
                self.put(c1, r0, wing, C_FLYING_ENEMY);
            }
            SpriteKind::Bullet(WeaponKind::Shotgun) => {
                let (col, row) = self.viewport.to_cell(rect.center());
                self.put(col, row, '•', C_SHOTGUN);
            }
            SpriteKind::Bullet(WeaponKind::Rifle) => {
                let (col, row) = self.viewport.to_cell(rect.center());
                self.put(col, row, '-', C_RIFLE);
            }
            SpriteKind::Reticle => {
                let (col, row) = self.viewport.to_cell(rect.center());
                self.put(col, row, '+', C_RETICLE);
            }
        }
    }

    fn draw_particle(&mut self, pos: Vec2, color: Rgb, alpha: f32, radius: f32) {
        let fade = |c: u8| (f32::from(c) * alpha) as u8;
        let fg = Color::Rgb {
            r: fade(color.0),
            g: fade(color.1),
            b: fade(color.2),
        };
        let (col, row) = self.viewport.to_cell(pos);
        self.put(col, row, if radius >= 5.0 { '*' } else { '.' }, fg);
    }

    fn draw_health_bar(&mut self, rect: Aabb, fraction: f32) {
        let (c0, r0, c1, _) = self.span(rect);
        let width = c1 - c0 + 1;
        let filled = (width as f32 * fraction).ceil() as i32;
        for i in 0..width {
            let fg = if i < filled { C_HP_FULL } else { C_HP_EMPTY };
            self.put(c0 + i, r0 - 1, '▬', fg);
        }
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame: HUD, scene, controls hint, and the pause or
/// game-over overlay when one applies.
pub fn render<W: Write>(out: &mut W, state: &GameState, viewport: Viewport) -> std::io::Result<()> {
    let mut buffer = CellBuffer::new(viewport);
    draw_scene(state, &mut buffer);

    draw_hud(out, state)?;
    buffer.flush(out)?;
    draw_controls_hint(out, viewport)?;

    match state.status {
        GameStatus::GameOver => draw_game_over(out, state, viewport)?,
        GameStatus::Paused => draw_paused(out, state, viewport)?,
        GameStatus::Playing => {}
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

fn centered<W: Write>(out: &mut W, row: u16, width: u16, text: &str, fg: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(fg))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Title screen with the loadout picker.
pub fn draw_title<W: Write>(out: &mut W, selected: Loadout) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cy = height / 2;

    centered(out, cy.saturating_sub(6), width, "C U B A N O I D", Color::Cyan)?;
    centered(out, cy.saturating_sub(4), width, "Choose a loadout:", Color::White)?;

    let options = [
        ("1", Loadout::ShotgunFirst, "Shotgun (left)  /  Rifle (right)"),
        ("2", Loadout::RifleFirst, "Rifle (left)  /  Shotgun (right)"),
    ];
    for (i, (key, loadout, label)) in options.iter().enumerate() {
        let (marker, fg) = if *loadout == selected {
            ("▶", Color::Yellow)
        } else {
            (" ", Color::DarkGrey)
        };
        let line = format!("{} [{}] {}", marker, key, label);
        centered(out, cy.saturating_sub(2) + i as u16, width, &line, fg)?;
    }

    centered(out, cy + 2, width, "ENTER : Start    ESC : Quit", Color::White)?;
    centered(
        out,
        cy + 4,
        width,
        "A D : Move   SHIFT : Boost   SPACE : Jump   Q : Dash",
        C_HINT,
    )?;
    centered(out, cy + 5, width, "Mouse L / R  or  J / K : Fire", C_HINT)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let armory = &state.armory;
    let magazine = state.config.weapons.magazine;
    let ammo = if armory.is_reloading() {
        format!("RELOAD {:>2}", armory.reload)
    } else {
        let left = magazine.saturating_sub(armory.shots) as usize;
        format!(
            "{}{}",
            "■".repeat(left),
            "□".repeat(magazine as usize - left)
        )
    };

    let dash = &state.player.dash;
    let dash_str = if dash.cooldown == 0 {
        "READY".to_string()
    } else {
        let rate = state.config.view.tick_rate.max(1) as f32;
        format!("{:.1}s", dash.cooldown as f32 / rate)
    };

    let line = format!(
        " Score:{:>7}   L:{:?} R:{:?}   Ammo:{}   Dash:{}   Next HP G:{} F:{}",
        state.score,
        armory.left,
        armory.right,
        ammo,
        dash_str,
        state.spawner.next_ground_health,
        state.spawner.next_flying_health,
    );

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(line))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, viewport: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, HUD_ROWS + viewport.rows))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        " A D : Move  SHIFT : Boost  SPACE : Jump  Q : Dash  Mouse/J K : Fire  1 2 : Loadout  ESC : Pause",
    ))?;
    Ok(())
}

// ── Pause overlay ─────────────────────────────────────────────────────────────

fn draw_paused<W: Write>(out: &mut W, state: &GameState, viewport: Viewport) -> std::io::Result<()> {
    let score_line = format!("Score: {:>7}", state.score);
    let lines: [(&str, Color); 5] = [
        ("╔════════════════════╗", Color::Cyan),
        ("║       PAUSED       ║", Color::Cyan),
        ("╚════════════════════╝", Color::Cyan),
        (score_line.as_str(), Color::Yellow),
        ("I - Resume   R - Restart   M - Title   ESC - Quit", Color::White),
    ];

    let start = (HUD_ROWS + viewport.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, fg)) in lines.iter().enumerate() {
        centered(out, start + i as u16, viewport.cols, text, *fg)?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, viewport: Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>7}", state.score);
    let kills_line = format!(
        "Kills: {} ground  {} flying",
        state.spawner.ground_kills, state.spawner.flying_kills
    );

    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║     YOU  DIED      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (kills_line.as_str(), Color::DarkGrey),
        ("R - Restart   M - Title   ESC - Quit", Color::White),
    ];

    let start = (HUD_ROWS + viewport.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, fg)) in lines.iter().enumerate() {
        centered(out, start + i as u16, viewport.cols, text, *fg)?;
    }
    Ok(())
}
