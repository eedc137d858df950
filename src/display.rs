/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only translates
/// state into terminal commands. World positions are in play-field pixels
/// and get scaled onto the cells inside the border.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use space_invaders::entities::{
    Bullet, Enemy, EnemyKind, EnemyMotion, EntireGameStateInfo, GameStatus, Outcome,
};
use space_invaders::level::Level;
use space_invaders::menu::{lerp, MAIN_MENU_ITEMS, SETTINGS_ITEMS};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TILE: Color = Color::DarkBlue;
const C_STAR: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE_TOP: Color = Color::Grey;
const C_TITLE_BOTTOM: Color = Color::Green;
const C_SELECTED: Color = Color::Yellow;

/// Terminal cells available for the play field, inside the border.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    field: Vec2,
}

impl Viewport {
    fn new(width: u16, height: u16, field: Vec2) -> Self {
        Self {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
            field,
        }
    }

    /// Cell for a world position, `None` when it falls outside the field.
    fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= self.field.x || pos.y >= self.field.y {
            return None;
        }
        let col = (pos.x / self.field.x * self.cols as f32) as u16;
        let row = (pos.y / self.field.y * self.rows as f32) as u16;
        Some((self.left + col.min(self.cols - 1), self.top + row.min(self.rows - 1)))
    }

    /// World position at the centre of a cell.
    fn world(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) / self.cols as f32 * self.field.x,
            (row as f32 + 0.5) / self.rows as f32 * self.field.y,
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &EntireGameStateInfo, level: &Level) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(width, height, state.field);
    match state.status {
        GameStatus::StartMenu => draw_start_menu(out, state, &view, width, height)?,
        GameStatus::SettingsMenu => draw_settings(out, state, width, height)?,
        GameStatus::Play => draw_play(out, state, level, &view, width, height)?,
        GameStatus::ScoreScreen => draw_score_screen(out, state, width, height)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    text: &str,
    width: u16,
    row: u16,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Print `text` starting at a possibly negative column, clipping what falls
/// off either side of the screen.
fn draw_clipped<W: Write>(
    out: &mut W,
    text: &str,
    col: i32,
    row: u16,
    width: u16,
    color: Color,
) -> std::io::Result<()> {
    let visible: String = text
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let c = col + *i as i32;
            c >= 0 && c < width as i32
        })
        .map(|(_, ch)| ch)
        .collect();
    if visible.is_empty() {
        return Ok(());
    }
    out.queue(cursor::MoveTo(col.max(0) as u16, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(visible))?;
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_start_menu<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    draw_stars(out, state, view)?;

    let top = "S P A C E";
    let bottom = "I N V A D E R S";
    let t = state.main_menu.title_progress;
    let top_len = top.chars().count() as f32;
    let bottom_len = bottom.chars().count() as f32;
    let centre = width as f32 / 2.0;
    let title_row = height / 5;

    let top_col = lerp(-top_len, centre - top_len / 2.0, t) as i32;
    let bottom_col = lerp(width as f32, centre - bottom_len / 2.0, t) as i32;
    draw_clipped(out, top, top_col, title_row, width, C_TITLE_TOP)?;
    draw_clipped(out, bottom, bottom_col, title_row + 2, width, C_TITLE_BOTTOM)?;

    let first = height / 2;
    for (i, item) in MAIN_MENU_ITEMS.iter().enumerate() {
        let selected = i == state.main_menu.selected;
        let label = if selected {
            format!("> {} <", item)
        } else {
            item.to_string()
        };
        let color = if selected { C_SELECTED } else { Color::White };
        draw_centered(out, &label, width, first + i as u16 * 2, color)?;
    }

    draw_centered(
        out,
        "↑ ↓ : Choose   ENTER : Select   ESC : Quit",
        width,
        height.saturating_sub(2),
        C_HINT,
    )
}

fn draw_settings<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let first = height / 2;
    draw_centered(out, "OPTIONS", width, first.saturating_sub(3), Color::Cyan)?;

    let motion = match state.settings.enemy_motion {
        EnemyMotion::March => "March",
        EnemyMotion::Descend => "Descend",
    };
    for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
        let text = if i == 0 {
            format!("{}: {}", item, motion)
        } else {
            item.to_string()
        };
        let selected = i == state.settings_menu.selected;
        let label = if selected { format!("> {} <", text) } else { text };
        let color = if selected { C_SELECTED } else { Color::White };
        draw_centered(out, &label, width, first + i as u16 * 2, color)?;
    }
    Ok(())
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_play<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    level: &Level,
    view: &Viewport,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    draw_border(out, width, height)?;
    draw_tiles(out, level, view)?;
    draw_stars(out, state, view)?;

    if state.player.active {
        draw_player(out, state, view)?;
    }
    for enemy in state.active_enemies() {
        draw_enemy(out, enemy, view)?;
    }
    for bullet in state.active_bullets() {
        draw_bullet(out, bullet, view)?;
    }
    for explosion in &state.explosions {
        out.queue(style::SetForegroundColor(C_EXPLOSION))?;
        for particle in &explosion.particles {
            if let Some((col, row)) = view.cell(*particle) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("*"))?;
            }
        }
    }

    draw_hud(out, state, level, width)?;
    draw_controls_hint(out, height)
}

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

/// Shade every cell whose centre lands on a non-empty map tile.
fn draw_tiles<W: Write>(out: &mut W, level: &Level, view: &Viewport) -> std::io::Result<()> {
    if level.tile_layers.is_empty() || level.tile_size.x <= 0.0 || level.tile_size.y <= 0.0 {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(C_TILE))?;
    for row in 0..view.rows {
        for col in 0..view.cols {
            let world = view.world(col, row);
            let tx = (world.x / level.tile_size.x) as u32;
            let ty = (world.y / level.tile_size.y) as u32;
            if level.tile_layers.iter().any(|layer| layer.tile_at(tx, ty) != 0) {
                out.queue(cursor::MoveTo(view.left + col, view.top + row))?;
                out.queue(Print("░"))?;
            }
        }
    }
    Ok(())
}

fn draw_stars<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    for star in &state.stars {
        if let Some((col, row)) = view.cell(star.position) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("."))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    level: &Level,
    width: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.session.score)))?;

    let level_str = format!("[ LEVEL {} ]", state.level_index + 1);
    draw_centered(out, &level_str, width, 0, C_HUD_LEVEL)?;

    let time_str = format!("{:>7.1}s  {}", state.session.elapsed(state.clock), level.name);
    let rx = width.saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(time_str))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    let p = &state.player;
    let centre = p.transform.position + p.collision.size / 2.0;
    if let Some((col, row)) = view.cell(centre) {
        out.queue(style::SetForegroundColor(C_PLAYER))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(view.left), row))?;
        out.queue(Print("/▲\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    let (sprite, color) = match enemy.kind {
        EnemyKind::Scout => ("«▼»", Color::Green),
        EnemyKind::Fighter => ("(◎)", Color::Red),
        EnemyKind::Bomber => ("╚█╝", Color::Magenta),
        EnemyKind::Mothership => ("<■>", Color::Cyan),
    };
    let centre = enemy.transform.position + enemy.collision.size / 2.0;
    if let Some((col, row)) = view.cell(centre) {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(view.left), row))?;
        out.queue(Print(sprite))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: &Viewport) -> std::io::Result<()> {
    let centre = bullet.transform.position + bullet.collision.size / 2.0;
    let Some((col, row)) = view.cell(centre) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    if bullet.is_from_player() {
        out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
        out.queue(Print("║"))?;
    } else {
        out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
        out.queue(Print("↓"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → ↑ ↓ / WASD : Move   SPACE : Shoot   ESC : Menu   Q : Quit"))?;
    Ok(())
}

// ── Score screen ──────────────────────────────────────────────────────────────

fn draw_score_screen<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let session = &state.session;
    let (result, color) = match session.outcome {
        Some(Outcome::Victory) => ("You won!", Color::Green),
        _ => ("Defeat", Color::Red),
    };

    let lines = [
        (format!("Final score: {}", session.score), Color::White),
        (format!("Enemies defeated: {}", session.enemies_defeated), Color::White),
        (
            format!("Game time: {:.2} seconds", session.elapsed(state.clock)),
            Color::White,
        ),
    ];

    let start_row = (height / 2).saturating_sub(4);
    draw_centered(out, result, width, start_row, color)?;
    for (i, (text, color)) in lines.iter().enumerate() {
        draw_centered(out, text, width, start_row + 2 + i as u16, *color)?;
    }
    draw_centered(
        out,
        "Press Enter to play again   ESC : Menu",
        width,
        start_row + 6,
        C_HINT,
    )
}
