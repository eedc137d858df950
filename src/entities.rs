/// All game entity types — pure data, no game rules.
///
/// Positions are in play-field pixels (the virtual 640×720 screen); the
/// terminal renderer scales them down to cells at draw time.

use glam::Vec2;
use serde::Deserialize;

use crate::explosion::Explosion;
use crate::formation::Formation;
use crate::menu::{MainMenu, SettingsMenu};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Position, movement direction and speed of anything that moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Unit vector or zero.
    pub direction: Vec2,
    /// Pixels per second.
    pub speed: f32,
}

impl Transform {
    pub fn new(position: Vec2, direction: Vec2, speed: f32) -> Self {
        Self {
            position,
            direction,
            speed,
        }
    }

    /// Integrate one step of straight-line motion.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
    }
}

/// Axis-aligned bounding box size, anchored at a transform's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionShape {
    pub size: Vec2,
}

impl CollisionShape {
    pub fn square(side: f32) -> Self {
        Self {
            size: Vec2::splat(side.max(0.0)),
        }
    }

    pub fn rect_at(&self, position: Vec2) -> Rect {
        Rect {
            x: position.x,
            y: position.y,
            w: self.size.x,
            h: self.size.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub transform: Transform,
    pub collision: CollisionShape,
    /// Cleared by the game loop on defeat; an inactive player is not drawn.
    pub active: bool,
    /// Seconds between two permitted shots.
    pub shoot_interval: f64,
    /// Clock time of the last permitted shot.
    pub last_shot_time: f64,
}

impl Player {
    pub fn new(position: Vec2, speed: f32, size: f32, shoot_interval: f64) -> Self {
        Self {
            transform: Transform::new(position, Vec2::ZERO, speed),
            collision: CollisionShape::square(size),
            active: true,
            shoot_interval,
            last_shot_time: -shoot_interval,
        }
    }

    pub fn rect(&self) -> Rect {
        self.collision.rect_at(self.transform.position)
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Enemy archetype, numbered the way level files number them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Scout,
    Fighter,
    Bomber,
    Mothership,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Scout,
        EnemyKind::Fighter,
        EnemyKind::Bomber,
        EnemyKind::Mothership,
    ];

    pub fn from_type_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn type_id(self) -> u32 {
        match self {
            EnemyKind::Scout => 0,
            EnemyKind::Fighter => 1,
            EnemyKind::Bomber => 2,
            EnemyKind::Mothership => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub transform: Transform,
    pub collision: CollisionShape,
    pub active: bool,
    pub kind: EnemyKind,
    /// Points granted when this enemy is shot down.
    pub score_value: u32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        self.collision.rect_at(self.transform.position)
    }

    /// Centre of the bottom edge, where enemy shots leave from.
    pub fn muzzle(&self) -> Vec2 {
        self.transform.position + Vec2::new(self.collision.size.x / 2.0, self.collision.size.y)
    }
}

/// How a wave moves across the play field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyMotion {
    /// The whole wave sweeps sideways and steps down at each edge.
    #[default]
    March,
    /// Every enemy falls straight down at its own speed.
    Descend,
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// A shot. Who fired it is encoded only in the sign of `direction.y`:
/// negative travels up (player), positive travels down (enemy).
#[derive(Clone, Debug)]
pub struct Bullet {
    pub transform: Transform,
    pub collision: CollisionShape,
    pub active: bool,
}

impl Bullet {
    pub fn new(position: Vec2, direction: Vec2, speed: f32, size: f32) -> Self {
        Self {
            transform: Transform::new(position, direction, speed),
            collision: CollisionShape::square(size),
            active: true,
        }
    }

    /// Re-arm a spent bullet slot for a new shot.
    pub fn reset(&mut self, position: Vec2, direction: Vec2, speed: f32, size: f32) {
        self.transform = Transform::new(position, direction, speed);
        self.collision = CollisionShape::square(size);
        self.active = true;
    }

    pub fn rect(&self) -> Rect {
        self.collision.rect_at(self.transform.position)
    }

    pub fn is_from_player(&self) -> bool {
        self.transform.direction.y < 0.0
    }

    pub fn is_from_enemy(&self) -> bool {
        self.transform.direction.y > 0.0
    }
}

// ── Background ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec2,
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Held keys relevant to the ship, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl PlayerInput {
    /// Normalised movement direction, zero when nothing (or opposites) is held.
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Key presses (edge-triggered) used to drive menus and screens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MenuInput {
    pub up: bool,
    pub down: bool,
    pub select: bool,
    pub back: bool,
}

/// Everything the simulation needs from the host for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub dt: f32,
    pub player: PlayerInput,
    pub menu: MenuInput,
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    StartMenu,
    SettingsMenu,
    Play,
    ScoreScreen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Per-game counters, reset every time play starts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub score: u32,
    pub enemies_defeated: u32,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub outcome: Option<Outcome>,
}

impl Session {
    pub fn started_at(now: f64) -> Self {
        Self {
            start_time: now,
            ..Self::default()
        }
    }

    /// Seconds between start and end of the game, or up to `now` if still running.
    pub fn elapsed(&self, now: f64) -> f64 {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

/// Options the player can change from the settings screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub enemy_motion: EnemyMotion,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state. Cloneable so `compute::tick` can return a new copy
/// without mutating the original.
#[derive(Clone, Debug)]
pub struct EntireGameStateInfo {
    pub status: GameStatus,
    pub session: Session,
    pub settings: Settings,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Bullet pool: spent shots stay in place with `active == false` and are
    /// re-armed by the next shot.
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub formation: Formation,
    pub main_menu: MainMenu,
    pub settings_menu: SettingsMenu,
    /// Simulated seconds since the program started.
    pub clock: f64,
    pub last_enemy_shot: f64,
    /// Index into the campaign; survives restarts, advances on victory.
    pub level_index: usize,
    /// Cleared when the player picks "Quit".
    pub running: bool,
    /// Play-field size in pixels.
    pub field: Vec2,
}

impl EntireGameStateInfo {
    pub fn field_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.field.x, self.field.y)
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.active)
    }
}
