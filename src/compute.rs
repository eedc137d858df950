/// Game-logic functions.
///
/// The public entry points (`init_state`, `start_game`, `tick`) take an
/// immutable reference to the current `EntireGameStateInfo` and return a
/// brand-new one. Side effects are limited to the injected RNG. The
/// per-entity helpers mutate the entity they are handed and nothing else.

use glam::Vec2;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::collision;
use crate::config::{EnemyConfig, GameConfig};
use crate::entities::{
    Bullet, CollisionShape, Enemy, EnemyKind, EnemyMotion, EntireGameStateInfo, FrameInput,
    GameStatus, Outcome, Player, PlayerInput, Rect, Session, Settings, Star, Transform,
};
use crate::explosion::Explosion;
use crate::formation::Formation;
use crate::level::{Campaign, Level};
use crate::menu::{MainMenu, MenuAction, SettingsAction, SettingsMenu};

/// Top row of a generated marching wave.
const WAVE_TOP: f32 = 60.0;

/// Score awarded per enemy destroyed.
pub fn score_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Scout => 10,
        EnemyKind::Fighter => 20,
        EnemyKind::Bomber => 30,
        EnemyKind::Mothership => 40,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state shown when the program starts: the title screen.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> EntireGameStateInfo {
    let field = config.field.size();
    let stars = (0..config.stars.count)
        .map(|_| Star {
            position: Vec2::new(rng.gen_range(0.0..field.x), rng.gen_range(0.0..field.y)),
        })
        .collect();

    EntireGameStateInfo {
        status: GameStatus::StartMenu,
        session: Session::default(),
        settings: Settings {
            enemy_motion: config.enemy.motion,
        },
        player: spawn_player(config),
        enemies: Vec::new(),
        bullets: Vec::new(),
        explosions: Vec::new(),
        stars,
        formation: new_formation(config),
        main_menu: MainMenu::new(),
        settings_menu: SettingsMenu::default(),
        clock: 0.0,
        last_enemy_shot: 0.0,
        level_index: 0,
        running: true,
        field,
    }
}

fn spawn_player(config: &GameConfig) -> Player {
    let field = config.field.size();
    Player::new(
        Vec2::new(field.x / 2.0, field.y - config.player.spawn_margin),
        config.player.speed,
        config.player.size,
        config.player.shoot_interval,
    )
}

fn new_formation(config: &GameConfig) -> Formation {
    Formation::new(
        config.enemy.march_speed,
        config.enemy.row_step,
        config.enemy.min_x,
        config.enemy.max_x,
    )
}

pub fn make_enemy(position: Vec2, kind: EnemyKind, direction: Vec2, speed: f32, size: f32) -> Enemy {
    Enemy {
        transform: Transform::new(position, direction, speed),
        collision: CollisionShape::square(size),
        active: true,
        kind,
        score_value: score_for(kind),
    }
}

/// Enemies for the given level: its spawn points if it has any, otherwise a
/// generated wave shaped for the chosen motion.
pub fn spawn_wave(
    level: &Level,
    motion: EnemyMotion,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let cfg = &config.enemy;
    let field = config.field.size();
    if !level.enemy_spawns.is_empty() {
        return level
            .enemy_spawns
            .iter()
            .map(|spawn| {
                let (dir, speed) = enemy_heading(motion, cfg, rng);
                make_enemy(spawn.position, spawn.kind, dir, speed, cfg.size)
            })
            .collect();
    }

    match motion {
        EnemyMotion::March => {
            let wave_width = (cfg.wave_cols.max(1) - 1) as f32 * cfg.wave_spacing + cfg.size;
            let left = ((field.x - wave_width) / 2.0).max(cfg.min_x);
            let mut enemies = Vec::with_capacity(cfg.wave_rows * cfg.wave_cols);
            for row in 0..cfg.wave_rows {
                // Top rows carry the more valuable kinds.
                let tier = (cfg.wave_rows - 1 - row).min(EnemyKind::ALL.len() - 1);
                let kind = EnemyKind::ALL[tier];
                for col in 0..cfg.wave_cols {
                    let position = Vec2::new(
                        left + col as f32 * cfg.wave_spacing,
                        WAVE_TOP + row as f32 * cfg.wave_spacing,
                    );
                    enemies.push(make_enemy(position, kind, Vec2::X, cfg.march_speed, cfg.size));
                }
            }
            enemies
        }
        EnemyMotion::Descend => (0..cfg.wave_rows * cfg.wave_cols)
            .map(|_| {
                let position = Vec2::new(
                    rng.gen_range(0.0..=(field.x - cfg.size).max(0.0)),
                    rng.gen_range(0.0..=field.y / 2.0),
                );
                let kind = *EnemyKind::ALL.choose(rng).unwrap_or(&EnemyKind::Scout);
                let (dir, speed) = enemy_heading(motion, cfg, rng);
                make_enemy(position, kind, dir, speed, cfg.size)
            })
            .collect(),
    }
}

/// Initial direction and speed of a freshly spawned enemy.
fn enemy_heading(motion: EnemyMotion, cfg: &EnemyConfig, rng: &mut impl Rng) -> (Vec2, f32) {
    match motion {
        EnemyMotion::March => (Vec2::X, cfg.march_speed),
        EnemyMotion::Descend => (
            Vec2::Y,
            rng.gen_range(cfg.descend_min_speed..=cfg.descend_max_speed),
        ),
    }
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Move the ship from held input and report whether it fires this frame.
///
/// Position is clamped to `[0, bounds - size]` on both axes. A shot is only
/// allowed once `shoot_interval` has passed since the previous one; the caller
/// creates the bullet.
pub fn update_player(
    player: &mut Player,
    input: &PlayerInput,
    dt: f32,
    now: f64,
    bounds: Vec2,
) -> bool {
    if !player.active {
        return false;
    }

    player.transform.direction = input.direction();
    player.transform.advance(dt);
    let max = (bounds - player.collision.size).max(Vec2::ZERO);
    player.transform.position = player.transform.position.clamp(Vec2::ZERO, max);

    if input.fire && now - player.last_shot_time >= player.shoot_interval {
        player.last_shot_time = now;
        return true;
    }
    false
}

/// Kinematic step; the enemy drops out once it leaves the play field.
pub fn update_enemy(enemy: &mut Enemy, dt: f32, field: &Rect) {
    if !enemy.active {
        return;
    }
    enemy.transform.advance(dt);
    if !field.contains(enemy.transform.position) {
        enemy.active = false;
    }
}

/// Kinematic step; the bullet is spent once it leaves the field vertically.
pub fn update_bullet(bullet: &mut Bullet, dt: f32, field: &Rect) {
    if !bullet.active {
        return;
    }
    bullet.transform.advance(dt);
    let y = bullet.transform.position.y;
    if y < field.y || y > field.y + field.h {
        bullet.active = false;
    }
}

/// Put a new shot in the pool, re-arming a spent slot when there is one.
pub fn fire_bullet(bullets: &mut Vec<Bullet>, position: Vec2, direction: Vec2, speed: f32, size: f32) {
    match bullets.iter_mut().find(|b| !b.active) {
        Some(slot) => slot.reset(position, direction, speed, size),
        None => bullets.push(Bullet::new(position, direction, speed, size)),
    }
}

/// Scroll the starfield down; stars leaving the bottom wrap to the top at a
/// fresh random column.
pub fn update_stars(stars: &mut [Star], dt: f32, speed: f32, field: Vec2, rng: &mut impl Rng) {
    for star in stars.iter_mut() {
        star.position.y += speed * dt;
        if star.position.y > field.y {
            star.position.y = 0.0;
            star.position.x = rng.gen_range(0.0..field.x);
        }
    }
}

// ── State transitions ────────────────────────────────────────────────────────

/// Reset the session and enter `Play` on the current level.
pub fn start_game(
    state: &EntireGameStateInfo,
    config: &GameConfig,
    campaign: &Campaign,
    rng: &mut impl Rng,
) -> EntireGameStateInfo {
    let mut next = state.clone();
    reset_for_play(&mut next, config, campaign, rng);
    next
}

fn reset_for_play(
    state: &mut EntireGameStateInfo,
    config: &GameConfig,
    campaign: &Campaign,
    rng: &mut impl Rng,
) {
    let level = campaign.level(state.level_index);
    state.session = Session::started_at(state.clock);
    state.player = spawn_player(config);
    state.bullets.clear();
    state.explosions.clear();
    state.enemies = spawn_wave(level, state.settings.enemy_motion, config, rng);
    state.formation = new_formation(config);
    state.last_enemy_shot = state.clock;
    info!(
        "starting level {} ({}) with {} enemies",
        state.level_index,
        level.name,
        state.enemies.len()
    );
    set_status(state, GameStatus::Play);
}

fn set_status(state: &mut EntireGameStateInfo, status: GameStatus) {
    if state.status != status {
        info!("status {:?} -> {:?}", state.status, status);
        state.status = status;
    }
}

/// Leave `Play` for the score screen. Only the first call of a game counts.
fn finish_game(state: &mut EntireGameStateInfo, outcome: Outcome) {
    if state.status != GameStatus::Play {
        return;
    }
    state.session.end_time.get_or_insert(state.clock);
    state.session.outcome = Some(outcome);
    info!(
        "game over: {:?}, score {}, enemies defeated {}",
        outcome, state.session.score, state.session.enemies_defeated
    );
    set_status(state, GameStatus::ScoreScreen);
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the whole game by one frame. All randomness comes through `rng`
/// so callers control determinism (tests use a seeded RNG).
pub fn tick(
    state: &EntireGameStateInfo,
    frame: &FrameInput,
    config: &GameConfig,
    campaign: &Campaign,
    rng: &mut impl Rng,
) -> EntireGameStateInfo {
    let mut next = state.clone();
    next.clock += frame.dt as f64;

    match next.status {
        GameStatus::StartMenu => {
            update_stars(&mut next.stars, frame.dt, config.stars.speed, next.field, rng);
            match next.main_menu.update(&frame.menu, frame.dt) {
                MenuAction::Start => reset_for_play(&mut next, config, campaign, rng),
                MenuAction::Settings => set_status(&mut next, GameStatus::SettingsMenu),
                MenuAction::Quit => {
                    info!("quit requested");
                    next.running = false;
                }
                MenuAction::None => {}
            }
        }
        GameStatus::SettingsMenu => match next.settings_menu.update(&frame.menu) {
            SettingsAction::ToggleMotion => {
                next.settings.enemy_motion = match next.settings.enemy_motion {
                    EnemyMotion::March => EnemyMotion::Descend,
                    EnemyMotion::Descend => EnemyMotion::March,
                };
                info!("enemy motion set to {:?}", next.settings.enemy_motion);
            }
            SettingsAction::Back => set_status(&mut next, GameStatus::StartMenu),
            SettingsAction::None => {}
        },
        GameStatus::Play => play_frame(&mut next, frame, config, campaign, rng),
        GameStatus::ScoreScreen => {
            if frame.menu.select {
                reset_for_play(&mut next, config, campaign, rng);
            } else if frame.menu.back {
                set_status(&mut next, GameStatus::StartMenu);
            }
        }
    }

    next
}

fn play_frame(
    state: &mut EntireGameStateInfo,
    frame: &FrameInput,
    config: &GameConfig,
    campaign: &Campaign,
    rng: &mut impl Rng,
) {
    if frame.menu.back {
        info!("game abandoned");
        set_status(state, GameStatus::StartMenu);
        return;
    }

    let dt = frame.dt;
    let field = state.field_rect();

    // ── 1. Background ────────────────────────────────────────────────────────
    update_stars(&mut state.stars, dt, config.stars.speed, state.field, rng);

    // ── 2. Player ────────────────────────────────────────────────────────────
    if update_player(&mut state.player, &frame.player, dt, state.clock, state.field) {
        let origin = state.player.transform.position + Vec2::from(config.player.muzzle_offset);
        fire_bullet(
            &mut state.bullets,
            origin,
            Vec2::NEG_Y,
            config.player.bullet_speed,
            config.player.bullet_size,
        );
    }

    // ── 3. Enemies ───────────────────────────────────────────────────────────
    match state.settings.enemy_motion {
        EnemyMotion::March => {
            if state.formation.advance(&mut state.enemies, dt, &field) {
                debug!("formation reversed, heading {}", state.formation.heading);
            }
        }
        EnemyMotion::Descend => {
            for enemy in state.enemies.iter_mut() {
                update_enemy(enemy, dt, &field);
            }
        }
    }
    enemy_volley(state, config, rng);

    // ── 4. Bullets ───────────────────────────────────────────────────────────
    for bullet in state.bullets.iter_mut() {
        update_bullet(bullet, dt, &field);
    }

    // ── 5. Collisions ────────────────────────────────────────────────────────
    let report = collision::resolve(&state.player, &mut state.enemies, &mut state.bullets);
    state.session.score += report.score_gained();
    state.session.enemies_defeated += report.kills.len() as u32;
    for kill in &report.kills {
        state.explosions.push(Explosion::new(kill.position, rng));
    }

    // ── 6. Explosions ────────────────────────────────────────────────────────
    for explosion in state.explosions.iter_mut() {
        explosion.update(dt);
    }
    state.explosions.retain(|e| !e.is_finished());

    // ── 7. Compaction & outcome ──────────────────────────────────────────────
    state.enemies.retain(|e| e.active);

    if report.player_hit() {
        state.player.active = false;
        finish_game(state, Outcome::Defeat);
    } else if state.enemies.is_empty() {
        state.level_index = campaign.next_index(state.level_index);
        finish_game(state, Outcome::Victory);
    }
}

/// Every `shoot_interval` seconds, a few random active enemies fire downward.
/// Later levels field more shooters per volley.
fn enemy_volley(state: &mut EntireGameStateInfo, config: &GameConfig, rng: &mut impl Rng) {
    let cfg = &config.enemy;
    if state.clock - state.last_enemy_shot < cfg.shoot_interval {
        return;
    }
    state.last_enemy_shot = state.clock;

    let shooters: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.active)
        .map(|(i, _)| i)
        .collect();
    let count = (cfg.shooters_base + state.level_index * cfg.shooters_per_level).min(shooters.len());

    let muzzles: Vec<Vec2> = shooters
        .choose_multiple(rng, count)
        .map(|&i| state.enemies[i].muzzle() - Vec2::new(cfg.bullet_size / 2.0, 0.0))
        .collect();
    debug!("enemy volley: {} shots", muzzles.len());

    for muzzle in muzzles {
        fire_bullet(&mut state.bullets, muzzle, Vec2::Y, cfg.bullet_speed, cfg.bullet_size);
    }
}
