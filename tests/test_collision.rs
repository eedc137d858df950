use glam::Vec2;

use space_invaders::collision::resolve;
use space_invaders::compute::make_enemy;
use space_invaders::entities::*;
use space_invaders::formation::Formation;

fn player_at(x: f32, y: f32) -> Player {
    Player::new(Vec2::new(x, y), 200.0, 40.0, 0.3)
}

fn enemy_at(x: f32, y: f32, kind: EnemyKind) -> Enemy {
    make_enemy(Vec2::new(x, y), kind, Vec2::X, 60.0, 40.0)
}

fn player_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(Vec2::new(x, y), Vec2::NEG_Y, 300.0, 16.0)
}

fn enemy_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(Vec2::new(x, y), Vec2::Y, 200.0, 16.0)
}

// ── sweep ─────────────────────────────────────────────────────────────────────

#[test]
fn player_bullet_destroys_enemy() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Fighter)];
    let mut bullets = vec![player_bullet(110.0, 110.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(!enemies[0].active);
    assert!(!bullets[0].active);
    assert_eq!(report.kills.len(), 1);
    assert_eq!(report.kills[0].position, Vec2::new(100.0, 100.0));
    assert_eq!(report.score_gained(), 20);
    assert!(!report.player_hit());
}

#[test]
fn enemy_bullet_never_damages_enemy() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Scout)];
    let mut bullets = vec![enemy_bullet(110.0, 110.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(enemies[0].active);
    assert!(bullets[0].active);
    assert!(report.kills.is_empty());
}

#[test]
fn player_bullet_never_damages_player() {
    let player = player_at(300.0, 600.0);
    let mut enemies = Vec::new();
    let mut bullets = vec![player_bullet(310.0, 610.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(!report.player_hit());
    assert!(bullets[0].active);
}

#[test]
fn enemy_bullet_hits_player() {
    let player = player_at(300.0, 600.0);
    let mut enemies = Vec::new();
    let mut bullets = vec![enemy_bullet(310.0, 590.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(report.player_shot);
    assert!(!report.player_rammed);
    assert!(!bullets[0].active);
}

#[test]
fn enemy_touching_player_rams() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![enemy_at(320.0, 620.0, EnemyKind::Scout)];
    let mut bullets = Vec::new();

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(report.player_rammed);
    assert!(report.player_hit());
}

#[test]
fn enemy_takes_at_most_one_bullet_per_frame() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Scout)];
    let mut bullets = vec![player_bullet(105.0, 110.0), player_bullet(115.0, 110.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert_eq!(report.kills.len(), 1);
    assert!(!bullets[0].active);
    assert!(bullets[1].active);
}

#[test]
fn one_bullet_kills_only_one_of_overlapping_enemies() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![
        enemy_at(100.0, 100.0, EnemyKind::Scout),
        enemy_at(110.0, 100.0, EnemyKind::Bomber),
    ];
    let mut bullets = vec![player_bullet(115.0, 110.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert_eq!(report.kills.len(), 1);
    assert!(!enemies[0].active);
    assert!(enemies[1].active);
}

#[test]
fn score_is_sum_of_kill_values() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![
        enemy_at(100.0, 100.0, EnemyKind::Scout),
        enemy_at(300.0, 100.0, EnemyKind::Mothership),
    ];
    let mut bullets = vec![player_bullet(110.0, 110.0), player_bullet(310.0, 110.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert_eq!(report.kills.len(), 2);
    assert_eq!(report.score_gained(), 50);
}

#[test]
fn inactive_entities_are_skipped() {
    let player = player_at(300.0, 600.0);
    let mut enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Scout)];
    enemies[0].active = false;
    let mut bullets = vec![player_bullet(110.0, 110.0), enemy_bullet(310.0, 590.0)];
    bullets[1].active = false;

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(report.kills.is_empty());
    assert!(!report.player_hit());
    assert!(bullets[0].active);
}

#[test]
fn inactive_player_rectangle_still_tested() {
    let mut player = player_at(300.0, 600.0);
    player.active = false;
    let mut enemies = Vec::new();
    let mut bullets = vec![enemy_bullet(310.0, 590.0)];

    let report = resolve(&player, &mut enemies, &mut bullets);
    assert!(report.player_shot);
}

// ── formation ─────────────────────────────────────────────────────────────────

fn field() -> Rect {
    Rect::new(0.0, 0.0, 640.0, 720.0)
}

#[test]
fn formation_reverses_and_steps_down_at_left_bound() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 560.0);
    formation.heading = -1.0;
    let mut enemies = vec![
        enemy_at(19.0, 100.0, EnemyKind::Scout),
        enemy_at(120.0, 100.0, EnemyKind::Scout),
        enemy_at(220.0, 160.0, EnemyKind::Bomber),
    ];

    let reversed = formation.advance(&mut enemies, 1.0 / 60.0, &field());
    assert!(reversed);
    assert_eq!(formation.heading, 1.0);
    assert_eq!(enemies[0].transform.position, Vec2::new(19.0, 120.0));
    assert_eq!(enemies[1].transform.position, Vec2::new(120.0, 120.0));
    assert_eq!(enemies[2].transform.position, Vec2::new(220.0, 180.0));
    assert!(enemies.iter().all(|e| e.transform.direction == Vec2::X));
}

#[test]
fn formation_reverses_at_right_bound() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 560.0);
    let mut enemies = vec![enemy_at(520.0, 100.0, EnemyKind::Scout)];

    assert!(formation.advance(&mut enemies, 1.0 / 60.0, &field()));
    assert_eq!(formation.heading, -1.0);
    assert_eq!(enemies[0].transform.position, Vec2::new(520.0, 120.0));
}

#[test]
fn formation_marches_sideways_between_bounds() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 560.0);
    let mut enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Scout)];

    assert!(!formation.advance(&mut enemies, 0.5, &field()));
    assert_eq!(formation.heading, 1.0);
    assert_eq!(enemies[0].transform.position, Vec2::new(130.0, 100.0));
}

#[test]
fn formation_ignores_inactive_members() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 560.0);
    formation.heading = -1.0;
    let mut enemies = vec![
        enemy_at(19.0, 100.0, EnemyKind::Scout),
        enemy_at(200.0, 100.0, EnemyKind::Scout),
    ];
    enemies[0].active = false;

    assert!(!formation.advance(&mut enemies, 0.5, &field()));
    assert_eq!(enemies[0].transform.position, Vec2::new(19.0, 100.0));
    assert_eq!(enemies[1].transform.position, Vec2::new(170.0, 100.0));
}

#[test]
fn formation_drops_enemies_that_leave_field() {
    let mut formation = Formation::new(60.0, 30.0, 20.0, 560.0);
    formation.heading = -1.0;
    let mut enemies = vec![enemy_at(19.0, 700.0, EnemyKind::Scout)];

    formation.advance(&mut enemies, 1.0 / 60.0, &field());
    assert!(!enemies[0].active);
}

#[test]
fn formation_spawned_outside_bounds_walks_back_in() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 620.0);
    let mut enemies = vec![enemy_at(5.0, 100.0, EnemyKind::Scout)];

    let reversals = (0..10)
        .filter(|_| formation.advance(&mut enemies, 1.0 / 60.0, &field()))
        .count();

    assert_eq!(reversals, 0);
    assert_eq!(formation.heading, 1.0);
    assert_eq!(enemies[0].transform.position.y, 100.0);
    assert!((enemies[0].transform.position.x - 15.0).abs() < 1e-3);
}

#[test]
fn formation_past_right_bound_keeps_marching_left() {
    let mut formation = Formation::new(60.0, 20.0, 20.0, 560.0);
    formation.heading = -1.0;
    let mut enemies = vec![enemy_at(580.0, 100.0, EnemyKind::Scout)];

    assert!(!formation.advance(&mut enemies, 0.5, &field()));
    assert_eq!(formation.heading, -1.0);
    assert_eq!(enemies[0].transform.position, Vec2::new(550.0, 100.0));
}
