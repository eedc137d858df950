/// Brute-force collision sweep between enemies, bullets and the player.
///
/// Which side a bullet can hurt is decided solely by the sign of its vertical
/// direction (see `Bullet::is_from_player`). The sweep only flags entities
/// inactive and reports what happened; scoring and state transitions are the
/// game loop's business.

use glam::Vec2;

use crate::entities::{Bullet, Enemy, Player};

/// One enemy shot down this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Kill {
    /// Enemy position at the moment of the hit.
    pub position: Vec2,
    pub score_value: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepReport {
    pub kills: Vec<Kill>,
    /// An enemy bullet reached the player.
    pub player_shot: bool,
    /// An enemy rammed the player.
    pub player_rammed: bool,
}

impl SweepReport {
    pub fn player_hit(&self) -> bool {
        self.player_shot || self.player_rammed
    }

    pub fn score_gained(&self) -> u32 {
        self.kills.iter().map(|k| k.score_value).sum()
    }
}

/// Resolve every overlap for this frame.
///
/// The player's rectangle is tested even when the player is inactive.
pub fn resolve(player: &Player, enemies: &mut [Enemy], bullets: &mut [Bullet]) -> SweepReport {
    let mut report = SweepReport::default();
    let player_rect = player.rect();

    // Player bullets ↔ enemies: one bullet per enemy at most.
    for enemy in enemies.iter_mut().filter(|e| e.active) {
        let enemy_rect = enemy.rect();
        for bullet in bullets.iter_mut() {
            if !bullet.active || !bullet.is_from_player() {
                continue;
            }
            if bullet.rect().overlaps(&enemy_rect) {
                enemy.active = false;
                bullet.active = false;
                report.kills.push(Kill {
                    position: enemy.transform.position,
                    score_value: enemy.score_value,
                });
                break;
            }
        }
    }

    // Enemy bullets ↔ player
    for bullet in bullets.iter_mut() {
        if !bullet.active || !bullet.is_from_enemy() {
            continue;
        }
        if bullet.rect().overlaps(&player_rect) {
            bullet.active = false;
            report.player_shot = true;
        }
    }

    // Enemies ↔ player
    report.player_rammed = enemies
        .iter()
        .filter(|e| e.active)
        .any(|e| e.rect().overlaps(&player_rect));

    report
}
