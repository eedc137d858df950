/// Marching wave: every enemy shares one horizontal heading. When any of them
/// would cross a side bound, the whole wave turns around and drops a row.

use glam::Vec2;

use crate::entities::{Enemy, Rect};

#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    /// +1.0 marches right, -1.0 marches left.
    pub heading: f32,
    pub speed: f32,
    /// Vertical drop applied to every enemy on each reversal.
    pub row_step: f32,
    /// Leftmost x an enemy's left edge may reach.
    pub min_x: f32,
    /// Rightmost x an enemy's right edge may reach.
    pub max_x: f32,
}

impl Formation {
    pub fn new(speed: f32, row_step: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            heading: 1.0,
            speed,
            row_step,
            min_x,
            max_x,
        }
    }

    /// Move the active enemies one frame. Returns `true` on a reversal frame.
    ///
    /// A reversal happens when some active enemy's next step would cross the
    /// bound in the current heading.
    ///
    /// On a reversal frame nobody moves sideways; the wave only drops by
    /// `row_step`. Enemies that leave `field` are deactivated either way.
    pub fn advance(&mut self, enemies: &mut [Enemy], dt: f32, field: &Rect) -> bool {
        let step = self.heading * self.speed * dt;
        // Only the bound ahead counts; members spawned outside walk back in.
        let hits_edge = enemies.iter().filter(|e| e.active).any(|e| {
            let next_x = e.transform.position.x + step;
            if self.heading < 0.0 {
                next_x < self.min_x
            } else {
                next_x + e.collision.size.x > self.max_x
            }
        });

        if hits_edge {
            self.heading = -self.heading;
        }

        for enemy in enemies.iter_mut().filter(|e| e.active) {
            enemy.transform.direction = Vec2::new(self.heading, 0.0);
            enemy.transform.speed = self.speed;
            if hits_edge {
                enemy.transform.position.y += self.row_step;
            } else {
                enemy.transform.advance(dt);
            }
            if !field.contains(enemy.transform.position) {
                enemy.active = false;
            }
        }

        hits_edge
    }
}
