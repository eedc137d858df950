/// Particle burst left behind by a destroyed enemy.
///
/// Explosions never take part in collision; they only drift outward and
/// expire on a shared clock.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

pub const PARTICLE_COUNT: usize = 20;
pub const LIFETIME: f32 = 0.5;
pub const MIN_PARTICLE_SPEED: f32 = 50.0;
pub const MAX_PARTICLE_SPEED: f32 = 150.0;

#[derive(Clone, Debug)]
pub struct Explosion {
    pub origin: Vec2,
    pub particles: Vec<Vec2>,
    /// One velocity per particle, same order as `particles`.
    pub velocities: Vec<Vec2>,
    /// Seconds left before the burst is finished.
    pub remaining_life: f32,
}

impl Explosion {
    pub fn new(origin: Vec2, rng: &mut impl Rng) -> Self {
        let velocities = (0..PARTICLE_COUNT)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let speed = rng.gen_range(MIN_PARTICLE_SPEED..MAX_PARTICLE_SPEED);
                Vec2::from_angle(angle) * speed
            })
            .collect();

        Self {
            origin,
            particles: vec![origin; PARTICLE_COUNT],
            velocities,
            remaining_life: LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for (particle, velocity) in self.particles.iter_mut().zip(&self.velocities) {
            *particle += *velocity * dt;
        }
        self.remaining_life -= dt;
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_life <= 0.0
    }
}
