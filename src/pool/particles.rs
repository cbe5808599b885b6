use super::object_pool::{ObjectPool, Poolable};
use crate::core::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime in seconds.
    pub life: f32,
    pub max_life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            life: 0.0,
            max_life: 0.0,
        }
    }
}

impl Poolable for Particle {}

impl Particle {
    /// 1.0 when freshly emitted, approaching 0.0 at expiry.
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Pooled particle state. Drawing is the host's job.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pool: ObjectPool<Particle>,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: ObjectPool::new(capacity),
        }
    }

    /// Returns false when the pool is full and the particle was dropped.
    pub fn emit(&mut self, position: Vec2, velocity: Vec2, life: f32) -> bool {
        let Some(handle) = self.pool.acquire() else {
            tracing::trace!("particle pool full, dropping emit");
            return false;
        };
        if let Some(particle) = self.pool.get_mut(handle) {
            *particle = Particle {
                position,
                velocity,
                life,
                max_life: life,
            };
        }
        true
    }

    /// Emits `count` particles flying outward in random directions.
    /// Returns how many fit in the pool.
    pub fn emit_burst(
        &mut self,
        position: Vec2,
        count: usize,
        speed: f32,
        life: f32,
        rng: &mut impl Rng,
    ) -> usize {
        let mut emitted = 0;
        for _ in 0..count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            if !self.emit(position, velocity, life) {
                break;
            }
            emitted += 1;
        }
        emitted
    }

    pub fn update(&mut self, dt_seconds: f32) {
        let mut expired = Vec::new();
        for (handle, particle) in self.pool.iter_active_mut() {
            particle.position += particle.velocity * dt_seconds;
            particle.life -= dt_seconds;
            if particle.life <= 0.0 {
                expired.push(handle);
            }
        }
        for handle in expired {
            self.pool.release(handle);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter_active().map(|(_, p)| p)
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn dropped_count(&self) -> u64 {
        self.pool.dropped_count()
    }
}
