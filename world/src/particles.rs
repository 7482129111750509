//! Cosmetic particle bursts.

use std::f32::consts::TAU;

use path_defence_core::{util, ParticleSnapshot, ParticleView, Vector2};
use rand::Rng;

const PARTICLE_SIZE: f32 = 4.0;
const FRICTION: f32 = 0.95;
const MIN_SPEED: f32 = 50.0;
const MAX_SPEED: f32 = 150.0;

/// Short-lived visual fragment with friction-damped velocity.
#[derive(Clone, Debug)]
pub struct Particle {
    position: Vector2,
    velocity: Vector2,
    life: f32,
    max_life: f32,
    color: &'static str,
}

impl Particle {
    /// Creates a particle with full remaining life.
    #[must_use]
    pub fn new(position: Vector2, velocity: Vector2, life: f32, color: &'static str) -> Self {
        Self {
            position,
            velocity,
            life,
            max_life: life,
            color,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.position = self.position + self.velocity * dt;
        self.life -= dt;
        self.velocity = self.velocity * FRICTION;
    }

    /// Reports whether any life remains.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life as a fraction of the initial life.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Captures an immutable snapshot of the particle.
    #[must_use]
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position,
            size: PARTICLE_SIZE,
            alpha: self.alpha(),
            color: self.color.to_owned(),
        }
    }
}

/// Emits and ages particle bursts.
#[derive(Debug, Default)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    /// Creates an emitter with no live particles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `count` particles radiating from `position` at random headings.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        position: Vector2,
        count: usize,
        life: f32,
        color: &'static str,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = util::random_range(rng, 0.0, TAU);
            let speed = util::random_range(rng, MIN_SPEED, MAX_SPEED);
            self.particles
                .push(Particle::new(position, Vector2::from_angle(angle, speed), life, color));
        }
    }

    /// Ages every particle and drops the expired ones.
    pub fn advance(&mut self, dt: f32) {
        self.particles.retain_mut(|particle| {
            particle.advance(dt);
            particle.is_alive()
        });
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Reports whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drops every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Captures snapshots of every live particle.
    #[must_use]
    pub fn view(&self) -> ParticleView {
        ParticleView::from_snapshots(self.particles.iter().map(Particle::snapshot).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn burst_speeds_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut emitter = ParticleEmitter::new();
        emitter.burst(&mut rng, Vector2::new(10.0, 10.0), 8, 0.5, "#ffff00");

        assert_eq!(emitter.len(), 8);
        for particle in &emitter.particles {
            let speed = particle.velocity.magnitude();
            assert!((MIN_SPEED - 0.01..MAX_SPEED + 0.01).contains(&speed), "speed={speed}");
        }
    }

    #[test]
    fn friction_slows_particles_and_life_runs_out() {
        let mut emitter = ParticleEmitter::new();
        emitter
            .particles
            .push(Particle::new(Vector2::ZERO, Vector2::new(100.0, 0.0), 0.3, "#ff0000"));

        emitter.advance(0.1);
        let particle = &emitter.particles[0];
        assert!((particle.position.x - 10.0).abs() < 1e-4);
        assert!((particle.velocity.x - 95.0).abs() < 1e-4);
        assert!((particle.alpha() - 2.0 / 3.0).abs() < 1e-4);

        emitter.advance(0.1);
        emitter.advance(0.11);
        assert!(emitter.is_empty());
    }
}
