//! Firework particles
//!
//! A fixed pool of glowing dots drifting through the sky. Each tick moves
//! every particle by its velocity and counts its lifetime down; expired
//! particles are moved to a fresh random spot in the spawn volume and given a
//! new lifetime. The pool is never reallocated.

use crate::core::config::ParticleConfig;
use crate::foundation::math::Vec3;
use crate::render::material::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One firework particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position
    pub position: Vec3,
    /// Displacement per tick
    pub velocity: Vec3,
    /// Remaining ticks; the particle respawns once this reaches 0
    pub life: i32,
    /// Current opacity
    pub opacity: f32,
    /// Colour, fixed for the particle's whole existence
    pub color: Color,
}

/// Pool of recycled particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: ParticleConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    /// Spawn `config.count` particles
    ///
    /// Uses `config.seed` when set so runs can be replayed.
    pub fn new(config: ParticleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut system = Self {
            particles: Vec::with_capacity(config.count),
            config,
            rng,
        };
        for _ in 0..system.config.count {
            let particle = system.spawn();
            system.particles.push(particle);
        }
        log::debug!("Spawned {} particles", system.particles.len());
        system
    }

    /// Current particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable particles
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Pool size
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Settings in use
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Advance one tick
    ///
    /// `frame_delta` (seconds since the previous tick) only matters when
    /// `scale_by_frame_delta` is on; otherwise each tick is one fixed step.
    /// Returns how many particles were recycled.
    pub fn update(&mut self, frame_delta: f32) -> usize {
        let step = if self.config.scale_by_frame_delta {
            frame_delta.max(0.0) * self.config.reference_rate_hz
        } else {
            1.0
        };

        let mut recycled = 0;
        for i in 0..self.particles.len() {
            let mut particle = self.particles[i];
            particle.position += particle.velocity * step;
            particle.life -= 1;

            if particle.life <= 0 {
                particle.position = self.random_position();
                particle.life = self.random_life();
                recycled += 1;
            }
            particle.opacity = self.opacity_for(particle.life);
            self.particles[i] = particle;
        }
        recycled
    }

    /// Opacity of a particle with `life` ticks left
    pub fn opacity_for(&self, life: i32) -> f32 {
        (life as f32 / self.config.fade_ticks).min(self.config.max_opacity)
    }

    fn spawn(&mut self) -> Particle {
        let speed = self.config.max_speed;
        let velocity = if speed > 0.0 {
            Vec3::new(
                self.rng.gen_range(-speed..speed),
                self.rng.gen_range(-speed..speed),
                self.rng.gen_range(-speed..speed),
            )
        } else {
            Vec3::zeros()
        };
        let color = Color::from_hsl(self.rng.gen::<f32>(), 1.0, 0.7);

        Particle {
            position: self.random_position(),
            velocity,
            life: self.random_life(),
            opacity: self.config.max_opacity,
            color,
        }
    }

    fn random_position(&mut self) -> Vec3 {
        let (min, max) = self.config.bounds();
        Vec3::new(
            self.rng.gen_range(min.x..max.x),
            self.rng.gen_range(min.y..max.y),
            self.rng.gen_range(min.z..max.z),
        )
    }

    fn random_life(&mut self) -> i32 {
        self.rng.gen_range(self.config.lifetime_min..self.config.lifetime_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded(count: usize) -> ParticleSystem {
        ParticleSystem::new(ParticleConfig {
            count,
            seed: Some(42),
            ..Default::default()
        })
    }

    fn in_bounds(config: &ParticleConfig, particle: &Particle) -> bool {
        let (min, max) = config.bounds();
        (0..3).all(|axis| particle.position[axis] >= min[axis] && particle.position[axis] < max[axis])
            && (config.lifetime_min..config.lifetime_max).contains(&particle.life)
    }

    #[test]
    fn test_initial_pool_within_volume() {
        let system = seeded(100);
        assert_eq!(system.len(), 100);
        for particle in system.particles() {
            assert!(in_bounds(system.config(), particle));
            assert!(particle.velocity.iter().all(|v| v.abs() <= 0.01));
            assert_eq!(particle.opacity, 0.8);
        }
    }

    #[test]
    fn test_fixed_step_ignores_frame_delta() {
        let mut system = seeded(1);
        system.particles_mut()[0].life = 100;
        system.particles_mut()[0].position = Vec3::zeros();
        system.particles_mut()[0].velocity = Vec3::new(0.01, 0.0, -0.01);

        system.update(0.5);

        let particle = system.particles()[0];
        assert_relative_eq!(particle.position, Vec3::new(0.01, 0.0, -0.01));
        assert_eq!(particle.life, 99);
        assert_eq!(particle.opacity, 0.8);
    }

    #[test]
    fn test_delta_scaling_is_relative_to_reference_rate() {
        let mut system = ParticleSystem::new(ParticleConfig {
            count: 1,
            seed: Some(1),
            scale_by_frame_delta: true,
            ..Default::default()
        });
        system.particles_mut()[0].life = 100;
        system.particles_mut()[0].position = Vec3::zeros();
        system.particles_mut()[0].velocity = Vec3::new(0.01, 0.0, 0.0);

        // 30 Hz frame: two reference steps
        system.update(1.0 / 30.0);
        assert_relative_eq!(system.particles()[0].position.x, 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_expired_particle_recycled_next_tick() {
        let mut system = seeded(3);
        let velocity = system.particles()[1].velocity;
        system.particles_mut()[1].life = 1;
        system.particles_mut()[1].position = Vec3::new(500.0, -500.0, 500.0);

        let recycled = system.update(1.0 / 60.0);

        let particle = system.particles()[1];
        assert_eq!(recycled, 1);
        assert!(in_bounds(system.config(), &particle));
        assert_eq!(particle.velocity, velocity);
        assert_relative_eq!(particle.opacity, (particle.life as f32 / 50.0).min(0.8));
    }

    #[test]
    fn test_opacity_fades_below_fade_threshold() {
        let system = seeded(0);
        assert_eq!(system.opacity_for(150), 0.8);
        assert_eq!(system.opacity_for(40), 0.8);
        assert_relative_eq!(system.opacity_for(25), 0.5);
        assert_relative_eq!(system.opacity_for(5), 0.1);
    }

    #[test]
    fn test_same_seed_same_pool() {
        assert_eq!(seeded(10).particles(), seeded(10).particles());
    }
}
