//! Star burst
//!
//! A ring of short-lived UI sparks thrown out from the centre of the burst
//! node. Sparks drift outward, slow down, and fade before despawning.
use std::{f32::consts::TAU, time::Duration};

use bevy::{color::Alpha, prelude::*};
use rand::Rng;

use crate::data::rng::GlobalRng;

pub struct ParticlePlugin;
impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (StarBurst::enact, BurstParticle::enact).chain());
    }
}

#[derive(Component, Clone, Debug)]
#[require(Node)]
pub struct StarBurst {
    pub particle_count: usize,
    /// Outward speed range in logical pixels per second.
    pub speed: (f32, f32),
    pub lifetime: f32,
    pub drag: f32,
    pub particle_size: f32,
    pub color: Color,
    /// Burst origin relative to the node's top-left corner.
    pub origin: Vec2,
    pub(crate) pending: Option<Timer>,
    pub(crate) clear_requested: bool,
}

impl Default for StarBurst {
    fn default() -> Self {
        Self {
            particle_count: 16,
            speed: (180.0, 320.0),
            lifetime: 0.7,
            drag: 3.0,
            particle_size: 8.0,
            color: Color::srgb(1.0, 0.85, 0.2),
            origin: Vec2::ZERO,
            pending: None,
            clear_requested: false,
        }
    }
}

impl StarBurst {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            ..default()
        }
    }

    /// Schedules one burst `delay` seconds from now, replacing any pending one.
    pub fn play_after(&mut self, delay: f32) {
        self.pending = Some(Timer::new(
            Duration::from_secs_f32(delay.max(0.0)),
            TimerMode::Once,
        ));
    }

    /// Cancels a pending burst and despawns every live spark.
    pub fn stop_and_clear(&mut self) {
        self.pending = None;
        self.clear_requested = true;
    }

    fn enact(
        mut commands: Commands,
        time: Res<Time>,
        mut rng: ResMut<GlobalRng>,
        mut bursts: Query<(Entity, &mut StarBurst)>,
        particles: Query<(Entity, &BurstParticle)>,
    ) {
        for (entity, mut burst) in bursts.iter_mut() {
            if burst.clear_requested {
                burst.clear_requested = false;
                for (particle, owner) in particles.iter() {
                    if owner.source == entity {
                        commands.entity(particle).despawn();
                    }
                }
            }

            let Some(timer) = burst.pending.as_mut() else {
                continue;
            };
            timer.tick(time.delta());
            if !timer.finished() {
                continue;
            }
            burst.pending = None;
            burst.spawn_ring(entity, &mut commands, &mut rng);
        }
    }

    fn spawn_ring(&self, source: Entity, commands: &mut Commands, rng: &mut GlobalRng) {
        let count = self.particle_count.max(1);
        let slice = TAU / count as f32;
        let (min_speed, max_speed) = if self.speed.0 <= self.speed.1 {
            self.speed
        } else {
            (self.speed.1, self.speed.0)
        };

        for index in 0..count {
            let angle = slice * index as f32 + rng.uniform.random_range(-0.3..=0.3) * slice;
            let speed = rng.uniform.random_range(min_speed..=max_speed);
            let lifetime = self.lifetime * rng.uniform.random_range(0.8..=1.2);

            commands.spawn((
                Name::new("star_burst_particle"),
                BurstParticle {
                    source,
                    position: self.origin,
                    velocity: Vec2::from_angle(angle) * speed,
                    drag: self.drag,
                    timer: Timer::from_seconds(lifetime.max(0.01), TimerMode::Once),
                },
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(self.origin.x),
                    top: Val::Px(self.origin.y),
                    width: Val::Px(self.particle_size),
                    height: Val::Px(self.particle_size),
                    ..default()
                },
                BackgroundColor(self.color),
                ChildOf(source),
            ));
        }
    }
}

#[derive(Component, Clone, Debug)]
pub struct BurstParticle {
    pub source: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub drag: f32,
    pub timer: Timer,
}

impl BurstParticle {
    fn enact(
        mut commands: Commands,
        time: Res<Time>,
        mut particles: Query<(Entity, &mut BurstParticle, &mut Node, &mut BackgroundColor)>,
    ) {
        let dt = time.delta_secs();
        for (entity, mut particle, mut node, mut color) in particles.iter_mut() {
            particle.timer.tick(time.delta());
            if particle.timer.finished() {
                commands.entity(entity).despawn();
                continue;
            }

            let damping = (1.0 - particle.drag * dt).max(0.0);
            particle.velocity *= damping;
            let step = particle.velocity * dt;
            particle.position += step;

            node.left = Val::Px(particle.position.x);
            node.top = Val::Px(particle.position.y);
            color.0.set_alpha(particle.timer.fraction_remaining());
        }
    }
}
