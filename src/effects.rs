//! Cosmetic particles.
//!
//! Emitters take a kind, a position, an optional direction and a count.
//! Nothing in here feeds back into the simulation.

use std::f32::consts::{PI, TAU};

use bevy_math::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::events::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    BulletImpact,
    Jump,
    Land,
    Run,
    WallJump,
    Blood,
}

const PARTICLE_GRAVITY: f32 = 0.2;

impl EffectKind {
    pub fn palette(self) -> &'static [Rgb] {
        match self {
            EffectKind::BulletImpact => &[Rgb(221, 221, 221), Rgb(131, 131, 131), Rgb(34, 27, 25)],
            EffectKind::Jump => &[Rgb(200, 230, 255), Rgb(150, 200, 255), Rgb(100, 170, 255)],
            EffectKind::Land => &[Rgb(200, 200, 200), Rgb(150, 150, 150), Rgb(100, 100, 100)],
            EffectKind::Run => &[Rgb(100, 100, 150), Rgb(70, 70, 120), Rgb(50, 50, 100)],
            EffectKind::WallJump => &[Rgb(255, 100, 100), Rgb(200, 70, 70), Rgb(150, 50, 50)],
            EffectKind::Blood => &[
                Rgb(200, 0, 0),
                Rgb(180, 0, 0),
                Rgb(160, 0, 0),
                Rgb(140, 0, 0),
            ],
        }
    }

    /// Impact, landing and run dust fall; the rest drift in a straight line.
    pub fn has_gravity(self) -> bool {
        matches!(self, EffectKind::BulletImpact | EffectKind::Land | EffectKind::Run)
    }

    fn radius_range(self) -> (u32, u32) {
        match self {
            EffectKind::BulletImpact => (2, 6),
            EffectKind::Jump => (3, 7),
            EffectKind::Land => (2, 5),
            EffectKind::Run => (2, 4),
            EffectKind::WallJump => (3, 6),
            EffectKind::Blood => (3, 7),
        }
    }

    /// How many particles an emit call with `count` actually produces.
    pub fn particle_count(self, count: usize) -> usize {
        match self {
            EffectKind::Land => count * 2,
            EffectKind::Run => count / 2,
            _ => count,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub color: Rgb,
    pub kind: EffectKind,
}

impl Particle {
    /// Opacity in `0.0..=1.0`, fading linearly with remaining lifetime.
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

fn polar(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

#[derive(Clone, Debug, Default)]
pub struct EffectSystem {
    particles: Vec<Particle>,
}

impl EffectSystem {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn emit(
        &mut self,
        kind: EffectKind,
        pos: Vec2,
        direction: Option<f32>,
        count: usize,
        rng: &mut impl Rng,
    ) {
        let (min_r, max_r) = kind.radius_range();
        for _ in 0..kind.particle_count(count) {
            let (start, vel, lifetime): (Vec2, Vec2, f32) = match kind {
                EffectKind::BulletImpact => (
                    pos,
                    polar(rng.gen_range(0.0..TAU), rng.gen_range(2.0..8.0)),
                    rng.gen_range(20.0..40.0),
                ),
                EffectKind::Jump => {
                    let v = polar(rng.gen_range(0.7 * PI..1.3 * PI), rng.gen_range(3.0..7.0));
                    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                    (pos, Vec2::new(v.x * sign, v.y), rng.gen_range(15.0..25.0))
                }
                EffectKind::Land => {
                    let angle: f32 = rng.gen_range(0.0..PI);
                    let speed: f32 = rng.gen_range(2.0..6.0);
                    let start = Vec2::new(pos.x + rng.gen_range(-20.0..20.0), pos.y);
                    let vel = Vec2::new(rng.gen_range(-2.0..2.0), -angle.sin() * speed);
                    (start, vel, rng.gen_range(20.0..30.0))
                }
                EffectKind::Run => {
                    let push = direction.map_or(0.0, |d| d * 2.0);
                    let start = Vec2::new(pos.x + rng.gen_range(-15.0..15.0), pos.y + 10.0);
                    let vel = Vec2::new(rng.gen_range(-1.0..1.0) + push, rng.gen_range(1.0..3.0));
                    (start, vel, rng.gen_range(10.0..20.0))
                }
                EffectKind::WallJump => {
                    let angle = if direction.unwrap_or(1.0) > 0.0 {
                        rng.gen_range(0.25 * PI..0.75 * PI)
                    } else {
                        rng.gen_range(1.25 * PI..1.75 * PI)
                    };
                    (pos, polar(angle, rng.gen_range(3.0..8.0)), rng.gen_range(20.0..30.0))
                }
                EffectKind::Blood => (
                    pos,
                    polar(rng.gen_range(0.0..TAU), rng.gen_range(3.0..10.0)),
                    rng.gen_range(20.0..40.0),
                ),
            };
            let color = kind.palette().choose(rng).copied().unwrap_or(Rgb(255, 255, 255));
            self.particles.push(Particle {
                pos: start,
                vel,
                radius: rng.gen_range(min_r..=max_r) as f32,
                lifetime,
                max_lifetime: lifetime,
                color,
                kind,
            });
        }
    }

    /// Move, age and cull every particle.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.lifetime -= 1.0;
            if p.kind.has_gravity() {
                p.vel.y += PARTICLE_GRAVITY;
            }
        }
        self.particles.retain(|p| p.lifetime > 0.0);
    }

    /// Turn one tick's simulation events into particles.
    pub fn apply_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a GameEvent>,
        rng: &mut impl Rng,
    ) {
        for event in events {
            match *event {
                GameEvent::PlayerJumped { pos, from_ground } => {
                    let count = if from_ground { 12 } else { 8 };
                    self.emit(EffectKind::Jump, pos, None, count, rng);
                }
                GameEvent::PlayerWallJumped { pos, wall_dir } => {
                    self.emit(EffectKind::WallJump, pos, Some(f32::from(wall_dir)), 15, rng);
                }
                GameEvent::PlayerLanded { pos, ended_dash } => {
                    let count = if ended_dash { 20 } else { 15 };
                    self.emit(EffectKind::Land, pos, None, count, rng);
                }
                GameEvent::PlayerRan { pos, direction } => {
                    self.emit(EffectKind::Run, pos, Some(direction), 3, rng);
                }
                GameEvent::PlayerDied { pos } => {
                    self.emit(EffectKind::Blood, pos, None, 30, rng);
                }
                GameEvent::DashStarted { pos, direction } => {
                    self.emit(EffectKind::Jump, pos, Some(direction.x), 15, rng);
                }
                GameEvent::DashInterrupted { pos } => {
                    self.emit(EffectKind::BulletImpact, pos, None, 15, rng);
                }
                GameEvent::DashStruck { pos, killed } => {
                    let count = if killed { 30 } else { 15 };
                    self.emit(EffectKind::Blood, pos, None, count, rng);
                }
                GameEvent::BulletHitWall { pos, weapon } => {
                    let count = weapon.profile().wall_impact;
                    self.emit(EffectKind::BulletImpact, pos, None, count, rng);
                }
                GameEvent::EnemyHit { pos, weapon } => {
                    let count = weapon.profile().enemy_impact;
                    self.emit(EffectKind::BulletImpact, pos, None, count, rng);
                }
                GameEvent::ShotFired { .. }
                | GameEvent::ReloadStarted
                | GameEvent::ReloadFinished
                | GameEvent::EnemyKilled { .. }
                | GameEvent::EnemySpawned { .. } => {}
            }
        }
    }
}
