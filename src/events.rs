//! Structured events raised by the simulation.
//!
//! Physics, combat and AI never emit particles or sounds themselves. They
//! push events here; the effect system and the audio collaborator each
//! read the queue independently once the tick's simulation work is done.

use bevy_math::Vec2;

use crate::entities::{EnemyKind, WeaponKind, WeaponSlot};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlayerJumped { pos: Vec2, from_ground: bool },
    PlayerWallJumped { pos: Vec2, wall_dir: i8 },
    PlayerLanded { pos: Vec2, ended_dash: bool },
    PlayerRan { pos: Vec2, direction: f32 },
    PlayerDied { pos: Vec2 },
    DashStarted { pos: Vec2, direction: Vec2 },
    /// A dash cut short by hitting a wall or ceiling.
    DashInterrupted { pos: Vec2 },
    DashStruck { pos: Vec2, killed: bool },
    ShotFired { slot: WeaponSlot, weapon: WeaponKind },
    ReloadStarted,
    ReloadFinished,
    BulletHitWall { pos: Vec2, weapon: WeaponKind },
    EnemyHit { pos: Vec2, weapon: WeaponKind },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    EnemySpawned { kind: EnemyKind, pos: Vec2 },
}

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
