//! All simulation types, as plain data. Behaviour lives in the module that
//! owns each concern (`player`, `combat`, `ai`, `spawner`).

use bevy_math::Vec2;
use serde::Deserialize;

use crate::camera::{Camera, Reticle};
use crate::config::GameConfig;
use crate::effects::EffectSystem;
use crate::events::EventQueue;
use crate::geometry::Aabb;
use crate::world::{PlatformGroup, TileCoord, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Nothing advances until play resumes.
    Paused,
    GameOver,
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum WeaponKind {
    /// 16 slow pellets with a wide spread.
    Shotgun,
    /// 8 fast rounds in a tight group.
    Rifle,
}

/// Fixed per-kind weapon behaviour.
#[derive(Debug)]
pub struct WeaponProfile {
    pub pellets: u32,
    /// Maximum per-axis perturbation added to the aim direction.
    pub spread: f32,
    pub speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Particles spawned when a bullet hits a wall / an enemy.
    pub wall_impact: usize,
    pub enemy_impact: usize,
    pub shake_intensity: i32,
    pub shake_ticks: u32,
}

const SHOTGUN: WeaponProfile = WeaponProfile {
    pellets: 16,
    spread: 0.3,
    speed: 15.0,
    bullet_width: 18.0,
    bullet_height: 6.0,
    wall_impact: 8,
    enemy_impact: 10,
    shake_intensity: 8,
    shake_ticks: 10,
};

const RIFLE: WeaponProfile = WeaponProfile {
    pellets: 8,
    spread: 0.05,
    speed: 30.0,
    bullet_width: 12.0,
    bullet_height: 4.0,
    wall_impact: 12,
    enemy_impact: 15,
    shake_intensity: 3,
    shake_ticks: 5,
};

impl WeaponKind {
    pub fn profile(self) -> &'static WeaponProfile {
        match self {
            WeaponKind::Shotgun => &SHOTGUN,
            WeaponKind::Rifle => &RIFLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponSlot {
    Left,
    Right,
}

/// Which weapon sits in which slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Loadout {
    /// Shotgun on the left trigger, rifle on the right.
    ShotgunFirst,
    RifleFirst,
}

impl Loadout {
    pub fn weapons(self) -> (WeaponKind, WeaponKind) {
        match self {
            Loadout::ShotgunFirst => (WeaponKind::Shotgun, WeaponKind::Rifle),
            Loadout::RifleFirst => (WeaponKind::Rifle, WeaponKind::Shotgun),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    /// Centre of the bullet.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unit direction at the moment of firing.
    pub direction: Vec2,
    pub weapon: WeaponKind,
    pub damage: f32,
    /// Ticks since firing.
    pub age: u32,
    pub slowing: bool,
}

impl Bullet {
    pub fn rect(&self) -> Aabb {
        let p = self.weapon.profile();
        Aabb::centered(self.pos, p.bullet_width, p.bullet_height)
    }
}

/// Both weapon slots plus the shared magazine and the live bullets.
#[derive(Clone, Debug)]
pub struct Armory {
    pub left: WeaponKind,
    pub right: WeaponKind,
    pub left_cooldown: u32,
    pub right_cooldown: u32,
    /// Shots fired from both slots since the last reload.
    pub shots: u32,
    pub left_shots: u32,
    pub right_shots: u32,
    /// Ticks left on the forced reload; 0 when not reloading.
    pub reload: u32,
    pub bullets: Vec<Bullet>,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Grounded,
    Airborne,
    /// Airborne and pressed against a wall; the one-shot wall-jump is available.
    WallContact,
    Dashing,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Dash {
    pub direction: Vec2,
    /// Ticks of dash motion left; 0 when not dashing.
    pub remaining: u32,
    pub cooldown: u32,
    /// Ticks of invulnerability left. Outlasts the dash itself.
    pub invulnerable: u32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Aabb,
    pub vel: Vec2,
    pub health: i32,
    pub alive: bool,
    pub state: PlayerState,
    /// Jumps since the last ground contact.
    pub jump_count: u8,
    pub wall_jump_used: bool,
    pub on_ground: bool,
    pub on_wall: bool,
    /// Side of the wall being touched: +1 right, -1 left, 0 none.
    pub wall_dir: i8,
    pub facing_right: bool,
    pub last_move_dir: f32,
    pub dash: Dash,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Ground,
    Flying,
}

/// Fixed per-kind enemy behaviour table.
#[derive(Debug)]
pub struct EnemyProfile {
    pub width: f32,
    pub height: f32,
    pub score_value: u32,
}

const GROUND_PROFILE: EnemyProfile = EnemyProfile {
    width: 40.0,
    height: 80.0,
    score_value: 100,
};

const FLYING_PROFILE: EnemyProfile = EnemyProfile {
    width: 80.0,
    height: 40.0,
    score_value: 150,
};

impl EnemyKind {
    pub fn profile(self) -> &'static EnemyProfile {
        match self {
            EnemyKind::Ground => &GROUND_PROFILE,
            EnemyKind::Flying => &FLYING_PROFILE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GroundState {
    Patrol,
    /// Running at the player; `direction` is re-aimed every tick.
    Charging { direction: f32 },
    /// Lost sight of the player; standing still until `remaining` runs out.
    Cooldown { remaining: u32 },
}

#[derive(Clone, Debug)]
pub struct GroundBrain {
    pub state: GroundState,
    /// Tile the enemy last landed on.
    pub platform: TileCoord,
    pub group: PlatformGroup,
    pub patrol_direction: f32,
    pub patrol_timer: u32,
    pub idle_timer: u32,
}

#[derive(Clone, Debug, Default)]
pub struct FlyingBrain {
    pub avoid_timer: u32,
}

#[derive(Clone, Debug)]
pub enum Brain {
    Ground(GroundBrain),
    Flying(FlyingBrain),
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Aabb,
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub facing_right: bool,
    pub brain: Brain,
}

impl Enemy {
    pub fn kind(&self) -> EnemyKind {
        match self.brain {
            Brain::Ground(_) => EnemyKind::Ground,
            Brain::Flying(_) => EnemyKind::Flying,
        }
    }
}

// ── Spawner ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SpawnState {
    /// Ticks since the last ground spawn attempt.
    pub ground_timer: u32,
    /// Health the next ground enemy spawns with. Ratchets up on kills.
    pub next_ground_health: u32,
    pub next_flying_health: u32,
    pub ground_kills: u32,
    pub flying_kills: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The simulation context. Owned by the game loop and passed explicitly to
/// every update; nothing in the core reaches for global state.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub world: World,
    pub player: Player,
    pub armory: Armory,
    pub enemies: Vec<Enemy>,
    pub spawner: SpawnState,
    pub effects: EffectSystem,
    /// Events raised this tick, drained by the effect system and returned
    /// to the caller for audio.
    pub events: EventQueue,
    pub camera: Camera,
    pub reticle: Reticle,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
}
