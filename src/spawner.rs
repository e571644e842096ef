//! Enemy spawning and the difficulty ratchet.
//!
//! Ground enemies arrive on a fixed interval, flying enemies on a per-tick
//! coin flip. Every kill multiplies the health the *next* enemy of that
//! kind spawns with. The ratchet never decays and has no ceiling: the game
//! is meant to get harder for as long as the player survives.

use bevy_math::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::ai;
use crate::config::SpawnTuning;
use crate::entities::{EnemyKind, Enemy, Player, SpawnState};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Aabb;
use crate::world::{Tile, World, TILE_SIZE};

/// Flying spawns stay this far inside the level bounds.
const FLYING_MARGIN: f32 = 100.0;

/// Result of one placement attempt. Failing to place an enemy is routine
/// and never an error; the spawner just tries again on a later tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    /// No platform (or no room in the level) qualifies at all.
    NoCandidate,
    /// Every sampled position was rejected.
    GaveUp { attempts: u32 },
}

impl SpawnState {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            ground_timer: 0,
            next_ground_health: tuning.ground_health,
            next_flying_health: tuning.flying_health,
            ground_kills: 0,
            flying_kills: 0,
        }
    }
}

/// One ratchet step, truncated to whole hit points.
pub fn ratchet(health: u32, growth: f64) -> u32 {
    (f64::from(health) * growth).floor() as u32
}

/// Bump the health baseline for the next enemy of `kind`.
pub fn record_kill(spawn: &mut SpawnState, tuning: &SpawnTuning, kind: EnemyKind) {
    let (baseline, kills) = match kind {
        EnemyKind::Ground => (&mut spawn.next_ground_health, &mut spawn.ground_kills),
        EnemyKind::Flying => (&mut spawn.next_flying_health, &mut spawn.flying_kills),
    };
    *baseline = ratchet(*baseline, tuning.hp_growth);
    *kills += 1;
    debug!("{:?} enemy killed ({} so far), next spawns with {} hp", kind, kills, baseline);
}

/// Whether `point` sits inside the no-spawn box around a live player.
pub fn too_close(point: Vec2, player: &Player, safe_distance: f32) -> bool {
    if !player.alive {
        return false;
    }
    let center = player.center();
    (point.x - center.x).abs() < safe_distance && (point.y - center.y).abs() < safe_distance
}

/// A platform qualifies for a ground spawn when it is away from the player,
/// has clear headroom, and has a neighbour on both sides to run along.
pub fn can_host_ground_enemy(world: &World, tile: &Tile, player: &Player, tuning: &SpawnTuning) -> bool {
    let rect = tile.rect;
    if too_close(rect.center(), player, tuning.safe_distance) {
        return false;
    }

    let headroom = Aabb::new(
        rect.center().x - 10.0,
        rect.top() - tuning.headroom,
        20.0,
        tuning.headroom,
    );
    if world.query(&headroom).iter().any(|t| t.coord != tile.coord) {
        return false;
    }

    let left = Aabb::new(rect.left() - TILE_SIZE - 5.0, rect.top(), 10.0, rect.h);
    let right = Aabb::new(rect.right() + 5.0, rect.top(), 10.0, rect.h);
    let has_neighbour = |probe: &Aabb| world.query(probe).iter().any(|t| t.coord != tile.coord);
    has_neighbour(&left) && has_neighbour(&right)
}

pub fn spawn_ground(
    spawn: &SpawnState,
    world: &World,
    enemies: &mut Vec<Enemy>,
    player: &Player,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) -> SpawnOutcome {
    let candidates: Vec<&Tile> = world
        .tiles()
        .iter()
        .filter(|t| can_host_ground_enemy(world, t, player, tuning))
        .collect();
    let Some(tile) = candidates.choose(rng) else {
        return SpawnOutcome::NoCandidate;
    };

    let height = EnemyKind::Ground.profile().height;
    for _ in 0..tuning.ground_attempts {
        let at = Vec2::new(
            rng.gen_range(tile.rect.left()..=tile.rect.right()),
            tile.rect.top() - height,
        );
        if too_close(at, player, tuning.safe_distance) {
            continue;
        }
        let enemy = Enemy::ground(at, tile.coord, world, spawn.next_ground_health);
        debug!("ground enemy spawned at {:?} with {} hp", at, spawn.next_ground_health);
        events.push(GameEvent::EnemySpawned {
            kind: EnemyKind::Ground,
            pos: enemy.rect.center(),
        });
        enemies.push(enemy);
        return SpawnOutcome::Spawned;
    }

    trace!("ground spawn gave up after {} attempts", tuning.ground_attempts);
    SpawnOutcome::GaveUp {
        attempts: tuning.ground_attempts,
    }
}

pub fn spawn_flying(
    spawn: &SpawnState,
    world: &World,
    enemies: &mut Vec<Enemy>,
    player: &Player,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) -> SpawnOutcome {
    let profile = EnemyKind::Flying.profile();
    let bounds = world.bounds();
    let (min_x, max_x) = (
        bounds.left() + FLYING_MARGIN,
        bounds.right() - FLYING_MARGIN - profile.width,
    );
    let (min_y, max_y) = (
        bounds.top() + FLYING_MARGIN,
        bounds.bottom() - FLYING_MARGIN - profile.height,
    );
    if min_x > max_x || min_y > max_y {
        return SpawnOutcome::NoCandidate;
    }

    for _ in 0..tuning.flying_attempts {
        let at = Vec2::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y));
        if too_close(at, player, tuning.safe_distance) {
            continue;
        }
        let rect = Aabb::new(at.x, at.y, profile.width, profile.height);
        if world.overlaps_any(&rect) {
            continue;
        }
        if enemies
            .iter()
            .any(|e| e.alive && e.kind() == EnemyKind::Flying && e.rect.overlaps(&rect))
        {
            continue;
        }

        debug!("flying enemy spawned at {:?} with {} hp", at, spawn.next_flying_health);
        events.push(GameEvent::EnemySpawned {
            kind: EnemyKind::Flying,
            pos: rect.center(),
        });
        enemies.push(Enemy::flying(at, spawn.next_flying_health));
        return SpawnOutcome::Spawned;
    }

    trace!("flying spawn gave up after {} attempts", tuning.flying_attempts);
    SpawnOutcome::GaveUp {
        attempts: tuning.flying_attempts,
    }
}

fn alive_count(enemies: &[Enemy], kind: EnemyKind) -> usize {
    enemies.iter().filter(|e| e.alive && e.kind() == kind).count()
}

/// One spawner tick: maybe spawn, drop the dead, run every enemy's AI, then
/// apply contact damage from the first enemy touching the player.
pub fn update(
    spawn: &mut SpawnState,
    enemies: &mut Vec<Enemy>,
    player: &mut Player,
    world: &World,
    tuning: &SpawnTuning,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    if !player.alive {
        return;
    }

    spawn.ground_timer += 1;
    if spawn.ground_timer >= tuning.ground_interval
        && alive_count(enemies, EnemyKind::Ground) < tuning.max_ground
    {
        spawn_ground(spawn, world, enemies, player, tuning, rng, events);
        spawn.ground_timer = 0;
    }

    if alive_count(enemies, EnemyKind::Flying) < tuning.max_flying
        && rng.gen_bool(tuning.flying_chance.clamp(0.0, 1.0))
    {
        spawn_flying(spawn, world, enemies, player, tuning, rng, events);
    }

    enemies.retain(|e| e.alive);

    for enemy in enemies.iter_mut() {
        ai::update_enemy(enemy, player, world, rng);
    }

    if enemies
        .iter()
        .any(|e| e.alive && e.rect.overlaps(&player.rect))
    {
        player.take_damage(events);
    }
}
