//! Enemy controllers.
//!
//! Ground enemies run a three-state machine bounded by the platform group
//! they stand on. Flying enemies steer: a pull towards the player blended
//! with a push away from any tile found along their path.

use bevy_math::Vec2;
use rand::Rng;

use crate::entities::{Brain, Enemy, EnemyKind, FlyingBrain, GroundBrain, GroundState, Player};
use crate::geometry::Aabb;
use crate::physics::{sweep_axis, Axis};
use crate::world::{PlatformGroup, TileCoord, World};

// ── Ground enemy constants ────────────────────────────────────────────────────

const GROUND_GRAVITY: f32 = 0.5;
const GROUND_MAX_FALL: f32 = 10.0;
const PATROL_SPEED: f32 = 2.0;
const CHARGE_SPEED: f32 = 6.0;
/// Horizontal distance within which the player can be spotted.
const ATTACK_RANGE: f32 = 800.0;
/// Maximum centre-to-centre vertical distance for a sighting.
const VERTICAL_BAND: f32 = 150.0;
/// How close the player's feet must be to a tile top to count as standing on it.
const STANDING_TOLERANCE: f32 = 20.0;
const PATROL_REVERSAL_TICKS: u32 = 300;
const EDGE_MARGIN: f32 = 15.0;
const REVERSAL_IDLE_TICKS: u32 = 20;
const LOST_SIGHT_COOLDOWN: u32 = 60;

// ── Flying enemy constants ────────────────────────────────────────────────────

const FLY_ACCELERATION: f32 = 0.3;
const FLY_MAX_SPEED: f32 = 8.0;
const LOOKAHEAD: f32 = 100.0;
const PROBE_SIZE: f32 = 40.0;
/// Repulsion contributed by each tile a probe touches.
const AVOID_WEIGHT: f32 = 0.5;
/// Weight of the avoidance vector relative to the unit pull.
const AVOID_BLEND: f32 = 2.0;
const AVOID_GRACE_TICKS: u32 = 10;
const AVOID_JITTER: f32 = 0.5;
/// Fraction of speed kept (and reversed) when bouncing off a tile.
const BOUNCE: f32 = 0.7;

impl Enemy {
    /// A ground enemy standing on `platform`, with its top-left at `at`.
    pub fn ground(at: Vec2, platform: TileCoord, world: &World, health: u32) -> Self {
        let p = EnemyKind::Ground.profile();
        Self {
            rect: Aabb::new(at.x, at.y, p.width, p.height),
            vel: Vec2::new(PATROL_SPEED, 0.0),
            health: health as f32,
            max_health: health as f32,
            alive: true,
            facing_right: true,
            brain: Brain::Ground(GroundBrain {
                state: GroundState::Patrol,
                platform,
                group: world.platform_group(platform),
                patrol_direction: 1.0,
                patrol_timer: 0,
                idle_timer: 0,
            }),
        }
    }

    pub fn flying(at: Vec2, health: u32) -> Self {
        let p = EnemyKind::Flying.profile();
        Self {
            rect: Aabb::new(at.x, at.y, p.width, p.height),
            vel: Vec2::ZERO,
            health: health as f32,
            max_health: health as f32,
            alive: true,
            facing_right: true,
            brain: Brain::Flying(FlyingBrain::default()),
        }
    }

    /// Returns `true` if this hit killed the enemy. Dead enemies ignore damage.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Run whichever controller the enemy carries. Dead enemies, and every
/// enemy once the player is dead, are left untouched.
pub fn update_enemy(enemy: &mut Enemy, player: &Player, world: &World, rng: &mut impl Rng) {
    if !enemy.alive || !player.alive {
        return;
    }
    match enemy.kind() {
        EnemyKind::Ground => update_ground(enemy, player, world),
        EnemyKind::Flying => update_flying(enemy, player, world, rng),
    }
}

// ── Ground ────────────────────────────────────────────────────────────────────

pub fn update_ground(enemy: &mut Enemy, player: &Player, world: &World) {
    if !enemy.alive || !player.alive {
        return;
    }
    let Brain::Ground(brain) = &mut enemy.brain else {
        return;
    };

    enemy.vel.y = (enemy.vel.y + GROUND_GRAVITY).min(GROUND_MAX_FALL);

    brain.group = world.platform_group(brain.platform);
    let bounds = brain.group.bounds();
    let sighting = spot_player(&enemy.rect, &brain.group, player, world);

    match (sighting, brain.state) {
        (Some(direction), GroundState::Patrol | GroundState::Charging { .. }) => {
            brain.state = GroundState::Charging { direction };
            enemy.vel.x = CHARGE_SPEED * direction;
        }
        (None, GroundState::Charging { .. }) => {
            brain.state = GroundState::Cooldown {
                remaining: LOST_SIGHT_COOLDOWN,
            };
            enemy.vel.x = 0.0;
        }
        (_, GroundState::Cooldown { remaining }) => {
            brain.state = if remaining <= 1 {
                GroundState::Patrol
            } else {
                GroundState::Cooldown {
                    remaining: remaining - 1,
                }
            };
            enemy.vel.x = 0.0;
        }
        (None, GroundState::Patrol) => {
            brain.patrol_timer += 1;
            if brain.patrol_timer >= PATROL_REVERSAL_TICKS
                || at_group_edge(&enemy.rect, &bounds, brain.patrol_direction)
            {
                brain.patrol_direction = -brain.patrol_direction;
                brain.patrol_timer = 0;
                brain.idle_timer = REVERSAL_IDLE_TICKS;
            }
            if brain.idle_timer > 0 {
                brain.idle_timer -= 1;
                enemy.vel.x = 0.0;
            } else {
                enemy.vel.x = PATROL_SPEED * brain.patrol_direction;
            }
        }
    }

    if enemy.vel.x.abs() > 0.1 {
        enemy.facing_right = enemy.vel.x > 0.0;
    }

    // ── Horizontal: foreign tiles and the group edges turn the enemy back ────
    if let Some(hit) = sweep_axis(world, &mut enemy.rect, Axis::Horizontal, enemy.vel.x) {
        force_patrol(brain, -hit.direction);
    }
    if !brain.group.is_empty() {
        if enemy.rect.left() < bounds.left() {
            enemy.rect.x = bounds.left();
            force_patrol(brain, 1.0);
        }
        if enemy.rect.right() > bounds.right() {
            enemy.rect.x = bounds.right() - enemy.rect.w;
            force_patrol(brain, -1.0);
        }
    }

    // ── Vertical: re-home onto whatever tile we land on ──────────────────────
    if let Some(hit) = sweep_axis(world, &mut enemy.rect, Axis::Vertical, enemy.vel.y) {
        enemy.vel.y = 0.0;
        if hit.direction > 0.0 && hit.tile != brain.platform {
            brain.platform = hit.tile;
            brain.group = world.platform_group(hit.tile);
        }
    }
}

fn force_patrol(brain: &mut GroundBrain, direction: f32) {
    brain.state = GroundState::Patrol;
    brain.patrol_direction = direction;
    brain.patrol_timer = 0;
}

fn at_group_edge(rect: &Aabb, bounds: &Aabb, direction: f32) -> bool {
    if direction > 0.0 {
        rect.right() >= bounds.right() - EDGE_MARGIN
    } else {
        rect.left() <= bounds.left() + EDGE_MARGIN
    }
}

/// Direction towards the player (+1 / -1) if the player is in range, inside
/// the vertical band, and standing on the enemy's own platform group.
pub fn spot_player(rect: &Aabb, group: &PlatformGroup, player: &Player, world: &World) -> Option<f32> {
    if !player.alive {
        return None;
    }
    let me = rect.center();
    let them = player.center();
    let dx = them.x - me.x;
    if dx.abs() > ATTACK_RANGE || (them.y - me.y).abs() > VERTICAL_BAND {
        return None;
    }

    let standing_on = world.tile_under(&player.rect, STANDING_TOLERANCE)?;
    if world.platform_group(standing_on) != *group {
        return None;
    }
    Some(if dx > 0.0 { 1.0 } else { -1.0 })
}

// ── Flying ────────────────────────────────────────────────────────────────────

pub fn update_flying(enemy: &mut Enemy, player: &Player, world: &World, rng: &mut impl Rng) {
    if !enemy.alive || !player.alive {
        return;
    }
    let Brain::Flying(brain) = &mut enemy.brain else {
        return;
    };

    brain.avoid_timer = brain.avoid_timer.saturating_sub(1);

    let center = enemy.rect.center();
    let to_player = player.center() - center;
    let pull = to_player / to_player.length().max(0.1);
    let push = avoidance(center, pull, world, brain, rng);

    let blended = pull + push * AVOID_BLEND;
    let steer = blended / blended.length().max(0.1);

    enemy.vel += steer * FLY_ACCELERATION;
    let speed = enemy.vel.length();
    if speed > FLY_MAX_SPEED {
        enemy.vel = enemy.vel / speed * FLY_MAX_SPEED;
    }

    if sweep_axis(world, &mut enemy.rect, Axis::Horizontal, enemy.vel.x).is_some() {
        enemy.vel.x *= -BOUNCE;
    }
    if sweep_axis(world, &mut enemy.rect, Axis::Vertical, enemy.vel.y).is_some() {
        enemy.vel.y *= -BOUNCE;
    }

    if enemy.vel.x.abs() > 0.1 {
        enemy.facing_right = enemy.vel.x > 0.0;
    }
}

/// Sample three points ahead (along the path, and along each axis alone)
/// and sum a repulsion from every tile found there.
fn avoidance(
    center: Vec2,
    heading: Vec2,
    world: &World,
    brain: &mut FlyingBrain,
    rng: &mut impl Rng,
) -> Vec2 {
    let probes = [
        center + heading * LOOKAHEAD,
        center + Vec2::new(heading.x * LOOKAHEAD * 0.7, 0.0),
        center + Vec2::new(0.0, heading.y * LOOKAHEAD * 0.7),
    ];

    let mut push = Vec2::ZERO;
    for probe in probes {
        for tile in world.query(&Aabb::centered(probe, PROBE_SIZE, PROBE_SIZE)) {
            let away = center - tile.rect.center();
            push += away / away.length().max(0.1) * AVOID_WEIGHT;
            brain.avoid_timer = AVOID_GRACE_TICKS;
        }
    }

    if brain.avoid_timer > 0 {
        push += Vec2::new(
            rng.gen_range(-AVOID_JITTER..AVOID_JITTER),
            rng.gen_range(-AVOID_JITTER..AVOID_JITTER),
        );
    }
    push
}
