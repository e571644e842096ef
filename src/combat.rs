//! Weapons, bullets and damage.
//!
//! Two slots cool down independently, but they share one magazine: once
//! the shared shot count reaches the cap, neither slot fires again until
//! the reload finishes and every counter is back at zero.

use bevy_math::Vec2;
use rand::Rng;
use tracing::debug;

use crate::config::{SpawnTuning, WeaponTuning};
use crate::entities::{Armory, Bullet, Enemy, EnemyKind, Loadout, SpawnState, WeaponKind, WeaponSlot};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Aabb;
use crate::spawner;
use crate::world::{TileCoord, World};

/// Eight compass directions, starting east and turning clockwise (y down).
/// Diagonals are left unnormalised; spread is added before normalising.
const COMPASS: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, -1.0),
];

/// How a bullet's tick ended. Anything but `Flying` removes the bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletFate {
    Flying,
    HitWall(TileCoord),
    Expired,
    OutOfView,
}

impl Armory {
    pub fn new(loadout: Loadout) -> Self {
        let (left, right) = loadout.weapons();
        Self {
            left,
            right,
            left_cooldown: 0,
            right_cooldown: 0,
            shots: 0,
            left_shots: 0,
            right_shots: 0,
            reload: 0,
            bullets: Vec::new(),
        }
    }

    pub fn weapon(&self, slot: WeaponSlot) -> WeaponKind {
        match slot {
            WeaponSlot::Left => self.left,
            WeaponSlot::Right => self.right,
        }
    }

    pub fn switch_loadout(&mut self, loadout: Loadout) {
        let (left, right) = loadout.weapons();
        self.left = left;
        self.right = right;
    }

    pub fn is_reloading(&self) -> bool {
        self.reload > 0
    }

    pub fn can_fire(&self, slot: WeaponSlot, tuning: &WeaponTuning) -> bool {
        let cooldown = match slot {
            WeaponSlot::Left => self.left_cooldown,
            WeaponSlot::Right => self.right_cooldown,
        };
        !self.is_reloading() && self.shots < tuning.magazine && cooldown == 0
    }

    /// Pull the trigger on `slot`. Returns `false` if the slot is cooling
    /// down or the magazine is spent.
    pub fn fire(
        &mut self,
        slot: WeaponSlot,
        origin: Vec2,
        aim_angle: f32,
        tuning: &WeaponTuning,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> bool {
        if !self.can_fire(slot, tuning) {
            return false;
        }

        self.shots += 1;
        match slot {
            WeaponSlot::Left => {
                self.left_shots += 1;
                self.left_cooldown = tuning.slot_cooldown;
            }
            WeaponSlot::Right => {
                self.right_shots += 1;
                self.right_cooldown = tuning.slot_cooldown;
            }
        }

        let weapon = self.weapon(slot);
        self.bullets
            .extend(spawn_pellets(weapon, origin, aim_angle, tuning, rng));
        events.push(GameEvent::ShotFired { slot, weapon });

        if self.shots >= tuning.magazine {
            self.reload = tuning.reload_ticks;
            debug!("magazine spent after {} shots, reloading", self.shots);
            events.push(GameEvent::ReloadStarted);
        }
        true
    }

    /// Count down both slot cooldowns and the shared reload. A finished
    /// reload resets every shot counter.
    pub fn update_cooldowns(&mut self, events: &mut EventQueue) {
        self.left_cooldown = self.left_cooldown.saturating_sub(1);
        self.right_cooldown = self.right_cooldown.saturating_sub(1);
        if self.reload > 0 {
            self.reload -= 1;
            if self.reload == 0 {
                self.shots = 0;
                self.left_shots = 0;
                self.right_shots = 0;
                events.push(GameEvent::ReloadFinished);
            }
        }
    }
}

/// Nearest of the eight compass directions to `angle`.
pub fn snap_to_compass(angle: f32) -> Vec2 {
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, TAU};
    let normalized = angle.rem_euclid(TAU);
    let sector = ((normalized + FRAC_PI_8) / FRAC_PI_4) as usize % COMPASS.len();
    COMPASS[sector]
}

/// One trigger pull's worth of bullets, scattered around the snapped aim.
pub fn spawn_pellets(
    weapon: WeaponKind,
    origin: Vec2,
    aim_angle: f32,
    tuning: &WeaponTuning,
    rng: &mut impl Rng,
) -> Vec<Bullet> {
    let profile = weapon.profile();
    let main = snap_to_compass(aim_angle);

    (0..profile.pellets)
        .map(|_| {
            let jitter = Vec2::new(
                rng.gen_range(-profile.spread..=profile.spread),
                rng.gen_range(-profile.spread..=profile.spread),
            );
            let direction = (main + jitter)
                .try_normalize()
                .unwrap_or_else(|| main.normalize());
            Bullet::new(origin, direction, weapon, tuning.bullet_damage)
        })
        .collect()
}

impl Bullet {
    pub fn new(origin: Vec2, direction: Vec2, weapon: WeaponKind, damage: f32) -> Self {
        Self {
            pos: origin,
            vel: direction * weapon.profile().speed,
            direction,
            weapon,
            damage,
            age: 0,
            slowing: false,
        }
    }

    /// Age, slow down, decay and move the bullet, then report whether it
    /// survives the tick. `view` is the visible area in world units.
    pub fn advance(
        &mut self,
        world: &World,
        view: &Aabb,
        tuning: &WeaponTuning,
        time_scale: f32,
    ) -> BulletFate {
        self.age += 1;

        if self.age >= tuning.slowdown_age && !self.slowing {
            self.slowing = true;
            self.vel.x *= 0.98;
            self.vel.y *= 0.95;
        }
        if self.slowing {
            self.vel *= 0.98;
            self.vel.y += 0.2;
        }
        if self.age >= tuning.decay_age {
            self.damage = (self.damage * 0.9).max(0.0);
        }

        self.pos += self.vel * time_scale;

        let rect = self.rect();
        if let Some(tile) = world.query(&rect).first() {
            return BulletFate::HitWall(tile.coord);
        }
        if self.age >= tuning.max_age {
            return BulletFate::Expired;
        }
        if rect.right() < view.left()
            || rect.left() > view.right()
            || rect.bottom() < view.top()
            || rect.top() > view.bottom()
        {
            return BulletFate::OutOfView;
        }
        BulletFate::Flying
    }
}

/// Advance every live bullet and resolve hits. A bullet damages at most
/// one enemy per tick: the first live, overlapping enemy in list order.
/// Returns the kinds of the enemies killed this tick.
pub fn update_bullets(
    armory: &mut Armory,
    world: &World,
    enemies: &mut [Enemy],
    view: &Aabb,
    tuning: &WeaponTuning,
    events: &mut EventQueue,
) -> Vec<EnemyKind> {
    let mut kills = Vec::new();

    for mut bullet in std::mem::take(&mut armory.bullets) {
        match bullet.advance(world, view, tuning, 1.0) {
            BulletFate::Flying => {}
            BulletFate::HitWall(_) => {
                events.push(GameEvent::BulletHitWall {
                    pos: bullet.pos,
                    weapon: bullet.weapon,
                });
                continue;
            }
            BulletFate::Expired | BulletFate::OutOfView => continue,
        }

        let rect = bullet.rect();
        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.alive && e.rect.overlaps(&rect))
        {
            events.push(GameEvent::EnemyHit {
                pos: bullet.pos,
                weapon: bullet.weapon,
            });
            if enemy.take_damage(bullet.damage) {
                events.push(GameEvent::EnemyKilled {
                    kind: enemy.kind(),
                    pos: enemy.rect.center(),
                });
                kills.push(enemy.kind());
            }
            continue;
        }

        armory.bullets.push(bullet);
    }

    kills
}

/// Score a kill and ratchet the next spawn of that kind.
pub fn register_kill(score: &mut u32, spawn: &mut SpawnState, tuning: &SpawnTuning, kind: EnemyKind) {
    *score += kind.profile().score_value;
    spawner::record_kill(spawn, tuning, kind);
}
