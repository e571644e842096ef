use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cubanoid::combat::*;
use cubanoid::config::{SpawnTuning, WeaponTuning};
use cubanoid::entities::{Armory, Bullet, Enemy, EnemyKind, Loadout, SpawnState, WeaponKind, WeaponSlot};
use cubanoid::events::{EventQueue, GameEvent};
use cubanoid::geometry::Aabb;
use cubanoid::world::{TileCoord, World};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn world(text: &str) -> World {
    match World::parse(text) {
        Ok(w) => w,
        Err(e) => panic!("level should parse: {e}"),
    }
}

fn huge_view() -> Aabb {
    Aabb::new(-1.0e6, -1.0e6, 2.0e6, 2.0e6)
}

fn rifle_round(at: Vec2) -> Bullet {
    Bullet::new(at, Vec2::X, WeaponKind::Rifle, 15.0)
}

// ── Magazine ──────────────────────────────────────────────────────────────────

#[test]
fn loadouts_map_weapons_to_slots() {
    let armory = Armory::new(Loadout::ShotgunFirst);
    assert_eq!(armory.weapon(WeaponSlot::Left), WeaponKind::Shotgun);
    assert_eq!(armory.weapon(WeaponSlot::Right), WeaponKind::Rifle);

    let mut armory = Armory::new(Loadout::RifleFirst);
    assert_eq!(armory.weapon(WeaponSlot::Left), WeaponKind::Rifle);
    armory.switch_loadout(Loadout::ShotgunFirst);
    assert_eq!(armory.weapon(WeaponSlot::Left), WeaponKind::Shotgun);
}

#[test]
fn slots_cool_down_independently() {
    let tuning = WeaponTuning::default();
    let mut rng = seeded_rng();
    let mut events = EventQueue::default();
    let mut armory = Armory::new(Loadout::ShotgunFirst);

    assert!(armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
    assert!(!armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
    assert!(armory.fire(WeaponSlot::Right, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));

    for _ in 0..tuning.slot_cooldown - 1 {
        armory.update_cooldowns(&mut events);
    }
    assert!(!armory.can_fire(WeaponSlot::Left, &tuning));
    armory.update_cooldowns(&mut events);
    assert!(armory.can_fire(WeaponSlot::Left, &tuning));
    assert!(armory.can_fire(WeaponSlot::Right, &tuning));

    assert_eq!(armory.bullets.len(), 16 + 8);
}

#[test]
fn shared_magazine_forces_reload() {
    let tuning = WeaponTuning::default();
    let mut rng = seeded_rng();
    let mut events = EventQueue::default();
    let mut armory = Armory::new(Loadout::ShotgunFirst);

    for round in 0..3 {
        assert!(armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
        assert!(armory.fire(WeaponSlot::Right, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
        if round < 2 {
            assert!(!armory.is_reloading());
            for _ in 0..tuning.slot_cooldown {
                armory.update_cooldowns(&mut events);
            }
        }
    }

    assert_eq!(armory.shots, 6);
    assert_eq!((armory.left_shots, armory.right_shots), (3, 3));
    assert_eq!(armory.reload, tuning.reload_ticks);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::ReloadStarted).count(), 1);

    for _ in 0..tuning.reload_ticks - 1 {
        armory.update_cooldowns(&mut events);
        assert!(!armory.can_fire(WeaponSlot::Left, &tuning));
        assert!(!armory.can_fire(WeaponSlot::Right, &tuning));
    }
    assert!(!armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));

    armory.update_cooldowns(&mut events);
    assert!(!armory.is_reloading());
    assert_eq!((armory.shots, armory.left_shots, armory.right_shots), (0, 0, 0));
    assert!(events.iter().any(|e| *e == GameEvent::ReloadFinished));
    assert!(armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
}

#[test]
fn one_slot_can_empty_the_magazine() {
    let tuning = WeaponTuning::default();
    let mut rng = seeded_rng();
    let mut events = EventQueue::default();
    let mut armory = Armory::new(Loadout::RifleFirst);

    for _ in 0..tuning.magazine {
        assert!(armory.fire(WeaponSlot::Left, Vec2::ZERO, 0.0, &tuning, &mut rng, &mut events));
        for _ in 0..tuning.slot_cooldown {
            armory.update_cooldowns(&mut events);
        }
    }
    assert_eq!(armory.left_shots, tuning.magazine);
    assert!(armory.is_reloading());
    // The untouched slot is locked out too.
    assert!(!armory.can_fire(WeaponSlot::Right, &tuning));
}

// ── Aim and spread ────────────────────────────────────────────────────────────

#[test]
fn aim_snaps_to_compass() {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
    assert_eq!(snap_to_compass(0.0), Vec2::new(1.0, 0.0));
    assert_eq!(snap_to_compass(0.3), Vec2::new(1.0, 0.0));
    assert_eq!(snap_to_compass(0.5), Vec2::new(1.0, 1.0));
    assert_eq!(snap_to_compass(FRAC_PI_2), Vec2::new(0.0, 1.0));
    assert_eq!(snap_to_compass(3.0 * FRAC_PI_4), Vec2::new(-1.0, 1.0));
    assert_eq!(snap_to_compass(PI), Vec2::new(-1.0, 0.0));
    assert_eq!(snap_to_compass(-FRAC_PI_2), Vec2::new(0.0, -1.0));
    assert_eq!(snap_to_compass(-0.3), Vec2::new(1.0, 0.0));
}

#[test]
fn pellets_scatter_around_aim() {
    let tuning = WeaponTuning::default();
    let mut rng = seeded_rng();

    let shot = spawn_pellets(WeaponKind::Shotgun, Vec2::ZERO, 0.0, &tuning, &mut rng);
    assert_eq!(shot.len(), 16);
    for b in &shot {
        assert!((b.direction.length() - 1.0).abs() < 1e-4);
        assert!(b.direction.x > 0.9, "pellet {:?} strays too far", b.direction);
        assert!((b.vel.length() - 15.0).abs() < 1e-3);
        assert_eq!(b.damage, tuning.bullet_damage);
        assert_eq!(b.age, 0);
    }

    let shot = spawn_pellets(WeaponKind::Rifle, Vec2::ZERO, std::f32::consts::PI, &tuning, &mut rng);
    assert_eq!(shot.len(), 8);
    for b in &shot {
        assert!(b.direction.x < -0.99);
        assert!((b.vel.length() - 30.0).abs() < 1e-3);
    }
}

// ── Bullet lifetime ───────────────────────────────────────────────────────────

#[test]
fn bullet_slows_after_sixty_ticks() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let mut bullet = rifle_round(Vec2::ZERO);

    for _ in 0..59 {
        assert_eq!(bullet.advance(&w, &huge_view(), &tuning, 1.0), BulletFate::Flying);
    }
    assert!(!bullet.slowing);
    assert_eq!(bullet.vel, Vec2::new(30.0, 0.0));

    bullet.advance(&w, &huge_view(), &tuning, 1.0);
    assert!(bullet.slowing);
    assert!((bullet.vel.x - 30.0 * 0.98 * 0.98).abs() < 1e-3);
    assert!((bullet.vel.y - 0.2).abs() < 1e-5);
}

#[test]
fn damage_decays_from_ninety_ticks() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let mut bullet = rifle_round(Vec2::ZERO);

    for _ in 0..89 {
        bullet.advance(&w, &huge_view(), &tuning, 1.0);
    }
    assert_eq!(bullet.damage, 15.0);
    bullet.advance(&w, &huge_view(), &tuning, 1.0);
    assert!((bullet.damage - 13.5).abs() < 1e-4);
    bullet.advance(&w, &huge_view(), &tuning, 1.0);
    assert!((bullet.damage - 12.15).abs() < 1e-4);
}

#[test]
fn bullet_expires_at_max_age() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let mut bullet = rifle_round(Vec2::ZERO);

    for _ in 0..tuning.max_age - 1 {
        assert_eq!(bullet.advance(&w, &huge_view(), &tuning, 1.0), BulletFate::Flying);
    }
    assert_eq!(bullet.advance(&w, &huge_view(), &tuning, 1.0), BulletFate::Expired);
}

#[test]
fn bullet_stops_at_wall() {
    let tuning = WeaponTuning::default();
    // Solid tile at x 160..240, y 0..80.
    let w = world("$.*");
    let mut armory = Armory::new(Loadout::ShotgunFirst);
    armory.bullets.push(rifle_round(Vec2::new(100.0, 40.0)));
    let mut events = EventQueue::default();

    let kills = update_bullets(&mut armory, &w, &mut [], &huge_view(), &tuning, &mut events);
    assert!(kills.is_empty());
    assert_eq!(armory.bullets.len(), 1);

    update_bullets(&mut armory, &w, &mut [], &huge_view(), &tuning, &mut events);
    assert!(armory.bullets.is_empty());
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::BulletHitWall { weapon: WeaponKind::Rifle, .. })));

    let mut bullet = rifle_round(Vec2::new(100.0, 40.0));
    bullet.advance(&w, &huge_view(), &tuning, 1.0);
    assert_eq!(
        bullet.advance(&w, &huge_view(), &tuning, 1.0),
        BulletFate::HitWall(TileCoord::new(2, 0))
    );
}

#[test]
fn bullet_leaving_view_is_culled() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let view = Aabb::new(0.0, 0.0, 200.0, 200.0);
    let mut bullet = rifle_round(Vec2::new(190.0, 100.0));
    assert_eq!(bullet.advance(&w, &view, &tuning, 1.0), BulletFate::OutOfView);

    let mut inside = rifle_round(Vec2::new(10.0, 100.0));
    assert_eq!(inside.advance(&w, &view, &tuning, 1.0), BulletFate::Flying);
}

// ── Hits ──────────────────────────────────────────────────────────────────────

#[test]
fn bullet_damages_only_first_enemy() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let mut armory = Armory::new(Loadout::ShotgunFirst);
    armory.bullets.push(rifle_round(Vec2::new(90.0, 120.0)));
    let mut enemies = vec![
        Enemy::flying(Vec2::new(100.0, 100.0), 40),
        Enemy::flying(Vec2::new(100.0, 100.0), 40),
    ];
    let mut events = EventQueue::default();

    let kills = update_bullets(&mut armory, &w, &mut enemies, &huge_view(), &tuning, &mut events);

    assert!(kills.is_empty());
    assert_eq!(enemies[0].health, 25.0);
    assert_eq!(enemies[1].health, 40.0);
    assert!(armory.bullets.is_empty());
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::EnemyHit { .. })).count(),
        1
    );
}

#[test]
fn dead_enemies_are_passed_through() {
    let tuning = WeaponTuning::default();
    let w = world("$");
    let mut armory = Armory::new(Loadout::ShotgunFirst);
    armory.bullets.push(rifle_round(Vec2::new(90.0, 120.0)));
    let mut enemies = vec![
        Enemy::flying(Vec2::new(100.0, 100.0), 40),
        Enemy::flying(Vec2::new(100.0, 100.0), 10),
    ];
    enemies[0].alive = false;
    let mut events = EventQueue::default();

    let kills = update_bullets(&mut armory, &w, &mut enemies, &huge_view(), &tuning, &mut events);

    assert_eq!(kills, vec![EnemyKind::Flying]);
    assert_eq!(enemies[0].health, 40.0);
    assert!(!enemies[1].alive);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { kind: EnemyKind::Flying, .. })));
}

#[test]
fn kills_score_and_ratchet() {
    let tuning = SpawnTuning::default();
    let mut spawn = SpawnState::new(&tuning);
    let mut score = 0;

    register_kill(&mut score, &mut spawn, &tuning, EnemyKind::Flying);
    assert_eq!(score, 150);
    assert_eq!(spawn.next_flying_health, 42);
    assert_eq!(spawn.next_ground_health, 100);

    register_kill(&mut score, &mut spawn, &tuning, EnemyKind::Ground);
    assert_eq!(score, 250);
    assert_eq!(spawn.next_ground_health, 105);
    assert_eq!((spawn.ground_kills, spawn.flying_kills), (1, 1));
}
