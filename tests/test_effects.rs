use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cubanoid::effects::*;
use cubanoid::entities::{WeaponKind, WeaponSlot};
use cubanoid::events::GameEvent;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn emit_scales_count_by_kind() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();

    fx.emit(EffectKind::Jump, Vec2::ZERO, None, 12, &mut rng);
    assert_eq!(fx.len(), 12);
    fx.clear();

    fx.emit(EffectKind::Land, Vec2::ZERO, None, 10, &mut rng);
    assert_eq!(fx.len(), 20);
    fx.clear();

    fx.emit(EffectKind::Run, Vec2::ZERO, Some(1.0), 3, &mut rng);
    assert_eq!(fx.len(), 1);
    fx.clear();
    assert!(fx.is_empty());
}

#[test]
fn particles_use_their_palette() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    for kind in [
        EffectKind::BulletImpact,
        EffectKind::Jump,
        EffectKind::Land,
        EffectKind::Run,
        EffectKind::WallJump,
        EffectKind::Blood,
    ] {
        fx.emit(kind, Vec2::new(50.0, 50.0), Some(1.0), 20, &mut rng);
    }
    for p in fx.particles() {
        assert!(p.kind.palette().contains(&p.color), "{:?} has colour {:?}", p.kind, p.color);
        assert!(p.radius >= 2.0 && p.radius <= 7.0);
        assert_eq!(p.alpha(), 1.0);
        assert!(p.lifetime >= 10.0 && p.lifetime < 40.0);
    }
}

#[test]
fn gravity_only_pulls_heavy_particles() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    fx.emit(EffectKind::BulletImpact, Vec2::ZERO, None, 1, &mut rng);
    fx.emit(EffectKind::Jump, Vec2::ZERO, None, 1, &mut rng);
    let before: Vec<Vec2> = fx.particles().iter().map(|p| p.vel).collect();

    fx.update();

    let after = fx.particles();
    assert!((after[0].vel.y - before[0].y - 0.2).abs() < 1e-5);
    assert_eq!(after[1].vel, before[1]);
}

#[test]
fn alpha_fades_and_particles_expire() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    fx.emit(EffectKind::Blood, Vec2::ZERO, None, 30, &mut rng);

    let lifetimes: Vec<f32> = fx.particles().iter().map(|p| p.max_lifetime).collect();
    fx.update();
    for (p, max) in fx.particles().iter().zip(&lifetimes) {
        assert!((p.alpha() - (max - 1.0) / max).abs() < 1e-5);
    }

    for _ in 0..40 {
        fx.update();
    }
    assert!(fx.is_empty());
}

#[test]
fn wall_jump_sparks_follow_wall_side() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    fx.emit(EffectKind::WallJump, Vec2::ZERO, Some(1.0), 15, &mut rng);
    assert!(fx.particles().iter().all(|p| p.vel.y > 0.0));

    fx.clear();
    fx.emit(EffectKind::WallJump, Vec2::ZERO, Some(-1.0), 15, &mut rng);
    assert!(fx.particles().iter().all(|p| p.vel.y < 0.0));
}

#[test]
fn run_dust_trails_movement() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    for _ in 0..10 {
        fx.emit(EffectKind::Run, Vec2::new(100.0, 200.0), Some(1.0), 2, &mut rng);
    }
    assert_eq!(fx.len(), 10);
    for p in fx.particles() {
        assert!(p.vel.x >= 1.0 && p.vel.x < 3.0);
        assert!(p.vel.y >= 1.0 && p.vel.y < 3.0);
        assert_eq!(p.pos.y, 210.0);
    }
}

#[test]
fn events_map_to_particle_bursts() {
    let mut rng = seeded_rng();
    let mut fx = EffectSystem::default();
    let events = [
        GameEvent::PlayerJumped {
            pos: Vec2::ZERO,
            from_ground: true,
        },
        GameEvent::PlayerLanded {
            pos: Vec2::ZERO,
            ended_dash: true,
        },
        GameEvent::BulletHitWall {
            pos: Vec2::ZERO,
            weapon: WeaponKind::Rifle,
        },
        GameEvent::EnemyHit {
            pos: Vec2::ZERO,
            weapon: WeaponKind::Shotgun,
        },
        GameEvent::ShotFired {
            slot: WeaponSlot::Left,
            weapon: WeaponKind::Shotgun,
        },
        GameEvent::ReloadStarted,
        GameEvent::PlayerDied { pos: Vec2::ZERO },
    ];

    fx.apply_events(&events, &mut rng);
    assert_eq!(fx.len(), 12 + 40 + 12 + 10 + 30);
}
