use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cubanoid::camera::{Camera, Reticle};
use cubanoid::config::ViewTuning;
use cubanoid::geometry::Aabb;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn camera() -> Camera {
    Camera::new(&ViewTuning::default())
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[test]
fn snap_centres_the_view() {
    let mut cam = camera();
    cam.snap_to(Vec2::new(1000.0, 600.0));
    assert_eq!(cam.pos, Vec2::new(40.0, 60.0));
    assert_eq!(cam.view_rect(), Aabb::new(40.0, 60.0, 1920.0, 1080.0));
}

#[test]
fn follow_closes_a_tenth_of_the_gap() {
    let mut cam = camera();
    let mut rng = seeded_rng();
    cam.snap_to(Vec2::new(960.0, 540.0));
    assert_eq!(cam.pos, Vec2::ZERO);

    cam.follow(Vec2::new(1960.0, 540.0), &mut rng, 1.0);
    assert!((cam.pos.x - 100.0).abs() < 1e-3);
    assert_eq!(cam.pos.y, 0.0);

    for _ in 0..300 {
        cam.follow(Vec2::new(1960.0, 540.0), &mut rng, 1.0);
    }
    assert!((cam.pos.x - 1000.0).abs() < 0.01);
}

#[test]
fn time_scale_speeds_up_follow() {
    let mut cam = camera();
    let mut rng = seeded_rng();
    cam.snap_to(Vec2::new(960.0, 540.0));
    cam.follow(Vec2::new(1960.0, 540.0), &mut rng, 2.0);
    assert!((cam.pos.x - 200.0).abs() < 1e-3);
}

#[test]
fn shake_jitters_for_its_duration() {
    let mut cam = camera();
    let mut rng = seeded_rng();
    cam.snap_to(Vec2::new(960.0, 540.0));
    cam.add_shake(8, 10);
    assert!(cam.is_shaking());

    for tick in 1..=9 {
        cam.follow(Vec2::new(960.0, 540.0), &mut rng, 1.0);
        assert!(cam.is_shaking(), "stopped early at tick {tick}");
        let o = cam.shake_offset;
        assert!(o.x.abs() <= 8.0 && o.y.abs() <= 8.0);
        assert_eq!(o.x.fract(), 0.0);
        assert_eq!(o.y.fract(), 0.0);
    }

    cam.follow(Vec2::new(960.0, 540.0), &mut rng, 1.0);
    assert!(!cam.is_shaking());
    assert_eq!(cam.shake_offset, Vec2::ZERO);
}

#[test]
fn negative_shake_is_clamped() {
    let mut cam = camera();
    cam.add_shake(-5, 3);
    assert_eq!(cam.shake_intensity, 0);
    let mut rng = seeded_rng();
    cam.follow(Vec2::ZERO, &mut rng, 1.0);
    assert_eq!(cam.shake_offset, Vec2::ZERO);
}

#[test]
fn view_and_world_coordinates_invert() {
    let mut cam = camera();
    cam.pos = Vec2::new(300.0, -50.0);
    cam.shake_offset = Vec2::new(4.0, -2.0);
    assert_eq!(cam.render_origin(), Vec2::new(296.0, -48.0));

    let p = Vec2::new(1234.0, 567.0);
    assert_eq!(cam.view_to_world(cam.world_to_view(p)), p);
    assert_eq!(cam.world_to_view(Vec2::new(296.0, -48.0)), Vec2::ZERO);
}

// ── Reticle ───────────────────────────────────────────────────────────────────

#[test]
fn reticle_orbits_at_radius() {
    let reticle = Reticle::new(&ViewTuning::default());
    assert_eq!(reticle.point(Vec2::new(100.0, 100.0)), Vec2::new(450.0, 100.0));
}

#[test]
fn reticle_eases_towards_pointer() {
    let mut reticle = Reticle::new(&ViewTuning::default());
    let center = Vec2::new(100.0, 100.0);
    reticle.update(center + Vec2::new(0.0, 200.0), center, 1.0);
    assert!((reticle.angle - std::f32::consts::FRAC_PI_2 * 0.1).abs() < 1e-5);

    for _ in 0..300 {
        reticle.update(center + Vec2::new(0.0, 200.0), center, 1.0);
    }
    assert!((reticle.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
}

#[test]
fn reticle_takes_the_short_way_round() {
    let mut reticle = Reticle::new(&ViewTuning::default());
    let center = Vec2::ZERO;
    reticle.angle = 3.0;
    let pointer = Vec2::new((-3.0f32).cos(), (-3.0f32).sin()) * 100.0;

    reticle.update(pointer, center, 1.0);
    assert!(reticle.angle > 3.0, "went the long way: {}", reticle.angle);

    for _ in 0..300 {
        reticle.update(pointer, center, 1.0);
    }
    assert!((reticle.angle + 3.0).abs() < 1e-3);
}

#[test]
fn pointer_on_player_leaves_reticle_alone() {
    let mut reticle = Reticle::new(&ViewTuning::default());
    reticle.angle = 1.0;
    reticle.update(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 1.0);
    assert_eq!(reticle.angle, 1.0);
}
