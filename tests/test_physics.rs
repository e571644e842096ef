use cubanoid::geometry::Aabb;
use cubanoid::physics::*;
use cubanoid::world::{TileCoord, World};

fn world(text: &str) -> World {
    match World::parse(text) {
        Ok(w) => w,
        Err(e) => panic!("level should parse: {e}"),
    }
}

/// One solid tile at column 1, row 1: x 80..160, y 80..160.
fn single_tile() -> World {
    world("$....\n.*...\n.....")
}

#[test]
fn horizontal_sweep_stops_flush() {
    let w = single_tile();
    let mut rect = Aabb::new(0.0, 60.0, 40.0, 40.0);
    let hit = sweep_axis(&w, &mut rect, Axis::Horizontal, 200.0);

    let hit = match hit {
        Some(h) => h,
        None => panic!("should hit the tile"),
    };
    assert_eq!(hit.tile, TileCoord::new(1, 1));
    assert_eq!(hit.axis, Axis::Horizontal);
    assert_eq!(hit.direction, 1.0);
    assert_eq!(rect.right(), 80.0);
    assert!(!w.overlaps_any(&rect));
}

#[test]
fn vertical_sweep_up_stops_under_ceiling() {
    let w = single_tile();
    let mut rect = Aabb::new(90.0, 200.0, 40.0, 40.0);
    let hit = sweep_axis(&w, &mut rect, Axis::Vertical, -100.0);
    assert!(matches!(hit, Some(h) if h.direction < 0.0));
    assert_eq!(rect.top(), 160.0);
}

#[test]
fn zero_displacement_is_no_op() {
    let w = single_tile();
    let mut rect = Aabb::new(0.0, 0.0, 40.0, 40.0);
    assert!(sweep_axis(&w, &mut rect, Axis::Horizontal, 0.0).is_none());
    assert_eq!(rect, Aabb::new(0.0, 0.0, 40.0, 40.0));
}

#[test]
fn fast_body_cannot_skip_a_tile() {
    let w = single_tile();
    // 400 units in one tick is five tile widths.
    let mut rect = Aabb::new(-300.0, 100.0, 40.0, 40.0);
    let hit = sweep_axis(&w, &mut rect, Axis::Horizontal, 400.0);
    assert!(hit.is_some());
    assert_eq!(rect.right(), 80.0);
}

#[test]
fn resting_body_stays_on_floor() {
    let w = single_tile();
    let mut rect = Aabb::new(90.0, 20.0, 40.0, 60.0);
    let hit = sweep_axis(&w, &mut rect, Axis::Vertical, 1.0);
    assert!(matches!(hit, Some(h) if h.direction > 0.0 && h.tile == TileCoord::new(1, 1)));
    assert_eq!(rect.bottom(), 80.0);
}

#[test]
fn upward_sweep_from_below_skips_nothing() {
    let w = single_tile();
    // 300 units up in one tick from under the tile.
    let mut rect = Aabb::new(100.0, 220.0, 40.0, 20.0);
    let hit = sweep_axis(&w, &mut rect, Axis::Vertical, -300.0);
    assert!(hit.is_some());
    assert_eq!(rect.top(), 160.0);
    assert!(!w.overlaps_any(&rect));
}
