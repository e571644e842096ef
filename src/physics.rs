//! Axis-separated movement against the static world.
//!
//! Every moving body applies its horizontal displacement and resolves it,
//! then its vertical displacement. Large displacements are split into
//! sub-steps no longer than half a tile so a body can never skip over a
//! tile or slip through a corner in a single tick.

use crate::geometry::Aabb;
use crate::world::{TileCoord, World, TILE_SIZE};

const MAX_STEP: f32 = TILE_SIZE / 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A tile that stopped a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub tile: TileCoord,
    pub axis: Axis,
    /// Sign of the blocked motion: +1 right/down, -1 left/up.
    pub direction: f32,
}

/// Move `rect` by `delta` along `axis`, stopping flush against the first
/// tile in the way. The caller owns the velocity and decides what a hit
/// means for it (stop, bounce, land).
pub fn sweep_axis(world: &World, rect: &mut Aabb, axis: Axis, delta: f32) -> Option<Hit> {
    if delta == 0.0 || !delta.is_finite() {
        return None;
    }

    let steps = (delta.abs() / MAX_STEP).ceil().max(1.0) as u32;
    let step = delta / steps as f32;

    for _ in 0..steps {
        match axis {
            Axis::Horizontal => rect.x += step,
            Axis::Vertical => rect.y += step,
        }

        let hits = world.query(rect);
        if hits.is_empty() {
            continue;
        }

        // Nearest blocking face in the direction of travel.
        let tile = match (axis, step > 0.0) {
            (Axis::Horizontal, true) => hits
                .iter()
                .min_by(|a, b| a.rect.left().total_cmp(&b.rect.left())),
            (Axis::Horizontal, false) => hits
                .iter()
                .max_by(|a, b| a.rect.right().total_cmp(&b.rect.right())),
            (Axis::Vertical, true) => hits
                .iter()
                .min_by(|a, b| a.rect.top().total_cmp(&b.rect.top())),
            (Axis::Vertical, false) => hits
                .iter()
                .max_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom())),
        }?;

        match (axis, step > 0.0) {
            (Axis::Horizontal, true) => rect.x = tile.rect.left() - rect.w,
            (Axis::Horizontal, false) => rect.x = tile.rect.right(),
            (Axis::Vertical, true) => rect.y = tile.rect.top() - rect.h,
            (Axis::Vertical, false) => rect.y = tile.rect.bottom(),
        }

        return Some(Hit {
            tile: tile.coord,
            axis,
            direction: step.signum(),
        });
    }

    None
}
