//! Static level geometry.
//!
//! A level is a grid of 80×80 cells loaded once from ASCII text. Tiles are
//! identified by their grid coordinate, so they can never overlap and
//! adjacency is always a lookup, never stored.

use std::collections::HashSet;
use std::path::Path;

use bevy_math::Vec2;
use tracing::info;

use crate::error::LevelError;
use crate::geometry::Aabb;

pub const TILE_SIZE: f32 = 80.0;

const SOLID: char = '*';
const SPAWN: char = '$';

/// The level shipped with the game, used when no level file is configured.
pub const DEFAULT_LEVEL: &str = include_str!("../levels/default.txt");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

impl TileCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn rect(self) -> Aabb {
        Aabb::new(
            self.col as f32 * TILE_SIZE,
            self.row as f32 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub coord: TileCoord,
    pub rect: Aabb,
}

impl Tile {
    fn at(coord: TileCoord) -> Self {
        Self {
            coord,
            rect: coord.rect(),
        }
    }
}

/// How a tile sits among its neighbours. Only the renderer cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileVariant {
    /// Open sky above, solid on both sides.
    Surface,
    /// Open sky above and to the left.
    SurfaceLeftEdge,
    /// Open sky above and to the right.
    SurfaceRightEdge,
    /// Open sky above, no horizontal neighbours.
    Island,
    /// Covered by another tile.
    Fill,
}

/// A run of row-aligned, edge-adjacent tiles. Computed on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformGroup {
    pub row: i32,
    pub first_col: i32,
    pub last_col: i32,
}

impl PlatformGroup {
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.row == self.row && (self.first_col..=self.last_col).contains(&coord.col)
    }

    pub fn len(&self) -> usize {
        (self.last_col - self.first_col + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.last_col < self.first_col
    }

    /// Union of the group's tile rectangles.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.first_col as f32 * TILE_SIZE,
            self.row as f32 * TILE_SIZE,
            self.len() as f32 * TILE_SIZE,
            TILE_SIZE,
        )
    }
}

#[derive(Clone, Debug)]
pub struct World {
    tiles: Vec<Tile>,
    solid: HashSet<TileCoord>,
    cols: i32,
    rows: i32,
    spawn: TileCoord,
}

impl World {
    /// Parse an ASCII level. `*` is solid, `$` marks the player spawn, and
    /// space or `.` is empty. Rows may be ragged.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(LevelError::Empty);
        }

        let mut tiles = Vec::new();
        let mut solid = HashSet::new();
        let mut spawn: Option<TileCoord> = None;
        let mut cols = 0;

        for (row, line) in lines.iter().enumerate() {
            let line = line.trim_end_matches('\r');
            cols = cols.max(line.chars().count() as i32);
            for (col, character) in line.chars().enumerate() {
                let coord = TileCoord::new(col as i32, row as i32);
                match character {
                    SOLID => {
                        solid.insert(coord);
                        tiles.push(Tile::at(coord));
                    }
                    SPAWN => {
                        if let Some(first) = spawn {
                            return Err(LevelError::DuplicateSpawn {
                                first: (first.col, first.row),
                                second: (coord.col, coord.row),
                            });
                        }
                        spawn = Some(coord);
                    }
                    ' ' | '.' => {}
                    character => {
                        return Err(LevelError::UnknownCell { character, col, row });
                    }
                }
            }
        }

        let spawn = spawn.ok_or(LevelError::MissingSpawn)?;
        let world = Self {
            tiles,
            solid,
            cols,
            rows: lines.len() as i32,
            spawn,
        };
        info!(
            "loaded level {}x{} with {} tiles, spawn at ({}, {})",
            world.cols,
            world.rows,
            world.tiles.len(),
            spawn.col,
            spawn.row
        );
        Ok(world)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_solid(&self, coord: TileCoord) -> bool {
        self.solid.contains(&coord)
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Top-left corner of the spawn cell.
    pub fn spawn_point(&self) -> Vec2 {
        let r = self.spawn.rect();
        Vec2::new(r.x, r.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            0.0,
            0.0,
            self.cols as f32 * TILE_SIZE,
            self.rows as f32 * TILE_SIZE,
        )
    }

    /// Every tile whose rectangle strictly overlaps `rect`, in row-major order.
    pub fn query(&self, rect: &Aabb) -> Vec<Tile> {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return Vec::new();
        }
        let first_col = (rect.left() / TILE_SIZE).floor() as i32;
        let last_col = (rect.right() / TILE_SIZE).ceil() as i32 - 1;
        let first_row = (rect.top() / TILE_SIZE).floor() as i32;
        let last_row = (rect.bottom() / TILE_SIZE).ceil() as i32 - 1;

        let mut hits = Vec::new();
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let coord = TileCoord::new(col, row);
                if self.is_solid(coord) {
                    let tile = Tile::at(coord);
                    if tile.rect.overlaps(rect) {
                        hits.push(tile);
                    }
                }
            }
        }
        hits
    }

    pub fn overlaps_any(&self, rect: &Aabb) -> bool {
        !self.query(rect).is_empty()
    }

    /// The tile a body is standing on: its top lies within `tolerance` of the
    /// body's bottom edge and the body's centre is above it.
    pub fn tile_under(&self, body: &Aabb, tolerance: f32) -> Option<TileCoord> {
        let center_x = body.center().x;
        self.tiles
            .iter()
            .find(|t| {
                (body.bottom() - t.rect.top()).abs() < tolerance
                    && t.rect.left() <= center_x
                    && center_x <= t.rect.right()
            })
            .map(|t| t.coord)
    }

    /// Flood-fill the connected run of row-aligned, edge-adjacent tiles
    /// containing `start`. A non-solid start yields an empty group.
    pub fn platform_group(&self, start: TileCoord) -> PlatformGroup {
        if !self.is_solid(start) {
            return PlatformGroup {
                row: start.row,
                first_col: start.col,
                last_col: start.col - 1,
            };
        }

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        let mut first_col = start.col;
        let mut last_col = start.col;

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            first_col = first_col.min(current.col);
            last_col = last_col.max(current.col);
            for neighbour in [current.offset(-1, 0), current.offset(1, 0)] {
                if self.is_solid(neighbour) && !visited.contains(&neighbour) {
                    stack.push(neighbour);
                }
            }
        }

        PlatformGroup {
            row: start.row,
            first_col,
            last_col,
        }
    }

    pub fn tile_variant(&self, coord: TileCoord) -> TileVariant {
        if self.is_solid(coord.offset(0, -1)) {
            return TileVariant::Fill;
        }
        match (
            self.is_solid(coord.offset(-1, 0)),
            self.is_solid(coord.offset(1, 0)),
        ) {
            (true, true) => TileVariant::Surface,
            (false, true) => TileVariant::SurfaceLeftEdge,
            (true, false) => TileVariant::SurfaceRightEdge,
            (false, false) => TileVariant::Island,
        }
    }
}
