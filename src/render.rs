//! Drawing interface.
//!
//! The core decides *what* is on screen and where; a `Renderer` decides
//! how it looks. Every position handed to a renderer is in view space:
//! world units relative to the camera's top-left corner, shake included.

use bevy_math::Vec2;

use crate::effects::Rgb;
use crate::entities::{EnemyKind, GameState, PlayerState, WeaponKind};
use crate::geometry::Aabb;
use crate::world::TileVariant;

/// Ticks each animation frame is held for.
const ANIM_TICKS: u64 = 6;
const RETICLE_SIZE: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player(PlayerState),
    Enemy(EnemyKind),
    Bullet(WeaponKind),
    Reticle,
}

pub trait Renderer {
    /// `pos` is the tile's top-left corner.
    fn draw_tile(&mut self, pos: Vec2, variant: TileVariant);

    fn draw_entity_sprite(&mut self, kind: SpriteKind, rect: Aabb, facing_right: bool, anim_frame: u32);

    fn draw_particle(&mut self, pos: Vec2, color: Rgb, alpha: f32, radius: f32);

    /// Health bar over a damaged enemy; `fraction` is in `0.0..=1.0`.
    fn draw_health_bar(&mut self, _rect: Aabb, _fraction: f32) {}
}

/// Emit one frame of draw calls, back to front: tiles, enemies, player,
/// bullets, particles, reticle. Anything outside the view is skipped.
pub fn draw_scene(state: &GameState, renderer: &mut impl Renderer) {
    let camera = &state.camera;
    let origin = camera.render_origin();
    let view = Aabb::new(origin.x, origin.y, camera.view_w, camera.view_h);
    let anim_frame = (state.frame / ANIM_TICKS) as u32;

    for tile in state.world.tiles() {
        if tile.rect.overlaps(&view) {
            let variant = state.world.tile_variant(tile.coord);
            renderer.draw_tile(camera.world_to_view(Vec2::new(tile.rect.x, tile.rect.y)), variant);
        }
    }

    for enemy in state.enemies.iter().filter(|e| e.alive && e.rect.overlaps(&view)) {
        let rect = enemy.rect.translated(-origin);
        renderer.draw_entity_sprite(SpriteKind::Enemy(enemy.kind()), rect, enemy.facing_right, anim_frame);
        if enemy.health < enemy.max_health && enemy.max_health > 0.0 {
            renderer.draw_health_bar(rect, (enemy.health / enemy.max_health).clamp(0.0, 1.0));
        }
    }

    let player = &state.player;
    renderer.draw_entity_sprite(
        SpriteKind::Player(player.state),
        player.rect.translated(-origin),
        player.facing_right,
        anim_frame,
    );

    for bullet in &state.armory.bullets {
        let rect = bullet.rect();
        if rect.overlaps(&view) {
            // Bullets are drawn facing their direction of travel.
            renderer.draw_entity_sprite(
                SpriteKind::Bullet(bullet.weapon),
                rect.translated(-origin),
                bullet.vel.x >= 0.0,
                0,
            );
        }
    }

    for particle in state.effects.particles() {
        renderer.draw_particle(
            camera.world_to_view(particle.pos),
            particle.color,
            particle.alpha(),
            particle.radius,
        );
    }

    if player.alive {
        let center = player.center();
        let point = state.reticle.point(center);
        renderer.draw_entity_sprite(
            SpriteKind::Reticle,
            Aabb::centered(point - origin, RETICLE_SIZE, RETICLE_SIZE),
            point.x >= center.x,
            anim_frame,
        );
    }
}

