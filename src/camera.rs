use bevy_math::Vec2;
use rand::Rng;

use crate::config::ViewTuning;
use crate::geometry::{normalize_angle, Aabb};

/// Smoothed follow camera with screen shake.
///
/// `pos` is the top-left corner of the view in world units. Shake is an
/// integer jitter re-rolled every tick while it lasts; it both pulls the
/// follow target and offsets the drawn frame.
#[derive(Clone, Debug)]
pub struct Camera {
    pub pos: Vec2,
    pub view_w: f32,
    pub view_h: f32,
    pub smoothing: f32,
    pub shake_timer: u32,
    pub shake_intensity: i32,
    pub shake_offset: Vec2,
}

impl Camera {
    pub fn new(view: &ViewTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            view_w: view.width,
            view_h: view.height,
            smoothing: view.camera_smoothing,
            shake_timer: 0,
            shake_intensity: 0,
            shake_offset: Vec2::ZERO,
        }
    }

    fn target_for(&self, center: Vec2) -> Vec2 {
        center - Vec2::new(self.view_w / 2.0, self.view_h / 2.0)
    }

    /// Jump straight to `center` with no smoothing.
    pub fn snap_to(&mut self, center: Vec2) {
        self.pos = self.target_for(center);
        self.shake_offset = Vec2::ZERO;
    }

    /// Start (or replace) a shake.
    pub fn add_shake(&mut self, intensity: i32, ticks: u32) {
        self.shake_intensity = intensity.max(0);
        self.shake_timer = ticks;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer > 0
    }

    pub fn follow(&mut self, center: Vec2, rng: &mut impl Rng, time_scale: f32) {
        self.shake_timer = self.shake_timer.saturating_sub(1);
        self.shake_offset = if self.shake_timer > 0 {
            let i = self.shake_intensity;
            Vec2::new(rng.gen_range(-i..=i) as f32, rng.gen_range(-i..=i) as f32)
        } else {
            Vec2::ZERO
        };

        let target = self.target_for(center) + self.shake_offset;
        self.pos += (target - self.pos) * self.smoothing * time_scale;
    }

    /// Area used for bullet culling.
    pub fn view_rect(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.view_w, self.view_h)
    }

    /// World point drawn at the view's top-left corner this frame.
    pub fn render_origin(&self) -> Vec2 {
        self.pos - self.shake_offset
    }

    pub fn world_to_view(&self, p: Vec2) -> Vec2 {
        p - self.render_origin()
    }

    pub fn view_to_world(&self, p: Vec2) -> Vec2 {
        p + self.render_origin()
    }
}

/// Aim reticle orbiting the player at a fixed radius. Its angle eases
/// towards the pointer along the shorter way round.
#[derive(Clone, Debug)]
pub struct Reticle {
    pub angle: f32,
    pub radius: f32,
    pub smoothing: f32,
}

impl Reticle {
    pub fn new(view: &ViewTuning) -> Self {
        Self {
            angle: 0.0,
            radius: view.reticle_radius,
            smoothing: view.reticle_smoothing,
        }
    }

    pub fn update(&mut self, pointer: Vec2, center: Vec2, time_scale: f32) {
        let to_pointer = pointer - center;
        if to_pointer.length_squared() == 0.0 {
            return;
        }
        let target = to_pointer.y.atan2(to_pointer.x);
        let diff = normalize_angle(target - normalize_angle(self.angle));
        self.angle = normalize_angle(self.angle + diff * self.smoothing * time_scale);
    }

    /// Reticle position around `center`.
    pub fn point(&self, center: Vec2) -> Vec2 {
        center + Vec2::new(self.angle.cos(), self.angle.sin()) * self.radius
    }
}
