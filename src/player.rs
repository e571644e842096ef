//! Player controller.
//!
//! State transitions:
//!
//! * `Grounded → Airborne` on jump.
//! * `Airborne → Grounded` on landing; resets the jump count and the wall-jump.
//! * `Airborne → WallContact` on a horizontal collision; enables one wall-jump.
//! * any live state `→ Dashing` on dash input when the cooldown has run out;
//!   the dash ends early on any collision.
//! * any state `→ Dead` once health reaches 0, or on falling below the level.

use bevy_math::Vec2;
use rand::Rng;

use crate::config::PlayerTuning;
use crate::entities::{Dash, Enemy, EnemyKind, Player, PlayerState};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{direction_from_angle, Aabb};
use crate::input::InputFrame;
use crate::physics::{sweep_axis, Axis};
use crate::world::World;

/// Chance per grounded, moving tick of kicking up run dust.
const RUN_DUST_CHANCE: f64 = 0.3;

impl Player {
    /// A fresh player with its top-left corner at `at`.
    pub fn spawn(at: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            rect: Aabb::new(at.x, at.y, tuning.width, tuning.height),
            vel: Vec2::ZERO,
            health: tuning.health,
            alive: true,
            state: PlayerState::Airborne,
            jump_count: 0,
            wall_jump_used: false,
            on_ground: false,
            on_wall: false,
            wall_dir: 0,
            facing_right: true,
            last_move_dir: 1.0,
            dash: Dash {
                direction: Vec2::X,
                remaining: 0,
                cooldown: 0,
                invulnerable: 0,
            },
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.remaining > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.is_dashing() || self.dash.invulnerable > 0
    }

    /// Apply one unguarded hit. Returns `true` if this hit killed the player.
    /// Hits while invulnerable or already dead are ignored.
    pub fn take_damage(&mut self, events: &mut EventQueue) -> bool {
        if !self.alive || self.is_invulnerable() {
            return false;
        }
        self.health -= 1;
        if self.health > 0 {
            return false;
        }
        self.die(events);
        true
    }

    fn die(&mut self, events: &mut EventQueue) {
        self.health = 0;
        self.alive = false;
        self.vel = Vec2::ZERO;
        self.dash.remaining = 0;
        self.state = PlayerState::Dead;
        events.push(GameEvent::PlayerDied { pos: self.center() });
    }

    /// Ground jump, air jump, or wall-jump, in that order of preference.
    pub fn jump(&mut self, tuning: &PlayerTuning, events: &mut EventQueue) -> bool {
        if !self.alive {
            return false;
        }

        let feet = Vec2::new(self.center().x, self.rect.bottom());
        if self.on_ground {
            self.vel.y = -tuning.jump_impulse;
            self.jump_count += 1;
            self.wall_jump_used = false;
            self.on_ground = false;
            events.push(GameEvent::PlayerJumped {
                pos: feet,
                from_ground: true,
            });
        } else if self.jump_count < tuning.max_jumps {
            self.vel.y = -tuning.jump_impulse;
            self.jump_count += 1;
            events.push(GameEvent::PlayerJumped {
                pos: feet,
                from_ground: false,
            });
        } else if self.on_wall && !self.wall_jump_used {
            self.vel.y = -tuning.wall_jump_vertical;
            self.vel.x = -f32::from(self.wall_dir) * tuning.wall_jump_horizontal;
            // A wall-jump hands back the spent air jump.
            if self.jump_count == tuning.max_jumps {
                self.jump_count = tuning.max_jumps.saturating_sub(1);
            }
            self.wall_jump_used = true;
            events.push(GameEvent::PlayerWallJumped {
                pos: self.center(),
                wall_dir: self.wall_dir,
            });
        } else {
            return false;
        }

        self.refresh_state();
        true
    }

    /// Start a dash along `aim_angle`. Gated by the cooldown and by any
    /// dash or invulnerability still running.
    pub fn start_dash(&mut self, aim_angle: f32, tuning: &PlayerTuning, events: &mut EventQueue) -> bool {
        if !self.alive || self.dash.cooldown > 0 || self.is_invulnerable() {
            return false;
        }

        self.dash = Dash {
            direction: direction_from_angle(aim_angle),
            remaining: tuning.dash_duration,
            cooldown: tuning.dash_cooldown,
            invulnerable: tuning.dash_invulnerability,
        };
        events.push(GameEvent::DashStarted {
            pos: self.center(),
            direction: self.dash.direction,
        });
        self.state = PlayerState::Dashing;
        true
    }

    /// Advance one tick: timers, horizontal intent, gravity, and collision
    /// against the world (horizontal pass first, then vertical).
    pub fn update(
        &mut self,
        input: &InputFrame,
        world: &World,
        tuning: &PlayerTuning,
        dt: f32,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) {
        if !self.alive {
            self.state = PlayerState::Dead;
            return;
        }

        self.tick_dash(tuning);

        let was_on_ground = self.on_ground;
        let dashing = self.is_dashing();

        if dashing {
            self.vel = self.dash.direction * tuning.dash_speed;
        } else {
            self.steer(input, tuning, dt);
        }

        // ── Horizontal pass ──────────────────────────────────────────────────
        let scale = if dashing { 1.0 } else { dt };
        self.on_wall = false;
        self.wall_dir = 0;
        if let Some(hit) = sweep_axis(world, &mut self.rect, Axis::Horizontal, self.vel.x * scale) {
            self.vel.x = 0.0;
            self.on_wall = true;
            self.wall_dir = hit.direction as i8;
            if self.is_dashing() {
                self.dash.remaining = 0;
                events.push(GameEvent::DashInterrupted { pos: self.center() });
            }
        }

        // ── Vertical pass ────────────────────────────────────────────────────
        let dashing = self.is_dashing();
        if !dashing {
            self.vel.y += tuning.gravity * dt;
            if self.on_wall && self.wall_jump_used {
                self.vel.y *= tuning.wall_slide;
            }
            self.vel.y = self.vel.y.min(tuning.max_fall_speed);
        }

        let scale = if dashing { 1.0 } else { dt };
        self.on_ground = false;
        if let Some(hit) = sweep_axis(world, &mut self.rect, Axis::Vertical, self.vel.y * scale) {
            self.vel.y = 0.0;
            let feet = Vec2::new(self.center().x, self.rect.bottom());
            if hit.direction > 0.0 {
                self.on_ground = true;
                self.jump_count = 0;
                self.wall_jump_used = false;
                if dashing {
                    self.dash.remaining = 0;
                    events.push(GameEvent::PlayerLanded {
                        pos: feet,
                        ended_dash: true,
                    });
                } else if !was_on_ground {
                    events.push(GameEvent::PlayerLanded {
                        pos: feet,
                        ended_dash: false,
                    });
                }
            } else if dashing {
                self.dash.remaining = 0;
                events.push(GameEvent::DashInterrupted {
                    pos: Vec2::new(self.center().x, self.rect.top()),
                });
            }
        }

        // Below the level there is nothing left to land on.
        if self.rect.top() > world.bounds().bottom() {
            self.die(events);
            return;
        }

        if self.on_ground
            && !self.is_dashing()
            && self.vel.x.abs() > tuning.stop_threshold
            && rng.gen_bool(RUN_DUST_CHANCE)
        {
            events.push(GameEvent::PlayerRan {
                pos: Vec2::new(self.center().x, self.rect.bottom()),
                direction: self.last_move_dir,
            });
        }

        self.refresh_state();
    }

    fn tick_dash(&mut self, tuning: &PlayerTuning) {
        self.dash.cooldown = self.dash.cooldown.saturating_sub(1);
        if self.dash.remaining > 0 {
            self.dash.remaining -= 1;
            if self.dash.remaining == 0 {
                self.vel = self.dash.direction * tuning.dash_exit_speed;
            }
        }
        self.dash.invulnerable = self.dash.invulnerable.saturating_sub(1);
    }

    /// Exponential approach to the target speed, plus friction when idle.
    fn steer(&mut self, input: &InputFrame, tuning: &PlayerTuning, dt: f32) {
        let intent = input.horizontal();
        if intent != 0.0 {
            self.last_move_dir = intent;
        }

        let mut target = intent * tuning.walk_speed;
        let mut accel = tuning.acceleration * dt;
        if input.boost {
            accel = tuning.boost_acceleration * dt;
            target *= tuning.boost_speed / tuning.walk_speed;
        }
        let friction = accel;

        self.vel.x += (target - self.vel.x) * accel;
        if target == 0.0 {
            if self.vel.x > 0.0 {
                self.vel.x = (self.vel.x - friction).max(0.0);
            } else if self.vel.x < 0.0 {
                self.vel.x = (self.vel.x + friction).min(0.0);
            }
        }

        if self.vel.x.abs() < tuning.stop_threshold {
            self.vel.x = 0.0;
        }
    }

    fn refresh_state(&mut self) {
        self.state = if !self.alive {
            PlayerState::Dead
        } else if self.is_dashing() {
            PlayerState::Dashing
        } else if self.on_ground {
            PlayerState::Grounded
        } else if self.on_wall {
            PlayerState::WallContact
        } else {
            PlayerState::Airborne
        };
    }
}

/// Damage and shove every live enemy the dashing player passes through.
/// Returns the kinds of the enemies it killed.
pub fn dash_strike(
    player: &Player,
    enemies: &mut [Enemy],
    tuning: &PlayerTuning,
    events: &mut EventQueue,
) -> Vec<EnemyKind> {
    let mut kills = Vec::new();
    if !player.alive || !player.is_dashing() {
        return kills;
    }

    for enemy in enemies.iter_mut() {
        if !enemy.alive || !player.rect.overlaps(&enemy.rect) {
            continue;
        }

        let pos = enemy.rect.center();
        let killed = enemy.take_damage(tuning.dash_damage);
        events.push(GameEvent::DashStruck { pos, killed });
        if killed {
            events.push(GameEvent::EnemyKilled {
                kind: enemy.kind(),
                pos,
            });
            kills.push(enemy.kind());
        }

        let away = pos - player.center();
        let len = away.length().max(0.1);
        enemy.vel.x += away.x / len * tuning.dash_push;
        enemy.vel.y += away.y / len * tuning.dash_push * 0.5;
    }

    kills
}
