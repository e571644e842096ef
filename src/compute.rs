//! Frame orchestration.
//!
//! `tick` advances the whole simulation by one fixed step, in a fixed
//! order: input, player, weapons and bullets, spawner and AI, effects,
//! camera. All randomness comes through the injected `rng`, so a seeded
//! RNG replays a run exactly.

use rand::Rng;
use tracing::info;

use crate::audio::{self, Audio};
use crate::camera::{Camera, Reticle};
use crate::combat::{register_kill, update_bullets};
use crate::config::GameConfig;
use crate::effects::EffectSystem;
use crate::entities::{Armory, GameState, GameStatus, Player, SpawnState, WeaponSlot};
use crate::events::{EventQueue, GameEvent};
use crate::input::InputFrame;
use crate::player::dash_strike;
use crate::spawner;
use crate::world::World;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh game on `world`: player at the spawn marker, no enemies, full
/// magazine, camera already centred on the player.
pub fn init_state(config: GameConfig, world: World) -> GameState {
    let player = Player::spawn(world.spawn_point(), &config.player);
    let mut camera = Camera::new(&config.view);
    camera.snap_to(player.center());

    info!(
        "new game on a {}x{} level, loadout {:?}",
        world.cols(),
        world.rows(),
        config.weapons.loadout
    );

    GameState {
        armory: Armory::new(config.weapons.loadout),
        spawner: SpawnState::new(&config.spawner),
        effects: EffectSystem::default(),
        events: EventQueue::default(),
        reticle: Reticle::new(&config.view),
        enemies: Vec::new(),
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        camera,
        player,
        config,
        world,
    }
}

/// Start over on the same level. Score, enemies, spawner and magazine are
/// reset; the loadout in hand is kept.
pub fn restart(state: &mut GameState) {
    let (left, right) = (state.armory.left, state.armory.right);
    info!("restarting, previous score {}", state.score);
    *state = init_state(state.config.clone(), state.world.clone());
    state.armory.left = left;
    state.armory.right = right;
}

/// Pause a running round, or resume a paused one. A finished round stays
/// finished. Returns `true` if the game is now paused.
pub fn toggle_pause(state: &mut GameState) -> bool {
    state.status = match state.status {
        GameStatus::Playing => {
            info!("paused at frame {}", state.frame);
            GameStatus::Paused
        }
        GameStatus::Paused => {
            info!("resumed at frame {}", state.frame);
            GameStatus::Playing
        }
        GameStatus::GameOver => GameStatus::GameOver,
    };
    state.status == GameStatus::Paused
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation one step and return the events it raised.
///
/// `dt` is elapsed time over the nominal frame time (1.0 at a steady
/// 60 Hz) and only scales the player's walking physics. After the player
/// dies the world freezes; particles keep fading and the camera settles.
/// A paused game does not advance at all.
pub fn tick(state: &mut GameState, input: &InputFrame, dt: f32, rng: &mut impl Rng) -> Vec<GameEvent> {
    if state.status == GameStatus::Paused {
        return Vec::new();
    }
    if state.status == GameStatus::GameOver {
        state.effects.update();
        state.camera.follow(state.player.center(), rng, 1.0);
        state.frame += 1;
        return Vec::new();
    }

    // ── 1. Input ─────────────────────────────────────────────────────────────
    if let Some(loadout) = input.switch_loadout {
        state.armory.switch_loadout(loadout);
    }

    let center = state.player.center();
    if let Some(pointer) = input.pointer {
        let target = state.camera.view_to_world(pointer);
        state.reticle.update(target, center, 1.0);
    }
    if state.player.alive {
        state.player.facing_right = state.reticle.point(center).x >= center.x;
    }

    if input.jump {
        state.player.jump(&state.config.player, &mut state.events);
    }
    if input.dash {
        state
            .player
            .start_dash(state.reticle.angle, &state.config.player, &mut state.events);
    }

    // ── 2. Player ────────────────────────────────────────────────────────────
    state.player.update(
        input,
        &state.world,
        &state.config.player,
        dt,
        rng,
        &mut state.events,
    );

    let kills = dash_strike(
        &state.player,
        &mut state.enemies,
        &state.config.player,
        &mut state.events,
    );
    for kind in kills {
        register_kill(&mut state.score, &mut state.spawner, &state.config.spawner, kind);
    }

    // ── 3. Weapons and bullets ───────────────────────────────────────────────
    if state.player.alive {
        let origin = state.player.center();
        for (pressed, slot) in [
            (input.fire_left, WeaponSlot::Left),
            (input.fire_right, WeaponSlot::Right),
        ] {
            if pressed
                && state.armory.fire(
                    slot,
                    origin,
                    state.reticle.angle,
                    &state.config.weapons,
                    rng,
                    &mut state.events,
                )
            {
                let profile = state.armory.weapon(slot).profile();
                state
                    .camera
                    .add_shake(profile.shake_intensity, profile.shake_ticks);
            }
        }
    }

    let view = state.camera.view_rect();
    let kills = update_bullets(
        &mut state.armory,
        &state.world,
        &mut state.enemies,
        &view,
        &state.config.weapons,
        &mut state.events,
    );
    for kind in kills {
        register_kill(&mut state.score, &mut state.spawner, &state.config.spawner, kind);
    }
    state.armory.update_cooldowns(&mut state.events);

    // ── 4. Spawner and AI ────────────────────────────────────────────────────
    spawner::update(
        &mut state.spawner,
        &mut state.enemies,
        &mut state.player,
        &state.world,
        &state.config.spawner,
        rng,
        &mut state.events,
    );

    if !state.player.alive {
        state.status = GameStatus::GameOver;
        info!("player died at frame {} with score {}", state.frame, state.score);
    }

    // ── 5. Effects and camera ────────────────────────────────────────────────
    state.effects.apply_events(state.events.iter(), rng);
    state.effects.update();
    state.camera.follow(state.player.center(), rng, 1.0);

    state.frame += 1;
    state.events.drain()
}

/// `tick`, then hand the tick's events to an audio backend.
pub fn tick_with_audio(
    state: &mut GameState,
    input: &InputFrame,
    dt: f32,
    rng: &mut impl Rng,
    sound: &mut impl Audio,
) -> Vec<GameEvent> {
    let events = tick(state, input, dt, rng);
    audio::play_events(sound, &events);
    events
}
