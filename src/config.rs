//! Game tunables, loaded from a RON file.
//!
//! Every section falls back to its defaults field by field, so a config
//! file only needs to name what it changes:
//!
//! ```ron
//! (
//!     spawner: (max_flying: 4, hp_growth: 1.1),
//!     weapons: (loadout: RifleFirst),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::entities::Loadout;
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub walk_speed: f32,
    pub boost_speed: f32,
    /// Fraction of the remaining speed gap closed per tick.
    pub acceleration: f32,
    pub boost_acceleration: f32,
    /// Below this horizontal speed the player is snapped to rest.
    pub stop_threshold: f32,
    pub gravity: f32,
    /// Terminal downward speed outside a dash.
    pub max_fall_speed: f32,
    pub jump_impulse: f32,
    /// Jumps allowed before ground or wall contact resets the count.
    pub max_jumps: u8,
    pub wall_jump_vertical: f32,
    pub wall_jump_horizontal: f32,
    /// Vertical damping while sliding down a wall with the wall-jump spent.
    pub wall_slide: f32,
    pub dash_speed: f32,
    pub dash_duration: u32,
    pub dash_invulnerability: u32,
    pub dash_cooldown: u32,
    /// Speed kept along the dash direction once a dash runs out.
    pub dash_exit_speed: f32,
    pub dash_damage: f32,
    pub dash_push: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 72.0,
            height: 60.0,
            health: 1,
            walk_speed: 7.0,
            boost_speed: 12.0,
            acceleration: 0.1,
            boost_acceleration: 0.2,
            stop_threshold: 0.1,
            gravity: 1.0,
            max_fall_speed: 30.0,
            jump_impulse: 15.0,
            max_jumps: 2,
            wall_jump_vertical: 20.0,
            wall_jump_horizontal: 25.0,
            wall_slide: 0.7,
            dash_speed: 40.0,
            dash_duration: 10,
            dash_invulnerability: 60,
            dash_cooldown: 300,
            dash_exit_speed: 5.0,
            dash_damage: 150.0,
            dash_push: 10.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeaponTuning {
    pub loadout: Loadout,
    /// Shots shared by both slots before a forced reload.
    pub magazine: u32,
    pub reload_ticks: u32,
    pub slot_cooldown: u32,
    pub bullet_damage: f32,
    pub slowdown_age: u32,
    pub decay_age: u32,
    pub max_age: u32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            loadout: Loadout::ShotgunFirst,
            magazine: 6,
            reload_ticks: 40,
            slot_cooldown: 5,
            bullet_damage: 15.0,
            slowdown_age: 60,
            decay_age: 90,
            max_age: 180,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnTuning {
    pub ground_interval: u32,
    pub max_ground: usize,
    pub max_flying: usize,
    /// Per-tick probability of a flying spawn while under the cap.
    pub flying_chance: f64,
    /// Spawns are rejected closer than this to the player on both axes.
    pub safe_distance: f32,
    pub headroom: f32,
    pub ground_attempts: u32,
    pub flying_attempts: u32,
    pub ground_health: u32,
    pub flying_health: u32,
    /// Multiplier applied to the next enemy's health after each kill.
    pub hp_growth: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            ground_interval: 120,
            max_ground: 100,
            max_flying: 2,
            flying_chance: 0.02,
            safe_distance: 200.0,
            headroom: 200.0,
            ground_attempts: 20,
            flying_attempts: 50,
            ground_health: 100,
            flying_health: 40,
            hp_growth: 1.05,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewTuning {
    /// Visible area in world units; bullets leaving it are culled.
    pub width: f32,
    pub height: f32,
    pub tick_rate: u32,
    pub camera_smoothing: f32,
    pub reticle_radius: f32,
    pub reticle_smoothing: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            tick_rate: 60,
            camera_smoothing: 0.1,
            reticle_radius: 350.0,
            reticle_smoothing: 0.1,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub weapons: WeaponTuning,
    pub spawner: SpawnTuning,
    pub view: ViewTuning,
    /// ASCII level file; the built-in level is used when absent.
    pub level: Option<PathBuf>,
    /// Directory holding sound cue files.
    pub sounds: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            weapons: WeaponTuning::default(),
            spawner: SpawnTuning::default(),
            view: ViewTuning::default(),
            level: None,
            sounds: PathBuf::from("assets/sounds"),
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Load a config file. A missing file means defaults; a file that exists
    /// but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text, path)?;
        info!("loaded config from {:?}", path);
        Ok(config)
    }
}
