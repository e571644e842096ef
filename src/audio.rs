//! Sound cues.
//!
//! The core only names cues; a backend decides what playing one means.
//! `SoundBoard` is the backend the terminal front end ships with: it checks
//! which cue files exist on disk, warns about the missing ones once, and
//! treats every play request as fire-and-forget.

use std::collections::HashSet;
use std::path::Path;

use tracing::{trace, warn};

use crate::entities::WeaponKind;
use crate::events::GameEvent;

/// Cue name and the file it is loaded from.
pub const SOUND_CUES: [(&str, &str); 5] = [
    ("shotgun", "shoot_shotgun.mp3"),
    ("rifle", "shoot_rifle.mp3"),
    ("jump", "jump.wav"),
    ("dash", "dash.wav"),
    ("reload", "rearmed.mp3"),
];

pub trait Audio {
    fn play_sound(&mut self, name: &str);
}

/// Cue for a simulation event, if it has one.
pub fn sound_for(event: &GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::PlayerJumped { .. } | GameEvent::PlayerWallJumped { .. } => Some("jump"),
        GameEvent::DashStarted { .. } => Some("dash"),
        GameEvent::ShotFired { weapon, .. } => Some(match weapon {
            WeaponKind::Shotgun => "shotgun",
            WeaponKind::Rifle => "rifle",
        }),
        GameEvent::ReloadStarted => Some("reload"),
        _ => None,
    }
}

/// Forward every cue-bearing event to `audio`.
pub fn play_events<'a>(audio: &mut impl Audio, events: impl IntoIterator<Item = &'a GameEvent>) {
    for name in events.into_iter().filter_map(sound_for) {
        audio.play_sound(name);
    }
}

#[derive(Debug, Default)]
pub struct SoundBoard {
    available: HashSet<&'static str>,
    played: u64,
}

impl SoundBoard {
    /// Scan `dir` for cue files. Missing files are not an error; their cues
    /// are silently skipped from then on.
    pub fn load(dir: &Path) -> Self {
        let mut available = HashSet::new();
        for (name, file) in SOUND_CUES {
            let path = dir.join(file);
            if path.is_file() {
                available.insert(name);
            } else {
                warn!("sound {:?} missing at {:?}, cue will be skipped", name, path);
            }
        }
        Self {
            available,
            played: 0,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.available.contains(name)
    }

    /// Cues actually played so far.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl Audio for SoundBoard {
    fn play_sound(&mut self, name: &str) {
        if self.has(name) {
            self.played += 1;
            trace!("play {}", name);
        } else {
            trace!("dropped sound cue {}", name);
        }
    }
}
