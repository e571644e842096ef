//! Simulation core for a side-scrolling platform shooter.
//!
//! Everything here is deterministic given an injected RNG and free of
//! terminal I/O; the binary in `main.rs` supplies input, drawing and sound.

pub mod ai;
pub mod audio;
pub mod camera;
pub mod combat;
pub mod compute;
pub mod config;
pub mod effects;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod player;
pub mod render;
pub mod spawner;
pub mod world;
