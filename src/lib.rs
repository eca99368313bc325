//! Dungeon Dash - side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawns, stages, boss)
//! - `config`: Data-driven stage and balance tables
//! - `assets`: Sprite-size resolution for the simulation's rectangles
//!
//! Rendering, audio and input polling live outside this crate. They feed a
//! [`sim::TickInput`] in and read a [`sim::Snapshot`] out.

pub mod assets;
pub mod config;
pub mod sim;

pub use assets::{AssetError, Assets, BuiltinSprites, SpriteResolver};
pub use config::{ConfigError, GameConfig};
pub use sim::InitError;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Screen dimensions in pixels
    pub const SCREEN_WIDTH: i32 = 1100;
    pub const SCREEN_HEIGHT: i32 = 650;

    /// Ground line used when a background has no detectable floor
    pub const DEFAULT_GROUND_Y: i32 = SCREEN_HEIGHT - 60;

    /// Player physics defaults
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const PLAYER_GRAVITY: f32 = 0.85;
    pub const PLAYER_JUMP_IMPULSE: f32 = -15.0;
    /// Jump cap with no status item held
    pub const BASE_MAX_JUMP: u8 = 2;
    pub const PLAYER_START_X: i32 = 200;

    /// Player damage model
    pub const PLAYER_MAX_HP: u32 = 100;
    pub const CONTACT_DAMAGE: u32 = 20;
    /// 0.5 s grace period at 60 Hz
    pub const INVULNERABILITY_TICKS: u32 = 30;
    pub const DAMAGE_BLINK_TICKS: u32 = 30;
    pub const DAMAGE_POPUP_TICKS: u32 = 120;

    /// Offset from the player's right edge where shots appear
    pub const MUZZLE_OFFSET: i32 = 30;

    /// Explosion lifetimes
    pub const ENEMY_EXPLOSION_TICKS: u32 = 30;
    pub const BOSS_EXPLOSION_TICKS: u32 = 60;
}
