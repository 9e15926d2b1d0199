//! Arena Survivor - a top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (enemies, weapons, status effects, hits)
//! - `platform`: Contracts with the rendering, input and HUD collaborators
//! - `session`: Driver-facing surface (start, step, select weapon, game over)
//! - `settings`: Player preferences resolved at session start

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game balance constants
pub mod consts {
    /// Milestone size: one weapon selection per crossed multiple
    pub const SCORE_MILESTONE: u64 = 200;
    /// Largest delta a single frame may advance (tab switches, debugger stalls)
    pub const MAX_FRAME_DELTA: f32 = 0.25;
    /// Slack for countdown timers so float drift never costs a whole frame
    pub const TIMER_EPSILON: f32 = 1e-4;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_HEALTH: f32 = 100.0;
    pub const ENEMY_RADIUS: f32 = 0.4;
    pub const ENEMY_SCORE_VALUE: u64 = 5;
    /// Health the player loses on a frame with any enemy contact
    pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;
    /// Enemies are shoved this far from the player after a hit or a selection
    pub const PUSHBACK_DISTANCE: f32 = 2.5;

    /// Spawn policy
    pub const SPAWN_DISTANCE: f32 = 15.0;
    pub const BASE_SPAWN_INTERVAL: f32 = 3.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
    pub const MAX_SPAWN_REDUCTION: f32 = 2.5;
    pub const SPAWN_SCORE_SCALE: f32 = 200.0;

    /// Shared projectile hit radius (projectile + enemy = 0.6)
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    /// Projectiles farther than this from the player are dropped
    pub const PROJECTILE_MAX_RANGE: f32 = 20.0;

    /// Offers presented per weapon selection
    pub const OFFER_COUNT: usize = 3;
    /// Chance per running frame of a one-point trickle (when enabled)
    pub const SCORE_TRICKLE_CHANCE: f64 = 0.1;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Point at `distance` from `center` along heading `theta`
#[inline]
pub fn ring_point(center: Vec2, theta: f32, distance: f32) -> Vec2 {
    center + Vec2::new(theta.cos(), theta.sin()) * distance
}

/// Unit vector from `from` toward `to`, or `fallback` when the points coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(fallback)
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Route `log` output to the browser console and install the panic hook
#[cfg(target_arch = "wasm32")]
pub fn init_web_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
