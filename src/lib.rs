//! Arena Duel - simulation core for a sword-and-bow arena action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (AI, combat, collisions, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input capture and UI live outside this crate. They feed a
//! [`sim::TickInput`] in every frame and read a [`sim::Snapshot`] back out.

pub mod sim;
pub mod tuning;

pub use tuning::{EnemyArchetype, Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-frame tuning values were balanced for
    pub const FRAME_RATE: u32 = 60;
    /// Default run seed
    pub const DEFAULT_SEED: u64 = 42;
    /// Ground plane height
    pub const GROUND_Y: f32 = 0.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalized angle to [-π, π]. Non-finite input maps to 0.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

/// Interpolate a yaw toward a target along the shortest arc
#[inline]
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * t)
}

/// Project onto the ground plane (drop the vertical component)
#[inline]
pub fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points on the ground plane
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flat(b - a).length()
}

/// Yaw that faces from `from` toward `to`
#[inline]
pub fn heading_to(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}

/// Horizontal unit vector for a yaw
#[inline]
pub fn facing_vector(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Camera look direction from yaw and pitch (pitch positive = up)
#[inline]
pub fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// Rotate a (forward, right) intent into a camera-relative world direction.
///
/// Returns `None` when there is no intent.
pub fn camera_relative(forward: f32, right: f32, camera_yaw: f32) -> Option<Vec3> {
    let local = Vec3::new(right, 0.0, -forward);
    if local.length_squared() <= f32::EPSILON {
        return None;
    }
    let local = local.normalize();
    let (s, c) = camera_yaw.sin_cos();
    Some(Vec3::new(
        local.x * c + local.z * s,
        0.0,
        -local.x * s + local.z * c,
    ))
}
