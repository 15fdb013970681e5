//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame steps only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order, stable enemy IDs)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod events;
pub mod player;
pub mod registry;
pub mod schedule;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

#[cfg(test)]
mod test_support;

pub use collision::{Contact, circle_overlap, resolve_collisions};
pub use events::FrameEvent;
pub use registry::Registry;
pub use schedule::{Scheduler, TimerKey};
pub use snapshot::{ChestView, EnemyView, ParticleView, PlayerView, ProjectileView, Snapshot};
pub use state::{
    AiState, Attack, Chest, ChestContents, Enemy, EnemyId, GamePhase, GameState, Obstacle,
    ObstacleKind, Particle, ParticleKind, Player, Projectile, Weapon,
};
pub use tick::{TickInput, restart, tick};
