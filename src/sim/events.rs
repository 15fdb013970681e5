//! Events raised during a simulation step, for audio/UI collaborators

use serde::Serialize;

use super::state::{EnemyId, Weapon};

/// Something that happened during the last step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameEvent {
    EnemyHit { id: EnemyId, damage: i32, remaining: i32 },
    EnemyKilled { id: EnemyId, boss: bool },
    /// Death animation finished and the body left the arena
    EnemyRemoved { id: EnemyId, boss: bool },
    EnemySpawned { id: EnemyId, boss: bool },
    PlayerDamaged { amount: i32, remaining: i32 },
    ProjectileFired,
    ChestOpened { weapon: Weapon, arrows: u32 },
    WeaponSwitched { weapon: Weapon },
    LockChanged { target: Option<EnemyId> },
    GameOver { kills: u32 },
}
