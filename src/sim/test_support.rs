//! Shared fixtures for simulation unit tests

use glam::Vec3;

use super::state::{Enemy, EnemyId, GameState};
use crate::tuning::Tuning;

/// Default balance without chests, so nothing gets picked up by accident
pub(crate) fn quiet_tuning() -> Tuning {
    Tuning {
        chest_count: 0,
        ..Tuning::default()
    }
}

/// A world with no obstacles or chests holding exactly the given enemies
/// (first archetype, 60 hp)
pub(crate) fn arena(tuning: Tuning, enemies: &[Vec3]) -> GameState {
    let mut state = GameState::with_obstacles(tuning, 7, Vec::new());
    state.registry.enemies.clear();
    state.registry.chests.clear();
    for &pos in enemies {
        add_enemy(&mut state, pos);
    }
    state
}

pub(crate) fn add_enemy(state: &mut GameState, pos: Vec3) -> EnemyId {
    let id = state.registry.next_enemy_id();
    let archetype = state.tuning.archetypes[0].clone();
    state.registry.add_enemy(Enemy::new(id, pos, &archetype, false));
    id
}
