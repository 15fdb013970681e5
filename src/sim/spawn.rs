//! Spawning and progression
//!
//! Keeps the enemy population at its floor, decides when the boss appears,
//! replaces opened chests and scatters the static obstacles of a new world.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combat::emit_smoke;
use super::events::FrameEvent;
use super::state::{Chest, ChestContents, Enemy, EnemyId, GameState, Obstacle, ObstacleKind};
use crate::horizontal_distance;
use crate::tuning::Tuning;

/// Stream offset for world scatter, independent of gameplay rolls
const WORLD_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// Center region kept free of obstacles so the player never starts stuck
fn in_clear_zone(tuning: &Tuning, x: f32, z: f32) -> bool {
    x.abs() < tuning.obstacle_clear_zone && z.abs() < tuning.obstacle_clear_zone
}

/// Scatter trees and rocks for a world built from `seed`.
///
/// Draws `obstacle_attempts` candidate positions and drops those in the
/// center clear zone, so the result is usually a little short of the attempt
/// count.
pub fn scatter_obstacles(tuning: &Tuning, seed: u64) -> Vec<Obstacle> {
    let mut rng = Pcg32::seed_from_u64(seed ^ WORLD_STREAM);
    let half = tuning.map_size * tuning.obstacle_spread / 2.0;
    let mut obstacles = Vec::new();

    for _ in 0..tuning.obstacle_attempts {
        let x = (rng.random::<f32>() - 0.5) * 2.0 * half;
        let z = (rng.random::<f32>() - 0.5) * 2.0 * half;
        if in_clear_zone(tuning, x, z) {
            continue;
        }

        let obstacle = if rng.random_bool(tuning.tree_chance) {
            Obstacle {
                pos: Vec3::new(x, 0.0, z),
                radius: tuning.tree_radius,
                kind: ObstacleKind::Tree,
            }
        } else {
            let size = rng.random::<f32>() + 0.5;
            Obstacle {
                pos: Vec3::new(x, 0.5, z),
                radius: size * 0.9,
                kind: ObstacleKind::Rock,
            }
        };
        obstacles.push(obstacle);
    }
    obstacles
}

/// Random ground position inside the spawn spread
fn random_spawn_point(state: &mut GameState) -> Vec3 {
    let half = state.tuning.map_size * state.tuning.spawn_spread / 2.0;
    let x = (state.rng.random::<f32>() - 0.5) * 2.0 * half;
    let z = (state.rng.random::<f32>() - 0.5) * 2.0 * half;
    Vec3::new(x, 0.0, z)
}

/// Place one chest at a random position with randomly rolled contents
pub fn spawn_chest(state: &mut GameState) {
    let mut pos = random_spawn_point(state);
    pos.y = 0.5;

    let contents = if state.rng.random_bool(state.tuning.chest_bow_chance) {
        let (min, max) = (state.tuning.chest_ammo_min, state.tuning.chest_ammo_max);
        ChestContents::RangedWeaponUnlock {
            arrows: state.rng.random_range(min..=max),
        }
    } else {
        ChestContents::MeleeWeaponUnlock
    };

    let radius = state.tuning.chest_radius;
    state.registry.add_chest(Chest {
        pos,
        radius,
        contents,
    });
}

/// Whether the next spawn should be the boss
fn boss_due(state: &GameState) -> bool {
    state.kills > 0 && state.kills % state.tuning.kills_for_boss == 0 && !state.boss_active
}

/// Spawn one enemy away from the player. Becomes the boss when the kill
/// count is on the cadence and no boss is alive.
pub fn spawn_enemy(state: &mut GameState) -> EnemyId {
    let is_boss = boss_due(state);
    let archetype = if is_boss {
        state.tuning.boss.clone()
    } else {
        let pick = state.rng.random_range(0..state.tuning.archetypes.len());
        state.tuning.archetypes[pick].clone()
    };

    // Re-roll while too close to the player; keep the last roll if it never clears
    let player_pos = state.player.pos;
    let mut pos = random_spawn_point(state);
    for _ in 1..state.tuning.spawn_attempts {
        if horizontal_distance(pos, player_pos) >= state.tuning.spawn_clearance {
            break;
        }
        pos = random_spawn_point(state);
    }

    let id = state.registry.next_enemy_id();
    state.registry.add_enemy(Enemy::new(id, pos, &archetype, is_boss));

    if is_boss {
        state.boss_active = true;
        log::info!("Boss {} spawned at kill {}", archetype.name, state.kills);
    } else {
        log::trace!("Spawned {} {:?} at {:?}", archetype.name, id, pos);
    }
    state.emit(FrameEvent::EnemySpawned { id, boss: is_boss });
    id
}

/// Spawn until the population floor is met
pub fn populate_enemies(state: &mut GameState) {
    while state.registry.enemy_count() < state.tuning.max_enemies {
        spawn_enemy(state);
    }
}

/// Finish a death: smoke, drop the body, count the kill and refill the
/// population. Unknown IDs are ignored.
pub fn on_enemy_removed(state: &mut GameState, id: EnemyId) {
    let Some(enemy) = state.registry.remove_enemy(id) else {
        return;
    };
    emit_smoke(state, enemy.pos, enemy.is_boss);

    if enemy.is_boss {
        state.boss_active = false;
    }
    state.kills += 1;
    log::debug!("Removed {} {:?}, kills={}", enemy.name, id, state.kills);
    state.emit(FrameEvent::EnemyRemoved {
        id,
        boss: enemy.is_boss,
    });

    if state.registry.enemy_count() < state.tuning.max_enemies {
        spawn_enemy(state);
    }
}
