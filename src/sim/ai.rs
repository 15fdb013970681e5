//! Enemy AI
//!
//! Each living enemy runs a small state machine:
//! `Idle → Chase → AttackCharge → AttackRecover → Chase → …`
//! with `Chase → Idle` when the player escapes past the detection band.
//! Knockback and the arena clamp apply every frame regardless of state.

use glam::Vec3;

use super::combat::damage_player;
use super::state::{AiState, Enemy, GameState};
use crate::tuning::Tuning;
use crate::{flat, heading_to, horizontal_distance, lerp_angle};

/// A charged attack that resolved this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: i32,
    /// Player was close enough to be hit
    pub connects: bool,
}

/// Charge tell for presentation: 0 outside `AttackCharge`, ramps to 1 at release
pub fn charge_progress(enemy: &Enemy, tuning: &Tuning) -> f32 {
    match enemy.state {
        AiState::AttackCharge if tuning.enemy_charge_time > 0.0 => {
            (enemy.state_timer / tuning.enemy_charge_time).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Advance one enemy by one frame. Dead enemies are left untouched.
pub fn step_enemy(enemy: &mut Enemy, player_pos: Vec3, tuning: &Tuning) -> Option<Strike> {
    if !enemy.alive {
        return None;
    }

    // Health bar fades unless the player is locked on
    if !enemy.locked && enemy.health_bar_timer > 0.0 {
        enemy.health_bar_timer = (enemy.health_bar_timer - tuning.health_bar_decay).max(0.0);
    }

    // Knockback slides and decays independently of the state machine
    enemy.pos += enemy.knockback;
    enemy.knockback *= tuning.knockback_friction;
    if enemy.knockback.length_squared() < 1e-10 {
        enemy.knockback = Vec3::ZERO;
    }

    let dist = horizontal_distance(enemy.pos, player_pos);
    let before = enemy.state;
    let mut strike = None;

    match enemy.state {
        AiState::Idle => {
            if dist < tuning.detection_range {
                enemy.state = AiState::Chase;
            }
        }
        AiState::Chase => {
            let target_yaw = heading_to(enemy.pos, player_pos);
            enemy.facing = lerp_angle(enemy.facing, target_yaw, tuning.enemy_turn_lerp);

            if dist < tuning.enemy_engage_distance {
                enemy.state = AiState::AttackCharge;
                enemy.state_timer = 0.0;
            } else if dist > tuning.detection_range + tuning.detection_release_margin {
                enemy.state = AiState::Idle;
            } else {
                let dir = flat(player_pos - enemy.pos).normalize_or_zero();
                enemy.pos += dir * enemy.speed;
            }
        }
        AiState::AttackCharge => {
            enemy.state_timer += tuning.enemy_timer_step;
            if enemy.state_timer >= tuning.enemy_charge_time {
                strike = Some(Strike {
                    damage: enemy.damage,
                    connects: dist < tuning.enemy_hit_distance,
                });
                enemy.state = AiState::AttackRecover;
                enemy.state_timer = 0.0;
            }
        }
        AiState::AttackRecover => {
            enemy.state_timer += tuning.enemy_timer_step;
            if enemy.state_timer >= tuning.enemy_recover_time {
                enemy.state = AiState::Chase;
            }
        }
    }

    if enemy.state != before {
        log::trace!("Enemy {:?}: {:?} -> {:?}", enemy.id, before, enemy.state);
    }

    let limit = tuning.arena_half_extent();
    enemy.pos.x = enemy.pos.x.clamp(-limit, limit);
    enemy.pos.z = enemy.pos.z.clamp(-limit, limit);

    strike
}

/// Run the AI for every living enemy, applying strikes to the player.
/// Stops as soon as the player dies.
pub fn update_enemies(state: &mut GameState) {
    let locked = state.player.locked_target;

    for i in 0..state.registry.enemies.len() {
        if state.is_game_over() {
            break;
        }
        let player_pos = state.player.pos;
        let enemy = &mut state.registry.enemies[i];
        enemy.locked = enemy.alive && locked == Some(enemy.id);

        if let Some(strike) = step_enemy(enemy, player_pos, &state.tuning) {
            if strike.connects {
                damage_player(state, strike.damage);
            }
        }
    }
}
