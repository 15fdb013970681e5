//! Fixed-step simulation tick
//!
//! Core game loop that advances the simulation one frame at a time.

use glam::Vec3;

use super::ai::update_enemies;
use super::collision::resolve_collisions;
use super::combat::{step_particles, step_projectiles};
use super::player::update_player;
use super::schedule::TimerKey;
use super::spawn::{on_enemy_removed, populate_enemies};
use super::state::{GamePhase, GameState, Player};

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Forward/back movement axis, -1..1
    pub move_forward: f32,
    /// Strafe axis, -1..1 (positive = right)
    pub move_right: f32,
    /// Camera yaw in radians
    pub camera_yaw: f32,
    /// Camera pitch in radians (positive = looking up)
    pub camera_pitch: f32,
    /// Attack pressed this frame
    pub attack: bool,
    /// Weapon switch pressed this frame
    pub switch_weapon: bool,
    /// Lock-on toggle pressed this frame
    pub lock_on: bool,
    /// Camera world position, used to orient health bars toward the viewer
    pub camera_pos: Vec3,
}

/// Fire deferred effects that came due this frame
fn run_due_timers(state: &mut GameState) {
    for key in state.scheduler.poll(state.frame) {
        match key {
            TimerKey::Removal(id) => on_enemy_removed(state, id),
            // Flash and marker intensities are read straight off the scheduler
            TimerKey::HitFlash(_) | TimerKey::HitMarker | TimerKey::HurtFlash => {}
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.frame += 1;
    state.events.clear();
    state.camera_pos = input.camera_pos;
    run_due_timers(state);

    // Bodies finish falling and smoke keeps drifting after death
    if state.is_game_over() {
        step_particles(state);
        return;
    }

    update_player(state, input);
    update_enemies(state);
    resolve_collisions(state);
    step_projectiles(state);
    step_particles(state);
}

/// Start a fresh run in the same world. Chests and obstacles stay put.
pub fn restart(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    state.kills = 0;
    state.boss_active = false;
    state.player = Player::new(&state.tuning);
    state.registry.clear_combatants();
    state.scheduler.clear();
    state.events.clear();
    populate_enemies(state);
    log::info!("Run restarted at frame {}", state.frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::FrameEvent;
    use crate::sim::state::{AiState, Weapon};
    use crate::sim::test_support::{arena, quiet_tuning};
    use crate::tuning::Tuning;

    #[test]
    fn test_removal_is_deferred() {
        let mut state = arena(quiet_tuning(), &[Vec3::new(0.0, 0.0, 2.0)]);
        state.player.pos = Vec3::ZERO;
        state.player.facing = 0.0;
        state.registry.enemies[0].health = 10;

        let swing = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &swing);
        let id = state.registry.enemies[0].id;
        assert!(!state.registry.enemies[0].alive);
        assert!(state.events.contains(&FrameEvent::EnemyKilled { id, boss: false }));
        assert_eq!(state.kills, 0);

        for _ in 0..29 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.registry.enemy(id).is_some());
        assert_eq!(state.kills, 0);

        tick(&mut state, &TickInput::default());
        assert!(state.registry.enemy(id).is_none());
        assert_eq!(state.kills, 1);
        // One replacement per removal
        assert_eq!(state.registry.enemy_count(), 1);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut state = arena(quiet_tuning(), &[Vec3::new(0.0, 0.0, 2.0)]);
        state.player.pos = Vec3::ZERO;
        state.player.health = 5;
        state.registry.enemies[0].state = AiState::AttackCharge;
        state.registry.enemies[0].state_timer = 1.49;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&FrameEvent::GameOver { kills: 0 }));

        let enemy_pos = state.registry.enemies[0].pos;
        let player_pos = state.player.pos;
        let walk = TickInput {
            move_forward: 1.0,
            attack: true,
            switch_weapon: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &walk);
        }
        assert_eq!(state.player.pos, player_pos);
        assert_eq!(state.registry.enemies[0].pos, enemy_pos);
        assert_eq!(state.player.weapon, Weapon::Melee);
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn test_removal_completes_during_game_over() {
        let mut state = arena(quiet_tuning(), &[Vec3::new(0.0, 0.0, 2.0)]);
        state.player.pos = Vec3::ZERO;
        state.registry.enemies[0].health = 10;
        let swing = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &swing);
        state.phase = GamePhase::GameOver;

        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = GameState::new(Tuning::default(), 5);
        state.player.health = 0;
        state.phase = GamePhase::GameOver;
        state.kills = 7;
        state.boss_active = true;
        state.player.weapon = Weapon::Ranged;
        state.player.arrows = 0;
        state.player.pos = Vec3::new(30.0, 0.0, 30.0);
        let chests = state.registry.chests.len();

        // A removal left over from the dead run must not count toward the new one
        let doomed = state.registry.enemies[0].id;
        state
            .scheduler
            .schedule(TimerKey::Removal(doomed), state.frame, 1);

        restart(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, 100);
        assert_eq!(state.kills, 0);
        assert!(!state.boss_active);
        assert_eq!(state.player.weapon, Weapon::Melee);
        assert_eq!(state.player.arrows, 10);
        assert_eq!(state.player.pos, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(state.registry.enemy_count(), 10);
        assert_eq!(state.registry.boss_count(), 0);
        assert_eq!(state.registry.chests.len(), chests);
        assert!(state.scheduler.is_empty());

        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.kills, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Tuning::default(), 99999);
        let mut state2 = GameState::new(Tuning::default(), 99999);

        let inputs = [
            TickInput {
                move_forward: 1.0,
                camera_yaw: 0.3,
                ..Default::default()
            },
            TickInput {
                attack: true,
                ..Default::default()
            },
            TickInput {
                lock_on: true,
                move_right: -1.0,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.registry.enemies.len(), state2.registry.enemies.len());
        for (a, b) in state1.registry.enemies.iter().zip(&state2.registry.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }
}
