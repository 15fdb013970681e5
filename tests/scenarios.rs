//! End-to-end gameplay scenarios driven through the public simulation API.
//!
//! Covered scenarios:
//! 1. Player damage clamps, ends the run at zero health, and restart resets it.
//! 2. Three sword hits take a 60 hp enemy to 35, 10, then dead.
//! 3. A bow with one arrow fires once; the next attack is refused.
//! 4. A stray arrow lives exactly its configured lifetime.
//! 5. The population floor holds across kills and the boss follows the cadence.
//! 6. Killing the locked target clears the lock.

use arena_duel::Tuning;
use arena_duel::sim::combat::{
    damage_enemy, damage_player, fire_arrow, melee_swing, step_projectiles,
};
use arena_duel::sim::{Enemy, FrameEvent, GamePhase, GameState, TickInput, Weapon, restart, tick};
use glam::Vec3;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// An obstacle-free, chest-free world holding only the given first-archetype enemies
fn arena_with(tuning: Tuning, enemies: &[Vec3]) -> GameState {
    let tuning = Tuning {
        chest_count: 0,
        ..tuning
    };
    let mut state = GameState::with_obstacles(tuning, 1, Vec::new());
    state.registry.enemies.clear();
    for &pos in enemies {
        let id = state.registry.next_enemy_id();
        let archetype = state.tuning.archetypes[0].clone();
        state.registry.add_enemy(Enemy::new(id, pos, &archetype, false));
    }
    state.player.pos = Vec3::ZERO;
    state
}

fn press_attack() -> TickInput {
    TickInput {
        attack: true,
        ..Default::default()
    }
}

/// Tick until every pending removal from a kill made this frame has resolved
fn settle_removals(state: &mut GameState) {
    for _ in 0..state.tuning.removal_delay_frames {
        tick(state, &TickInput::default());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_player_damage_game_over_and_restart() {
    let mut state = GameState::new(Tuning::default(), 3);
    assert_eq!(state.player.health, 100);

    damage_player(&mut state, 30);
    assert_eq!(state.player.health, 70);
    assert!((state.snapshot().player.health_percent - 70.0).abs() < 1e-4);
    assert_eq!(state.phase, GamePhase::Playing);

    damage_player(&mut state, 90);
    assert_eq!(state.player.health, 0);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(state.snapshot().game_over);

    restart(&mut state);
    assert_eq!(state.player.health, 100);
    assert_eq!(state.kills, 0);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn test_three_sword_hits_kill_a_stalker() {
    let mut state = arena_with(Tuning::default(), &[Vec3::new(0.0, 0.0, 2.0)]);
    state.player.facing = 0.0;
    let id = state.registry.enemies[0].id;

    let mut seen = Vec::new();
    for _ in 0..3 {
        assert_eq!(melee_swing(&mut state), 1);
        seen.push(state.registry.enemies[0].health);
    }
    assert_eq!(seen, vec![35, 10, 0]);
    assert!(!state.registry.enemies[0].alive);
    assert!(state.events.contains(&FrameEvent::EnemyKilled { id, boss: false }));

    // The corpse is out of play
    assert_eq!(melee_swing(&mut state), 0);
}

#[test]
fn test_last_arrow_fires_once() {
    let mut state = arena_with(Tuning::default(), &[]);
    state.player.weapon = Weapon::Ranged;
    state.player.arrows = 1;

    let mut fired = 0;
    tick(&mut state, &press_attack());
    fired += state.events.iter().filter(|e| **e == FrameEvent::ProjectileFired).count();
    while state.player.is_attacking() {
        tick(&mut state, &TickInput::default());
        fired += state.events.iter().filter(|e| **e == FrameEvent::ProjectileFired).count();
    }
    assert_eq!(fired, 1);
    assert_eq!(state.player.arrows, 0);
    assert_eq!(state.registry.projectiles.len(), 1);

    // Empty quiver: nothing starts, nothing fires
    tick(&mut state, &press_attack());
    assert!(!state.player.is_attacking());
    assert_eq!(state.player.arrows, 0);
    assert!(!state.events.contains(&FrameEvent::ProjectileFired));
    assert_eq!(state.registry.projectiles.len(), 1);
}

#[test]
fn test_stray_arrow_lives_exactly_its_lifetime() {
    let mut state = arena_with(Tuning::default(), &[]);
    fire_arrow(&mut state, Vec3::Y);
    let lifetime = state.tuning.arrow_lifetime;

    for _ in 0..lifetime - 1 {
        step_projectiles(&mut state);
    }
    assert_eq!(state.registry.projectiles.len(), 1);
    step_projectiles(&mut state);
    assert!(state.registry.projectiles.is_empty());
}

#[test]
fn test_population_floor_and_boss_cadence() {
    let tuning = Tuning {
        max_player_health: 1_000_000,
        chest_count: 0,
        ..Tuning::default()
    };
    let max = tuning.max_enemies;
    let mut state = GameState::new(tuning, 21);
    assert_eq!(state.registry.enemy_count(), max);

    let kill_next = |state: &mut GameState, boss: bool| {
        let id = state
            .registry
            .living_enemies()
            .find(|e| e.is_boss == boss)
            .map(|e| e.id)
            .expect("a matching enemy");
        assert!(damage_enemy(state, id, 100_000));
        settle_removals(state);
    };

    for kill in 1..=4 {
        kill_next(&mut state, false);
        assert_eq!(state.kills, kill);
        assert_eq!(state.registry.enemy_count(), max);
        assert_eq!(state.registry.boss_count(), 0);
    }

    // Fifth kill brings the boss
    kill_next(&mut state, false);
    assert_eq!(state.kills, 5);
    assert_eq!(state.registry.enemy_count(), max);
    assert_eq!(state.registry.boss_count(), 1);
    assert!(state.boss_active);

    // The tenth kill lands on the cadence but the boss is still out
    for _ in 6..=10 {
        kill_next(&mut state, false);
        assert_eq!(state.registry.enemy_count(), max);
        assert_eq!(state.registry.boss_count(), 1);
    }

    kill_next(&mut state, true);
    assert_eq!(state.kills, 11);
    assert!(!state.boss_active);
    assert_eq!(state.registry.boss_count(), 0);
    assert_eq!(state.registry.enemy_count(), max);
}

#[test]
fn test_lock_clears_when_target_dies() {
    let mut state = arena_with(Tuning::default(), &[Vec3::new(0.0, 0.0, 10.0)]);
    let id = state.registry.enemies[0].id;

    tick(
        &mut state,
        &TickInput {
            lock_on: true,
            ..Default::default()
        },
    );
    assert_eq!(state.player.locked_target, Some(id));
    assert!(state.registry.enemies[0].locked);

    damage_enemy(&mut state, id, 1_000);
    assert_eq!(state.player.locked_target, None);

    tick(&mut state, &TickInput::default());
    assert!(!state.snapshot().enemies[0].locked);
}
