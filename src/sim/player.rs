//! Player controller
//!
//! Turns per-frame intent into movement, facing, attacks, weapon changes,
//! lock-on and chest pickups.

use glam::Vec3;

use super::combat::{fire_arrow, melee_swing};
use super::events::FrameEvent;
use super::schedule::TimerKey;
use super::spawn::spawn_chest;
use super::state::{Attack, ChestContents, EnemyId, GameState, Weapon};
use super::tick::TickInput;
use crate::{aim_direction, camera_relative, heading_to, horizontal_distance, lerp_angle};

/// Toggle lock-on. Engaging picks the nearest living enemy within range;
/// ties keep the earliest in registry order.
pub fn toggle_lock_on(state: &mut GameState) {
    if state.player.locked_target.take().is_some() {
        log::debug!("Lock released");
        state.emit(FrameEvent::LockChanged { target: None });
        return;
    }

    let origin = state.player.pos;
    let mut best: Option<(EnemyId, f32)> = None;
    for enemy in state.registry.living_enemies() {
        let dist = horizontal_distance(origin, enemy.pos);
        let limit = best.map_or(state.tuning.lock_on_distance, |(_, d)| d);
        if dist < limit {
            best = Some((enemy.id, dist));
        }
    }

    if let Some((id, _)) = best {
        state.player.locked_target = Some(id);
        log::debug!("Locked onto {:?}", id);
        state.emit(FrameEvent::LockChanged { target: Some(id) });
    }
}

/// Swap sword and bow. Ignored after game over.
pub fn switch_weapon(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let weapon = state.player.weapon.toggled();
    state.player.weapon = weapon;
    state
        .scheduler
        .schedule(TimerKey::HitMarker, state.frame, state.tuning.hit_marker_frames);
    log::debug!("Switched to {:?}", weapon);
    state.emit(FrameEvent::WeaponSwitched { weapon });
}

/// Start an attack with the current weapon. Returns false when refused
/// (already attacking, game over, or bow with no arrows).
pub fn try_attack(state: &mut GameState) -> bool {
    if state.is_game_over() || state.player.is_attacking() {
        return false;
    }
    let weapon = state.player.weapon;
    if weapon == Weapon::Ranged && state.player.arrows == 0 {
        return false;
    }

    state.player.attack = Some(Attack {
        weapon,
        progress: 0.0,
        released: false,
    });
    if weapon == Weapon::Melee {
        melee_swing(state);
    }
    true
}

/// Advance the attack animation; the bow releases inside its window
fn advance_attack(state: &mut GameState, aim: Vec3) {
    let Some(mut attack) = state.player.attack else {
        return;
    };
    attack.progress += state.tuning.attack_progress_step;

    let in_window = attack.progress >= state.tuning.ranged_release_start
        && attack.progress < state.tuning.ranged_release_end;
    if attack.weapon == Weapon::Ranged && in_window && !attack.released {
        state.player.arrows = state.player.arrows.saturating_sub(1);
        attack.released = true;
        fire_arrow(state, aim);
    }

    state.player.attack = (attack.progress < 1.0).then_some(attack);
}

/// Open every chest within pickup reach and replace each one elsewhere.
/// Reach is measured in 3D from the player's feet to the chest center.
fn collect_chests(state: &mut GameState) {
    let origin = state.player.pos;
    let reach = state.tuning.pickup_distance;
    let touching: Vec<usize> = state
        .registry
        .chests
        .iter()
        .enumerate()
        .filter(|(_, c)| origin.distance(c.pos) < reach)
        .map(|(i, _)| i)
        .collect();
    if touching.is_empty() {
        return;
    }

    let mut opened: Vec<ChestContents> = touching
        .iter()
        .rev()
        .filter_map(|&i| state.registry.remove_chest(i))
        .map(|c| c.contents)
        .collect();
    opened.reverse();

    for contents in opened {
        let arrows = match contents {
            ChestContents::RangedWeaponUnlock { arrows } => arrows,
            ChestContents::MeleeWeaponUnlock => 0,
        };
        let weapon = contents.weapon();
        state.player.arrows = state.player.arrows.saturating_add(arrows);
        state.player.weapon = weapon;
        log::debug!("Opened chest: {:?} (+{} arrows)", weapon, arrows);
        state.emit(FrameEvent::ChestOpened { weapon, arrows });
        spawn_chest(state);
    }
}

/// Keep facing the locked target; drop the lock if it died or got away
fn track_lock(state: &mut GameState) {
    let Some(id) = state.player.locked_target else {
        return;
    };
    let target = state
        .registry
        .enemy(id)
        .filter(|e| e.alive)
        .map(|e| e.pos);

    let release = state.tuning.lock_on_distance + state.tuning.lock_on_release_margin;
    match target {
        Some(pos) if horizontal_distance(state.player.pos, pos) <= release => {
            let yaw = heading_to(state.player.pos, pos);
            state.player.facing =
                lerp_angle(state.player.facing, yaw, state.tuning.facing_lerp_aim);
        }
        _ => {
            state.player.locked_target = None;
            log::debug!("Lock on {:?} lost", id);
            state.emit(FrameEvent::LockChanged { target: None });
        }
    }
}

/// Run the player stage of a step
pub fn update_player(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        return;
    }

    if input.lock_on {
        toggle_lock_on(state);
    }
    if input.switch_weapon {
        switch_weapon(state);
    }
    if input.attack {
        try_attack(state);
    }

    // Non-finite camera angles fall back to the default view
    let camera_yaw = Some(input.camera_yaw).filter(|a| a.is_finite()).unwrap_or(0.0);
    let camera_pitch = Some(input.camera_pitch).filter(|a| a.is_finite()).unwrap_or(0.0);

    let tuning = &state.tuning;
    let player = &mut state.player;

    // Movement
    match camera_relative(input.move_forward, input.move_right, camera_yaw) {
        Some(dir) => {
            player.velocity = dir * tuning.player_speed;
            player.pos += player.velocity;
            let heading = dir.x.atan2(dir.z);
            player.facing = lerp_angle(player.facing, heading, tuning.facing_lerp_move);
            player.walk_phase += tuning.player_speed;
        }
        None => {
            player.velocity = Vec3::ZERO;
            // Aim over the shoulder when the bow is out or a target is locked
            if player.weapon == Weapon::Ranged || player.locked_target.is_some() {
                let reverse = camera_yaw + std::f32::consts::PI;
                player.facing = lerp_angle(player.facing, reverse, tuning.facing_lerp_aim);
            }
        }
    }

    // Invisible walls
    let limit = tuning.arena_half_extent();
    player.pos.x = player.pos.x.clamp(-limit, limit);
    player.pos.z = player.pos.z.clamp(-limit, limit);

    collect_chests(state);
    track_lock(state);
    advance_attack(state, aim_direction(camera_yaw, camera_pitch));
}
