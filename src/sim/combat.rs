//! Combat resolution
//!
//! Melee cone checks, arrow flight and hit-testing, damage, knockback, death,
//! and the spark/smoke particles combat leaves behind.

use glam::Vec3;
use rand::Rng;

use super::events::FrameEvent;
use super::schedule::TimerKey;
use super::state::{EnemyId, GamePhase, GameState, Particle, ParticleKind, Projectile};
use crate::{facing_vector, flat};

/// Swing the sword along the player's facing. Every living enemy inside the
/// range and forward cone is hit. Returns how many were hit.
pub fn melee_swing(state: &mut GameState) -> usize {
    let forward = facing_vector(state.player.facing);
    let origin = state.player.pos;
    let range = state.tuning.attack_range;
    let cone = state.tuning.melee_cone_cos;

    let targets: Vec<EnemyId> = state
        .registry
        .living_enemies()
        .filter(|e| {
            let to_enemy = flat(e.pos - origin);
            let dist = to_enemy.length();
            dist < range && forward.dot(to_enemy.normalize_or_zero()) > cone
        })
        .map(|e| e.id)
        .collect();

    let damage = state.tuning.sword_damage;
    for &id in &targets {
        damage_enemy(state, id, damage);
    }
    targets.len()
}

/// Release an arrow from shoulder height along `aim` (captured now, never re-aimed)
pub fn fire_arrow(state: &mut GameState, aim: Vec3) {
    let dir = aim.normalize_or_zero();
    if dir == Vec3::ZERO {
        return;
    }
    let projectile = Projectile {
        pos: state.player.pos + Vec3::Y * state.tuning.arrow_spawn_height,
        vel: dir * state.tuning.arrow_speed,
        life: state.tuning.arrow_lifetime,
    };
    state.registry.add_projectile(projectile);
    state.emit(FrameEvent::ProjectileFired);
}

/// Advance every arrow one frame. An arrow dies on its first living-enemy
/// hit or when its lifetime runs out, whichever comes first.
pub fn step_projectiles(state: &mut GameState) {
    let torso = Vec3::Y * state.tuning.enemy_torso_height;
    let hit_radius = state.tuning.arrow_hit_radius;
    let damage = state.tuning.arrow_damage;

    let mut i = 0;
    while i < state.registry.projectiles.len() {
        let p = &mut state.registry.projectiles[i];
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
        let pos = p.pos;
        let expired = p.life == 0;

        let hit = state
            .registry
            .living_enemies()
            .find(|e| (e.pos + torso).distance(pos) < hit_radius)
            .map(|e| e.id);
        if let Some(id) = hit {
            damage_enemy(state, id, damage);
        }

        if hit.is_some() || expired {
            state.registry.projectiles.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Apply damage to an enemy. Returns true if this hit killed it.
///
/// Dead or missing enemies are ignored.
pub fn damage_enemy(state: &mut GameState, id: EnemyId, amount: i32) -> bool {
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    let Some(enemy) = state.registry.enemy_mut(id) else {
        return false;
    };
    if !enemy.alive {
        return false;
    }

    enemy.health = (enemy.health - amount).clamp(0, enemy.max_health);
    enemy.health_bar_timer = tuning.health_bar_duration;
    let away = flat(enemy.pos - player_pos).normalize_or_zero();
    enemy.knockback += away * tuning.knockback_force;

    let remaining = enemy.health;
    let hit_pos = enemy.pos;
    let (flash, marker) = (tuning.hit_flash_frames, tuning.hit_marker_frames);

    state.scheduler.schedule(TimerKey::HitFlash(id), state.frame, flash);
    state.scheduler.schedule(TimerKey::HitMarker, state.frame, marker);
    emit_sparks(state, hit_pos);
    state.emit(FrameEvent::EnemyHit {
        id,
        damage: amount,
        remaining,
    });

    if remaining == 0 {
        kill_enemy(state, id);
        return true;
    }
    false
}

/// Mark an enemy dead and queue its removal after the fall-over delay
fn kill_enemy(state: &mut GameState, id: EnemyId) {
    let Some(enemy) = state.registry.enemy_mut(id) else {
        return;
    };
    enemy.alive = false;
    enemy.knockback = Vec3::ZERO;
    enemy.locked = false;
    let boss = enemy.is_boss;

    state
        .scheduler
        .schedule(TimerKey::Removal(id), state.frame, state.tuning.removal_delay_frames);
    if state.player.locked_target == Some(id) {
        state.player.locked_target = None;
        state.emit(FrameEvent::LockChanged { target: None });
    }
    log::debug!("Enemy {:?} killed (boss={})", id, boss);
    state.emit(FrameEvent::EnemyKilled { id, boss });
}

/// Damage the player. Reaching zero health ends the run.
pub fn damage_player(state: &mut GameState, amount: i32) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    let max = state.tuning.max_player_health;
    state.player.health = (state.player.health - amount).clamp(0, max);
    state
        .scheduler
        .schedule(TimerKey::HurtFlash, state.frame, state.tuning.hurt_flash_frames);
    state.emit(FrameEvent::PlayerDamaged {
        amount,
        remaining: state.player.health,
    });

    if state.player.health == 0 {
        state.phase = GamePhase::GameOver;
        state.player.attack = None;
        log::info!("Game over after {} kills", state.kills);
        state.emit(FrameEvent::GameOver { kills: state.kills });
    }
}

/// Burst of gravity-affected sparks at a struck enemy
pub fn emit_sparks(state: &mut GameState, at: Vec3) {
    let origin = at + Vec3::Y;
    for _ in 0..state.tuning.spark_count {
        let rng = &mut state.fx_rng;
        let vel = Vec3::new(
            (rng.random::<f32>() - 0.5) * 0.2,
            rng.random::<f32>() * 0.2,
            (rng.random::<f32>() - 0.5) * 0.2,
        );
        state.registry.add_particle(Particle {
            kind: ParticleKind::Spark,
            pos: origin,
            vel,
            life: 1.0,
            size: 1.0,
        });
    }
}

/// Rising smoke left behind when a body is removed
pub fn emit_smoke(state: &mut GameState, at: Vec3, boss: bool) {
    let (count, scale, spread, lift) = if boss {
        (state.tuning.boss_smoke_count, 2.0, 0.3, 0.4)
    } else {
        (state.tuning.smoke_count, 1.0, 0.1, 0.15)
    };
    let origin = at + Vec3::Y * (0.5 * scale);
    for _ in 0..count {
        let rng = &mut state.fx_rng;
        let vel = Vec3::new(
            (rng.random::<f32>() - 0.5) * spread,
            rng.random::<f32>() * lift,
            (rng.random::<f32>() - 0.5) * spread,
        );
        state.registry.add_particle(Particle {
            kind: ParticleKind::Smoke,
            pos: origin,
            vel,
            life: 1.0,
            size: scale,
        });
    }
}

/// Move, accelerate and age particles; drop the expired ones
pub fn step_particles(state: &mut GameState) {
    let decay = state.tuning.particle_decay;
    let gravity = state.tuning.spark_gravity;
    let damping = state.tuning.smoke_damping;

    for p in state.registry.particles.iter_mut() {
        p.pos += p.vel;
        match p.kind {
            ParticleKind::Smoke => p.vel.y *= damping,
            ParticleKind::Spark => p.vel.y -= gravity,
        }
        p.life -= decay;
    }
    state.registry.particles.retain(|p| p.life > 0.0);
}
