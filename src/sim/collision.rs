//! Circle collision detection and response on the ground plane
//!
//! Player, enemies and obstacles are all circles in x/z. Movable pairs split
//! the correction evenly; obstacles never move. Vertical coordinates are left
//! alone until the final ground clamp.

use glam::Vec3;

use super::state::{Enemy, GameState, Obstacle};
use crate::consts::GROUND_Y;
use crate::flat;

/// Overlaps smaller than this are treated as resting contact
pub const CONTACT_SLOP: f32 = 1e-4;

/// Result of an overlap test between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector on the ground plane pointing from `b` toward `a`
    pub normal: Vec3,
    /// How far the circles interpenetrate
    pub penetration: f32,
}

/// Check two ground-plane circles for overlap.
///
/// Returns `None` when they are apart, merely touching, or when the centers
/// coincide (no separation axis exists).
pub fn circle_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> Option<Contact> {
    let delta = flat(a - b);
    let dist_sq = delta.length_squared();
    if dist_sq <= f32::EPSILON {
        return None;
    }
    let dist = dist_sq.sqrt();
    let penetration = radius_a + radius_b - dist;
    if penetration <= CONTACT_SLOP {
        return None;
    }
    Some(Contact {
        normal: delta / dist,
        penetration,
    })
}

/// Push two movable circles apart, half the overlap each
fn separate_pair(a: &mut Vec3, radius_a: f32, b: &mut Vec3, radius_b: f32) -> bool {
    match circle_overlap(*a, radius_a, *b, radius_b) {
        Some(c) => {
            let push = c.normal * (c.penetration * 0.5);
            *a += push;
            *b -= push;
            true
        }
        None => false,
    }
}

/// Push a movable circle fully out of a static one
fn push_out_of(pos: &mut Vec3, radius: f32, obstacle: &Obstacle) -> bool {
    match circle_overlap(*pos, radius, obstacle.pos, obstacle.radius) {
        Some(c) => {
            *pos += c.normal * c.penetration;
            true
        }
        None => false,
    }
}

/// Enemy↔enemy pass over living enemies, each unordered pair once
fn separate_enemies(enemies: &mut [Enemy], radius: f32) -> usize {
    let mut resolved = 0;
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.alive {
            continue;
        }
        for b in tail.iter_mut().filter(|e| e.alive) {
            if separate_pair(&mut a.pos, radius, &mut b.pos, radius) {
                resolved += 1;
            }
        }
    }
    resolved
}

/// Resolve all overlaps for this frame. Returns the number of corrected pairs.
pub fn resolve_collisions(state: &mut GameState) -> usize {
    let player_radius = state.tuning.player_radius;
    let enemy_radius = state.tuning.enemy_radius;
    let player = &mut state.player;
    let enemies = &mut state.registry.enemies;
    let mut resolved = 0;

    // Player ↔ enemy
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        if separate_pair(&mut player.pos, player_radius, &mut enemy.pos, enemy_radius) {
            resolved += 1;
        }
    }

    // Enemy ↔ enemy
    resolved += separate_enemies(enemies, enemy_radius);

    // Movers ↔ obstacles
    for obstacle in &state.obstacles {
        if push_out_of(&mut player.pos, player_radius, obstacle) {
            resolved += 1;
        }
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if push_out_of(&mut enemy.pos, enemy_radius, obstacle) {
                resolved += 1;
            }
        }
    }

    // Ground clamp
    player.pos.y = GROUND_Y;
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.y = GROUND_Y;
    }

    resolved
}
