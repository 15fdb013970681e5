//! Entity registry
//!
//! Owns every enemy, projectile, particle and chest. Lists keep insertion
//! order so iteration is stable across a frame and across runs with the same
//! seed.

use super::state::{Chest, Enemy, EnemyId, Particle, Projectile};

/// Canonical entity lists
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub chests: Vec<Chest>,
    /// Next enemy ID
    next_enemy_id: u32,
}

impl Registry {
    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Remove an enemy, preserving the order of the rest
    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// Enemies counted against the population floor (dying ones included)
    #[inline]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn boss_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_boss).count()
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn add_chest(&mut self, chest: Chest) {
        self.chests.push(chest);
    }

    pub fn remove_chest(&mut self, index: usize) -> Option<Chest> {
        (index < self.chests.len()).then(|| self.chests.remove(index))
    }

    /// Drop enemies, projectiles and particles; chests stay in the world
    pub fn clear_combatants(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
    }
}
