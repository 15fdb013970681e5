//! Data-driven game balance
//!
//! Every speed, damage, range, timer and population cap the simulation reads
//! lives in [`Tuning`]. The defaults are the shipped balance; a JSON document
//! can override any subset of fields.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Stats for one kind of enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub max_health: i32,
    /// Units per frame while chasing
    pub speed: f32,
    /// Damage dealt when a charged attack lands
    pub damage: i32,
    /// Visual size multiplier
    pub scale: f32,
}

impl EnemyArchetype {
    fn new(name: &str, max_health: i32, speed: f32, damage: i32, scale: f32) -> Self {
        Self {
            name: name.to_string(),
            max_health,
            speed,
            damage,
            scale,
        }
    }
}

/// Immutable configuration record, fixed when a [`crate::sim::GameState`] is created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Units per frame
    pub player_speed: f32,
    pub player_radius: f32,
    pub max_player_health: i32,
    pub starting_arrows: u32,
    pub player_spawn: Vec3,
    /// Facing smoothing while moving
    pub facing_lerp_move: f32,
    /// Facing smoothing while aiming or locked on
    pub facing_lerp_aim: f32,

    // === Attacks ===
    /// Attack progress gained per frame (0..1)
    pub attack_progress_step: f32,
    /// Bow release window, as attack progress
    pub ranged_release_start: f32,
    pub ranged_release_end: f32,
    pub attack_range: f32,
    /// Minimum facing·direction dot product for a melee hit
    pub melee_cone_cos: f32,
    pub sword_damage: i32,
    pub arrow_damage: i32,
    pub arrow_speed: f32,
    /// Frames an arrow lives before despawning
    pub arrow_lifetime: u32,
    pub arrow_spawn_height: f32,
    pub arrow_hit_radius: f32,
    /// Height of the point arrows are tested against
    pub enemy_torso_height: f32,
    pub knockback_force: f32,
    /// Multiplier applied to knockback velocity every frame
    pub knockback_friction: f32,

    // === Lock-on ===
    pub lock_on_distance: f32,
    pub lock_on_release_margin: f32,

    // === Enemy AI ===
    pub detection_range: f32,
    pub detection_release_margin: f32,
    pub enemy_engage_distance: f32,
    pub enemy_hit_distance: f32,
    pub enemy_charge_time: f32,
    pub enemy_recover_time: f32,
    /// AI timer gained per frame
    pub enemy_timer_step: f32,
    pub enemy_turn_lerp: f32,
    pub enemy_radius: f32,
    pub health_bar_duration: f32,
    pub health_bar_decay: f32,
    pub archetypes: Vec<EnemyArchetype>,
    pub boss: EnemyArchetype,

    // === Arena & population ===
    /// Full side length of the square arena
    pub map_size: f32,
    pub max_enemies: usize,
    pub kills_for_boss: u32,
    /// Fraction of the arena used for spawn placement
    pub spawn_spread: f32,
    /// Minimum distance from the player for new enemies
    pub spawn_clearance: f32,
    pub spawn_attempts: u32,

    // === Loot ===
    pub chest_count: usize,
    pub chest_radius: f32,
    pub pickup_distance: f32,
    pub chest_bow_chance: f64,
    pub chest_ammo_min: u32,
    pub chest_ammo_max: u32,

    // === World scatter ===
    pub obstacle_attempts: u32,
    pub obstacle_spread: f32,
    pub obstacle_clear_zone: f32,
    pub tree_radius: f32,
    pub tree_chance: f64,

    // === Particles ===
    pub spark_count: usize,
    pub smoke_count: usize,
    pub boss_smoke_count: usize,
    pub particle_decay: f32,
    pub spark_gravity: f32,
    pub smoke_damping: f32,

    // === Deferred effects (frames) ===
    pub hit_flash_frames: u64,
    pub removal_delay_frames: u64,
    pub hit_marker_frames: u64,
    pub hurt_flash_frames: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 0.15,
            player_radius: 0.6,
            max_player_health: 100,
            starting_arrows: 10,
            player_spawn: Vec3::new(0.0, 0.0, 5.0),
            facing_lerp_move: 0.15,
            facing_lerp_aim: 0.1,

            attack_progress_step: 0.08,
            ranged_release_start: 0.8,
            ranged_release_end: 0.95,
            attack_range: 3.5,
            melee_cone_cos: 0.5,
            sword_damage: 25,
            arrow_damage: 35,
            arrow_speed: 0.8,
            arrow_lifetime: 150,
            arrow_spawn_height: 1.4,
            arrow_hit_radius: 1.0,
            enemy_torso_height: 1.0,
            knockback_force: 1.5,
            knockback_friction: 0.9,

            lock_on_distance: 25.0,
            lock_on_release_margin: 5.0,

            detection_range: 20.0,
            detection_release_margin: 5.0,
            enemy_engage_distance: 2.5,
            enemy_hit_distance: 3.0,
            enemy_charge_time: 1.5,
            enemy_recover_time: 1.0,
            enemy_timer_step: 0.05,
            enemy_turn_lerp: 0.1,
            enemy_radius: 0.6,
            health_bar_duration: 2.0,
            health_bar_decay: 0.02,
            archetypes: vec![
                EnemyArchetype::new("Blocky Stalker", 60, 0.1, 10, 0.8),
                EnemyArchetype::new("Stone Crusher", 150, 0.04, 25, 1.4),
                EnemyArchetype::new("Void Spinner", 80, 0.07, 15, 1.0),
            ],
            boss: EnemyArchetype::new("Ancient Ruler", 300, 0.05, 35, 2.5),

            map_size: 250.0,
            max_enemies: 10,
            kills_for_boss: 5,
            spawn_spread: 0.8,
            spawn_clearance: 15.0,
            spawn_attempts: 64,

            chest_count: 20,
            chest_radius: 1.2,
            pickup_distance: 1.5,
            chest_bow_chance: 0.6,
            chest_ammo_min: 15,
            chest_ammo_max: 24,

            obstacle_attempts: 150,
            obstacle_spread: 0.9,
            obstacle_clear_zone: 5.0,
            tree_radius: 0.8,
            tree_chance: 0.6,

            spark_count: 8,
            smoke_count: 12,
            boss_smoke_count: 30,
            particle_decay: 0.02,
            spark_gravity: 0.005,
            smoke_damping: 0.98,

            hit_flash_frames: 12,
            removal_delay_frames: 30,
            hit_marker_frames: 9,
            hurt_flash_frames: 6,
        }
    }
}

impl Tuning {
    /// Half the arena side; entities are clamped to ±this on x and z
    #[inline]
    pub fn arena_half_extent(&self) -> f32 {
        self.map_size / 2.0
    }

    /// Parse a JSON document (missing keys keep their defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from JSON if given, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.archetypes.is_empty() {
            return invalid("archetypes", "at least one enemy archetype is required");
        }
        if self.max_enemies == 0 {
            return invalid("max_enemies", "must be at least 1");
        }
        if self.kills_for_boss == 0 {
            return invalid("kills_for_boss", "must be at least 1");
        }
        if !(self.map_size.is_finite() && self.map_size > 0.0) {
            return invalid("map_size", "must be positive");
        }
        if self.max_player_health <= 0 {
            return invalid("max_player_health", "must be positive");
        }

        let non_negative = [
            ("player_speed", self.player_speed),
            ("player_radius", self.player_radius),
            ("enemy_radius", self.enemy_radius),
            ("arrow_speed", self.arrow_speed),
            ("attack_range", self.attack_range),
            ("knockback_force", self.knockback_force),
            ("pickup_distance", self.pickup_distance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(field, "must be finite and non-negative");
            }
        }
        if self.sword_damage < 0 {
            return invalid("sword_damage", "must be non-negative");
        }
        if self.arrow_damage < 0 {
            return invalid("arrow_damage", "must be non-negative");
        }
        for archetype in self.archetypes.iter().chain(std::iter::once(&self.boss)) {
            if archetype.damage < 0 {
                return invalid("archetypes.damage", "must be non-negative");
            }
            if archetype.max_health <= 0 {
                return invalid("archetypes.max_health", "must be positive");
            }
            if !(archetype.speed.is_finite() && archetype.speed >= 0.0) {
                return invalid("archetypes.speed", "must be finite and non-negative");
            }
        }

        if !(self.attack_progress_step > 0.0 && self.attack_progress_step <= 1.0) {
            return invalid("attack_progress_step", "must be in (0, 1]");
        }
        if self.ranged_release_start >= self.ranged_release_end {
            return invalid("ranged_release_start", "must be before ranged_release_end");
        }
        if self.ranged_release_end > 1.0 {
            return invalid("ranged_release_end", "must not exceed 1");
        }
        if self.ranged_release_end - self.ranged_release_start < self.attack_progress_step {
            return invalid(
                "ranged_release_end",
                "release window is narrower than one frame of progress",
            );
        }
        if !(0.0..1.0).contains(&self.knockback_friction) {
            return invalid("knockback_friction", "must be in [0, 1)");
        }
        if self.chest_ammo_min > self.chest_ammo_max {
            return invalid("chest_ammo_min", "must not exceed chest_ammo_max");
        }
        if !(0.0..=1.0).contains(&self.chest_bow_chance) || !(0.0..=1.0).contains(&self.tree_chance)
        {
            return invalid("chest_bow_chance", "probabilities must be in [0, 1]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().arena_half_extent(), 125.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_enemies": 3, "sword_damage": 40 }"#).unwrap();
        assert_eq!(tuning.max_enemies, 3);
        assert_eq!(tuning.sword_damage, 40);
        assert_eq!(tuning.arrow_damage, 35);
        assert_eq!(tuning.archetypes.len(), 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "kills_for_boss": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "kills_for_boss",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "archetypes": [] }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "archetypes", .. }));

        let err = Tuning::from_json(r#"{ "sword_damage": -40 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));

        let mut tuning = Tuning::default();
        tuning.boss.damage = -1;
        assert!(tuning.validate().is_err());

        let err = Tuning::from_json(r#"{ "ranged_release_end": 0.82 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let tuning = Tuning::load_or_default(Some(r#"{ "max_enemies": 0 }"#));
        assert_eq!(tuning.max_enemies, 10);
        let tuning = Tuning::load_or_default(None);
        assert_eq!(tuning.max_player_health, 100);
    }
}
