//! Game state and core simulation types

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::FrameEvent;
use super::registry::Registry;
use super::schedule::Scheduler;
use super::spawn;
use crate::tuning::{EnemyArchetype, Tuning};

/// Stream offset so visual effects never consume gameplay randomness
const FX_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Overall lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player died; only `restart` leaves this phase
    GameOver,
}

/// The two interchangeable weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    /// Sword: instant forward-cone swing
    Melee,
    /// Bow: timed draw, releases an arrow
    Ranged,
}

impl Weapon {
    pub fn toggled(self) -> Self {
        match self {
            Weapon::Melee => Weapon::Ranged,
            Weapon::Ranged => Weapon::Melee,
        }
    }
}

/// An attack animation in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Weapon the attack was started with
    pub weapon: Weapon,
    /// Normalized progress, 0..1
    pub progress: f32,
    /// Arrow already released during this draw
    pub released: bool,
}

/// The player record
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec3,
    /// Yaw in radians
    pub facing: f32,
    pub health: i32,
    pub weapon: Weapon,
    pub arrows: u32,
    pub attack: Option<Attack>,
    pub locked_target: Option<EnemyId>,
    /// Displacement applied this frame by movement intent
    pub velocity: Vec3,
    /// Walk cycle phase for limb swing
    pub walk_phase: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_spawn,
            facing: 0.0,
            health: tuning.max_player_health,
            weapon: Weapon::Melee,
            arrows: tuning.starting_arrows,
            attack: None,
            locked_target: None,
            velocity: Vec3::ZERO,
            walk_phase: 0.0,
        }
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    /// Normalized attack progress (0 when idle)
    #[inline]
    pub fn attack_progress(&self) -> f32 {
        self.attack.map_or(0.0, |a| a.progress)
    }
}

/// Stable enemy identity (never reused within a run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Enemy AI states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Standing still until the player is detected
    Idle,
    /// Turning toward and walking at the player
    Chase,
    /// Winding up; the strike resolves when the timer fills
    AttackCharge,
    /// Cooling down after a strike
    AttackRecover,
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    pub pos: Vec3,
    /// Yaw in radians
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    /// Units per frame
    pub speed: f32,
    pub damage: i32,
    pub scale: f32,
    pub state: AiState,
    pub state_timer: f32,
    /// Per-frame displacement, damped by friction
    pub knockback: Vec3,
    pub alive: bool,
    pub is_boss: bool,
    /// Health bar stays visible while positive
    pub health_bar_timer: f32,
    /// Mirrors the player's lock; kept in sync every frame
    pub locked: bool,
}

impl Enemy {
    pub fn new(id: EnemyId, pos: Vec3, archetype: &EnemyArchetype, is_boss: bool) -> Self {
        Self {
            id,
            name: archetype.name.clone(),
            pos,
            facing: 0.0,
            health: archetype.max_health,
            max_health: archetype.max_health,
            speed: archetype.speed,
            damage: archetype.damage,
            scale: archetype.scale,
            state: AiState::Idle,
            state_timer: 0.0,
            knockback: Vec3::ZERO,
            alive: true,
            is_boss,
            health_bar_timer: 0.0,
            locked: false,
        }
    }

    /// Health as a fraction of max, in [0, 1]
    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Whether the floating health bar should render
    #[inline]
    pub fn shows_health_bar(&self) -> bool {
        self.alive && (self.health_bar_timer > 0.0 || self.locked)
    }
}

/// An arrow in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec3,
    /// Per-frame displacement, fixed at release
    pub vel: Vec3,
    /// Frames remaining
    pub life: u32,
}

/// Particle flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Hit sparks, fall under gravity
    Spark,
    /// Death smoke, rises and slows
    Smoke,
}

/// A visual-only particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec3,
    pub vel: Vec3,
    /// 1.0 → 0.0
    pub life: f32,
    /// Base size (boss smoke is larger)
    pub size: f32,
}

/// What a chest grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestContents {
    MeleeWeaponUnlock,
    RangedWeaponUnlock { arrows: u32 },
}

impl ChestContents {
    pub fn weapon(&self) -> Weapon {
        match self {
            ChestContents::MeleeWeaponUnlock => Weapon::Melee,
            ChestContents::RangedWeaponUnlock { .. } => Weapon::Ranged,
        }
    }
}

/// A loot chest
#[derive(Debug, Clone)]
pub struct Chest {
    pub pos: Vec3,
    pub radius: f32,
    pub contents: ChestContents,
}

/// Static obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

/// A static, immovable obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec3,
    pub radius: f32,
    pub kind: ObstacleKind,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Immutable balance record
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn placement and loot rolls
    pub rng: Pcg32,
    /// Particle jitter only
    pub fx_rng: Pcg32,
    /// Simulation frame counter
    pub frame: u64,
    pub phase: GamePhase,
    pub kills: u32,
    pub boss_active: bool,
    pub player: Player,
    /// Enemies, projectiles, particles and chests
    pub registry: Registry,
    /// Static obstacles (read-only)
    pub obstacles: Vec<Obstacle>,
    /// Deferred effects
    pub scheduler: Scheduler,
    /// Last camera position reported by the host (billboards only)
    pub camera_pos: Vec3,
    /// Events raised during the last step
    pub events: Vec<FrameEvent>,
}

impl GameState {
    /// Create a new run with the default world scatter for this seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let obstacles = spawn::scatter_obstacles(&tuning, seed);
        Self::with_obstacles(tuning, seed, obstacles)
    }

    /// Create a new run around obstacles supplied by the world builder.
    ///
    /// `tuning` must already have passed [`Tuning::validate`];
    /// [`Tuning::from_json`] and [`Tuning::load_or_default`] guarantee that.
    pub fn with_obstacles(tuning: Tuning, seed: u64, obstacles: Vec<Obstacle>) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {:?}", tuning.validate());
        let player = Player::new(&tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
            frame: 0,
            phase: GamePhase::Playing,
            kills: 0,
            boss_active: false,
            player,
            registry: Registry::default(),
            obstacles,
            scheduler: Scheduler::default(),
            camera_pos: Vec3::ZERO,
            events: Vec::new(),
            tuning,
        };

        for _ in 0..state.tuning.chest_count {
            spawn::spawn_chest(&mut state);
        }
        spawn::populate_enemies(&mut state);

        log::info!(
            "Arena ready: seed={}, enemies={}, chests={}, obstacles={}",
            seed,
            state.registry.enemies.len(),
            state.registry.chests.len(),
            state.obstacles.len()
        );
        state
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Player health as a fraction of max, in [0, 1]
    #[inline]
    pub fn player_health_fraction(&self) -> f32 {
        (self.player.health as f32 / self.tuning.max_player_health as f32).clamp(0.0, 1.0)
    }

    pub(crate) fn emit(&mut self, event: FrameEvent) {
        self.events.push(event);
    }
}
