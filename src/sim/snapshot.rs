//! Read-only views of the simulation for presentation
//!
//! Built once per rendered frame after `tick`. Everything here is plain data
//! so a renderer, UI layer or the native runner can consume it without
//! touching `GameState`.

use glam::Vec3;
use serde::Serialize;

use super::ai::charge_progress;
use super::events::FrameEvent;
use super::schedule::TimerKey;
use super::state::{AiState, ChestContents, EnemyId, GamePhase, GameState, ParticleKind, Weapon};
use crate::heading_to;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec3,
    pub facing: f32,
    /// 0..=100
    pub health_percent: f32,
    pub weapon: Weapon,
    pub arrows: u32,
    pub attacking: bool,
    pub attack_progress: f32,
    pub locked_target: Option<EnemyId>,
    pub walk_phase: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub name: String,
    pub pos: Vec3,
    pub facing: f32,
    pub alive: bool,
    /// 0..=100
    pub health_percent: f32,
    pub show_health_bar: bool,
    /// Yaw that turns the health bar toward the camera
    pub health_bar_yaw: f32,
    pub boss: bool,
    pub scale: f32,
    pub state: AiState,
    /// Attack wind-up, 0..1
    pub charge: f32,
    /// Hit flash intensity, 0..1
    pub flash: f32,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec3,
    /// Unit direction of travel
    pub dir: Vec3,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub kind: ParticleKind,
    pub pos: Vec3,
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChestView {
    pub pos: Vec3,
    pub contents: ChestContents,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub game_over: bool,
    pub kills: u32,
    /// Kill tally shown on the game-over screen
    pub final_kills: Option<u32>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub chests: Vec<ChestView>,
    /// Crosshair hit marker intensity, 0..1
    pub hit_marker: f32,
    /// Player health bar hurt flash intensity, 0..1
    pub hurt_flash: f32,
    pub events: Vec<FrameEvent>,
}

impl GameState {
    /// Capture the current frame for presentation
    pub fn snapshot(&self) -> Snapshot {
        let t = &self.tuning;
        let now = self.frame;
        let game_over = self.is_game_over();

        let player = PlayerView {
            pos: self.player.pos,
            facing: self.player.facing,
            health_percent: self.player_health_fraction() * 100.0,
            weapon: self.player.weapon,
            arrows: self.player.arrows,
            attacking: self.player.is_attacking(),
            attack_progress: self.player.attack_progress(),
            locked_target: self.player.locked_target,
            walk_phase: self.player.walk_phase,
        };

        let enemies = self
            .registry
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                name: e.name.clone(),
                pos: e.pos,
                facing: e.facing,
                alive: e.alive,
                health_percent: e.health_fraction() * 100.0,
                show_health_bar: e.shows_health_bar(),
                health_bar_yaw: heading_to(e.pos, self.camera_pos),
                boss: e.is_boss,
                scale: e.scale,
                state: e.state,
                charge: charge_progress(e, t),
                flash: self
                    .scheduler
                    .remaining_fraction(TimerKey::HitFlash(e.id), now, t.hit_flash_frames),
                locked: e.locked,
            })
            .collect();

        let projectiles = self
            .registry
            .projectiles
            .iter()
            .map(|p| ProjectileView {
                pos: p.pos,
                dir: p.vel.normalize_or_zero(),
            })
            .collect();

        // Particles shrink and fade with their remaining life
        let particles = self
            .registry
            .particles
            .iter()
            .map(|p| {
                let life = p.life.clamp(0.0, 1.0);
                ParticleView {
                    kind: p.kind,
                    pos: p.pos,
                    opacity: life,
                    scale: p.size * life,
                }
            })
            .collect();

        let chests = self
            .registry
            .chests
            .iter()
            .map(|c| ChestView {
                pos: c.pos,
                contents: c.contents,
            })
            .collect();

        Snapshot {
            frame: now,
            phase: self.phase,
            game_over,
            kills: self.kills,
            final_kills: game_over.then_some(self.kills),
            player,
            enemies,
            projectiles,
            particles,
            chests,
            hit_marker: self
                .scheduler
                .remaining_fraction(TimerKey::HitMarker, now, t.hit_marker_frames),
            hurt_flash: self
                .scheduler
                .remaining_fraction(TimerKey::HurtFlash, now, t.hurt_flash_frames),
            events: self.events.clone(),
        }
    }
}
