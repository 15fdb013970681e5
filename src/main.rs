//! Arena Duel headless runner
//!
//! Builds a world, drives it through a scripted demo and prints the final
//! snapshot as JSON. Usage: `arena-duel [tuning.json] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
use arena_duel::consts::{DEFAULT_SEED, FRAME_RATE};
#[cfg(not(target_arch = "wasm32"))]
use arena_duel::sim::{GameState, TickInput, restart, tick};
#[cfg(not(target_arch = "wasm32"))]
use arena_duel::Tuning;

/// Length of the scripted demo in frames
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAMES: u64 = 600;

/// Scripted intent for a demo frame: wander, swing, then switch to the bow
/// and lock on to whatever is close
#[cfg(not(target_arch = "wasm32"))]
fn demo_input(frame: u64, player_pos: glam::Vec3) -> TickInput {
    let camera_yaw = frame as f32 * 0.004;
    // Orbit camera trailing behind the player
    let behind = glam::Vec3::new(camera_yaw.sin(), 0.0, camera_yaw.cos()) * 7.0;
    let camera_pos = player_pos + behind + glam::Vec3::Y * 2.8;
    let mut input = TickInput {
        camera_yaw,
        camera_pitch: 0.05,
        camera_pos,
        ..Default::default()
    };

    match frame {
        0..=179 => {
            input.move_forward = 1.0;
            input.attack = frame % 30 == 0;
        }
        180 => input.switch_weapon = true,
        181..=359 => {
            input.move_right = if (frame / 60) % 2 == 0 { 1.0 } else { -1.0 };
            input.lock_on = frame == 200;
            input.attack = frame % 20 == 0;
        }
        360 => input.switch_weapon = true,
        _ => {
            input.move_forward = -1.0;
            input.attack = frame % 15 == 0;
        }
    }
    input
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Duel (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}", path, e);
            None
        }
    });
    let tuning = Tuning::load_or_default(tuning_json.as_deref());

    let seed = args
        .next()
        .and_then(|s| match s.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Invalid seed {:?} ({}), using default", s, e);
                None
            }
        })
        .unwrap_or(DEFAULT_SEED);

    let mut state = GameState::new(tuning, seed);
    log::info!("Game initialized with seed: {}", seed);

    for frame in 0..DEMO_FRAMES {
        let input = demo_input(frame, state.player.pos);
        tick(&mut state, &input);

        if state.is_game_over() {
            log::info!("Player fell at frame {}, restarting", state.frame);
            restart(&mut state);
        }
        if (frame + 1) % u64::from(FRAME_RATE) == 0 {
            log::debug!(
                "t={}s hp={} kills={} enemies={} arrows={}",
                (frame + 1) / u64::from(FRAME_RATE),
                state.player.health,
                state.kills,
                state.registry.enemy_count(),
                state.player.arrows
            );
        }
    }

    log::info!(
        "Demo finished: {} frames, {} kills, {} health",
        state.frame,
        state.kills,
        state.player.health
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no standalone web entry point
}
