//! Dungeon Dash headless runner
//!
//! Plays one scripted session without a window and prints the final
//! snapshot as JSON. Usage: `dungeon-dash [config.json] [seed] [max_ticks]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dungeon Dash (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use dungeon_dash::GameConfig;
    use dungeon_dash::consts::TICK_RATE;
    use dungeon_dash::sim::{GamePhase, GameState, Snapshot, TickFlow, TickInput, tick};

    /// Default session length: five minutes of game time
    const DEFAULT_MAX_TICKS: u64 = 5 * 60 * TICK_RATE as u64;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                GameConfig::from_json(&json)?
            }
            None => GameConfig::default(),
        };
        let seed = match args.next() {
            Some(s) => s.parse()?,
            None => 0x5eed,
        };
        let max_ticks = match args.next() {
            Some(s) => s.parse()?,
            None => DEFAULT_MAX_TICKS,
        };

        // Invalid configs and missing sprites abort here, before any state exists
        let mut state = GameState::with_builtin_sprites(config, seed)?;

        let mut frame: u64 = 0;
        while frame < max_ticks && !state.phase.is_terminal() {
            let input = autopilot(&state, frame);
            if tick(&mut state, &input) == TickFlow::Quit {
                break;
            }
            for event in &state.events {
                log::trace!("tick {}: {:?}", state.world.time_ticks, event);
            }
            frame += 1;
        }

        let snapshot = Snapshot::capture(&state);
        log::info!(
            "Session ended in {:?} after {} ticks: stage {}, score {}, hp {}",
            snapshot.phase,
            frame,
            snapshot.stage,
            snapshot.score,
            snapshot.hp
        );
        println!("{}", snapshot.to_json()?);
        Ok(())
    }

    /// Simple scripted player: confirms the title screen, jumps over
    /// whatever is about to hit it and keeps firing.
    fn autopilot(state: &GameState, frame: u64) -> TickInput {
        if state.phase == GamePhase::Start {
            // Release between presses so confirm registers as a press
            return TickInput {
                confirm: frame % 2 == 0,
                ..Default::default()
            };
        }

        let player = state.player.rect;
        let threat = state
            .registry
            .enemies
            .iter()
            .chain(&state.registry.boss_projectiles)
            .any(|e| {
                let ahead = e.rect.left() - player.right();
                (-20..=120).contains(&ahead) && e.rect.top() < player.bottom()
            });

        TickInput {
            left: player.left() > 400,
            right: player.left() < 120,
            jump: threat && frame % 2 == 0,
            attack: frame % 12 == 0,
            ..Default::default()
        }
    }
}
