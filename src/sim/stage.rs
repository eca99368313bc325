//! Stage/phase state machine
//!
//! Phase changes happen in two ways. The tick evaluates timed and
//! input-driven conditions through [`evaluate`], and the spawner and
//! collision resolver raise [`PhaseSignal`]s through [`apply_signal`].

use serde::{Deserialize, Serialize};

use super::boss;
use super::state::{GameEvent, GameState};
use super::tick::TickInput;

/// Current game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Timed interstitial between stages; nothing moves
    Transition,
    /// Gameplay with the boss on screen
    Boss,
    /// Run won
    Clear,
    /// Run lost
    GameOver,
}

impl GamePhase {
    /// Phases in which gameplay entities are simulated
    pub fn is_simulating(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Boss)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Clear | GamePhase::GameOver)
    }
}

/// Inputs to the state machine raised during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    /// Confirm key pressed
    Confirm,
    /// The active stage ran out of time
    StageTimeUp,
    /// Score passed the boss threshold for the first time
    BossThresholdCrossed,
    /// Boss HP reached zero and cleanup has run
    BossDefeated,
    /// External "final stage cleared" flag
    StageCleared,
    /// Player HP reached zero
    PlayerDown,
}

/// Check timed and input-driven transitions at the top of a tick
pub fn evaluate(state: &mut GameState, input: &TickInput, pressed: &TickInput) {
    match state.phase {
        GamePhase::Start => {
            if pressed.confirm {
                apply_signal(state, PhaseSignal::Confirm);
            }
        }
        GamePhase::Playing => {
            if input.stage_clear {
                apply_signal(state, PhaseSignal::StageCleared);
            } else if stage_time_up(state) {
                apply_signal(state, PhaseSignal::StageTimeUp);
            }
        }
        GamePhase::Boss => {
            if input.stage_clear {
                apply_signal(state, PhaseSignal::StageCleared);
            }
        }
        GamePhase::Transition => {
            state.transition_ticks = state.transition_ticks.saturating_sub(1);
            if state.transition_ticks == 0 {
                let next = state.world.stage + 1;
                enter_stage(state, next);
                set_phase(state, GamePhase::Playing);
            }
        }
        GamePhase::Clear | GamePhase::GameOver => {}
    }
}

/// Whether the active stage has a successor and its timer has run out
fn stage_time_up(state: &GameState) -> bool {
    let has_next = state.world.stage < state.config.stages.len();
    has_next
        && state
            .stage_config()
            .duration_ticks
            .is_some_and(|limit| state.world.stage_ticks >= limit)
}

/// Apply a signal to the current phase. Signals that make no sense in the
/// current phase are ignored.
pub fn apply_signal(state: &mut GameState, signal: PhaseSignal) {
    match (state.phase, signal) {
        (GamePhase::Start, PhaseSignal::Confirm) => {
            log::info!("Run started (seed {})", state.seed);
            state.world.stage_ticks = 0;
            set_phase(state, GamePhase::Playing);
        }
        (GamePhase::Playing, PhaseSignal::StageTimeUp) => {
            state.transition_ticks = state.config.transition_ticks;
            set_phase(state, GamePhase::Transition);
        }
        (GamePhase::Playing, PhaseSignal::BossThresholdCrossed) => {
            boss::spawn_boss(state);
            set_phase(state, GamePhase::Boss);
        }
        (GamePhase::Boss, PhaseSignal::BossDefeated) => {
            let next = if state.config.boss.final_encounter {
                GamePhase::Clear
            } else {
                GamePhase::Playing
            };
            set_phase(state, next);
        }
        (GamePhase::Playing | GamePhase::Boss, PhaseSignal::StageCleared) => {
            set_phase(state, GamePhase::Clear);
        }
        (GamePhase::Playing | GamePhase::Boss, PhaseSignal::PlayerDown) => {
            set_phase(state, GamePhase::GameOver);
        }
        (phase, signal) => {
            log::debug!("Ignoring {:?} in {:?}", signal, phase);
        }
    }
}

/// Load stage parameters for a 1-based stage id.
///
/// Recomputes the ground line, clears the previous stage's enemies,
/// re-derives the jump cap from the held status item and puts the player
/// back on the ground.
pub fn enter_stage(state: &mut GameState, stage: usize) {
    let Some(cfg) = state.config.stage(stage) else {
        log::warn!("Stage {} is not configured, staying on {}", stage, state.world.stage);
        return;
    };
    let ground_y = state.assets.ground_y(&cfg.background);

    state.world.stage = stage;
    state.world.ground_y = ground_y;
    state.world.stage_ticks = 0;
    state.world.background_offset = 0;
    state.registry.enemies.clear();

    let base = state.config.player.base_max_jump;
    let cap = state.inventory.derived_max_jump(&state.config.items, base);
    let player = &mut state.player;
    player.set_max_jump(cap);
    player.rect.set_bottom(ground_y);
    player.vel.y = 0.0;
    player.jump_count = 0;

    log::info!("Entered stage {} (ground_y {}, max_jump {})", stage, ground_y, cap);
    state.push_event(GameEvent::StageEntered { stage });
}

fn set_phase(state: &mut GameState, to: GamePhase) {
    let from = state.phase;
    if from == to {
        return;
    }
    log::info!("Phase {:?} -> {:?}", from, to);
    state.phase = to;
    state.push_event(GameEvent::PhaseChanged { from, to });
}
