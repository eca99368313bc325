//! Game state and core simulation types
//!
//! Everything the core owns lives in [`GameState`]. Collaborators get
//! read-only [`super::Snapshot`]s between ticks.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entity::{Player, Registry};
use super::inventory::{Inventory, ItemId};
use super::stage::GamePhase;
use super::tick::TickInput;
use crate::assets::{AssetError, Assets, BuiltinSprites, SpriteResolver};
use crate::config::{ConfigError, GameConfig, StageConfig};
use crate::consts::DEFAULT_GROUND_Y;

/// Screen bounds, ground line and clocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub width: i32,
    pub height: i32,
    /// Walkable surface of the active stage; only changes on stage load
    pub ground_y: i32,
    /// 1-based stage id
    pub stage: usize,
    /// Simulated ticks since the run started
    pub time_ticks: u64,
    /// Ticks since the current stage was entered
    pub stage_ticks: u64,
    /// Horizontal scroll of the background, in `[0, width)`
    pub background_offset: i32,
}

impl WorldState {
    pub fn new(width: i32, height: i32, ground_y: i32) -> Self {
        Self {
            width,
            height,
            ground_y,
            stage: 1,
            time_ticks: 0,
            stage_ticks: 0,
            background_offset: 0,
        }
    }

    /// Advance the clocks after a simulated tick
    pub fn advance(&mut self, background_speed: i32) {
        self.time_ticks += 1;
        self.stage_ticks += 1;
        if self.width > 0 {
            self.background_offset = (self.background_offset + background_speed).rem_euclid(self.width);
        }
    }
}

/// Things that happened during a tick, for audio/HUD collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { id: u32, reward: u64 },
    ItemPicked { item: ItemId },
    PlayerDamaged { damage: u32, hp: u32 },
    BossSpawned { hp: i32 },
    BossDamaged { damage: i32, hp: i32 },
    BossDefeated { bonus: u64 },
    StageEntered { stage: usize },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub assets: Assets,
    pub world: WorldState,
    pub phase: GamePhase,
    pub player: Player,
    pub inventory: Inventory,
    pub registry: Registry,
    /// Active boss, if any
    pub boss: Option<Boss>,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    /// Never decreases
    pub score: u64,
    /// Ticks left on the HUD damage popup
    pub damage_popup_ticks: u32,
    /// Ticks left in the stage interstitial
    pub transition_ticks: u32,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Key state of the previous tick (for press detection)
    pub(crate) prev_input: TickInput,
    next_id: u32,
}

impl GameState {
    /// Create a run waiting on the start screen.
    ///
    /// `assets` must have been resolved from `config`. An invalid config is
    /// rejected here rather than panicking mid-run.
    pub fn new(config: GameConfig, assets: Assets, seed: u64) -> Result<Self, InitError> {
        config.validate()?;
        Ok(Self::build(config, assets, seed))
    }

    fn build(config: GameConfig, assets: Assets, seed: u64) -> Self {
        let ground_y = config
            .stages
            .first()
            .map_or(DEFAULT_GROUND_Y, |s| assets.ground_y(&s.background));
        let world = WorldState::new(config.screen_width, config.screen_height, ground_y);
        let player = Player::new(
            &config.player,
            assets.size(&config.player.sprite),
            config.player.start_x,
            ground_y,
        );

        Self {
            config,
            assets,
            world,
            phase: GamePhase::Start,
            player,
            inventory: Inventory::default(),
            registry: Registry::default(),
            boss: None,
            boss_spawned: false,
            boss_defeated: false,
            score: 0,
            damage_popup_ticks: 0,
            transition_ticks: 0,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            prev_input: TickInput::default(),
            next_id: 1,
        }
    }

    /// Validate `config`, resolve sprites with `resolver` and create the run.
    ///
    /// Fails before any simulation state exists when the config is invalid
    /// or a sprite is missing.
    pub fn resolve(
        config: GameConfig,
        resolver: &dyn SpriteResolver,
        seed: u64,
    ) -> Result<Self, InitError> {
        config.validate()?;
        let assets = Assets::resolve(&config, resolver)?;
        Ok(Self::build(config, assets, seed))
    }

    /// Create a run using the built-in sprite table
    pub fn with_builtin_sprites(config: GameConfig, seed: u64) -> Result<Self, InitError> {
        Self::resolve(config, &BuiltinSprites, seed)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Parameters of the active stage
    pub fn stage_config(&self) -> &StageConfig {
        // stage ids are only ever set from indices into `config.stages`
        &self.config.stages[self.world.stage - 1]
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Startup failures; the run never starts when one is returned
#[derive(Debug)]
pub enum InitError {
    Config(ConfigError),
    Asset(AssetError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Config(e) => write!(f, "{}", e),
            InitError::Asset(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Config(e) => Some(e),
            InitError::Asset(e) => Some(e),
        }
    }
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

impl From<AssetError> for InitError {
    fn from(e: AssetError) -> Self {
        InitError::Asset(e)
    }
}
