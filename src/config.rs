//! Game balance tables
//!
//! Stage parameters, player physics, boss tuning and the item catalog.
//! Defaults reproduce the baseline two-stage game; any field can be
//! overridden from JSON.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::inventory::ItemCatalog;

/// Per-stage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Background sprite; also keys the stage's ground line
    pub background: String,
    pub ground_enemy_sprite: String,
    pub air_enemy_sprite: String,
    /// Background scroll (pixels per tick)
    pub background_speed: i32,
    /// Enemy leftward speed (pixels per tick)
    pub enemy_speed: i32,
    /// Item leftward speed (pixels per tick)
    pub item_speed: i32,
    /// Ticks between enemy spawn attempts
    pub spawn_interval: u64,
    /// Chance that an enemy spawn attempt succeeds
    pub enemy_spawn_probability: f64,
    /// Ticks between item spawn attempts
    pub item_spawn_interval: u64,
    /// Chance that an item spawn attempt succeeds
    pub item_spawn_probability: f64,
    /// Stage length before moving on; `None` keeps the stage running
    pub duration_ticks: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::stage_one()
    }
}

impl StageConfig {
    pub fn stage_one() -> Self {
        Self {
            background: "bg_1".into(),
            ground_enemy_sprite: "enemy_ground_1".into(),
            air_enemy_sprite: "enemy_air_1".into(),
            background_speed: 4,
            enemy_speed: 5,
            item_speed: 5,
            spawn_interval: 60,
            enemy_spawn_probability: 0.93,
            item_spawn_interval: 90,
            item_spawn_probability: 0.55,
            duration_ticks: Some(1500),
        }
    }

    pub fn stage_two() -> Self {
        Self {
            background: "bg_2".into(),
            ground_enemy_sprite: "enemy_ground_2".into(),
            air_enemy_sprite: "enemy_air_2".into(),
            background_speed: 6,
            enemy_speed: 5,
            item_speed: 7,
            spawn_interval: 45,
            enemy_spawn_probability: 0.93,
            item_spawn_interval: 70,
            item_spawn_probability: 0.65,
            duration_ticks: None,
        }
    }
}

/// Player physics and damage model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub sprite: String,
    pub start_x: i32,
    pub max_hp: u32,
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub base_max_jump: u8,
    pub contact_damage: u32,
    pub invulnerability_ticks: u32,
    pub blink_ticks: u32,
    pub damage_popup_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite: "player".into(),
            start_x: PLAYER_START_X,
            max_hp: PLAYER_MAX_HP,
            speed: PLAYER_SPEED,
            gravity: PLAYER_GRAVITY,
            jump_impulse: PLAYER_JUMP_IMPULSE,
            base_max_jump: BASE_MAX_JUMP,
            contact_damage: CONTACT_DAMAGE,
            invulnerability_ticks: INVULNERABILITY_TICKS,
            blink_ticks: DAMAGE_BLINK_TICKS,
            damage_popup_ticks: DAMAGE_POPUP_TICKS,
        }
    }
}

/// Boss encounter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub sprite: String,
    pub beam_sprite: String,
    pub meteor_sprite: String,
    /// Score that must be exceeded to summon the boss
    pub score_threshold: u64,
    pub hp: i32,
    /// Horizontal distance from the right edge to the boss centre
    pub right_offset: i32,
    /// Spawn centre height above the ground
    pub spawn_height: i32,
    /// Oscillation base line height above the ground
    pub hover_height: i32,
    pub amplitude: f32,
    /// Radians per tick
    pub angular_rate: f32,
    pub beam_interval: u32,
    pub beam_speed: f32,
    pub meteor_interval: u32,
    pub meteor_speed: f32,
    pub meteor_size: RangeInclusive<i32>,
    pub defeat_bonus: u64,
    /// Defeating the boss clears the game instead of resuming play
    pub final_encounter: bool,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            sprite: "boss".into(),
            beam_sprite: "boss_beam".into(),
            meteor_sprite: "meteor".into(),
            score_threshold: 500,
            hp: 500,
            right_offset: 150,
            spawn_height: 200,
            hover_height: 250,
            amplitude: 100.0,
            angular_rate: 0.05,
            beam_interval: 90,
            beam_speed: 15.0,
            meteor_interval: 120,
            meteor_speed: 6.0,
            meteor_size: 50..=150,
            defeat_bonus: 1000,
            final_encounter: false,
        }
    }
}

/// Scoring and visual-effect timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub kill_reward: RangeInclusive<u64>,
    pub explosion_sprite: String,
    pub enemy_explosion_ticks: u32,
    pub boss_explosion_ticks: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            kill_reward: 10..=20,
            explosion_sprite: "explosion".into(),
            enemy_explosion_ticks: ENEMY_EXPLOSION_TICKS,
            boss_explosion_ticks: BOSS_EXPLOSION_TICKS,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Ticks of the interstitial between stages
    pub transition_ticks: u32,
    pub stages: Vec<StageConfig>,
    pub player: PlayerConfig,
    pub boss: BossConfig,
    pub score: ScoreConfig,
    pub items: ItemCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            transition_ticks: 2 * TICK_RATE,
            stages: vec![StageConfig::stage_one(), StageConfig::stage_two()],
            player: PlayerConfig::default(),
            boss: BossConfig::default(),
            score: ScoreConfig::default(),
            items: ItemCatalog::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: {} stages, {} catalog items",
            config.stages.len(),
            config.items.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stage parameters for a 1-based stage id
    pub fn stage(&self, stage: usize) -> Option<&StageConfig> {
        stage.checked_sub(1).and_then(|i| self.stages.get(i))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(ConfigError::Invalid("screen size must be positive".into()));
        }
        if self.stages.is_empty() {
            return Err(ConfigError::Invalid("at least one stage is required".into()));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            let n = i + 1;
            if stage.spawn_interval == 0 || stage.item_spawn_interval == 0 {
                return Err(ConfigError::Invalid(format!(
                    "stage {n}: spawn intervals must be non-zero"
                )));
            }
            for (name, p) in [
                ("enemy_spawn_probability", stage.enemy_spawn_probability),
                ("item_spawn_probability", stage.item_spawn_probability),
            ] {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::Invalid(format!(
                        "stage {n}: {name} {p} is outside [0, 1]"
                    )));
                }
            }
        }
        if self.player.max_hp == 0 {
            return Err(ConfigError::Invalid("player max_hp must be positive".into()));
        }
        if self.boss.hp <= 0 {
            return Err(ConfigError::Invalid("boss hp must be positive".into()));
        }
        if self.boss.beam_interval == 0 || self.boss.meteor_interval == 0 {
            return Err(ConfigError::Invalid("boss attack intervals must be non-zero".into()));
        }
        if self.boss.meteor_size.is_empty() || self.score.kill_reward.is_empty() {
            return Err(ConfigError::Invalid("empty random range".into()));
        }
        if self.items.is_empty() {
            return Err(ConfigError::Invalid("item catalog is empty".into()));
        }
        if self.items.iter().all(|d| d.weight <= 0) {
            log::warn!("All item weights are <= 0; item spawns will always pick the first entry");
        }
        Ok(())
    }
}

/// Configuration loading failures
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types
    Parse(String),
    /// Well-formed but unusable values
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stages.len(), 2);
        assert_eq!(config.stage(1).map(|s| s.spawn_interval), Some(60));
        assert_eq!(config.stage(2).map(|s| s.spawn_interval), Some(45));
        assert!(config.stage(0).is_none());
        assert!(config.stage(3).is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "transition_ticks": 30, "boss": { "score_threshold": 100 } }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.transition_ticks, 30);
        assert_eq!(config.boss.score_threshold, 100);
        assert_eq!(config.boss.hp, 500);
        assert_eq!(config.stages.len(), 2);
    }

    #[test]
    fn test_stage_keys() {
        let json = r#"{
            "stages": [{
                "background_speed": 3,
                "enemy_speed": 9,
                "item_speed": 4,
                "spawn_interval": 30,
                "item_spawn_interval": 50,
                "item_spawn_probability": 0.5
            }]
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        let stage = config.stage(1).unwrap();
        assert_eq!(stage.enemy_speed, 9);
        assert_eq!(stage.item_spawn_interval, 50);
        // Unspecified keys fall back to stage-one values
        assert_eq!(stage.background, "bg_1");
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = GameConfig::default();
        config.stages[1].item_spawn_probability = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = GameConfig::default();
        config.stages[0].spawn_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_catalog_and_stages() {
        let json = r#"{ "items": [] }"#;
        assert!(matches!(GameConfig::from_json(json), Err(ConfigError::Invalid(_))));

        let json = r#"{ "stages": [] }"#;
        assert!(GameConfig::from_json(json).is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
