//! Sprite-size resolution
//!
//! The simulation never touches pixels. It only needs the rectangle size of
//! each sprite and the ground line of each stage background. Everything is
//! resolved once, before the first tick; a missing sprite is fatal.

use std::collections::HashMap;
use std::fmt;

use glam::IVec2;

use crate::config::GameConfig;
use crate::consts::DEFAULT_GROUND_Y;
use crate::sim::inventory::ItemId;

/// Maps logical sprite names to pixel dimensions
pub trait SpriteResolver {
    /// Unscaled sprite size, or `None` when the sprite cannot be found
    fn sprite_size(&self, name: &str) -> Option<IVec2>;

    /// Walkable surface of a background, when the resolver knows it
    fn ground_line(&self, _background: &str) -> Option<i32> {
        None
    }
}

/// Sizes baked into the binary for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSprites;

impl SpriteResolver for BuiltinSprites {
    fn sprite_size(&self, name: &str) -> Option<IVec2> {
        let (w, h) = match name {
            "player" => (72, 72),
            "enemy_ground_1" => (48, 48),
            "enemy_air_1" => (56, 40),
            "enemy_ground_2" => (52, 52),
            "enemy_air_2" => (60, 44),
            "beam" => (60, 20),
            "arrow" => (300, 100),
            "mushroom" => (500, 500),
            "tobacco" => (1500, 1500),
            "boss" => (300, 300),
            "boss_beam" => (200, 80),
            "meteor" => (100, 100),
            "explosion" => (64, 64),
            "bg_1" | "bg_2" => (crate::consts::SCREEN_WIDTH, crate::consts::SCREEN_HEIGHT),
            _ => return None,
        };
        Some(IVec2::new(w, h))
    }

    fn ground_line(&self, background: &str) -> Option<i32> {
        match background {
            "bg_1" => Some(DEFAULT_GROUND_Y),
            "bg_2" => Some(DEFAULT_GROUND_Y - 15),
            _ => None,
        }
    }
}

/// Resolved sprite sizes and per-background ground lines
#[derive(Debug, Clone, Default)]
pub struct Assets {
    sizes: HashMap<String, IVec2>,
    /// Scaled per catalog entry, so two items may share one sprite
    item_sizes: HashMap<ItemId, IVec2>,
    ground_lines: HashMap<String, i32>,
}

impl Assets {
    /// Resolve every sprite the configuration can reference.
    ///
    /// Item sizes are stored per item id, already scaled by the catalog
    /// entry's scale.
    pub fn resolve(config: &GameConfig, resolver: &dyn SpriteResolver) -> Result<Self, AssetError> {
        let mut assets = Self::default();

        let fixed = [
            &config.player.sprite,
            &config.boss.sprite,
            &config.boss.beam_sprite,
            &config.boss.meteor_sprite,
            &config.score.explosion_sprite,
        ];
        for name in fixed {
            assets.insert(resolver, name)?;
        }

        for stage in &config.stages {
            assets.insert(resolver, &stage.ground_enemy_sprite)?;
            assets.insert(resolver, &stage.air_enemy_sprite)?;

            if resolver.sprite_size(&stage.background).is_none() {
                return Err(AssetError::MissingBackground {
                    name: stage.background.clone(),
                });
            }
            let ground = resolver.ground_line(&stage.background).unwrap_or_else(|| {
                log::warn!(
                    "No ground line for '{}', using {}",
                    stage.background,
                    DEFAULT_GROUND_Y
                );
                DEFAULT_GROUND_Y
            });
            assets.ground_lines.insert(stage.background.clone(), ground);
        }

        for def in config.items.iter() {
            let raw = lookup(resolver, &def.sprite)?;
            let scaled = (raw.as_vec2() * def.scale).round().as_ivec2().max(IVec2::ONE);
            assets.item_sizes.insert(def.id.clone(), scaled);
        }

        log::info!(
            "Resolved {} sprites and {} items",
            assets.sizes.len(),
            assets.item_sizes.len()
        );
        Ok(assets)
    }

    fn insert(&mut self, resolver: &dyn SpriteResolver, name: &str) -> Result<(), AssetError> {
        let size = lookup(resolver, name)?;
        self.sizes.insert(name.to_string(), size.max(IVec2::ONE));
        Ok(())
    }

    /// Rectangle size of a resolved sprite
    pub fn size(&self, name: &str) -> IVec2 {
        self.sizes.get(name).copied().unwrap_or(IVec2::ONE)
    }

    /// Scaled rectangle size of a catalog item, used for both the pickup
    /// and the shots it fires
    pub fn item_size(&self, id: &ItemId) -> IVec2 {
        self.item_sizes.get(id).copied().unwrap_or(IVec2::ONE)
    }

    /// Ground line of a resolved background
    pub fn ground_y(&self, background: &str) -> i32 {
        self.ground_lines
            .get(background)
            .copied()
            .unwrap_or(DEFAULT_GROUND_Y)
    }
}

fn lookup(resolver: &dyn SpriteResolver, name: &str) -> Result<IVec2, AssetError> {
    resolver
        .sprite_size(name)
        .ok_or_else(|| AssetError::MissingSprite { name: name.to_string() })
}

/// Estimate the ground line of a background image.
///
/// Scans the rows between 40% and 90% of the height for the darkest, most
/// uniform horizontal band and returns the row just below it. `sample`
/// returns the RGB colour at `(x, y)`.
pub fn detect_ground_line(width: u32, height: u32, sample: impl Fn(u32, u32) -> [u8; 3]) -> i32 {
    const X_STEP: usize = 4;

    let y_start = (height as f32 * 0.40) as u32;
    let y_end = (height as f32 * 0.90) as u32;
    let mut best_y = (height as f32 * 0.75) as u32;
    let mut best_score = f64::MAX;

    for y in y_start..y_end {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut n = 0.0;
        for x in (0..width).step_by(X_STEP) {
            let [r, g, b] = sample(x, y);
            let lum = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
            sum += lum;
            sum_sq += lum * lum;
            n += 1.0;
        }
        if n == 0.0 {
            continue;
        }

        let mean = sum / n;
        let var = sum_sq / n - mean * mean;
        let std = if var > 0.0 { var.sqrt() } else { 0.0 };
        let score = mean + 0.3 * std;
        if score < best_score {
            best_score = score;
            best_y = y;
        }
    }

    (height.saturating_sub(1)).min(best_y + 1) as i32
}

/// Asset resolution failures (fatal, raised before the simulation starts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    MissingSprite { name: String },
    MissingBackground { name: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingSprite { name } => {
                write!(f, "failed to resolve sprite '{}'", name)
            }
            AssetError::MissingBackground { name } => {
                write!(f, "failed to resolve background '{}'", name)
            }
        }
    }
}

impl std::error::Error for AssetError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoBoss;

    impl SpriteResolver for NoBoss {
        fn sprite_size(&self, name: &str) -> Option<IVec2> {
            if name == "boss" {
                None
            } else {
                BuiltinSprites.sprite_size(name)
            }
        }
    }

    #[test]
    fn test_builtin_resolves_default_config() {
        let config = GameConfig::default();
        let assets = Assets::resolve(&config, &BuiltinSprites).unwrap();
        assert_eq!(assets.size("player"), IVec2::new(72, 72));
        // arrow sprite is scaled by 0.2
        assert_eq!(assets.item_size(&ItemId::from("arrow")), IVec2::new(60, 20));
        assert_eq!(assets.item_size(&ItemId::from("tobacco")), IVec2::new(45, 45));
        assert_eq!(assets.ground_y("bg_1"), DEFAULT_GROUND_Y);
        assert_eq!(assets.ground_y("bg_2"), DEFAULT_GROUND_Y - 15);
    }

    #[test]
    fn test_missing_sprite_is_fatal() {
        let config = GameConfig::default();
        let err = Assets::resolve(&config, &NoBoss).unwrap_err();
        assert_eq!(err, AssetError::MissingSprite { name: "boss".into() });
        assert!(err.to_string().contains("boss"));
    }

    #[test]
    fn test_items_sharing_a_sprite_keep_their_own_scale() {
        use crate::sim::inventory::{AttackProfile, ItemCatalog, ItemDefinition};

        let mut config = GameConfig::default();
        let profile = AttackProfile {
            velocity: glam::Vec2::new(16.0, 0.0),
            gravity: 0.0,
            range: None,
            boss_damage: 50,
        };
        let big = ItemDefinition::attack("big_beam", "beam", 2.0, 1, profile);
        let entries = config.items.iter().cloned().chain([big]).collect();
        config.items = ItemCatalog::new(entries);
        let assets = Assets::resolve(&config, &BuiltinSprites).unwrap();

        assert_eq!(assets.item_size(&ItemId::from("beam")), IVec2::new(60, 20));
        assert_eq!(assets.item_size(&ItemId::from("big_beam")), IVec2::new(120, 40));
    }

    #[test]
    fn test_ground_line_falls_back_to_default() {
        // NoBoss has no ground lines; drop the boss requirement by renaming
        let mut config = GameConfig::default();
        config.boss.sprite = "boss_beam".into();
        let assets = Assets::resolve(&config, &NoBoss).unwrap();
        assert_eq!(assets.ground_y("bg_2"), DEFAULT_GROUND_Y);
    }

    #[test]
    fn test_detect_ground_line_finds_dark_band() {
        // Bright sky with a black stripe at rows 300..=302
        let ground = detect_ground_line(200, 500, |_, y| {
            if (300..=302).contains(&y) {
                [0, 0, 0]
            } else {
                [200, 200, 200]
            }
        });
        assert_eq!(ground, 301);
    }

    #[test]
    fn test_detect_ground_line_uniform_image() {
        // No band: the first scanned row wins ties
        let ground = detect_ground_line(100, 100, |_, _| [50, 50, 50]);
        assert_eq!(ground, 41);
    }
}
