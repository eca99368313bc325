//! Item catalog and the two-slot inventory
//!
//! Every item exposes exactly an id and a category. Attack items carry a
//! motion profile for the shot they fire; status items carry the rule that
//! decides the player's jump cap.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical item identifier ("beam", "mushroom", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which inventory slot an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Attack,
    Status,
}

/// How a fired shot moves and how hard it hits the boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Launch velocity in pixels per tick
    pub velocity: Vec2,
    /// Added to vertical velocity every tick (0 = straight line)
    #[serde(default)]
    pub gravity: f32,
    /// Maximum horizontal travel from the muzzle before despawning
    #[serde(default)]
    pub range: Option<i32>,
    /// HP removed from the boss per hit
    pub boss_damage: i32,
}

/// Jump-cap effect of holding a status item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    pub max_jump: u8,
    /// Picking this item while `cancels` is held empties the status slot
    #[serde(default)]
    pub cancels: Option<ItemId>,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub category: ItemCategory,
    /// Sprite name handed to the asset resolver
    pub sprite: String,
    /// Visual scale applied to the resolved sprite size
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Spawn weight; values <= 0 never win a draw
    pub weight: i32,
    #[serde(default)]
    pub attack: Option<AttackProfile>,
    #[serde(default)]
    pub status: Option<StatusRule>,
}

fn default_scale() -> f32 {
    1.0
}

impl ItemDefinition {
    pub fn attack(id: &str, sprite: &str, scale: f32, weight: i32, profile: AttackProfile) -> Self {
        Self {
            id: ItemId::from(id),
            category: ItemCategory::Attack,
            sprite: sprite.to_string(),
            scale,
            weight,
            attack: Some(profile),
            status: None,
        }
    }

    pub fn status(id: &str, sprite: &str, scale: f32, weight: i32, rule: StatusRule) -> Self {
        Self {
            id: ItemId::from(id),
            category: ItemCategory::Status,
            sprite: sprite.to_string(),
            scale,
            weight,
            attack: None,
            status: Some(rule),
        }
    }
}

/// Reducing status item: no double jump while held
pub const TOBACCO: &str = "tobacco";
/// Boosting status item: triple jump, cancels tobacco
pub const MUSHROOM: &str = "mushroom";
pub const BEAM: &str = "beam";
pub const ARROW: &str = "arrow";

/// Ordered item catalog (the first entry is the zero-weight fallback)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    entries: Vec<ItemDefinition>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new(vec![
            ItemDefinition::attack(
                BEAM,
                "beam",
                1.0,
                5,
                AttackProfile {
                    velocity: Vec2::new(16.0, 0.0),
                    gravity: 0.0,
                    range: Some(200),
                    boss_damage: 100,
                },
            ),
            ItemDefinition::attack(
                ARROW,
                "arrow",
                0.2,
                3,
                AttackProfile {
                    velocity: Vec2::new(16.0, -10.5),
                    gravity: 0.6,
                    range: None,
                    boss_damage: 80,
                },
            ),
            ItemDefinition::status(
                MUSHROOM,
                "mushroom",
                0.1,
                4,
                StatusRule {
                    max_jump: 3,
                    cancels: Some(ItemId::from(TOBACCO)),
                },
            ),
            ItemDefinition::status(
                TOBACCO,
                "tobacco",
                0.03,
                2,
                StatusRule {
                    max_jump: 1,
                    cancels: None,
                },
            ),
        ])
    }
}

impl ItemCatalog {
    pub fn new(entries: Vec<ItemDefinition>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.entries.iter().find(|d| &d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&ItemDefinition> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two independent single-item slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    attack: Option<ItemId>,
    status: Option<ItemId>,
}

impl Inventory {
    pub fn attack(&self) -> Option<&ItemId> {
        self.attack.as_ref()
    }

    pub fn status(&self) -> Option<&ItemId> {
        self.status.as_ref()
    }

    /// Put `def` into its slot, replacing whatever was there.
    ///
    /// Returns the new jump cap when the pickup changes it.
    pub fn pickup(&mut self, def: &ItemDefinition, base_max_jump: u8) -> Option<u8> {
        match def.category {
            ItemCategory::Attack => {
                self.attack = Some(def.id.clone());
                None
            }
            ItemCategory::Status => self.pickup_status(def, base_max_jump),
        }
    }

    fn pickup_status(&mut self, def: &ItemDefinition, base_max_jump: u8) -> Option<u8> {
        let Some(rule) = &def.status else {
            // Status ids without a rule only occupy the slot
            self.status = Some(def.id.clone());
            return None;
        };

        if rule.cancels.is_some() && self.status == rule.cancels {
            self.status = None;
            return Some(base_max_jump);
        }

        self.status = Some(def.id.clone());
        Some(rule.max_jump)
    }

    /// Jump cap implied by the held status item
    pub fn derived_max_jump(&self, catalog: &ItemCatalog, base_max_jump: u8) -> u8 {
        self.status
            .as_ref()
            .and_then(|id| catalog.get(id))
            .and_then(|def| def.status.as_ref())
            .map(|rule| rule.max_jump)
            .unwrap_or(base_max_jump)
    }
}
