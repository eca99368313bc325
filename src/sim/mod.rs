//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order per collection)
//! - No rendering, audio or input-device dependencies

pub mod boss;
pub mod collision;
pub mod entity;
pub mod geom;
pub mod inventory;
pub mod physics;
pub mod snapshot;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use boss::Boss;
pub use entity::{
    BossShotKind, EnemyKind, Entity, EntityKind, EntityTag, Faction, Facing, Player, Registry,
};
pub use geom::Rect;
pub use inventory::{
    AttackProfile, Inventory, ItemCatalog, ItemCategory, ItemDefinition, ItemId, StatusRule,
};
pub use snapshot::{EntityView, Snapshot, Visual};
pub use spawn::pick_weighted_item;
pub use stage::{GamePhase, PhaseSignal};
pub use state::{GameEvent, GameState, InitError, WorldState};
pub use tick::{TickFlow, TickInput, fire_attack, tick};
