//! Entities and the typed collections that hold them

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::inventory::ItemId;
use crate::config::PlayerConfig;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
    Neutral,
}

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Mob variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks along the ground line
    Ground,
    /// Flies at a random height above the ground
    Air,
}

/// Boss attack variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossShotKind {
    /// Travels left at constant speed
    Beam,
    /// Falls straight down onto the player's column
    Meteor,
}

/// Kind tag shared with the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    Player,
    Enemy,
    Projectile,
    Item,
    Boss,
    BossProjectile,
    Effect,
}

/// Per-kind data for registry entities
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Enemy(EnemyKind),
    /// Player shot; `item` is the attack item that fired it
    Projectile {
        item: ItemId,
        gravity: f32,
        range_end_x: Option<i32>,
        boss_damage: i32,
    },
    Item(ItemId),
    BossProjectile(BossShotKind),
    Explosion,
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            EntityKind::Enemy(_) => EntityTag::Enemy,
            EntityKind::Projectile { .. } => EntityTag::Projectile,
            EntityKind::Item(_) => EntityTag::Item,
            EntityKind::BossProjectile(_) => EntityTag::BossProjectile,
            EntityKind::Explosion => EntityTag::Effect,
        }
    }

    pub fn faction(&self) -> Faction {
        match self {
            EntityKind::Enemy(_) | EntityKind::BossProjectile(_) => Faction::Hostile,
            EntityKind::Projectile { .. } => Faction::Player,
            EntityKind::Item(_) | EntityKind::Explosion => Faction::Neutral,
        }
    }
}

/// A registry entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
    /// Pixels per tick
    pub vel: Vec2,
    /// Side it fights on; only hostile entities hurt the player
    pub faction: Faction,
    /// Ticks left before timed despawn
    pub lifetime: Option<u32>,
    pub sprite: String,
    /// Cleared when consumed; dead entities are skipped by later passes
    /// and dropped by [`Registry::prune`]
    pub alive: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, rect: Rect, sprite: impl Into<String>) -> Self {
        let faction = kind.faction();
        Self {
            id,
            kind,
            rect,
            vel: Vec2::ZERO,
            faction,
            lifetime: None,
            sprite: sprite.into(),
            alive: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.lifetime = Some(ticks);
        self
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Ticks remaining before the next contact hit can register
    pub invulnerable_ticks: u32,
    /// Ticks remaining of the damage blink
    pub blink_ticks: u32,
    pub jump_count: u8,
    pub max_jump: u8,
    pub facing: Facing,
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
}

impl Player {
    /// Create a player standing on `ground_y`, horizontally centred on `x`
    pub fn new(cfg: &PlayerConfig, size: IVec2, x: i32, ground_y: i32) -> Self {
        let mut rect = Rect::from_center(IVec2::new(x, ground_y), size);
        rect.set_bottom(ground_y);
        Self {
            rect,
            vel: Vec2::ZERO,
            hp: cfg.max_hp,
            max_hp: cfg.max_hp,
            invulnerable_ticks: 0,
            blink_ticks: 0,
            jump_count: 0,
            max_jump: cfg.base_max_jump.max(1),
            facing: Facing::Right,
            speed: cfg.speed,
            gravity: cfg.gravity,
            jump_impulse: cfg.jump_impulse,
        }
    }

    pub fn set_max_jump(&mut self, n: u8) {
        self.max_jump = n.max(1);
        self.jump_count = self.jump_count.min(self.max_jump);
    }

    /// Hidden on two of every four blink ticks
    pub fn is_blink_hidden(&self) -> bool {
        self.blink_ticks > 0 && self.blink_ticks % 4 < 2
    }
}

/// Typed entity collections
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub enemies: Vec<Entity>,
    /// Player-owned shots
    pub projectiles: Vec<Entity>,
    pub items: Vec<Entity>,
    /// Boss beams and meteors
    pub boss_projectiles: Vec<Entity>,
    pub effects: Vec<Entity>,
}

impl Registry {
    /// Drop every entity that died this tick
    pub fn prune(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|e| e.alive);
        self.items.retain(|e| e.alive);
        self.boss_projectiles.retain(|e| e.alive);
        self.effects.retain(|e| e.alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.enemies
            .iter()
            .chain(&self.projectiles)
            .chain(&self.items)
            .chain(&self.boss_projectiles)
            .chain(&self.effects)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
            + self.projectiles.len()
            + self.items.len()
            + self.boss_projectiles.len()
            + self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_from_kind() {
        assert_eq!(EntityKind::Enemy(EnemyKind::Air).faction(), Faction::Hostile);
        assert_eq!(
            EntityKind::BossProjectile(BossShotKind::Meteor).faction(),
            Faction::Hostile
        );
        assert_eq!(EntityKind::Item(ItemId::from("beam")).faction(), Faction::Neutral);
        assert_eq!(EntityKind::Explosion.tag(), EntityTag::Effect);
    }

    #[test]
    fn test_prune_removes_dead_only() {
        let mut reg = Registry::default();
        for id in 0..3 {
            reg.enemies.push(Entity::new(
                id,
                EntityKind::Enemy(EnemyKind::Ground),
                Rect::new(0, 0, 10, 10),
                "enemy",
            ));
        }
        reg.enemies[1].kill();
        reg.prune();
        assert_eq!(reg.enemies.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_player_spawns_on_ground() {
        let player = Player::new(&PlayerConfig::default(), IVec2::new(72, 72), 200, 590);
        assert_eq!(player.rect.bottom(), 590);
        assert_eq!(player.rect.center().x, 200);
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.max_jump, 2);
    }

    #[test]
    fn test_set_max_jump_floor_is_one() {
        let mut player = Player::new(&PlayerConfig::default(), IVec2::new(72, 72), 200, 590);
        player.jump_count = 2;
        player.set_max_jump(0);
        assert_eq!(player.max_jump, 1);
        assert_eq!(player.jump_count, 1);
    }
}
