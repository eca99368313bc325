//! Read-only display snapshot
//!
//! Built between ticks for the renderer and HUD. Holds copies only, so
//! collaborators can never mutate simulation state.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, EntityTag, Facing};
use super::geom::Rect;
use super::inventory::ItemId;
use super::stage::GamePhase;
use super::state::GameState;

/// Ticks per explosion animation frame
const EXPLOSION_FRAME_TICKS: u32 = 5;

/// Visual-state tag the renderer uses to pick an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visual {
    /// Draw facing this way
    Facing(Facing),
    /// Skip this frame (damage blink)
    Hidden,
    /// Animation frame index
    Frame(u8),
    /// Oscillation phase in `[-1, 1]`
    Phase(f32),
    /// Heading in degrees, 0 = right, positive = counter-clockwise
    Heading(f32),
    Static,
}

/// One drawable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub tag: EntityTag,
    pub sprite: String,
    pub rect: Rect,
    pub visual: Visual,
}

/// Everything the renderer and HUD need for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub stage: usize,
    pub tick: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub score: u64,
    pub attack: Option<ItemId>,
    pub status: Option<ItemId>,
    pub max_jump: u8,
    pub damage_popup_ticks: u32,
    pub transition_ticks: u32,
    pub boss_hp: Option<i32>,
    pub boss_max_hp: Option<i32>,
    pub background: String,
    pub background_offset: i32,
    pub ground_y: i32,
    /// Draw order: effects last
    pub entities: Vec<EntityView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut entities = Vec::with_capacity(2 + state.registry.len());

        // Registry IDs start at 1
        let player = &state.player;
        entities.push(EntityView {
            id: 0,
            tag: EntityTag::Player,
            sprite: state.config.player.sprite.clone(),
            rect: player.rect,
            visual: if player.is_blink_hidden() {
                Visual::Hidden
            } else {
                Visual::Facing(player.facing)
            },
        });

        if let Some(boss) = &state.boss {
            entities.push(EntityView {
                id: boss.id,
                tag: EntityTag::Boss,
                sprite: boss.sprite.clone(),
                rect: boss.rect,
                visual: Visual::Phase(boss.oscillation(&state.config.boss)),
            });
        }

        entities.extend(state.registry.iter().filter(|e| e.alive).map(entity_view));

        let stage = state.stage_config();
        Self {
            phase: state.phase,
            stage: state.world.stage,
            tick: state.world.time_ticks,
            hp: player.hp,
            max_hp: player.max_hp,
            score: state.score,
            attack: state.inventory.attack().cloned(),
            status: state.inventory.status().cloned(),
            max_jump: player.max_jump,
            damage_popup_ticks: state.damage_popup_ticks,
            transition_ticks: state.transition_ticks,
            boss_hp: state.boss.as_ref().map(|b| b.hp.max(0)),
            boss_max_hp: state.boss.as_ref().map(|b| b.max_hp),
            background: stage.background.clone(),
            background_offset: state.world.background_offset,
            ground_y: state.world.ground_y,
            entities,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn entity_view(entity: &Entity) -> EntityView {
    let visual = match &entity.kind {
        EntityKind::Explosion => {
            let life = entity.lifetime.unwrap_or(0);
            Visual::Frame(((life / EXPLOSION_FRAME_TICKS) % 2) as u8)
        }
        EntityKind::Projectile { gravity, .. } if *gravity > 0.0 => {
            // Level while rising, then follow the velocity
            if entity.vel.y < 0.0 {
                Visual::Heading(0.0)
            } else {
                Visual::Heading(-entity.vel.y.atan2(entity.vel.x).to_degrees())
            }
        }
        EntityKind::Enemy(_) | EntityKind::Item(_) => Visual::Facing(Facing::Left),
        EntityKind::Projectile { .. } | EntityKind::BossProjectile(_) => Visual::Static,
    };

    EntityView {
        id: entity.id,
        tag: entity.kind.tag(),
        sprite: entity.sprite.clone(),
        rect: entity.rect,
        visual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::boss;
    use crate::sim::spawn;
    use glam::{IVec2, Vec2};

    fn state() -> GameState {
        GameState::with_builtin_sprites(GameConfig::default(), 2).unwrap()
    }

    #[test]
    fn test_capture_basics() {
        let s = state();
        let snap = Snapshot::capture(&s);
        assert_eq!(snap.phase, GamePhase::Start);
        assert_eq!(snap.stage, 1);
        assert_eq!(snap.hp, 100);
        assert_eq!(snap.background, "bg_1");
        assert_eq!(snap.boss_hp, None);
        assert_eq!(snap.boss_max_hp, None);
        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].tag, EntityTag::Player);
        assert_eq!(snap.entities[0].visual, Visual::Facing(Facing::Right));
    }

    #[test]
    fn test_blinking_player_is_hidden() {
        let mut s = state();
        s.player.blink_ticks = 30;
        assert_eq!(Snapshot::capture(&s).entities[0].visual, Visual::Facing(Facing::Right));
        s.player.blink_ticks = 29;
        assert_eq!(Snapshot::capture(&s).entities[0].visual, Visual::Hidden);
    }

    #[test]
    fn test_dead_entities_are_not_published() {
        let mut s = state();
        spawn::spawn_explosion(&mut s, IVec2::new(100, 100), 30);
        let id = spawn::spawn_explosion(&mut s, IVec2::new(200, 100), 30);
        s.registry.effects[0].kill();

        let snap = Snapshot::capture(&s);
        let effects: Vec<_> = snap.entities.iter().filter(|e| e.tag == EntityTag::Effect).collect();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].id, id);
        assert_eq!(effects[0].visual, Visual::Frame(0));
    }

    #[test]
    fn test_boss_view() {
        let mut s = state();
        boss::spawn_boss(&mut s);
        boss::update_boss(&mut s);
        s.boss.as_mut().unwrap().hp = -40;
        let snap = Snapshot::capture(&s);
        assert_eq!(snap.boss_hp, Some(0));
        assert_eq!(snap.boss_max_hp, Some(500));
        let view = snap.entities.iter().find(|e| e.tag == EntityTag::Boss).unwrap();
        assert!(matches!(view.visual, Visual::Phase(p) if (p - 0.05f32.sin()).abs() < 1e-6));
    }

    #[test]
    fn test_falling_arrow_heading() {
        let mut e = Entity::new(
            1,
            EntityKind::Projectile {
                item: ItemId::from("arrow"),
                gravity: 0.6,
                range_end_x: None,
                boss_damage: 80,
            },
            Rect::new(0, 0, 60, 20),
            "arrow",
        )
        .with_velocity(Vec2::new(16.0, -4.0));
        assert_eq!(entity_view(&e).visual, Visual::Heading(0.0));

        e.vel = Vec2::new(16.0, 16.0);
        assert!(matches!(entity_view(&e).visual, Visual::Heading(d) if (d + 45.0).abs() < 1e-4));
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = Snapshot::capture(&state()).to_json().unwrap();
        assert!(json.contains("\"phase\": \"start\""));
        assert!(json.contains("\"player\""));
    }
}
