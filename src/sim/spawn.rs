//! Spawn scheduler
//!
//! Enemy and item spawns are attempted every `interval` stage ticks and
//! accepted with the stage's probability. Items are drawn from the catalog
//! by weight. The boss trigger is a one-shot check on the score.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::entity::{EnemyKind, Entity, EntityKind};
use super::geom::Rect;
use super::inventory::{ItemCatalog, ItemDefinition};
use super::stage::{GamePhase, PhaseSignal};
use super::state::GameState;

/// Horizontal jitter past the right edge for new enemies
const ENEMY_ENTRY_JITTER: i32 = 80;
/// Horizontal jitter past the right edge for new items
const ITEM_ENTRY_JITTER: i32 = 200;
/// Air enemies fly this far above the ground
const AIR_ALTITUDE: std::ops::RangeInclusive<i32> = 120..=260;
/// Air enemies never go above this bottom line
const AIR_MIN_BOTTOM: i32 = 40;
/// Items never spawn with their centre above this line
const ITEM_TOP_MARGIN: i32 = 60;
/// Gap kept between a spawned item and the screen top / ground
const ITEM_EDGE_GAP: i32 = 10;

/// Run the spawn step of a tick.
///
/// Returns the boss signal when the score threshold was crossed.
pub fn run(state: &mut GameState) -> Option<PhaseSignal> {
    if !state.boss_active() {
        maybe_spawn_enemy(state);
    }
    maybe_spawn_item(state);
    boss_trigger_ready(state).then_some(PhaseSignal::BossThresholdCrossed)
}

fn maybe_spawn_enemy(state: &mut GameState) -> bool {
    let stage = state.stage_config();
    if state.world.stage_ticks % stage.spawn_interval != 0 {
        return false;
    }
    let p = stage.enemy_spawn_probability;
    if !state.rng.random_bool(p) {
        return false;
    }

    let kind = if state.rng.random_bool(0.5) {
        EnemyKind::Ground
    } else {
        EnemyKind::Air
    };
    spawn_enemy(state, kind);
    true
}

/// Add one enemy just past the right edge. Returns its ID.
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind) -> u32 {
    let stage = state.stage_config();
    let sprite = match kind {
        EnemyKind::Ground => stage.ground_enemy_sprite.clone(),
        EnemyKind::Air => stage.air_enemy_sprite.clone(),
    };
    let speed = stage.enemy_speed;
    let size = state.assets.size(&sprite);
    let ground = state.world.ground_y;

    let mut rect = Rect::new(0, 0, size.x, size.y);
    rect.set_left(state.world.width + state.rng.random_range(0..=ENEMY_ENTRY_JITTER));
    match kind {
        EnemyKind::Ground => rect.set_bottom(ground),
        EnemyKind::Air => {
            let bottom = ground - state.rng.random_range(AIR_ALTITUDE);
            rect.set_bottom(bottom.max(AIR_MIN_BOTTOM));
        }
    }

    let id = state.next_entity_id();
    state.registry.enemies.push(
        Entity::new(id, EntityKind::Enemy(kind), rect, sprite)
            .with_velocity(Vec2::new(-(speed as f32), 0.0)),
    );
    id
}

fn maybe_spawn_item(state: &mut GameState) -> bool {
    let stage = state.stage_config();
    if state.world.stage_ticks % stage.item_spawn_interval != 0 {
        return false;
    }
    let p = stage.item_spawn_probability;
    if !state.rng.random_bool(p) {
        return false;
    }

    let Some(def) = pick_weighted_item(&state.config.items, &mut state.rng).cloned() else {
        return false;
    };
    spawn_item(state, &def);
    true
}

/// Add one item just past the right edge, at a random height above the
/// ground. Returns its ID.
pub fn spawn_item(state: &mut GameState, def: &ItemDefinition) -> u32 {
    let size = state.assets.item_size(&def.id);
    let half_h = size.y / 2;
    let highest = ITEM_TOP_MARGIN.max(half_h + ITEM_EDGE_GAP);
    let lowest = state.world.ground_y - half_h - ITEM_EDGE_GAP;
    let center_y = if highest <= lowest {
        state.rng.random_range(highest..=lowest)
    } else {
        lowest
    };

    let mut rect = Rect::new(0, 0, size.x, size.y);
    rect.set_left(state.world.width + state.rng.random_range(0..=ITEM_ENTRY_JITTER));
    rect.set_center_y(center_y);

    let speed = state.stage_config().item_speed;
    let id = state.next_entity_id();
    state.registry.items.push(
        Entity::new(id, EntityKind::Item(def.id.clone()), rect, def.sprite.clone())
            .with_velocity(Vec2::new(-(speed as f32), 0.0)),
    );
    id
}

/// Weighted draw over the catalog.
///
/// Each entry owns a cumulative slice of `[1, total]` as wide as its weight;
/// entries with weight <= 0 own nothing. With no positive weight at all the
/// first entry is returned.
pub fn pick_weighted_item<'a, R: Rng + ?Sized>(
    catalog: &'a ItemCatalog,
    rng: &mut R,
) -> Option<&'a ItemDefinition> {
    let weight = |d: &ItemDefinition| d.weight.max(0) as u64;
    let total: u64 = catalog.iter().map(weight).sum();
    if total == 0 {
        return catalog.first();
    }

    let draw = rng.random_range(1..=total);
    let mut acc = 0;
    for def in catalog.iter() {
        acc += weight(def);
        if draw <= acc {
            return Some(def);
        }
    }
    catalog.first()
}

/// Add a timed explosion effect centred on `center`
pub fn spawn_explosion(state: &mut GameState, center: IVec2, ticks: u32) -> u32 {
    let sprite = state.config.score.explosion_sprite.clone();
    let size = state.assets.size(&sprite);
    let id = state.next_entity_id();
    state.registry.effects.push(
        Entity::new(id, EntityKind::Explosion, Rect::from_center(center, size), sprite)
            .with_lifetime(ticks),
    );
    id
}

/// First tick with the score above the threshold and no boss so far
pub fn boss_trigger_ready(state: &GameState) -> bool {
    state.phase == GamePhase::Playing
        && !state.boss_spawned
        && !state.boss_defeated
        && state.score > state.config.boss.score_threshold
}
