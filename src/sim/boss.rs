//! Boss controller
//!
//! The boss hovers on a sine wave above the ground and runs two attack
//! timers: a beam fired left from its centre and a meteor dropped onto the
//! player's column. Its HP pool is separate from the player damage model;
//! collision pass 2 drains it and pass 5 calls [`defeat_boss`].

use glam::{IVec2, Vec2};
use rand::Rng;

use super::entity::{BossShotKind, Entity, EntityKind};
use super::geom::Rect;
use super::spawn::spawn_explosion;
use super::state::{GameEvent, GameState, WorldState};
use crate::config::BossConfig;

/// The active boss
#[derive(Debug, Clone)]
pub struct Boss {
    pub id: u32,
    pub rect: Rect,
    pub hp: i32,
    pub max_hp: i32,
    /// Ticks since spawn; drives oscillation and attack cooldowns
    pub timer: u32,
    pub sprite: String,
}

impl Boss {
    pub fn new(id: u32, cfg: &BossConfig, size: IVec2, world: &WorldState) -> Self {
        let center = IVec2::new(
            world.width - cfg.right_offset,
            world.ground_y - cfg.spawn_height,
        );
        Self {
            id,
            rect: Rect::from_center(center, size),
            hp: cfg.hp,
            max_hp: cfg.hp,
            timer: 0,
            sprite: cfg.sprite.clone(),
        }
    }

    /// Current oscillation value in `[-1, 1]`
    pub fn oscillation(&self, cfg: &BossConfig) -> f32 {
        (self.timer as f32 * cfg.angular_rate).sin()
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

/// Create the boss. Clears all enemies on screen.
pub fn spawn_boss(state: &mut GameState) {
    let size = state.assets.size(&state.config.boss.sprite);
    let id = state.next_entity_id();
    let boss = Boss::new(id, &state.config.boss, size, &state.world);

    state.registry.enemies.clear();
    state.boss_spawned = true;
    log::info!("Boss spawned with {} HP at {:?}", boss.hp, boss.rect.center());
    state.push_event(GameEvent::BossSpawned { hp: boss.hp });
    state.boss = Some(boss);
}

/// Advance the boss one tick: hover, then fire whichever attacks are due
pub fn update_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let cfg = &state.config.boss;

    boss.timer += 1;
    let base = state.world.ground_y - cfg.hover_height;
    let offset = boss.oscillation(cfg) * cfg.amplitude;
    boss.rect.set_center_y(base + offset.round() as i32);

    let origin = boss.rect.center();
    let beam_due = boss.timer % cfg.beam_interval == 0;
    let meteor_due = boss.timer % cfg.meteor_interval == 0;

    if beam_due {
        fire_beam(state, origin);
    }
    if meteor_due {
        drop_meteor(state);
    }
}

fn fire_beam(state: &mut GameState, origin: IVec2) {
    let cfg = &state.config.boss;
    let size = state.assets.size(&cfg.beam_sprite);
    let sprite = cfg.beam_sprite.clone();
    let vel = Vec2::new(-cfg.beam_speed, 0.0);

    let id = state.next_entity_id();
    let beam = Entity::new(
        id,
        EntityKind::BossProjectile(BossShotKind::Beam),
        Rect::from_center(origin, size),
        sprite,
    )
    .with_velocity(vel);
    state.registry.boss_projectiles.push(beam);
}

fn drop_meteor(state: &mut GameState) {
    let cfg = &state.config.boss;
    let side = state.rng.random_range(cfg.meteor_size.clone());
    let sprite = cfg.meteor_sprite.clone();
    let vel = Vec2::new(0.0, cfg.meteor_speed);
    let center = IVec2::new(state.player.rect.center().x, -50);

    let id = state.next_entity_id();
    let meteor = Entity::new(
        id,
        EntityKind::BossProjectile(BossShotKind::Meteor),
        Rect::from_center(center, IVec2::splat(side)),
        sprite,
    )
    .with_velocity(vel);
    state.registry.boss_projectiles.push(meteor);
}

/// Remove the boss and everything it fired, leave a large explosion and
/// award the defeat bonus.
///
/// Returns false when there was no boss to defeat, so the bonus can only
/// be paid once per boss.
pub fn defeat_boss(state: &mut GameState) -> bool {
    let Some(boss) = state.boss.take() else {
        return false;
    };

    let ticks = state.config.score.boss_explosion_ticks;
    spawn_explosion(state, boss.rect.center(), ticks);
    state.registry.boss_projectiles.clear();
    state.boss_defeated = true;

    let bonus = state.config.boss.defeat_bonus;
    state.score += bonus;
    log::info!("Boss defeated, +{} (score {})", bonus, state.score);
    state.push_event(GameEvent::BossDefeated { bonus });
    true
}
