//! Collision and damage resolution
//!
//! Five passes run in a fixed order every simulated tick. Consumed entities
//! are only marked dead, and every pass skips dead entities, so a later pass
//! never sees something an earlier pass already removed. Pruning happens
//! after all passes.

use glam::IVec2;
use rand::Rng;

use super::boss;
use super::entity::{EntityKind, Faction};
use super::spawn::spawn_explosion;
use super::stage::{self, PhaseSignal};
use super::state::{GameEvent, GameState};

/// Run all collision passes for this tick
pub fn resolve(state: &mut GameState) {
    projectiles_vs_enemies(state);
    projectiles_vs_boss(state);
    player_vs_items(state);
    player_vs_hostiles(state);
    check_boss_defeat(state);
}

/// Pass 1: each player shot destroys the first live enemy it touches
fn projectiles_vs_enemies(state: &mut GameState) {
    let mut kills: Vec<(u32, IVec2)> = Vec::new();
    let registry = &mut state.registry;

    for shot in registry.projectiles.iter_mut().filter(|s| s.alive) {
        for enemy in registry.enemies.iter_mut().filter(|e| e.alive) {
            if enemy.rect.overlaps(&shot.rect) {
                enemy.kill();
                shot.kill();
                kills.push((enemy.id, enemy.rect.center()));
                break;
            }
        }
    }

    let ticks = state.config.score.enemy_explosion_ticks;
    for (id, center) in kills {
        let reward = state.rng.random_range(state.config.score.kill_reward.clone());
        state.score += reward;
        spawn_explosion(state, center, ticks);
        log::debug!("Enemy {} destroyed, +{} (score {})", id, reward, state.score);
        state.push_event(GameEvent::EnemyKilled { id, reward });
    }
}

/// Pass 2: player shots drain the boss HP pool
fn projectiles_vs_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    for shot in state.registry.projectiles.iter_mut().filter(|s| s.alive) {
        if !shot.rect.overlaps(&boss.rect) {
            continue;
        }
        shot.kill();
        let damage = match shot.kind {
            EntityKind::Projectile { boss_damage, .. } => boss_damage,
            _ => 0,
        };
        boss.hp -= damage;
        log::debug!("Boss hit for {} ({} HP left)", damage, boss.hp);
        state.events.push(GameEvent::BossDamaged {
            damage,
            hp: boss.hp,
        });
    }
}

/// Pass 3: touching an item puts it in its inventory slot
fn player_vs_items(state: &mut GameState) {
    let player_rect = state.player.rect;
    let mut picked = Vec::new();

    for item in state.registry.items.iter_mut().filter(|i| i.alive) {
        if !item.rect.overlaps(&player_rect) {
            continue;
        }
        item.kill();
        if let EntityKind::Item(id) = &item.kind {
            picked.push(id.clone());
        }
    }

    let base = state.config.player.base_max_jump;
    for id in picked {
        let Some(def) = state.config.items.get(&id) else {
            log::warn!("Picked up item '{}' that is not in the catalog", id);
            continue;
        };
        if let Some(cap) = state.inventory.pickup(def, base) {
            state.player.set_max_jump(cap);
        }
        log::debug!(
            "Picked up {} (attack {:?}, status {:?}, max_jump {})",
            id,
            state.inventory.attack(),
            state.inventory.status(),
            state.player.max_jump
        );
        state.push_event(GameEvent::ItemPicked { item: id });
    }
}

/// Pass 4: contact with enemies or boss shots hurts the player, at most
/// once per invulnerability window
fn player_vs_hostiles(state: &mut GameState) {
    let player = &mut state.player;
    player.invulnerable_ticks = player.invulnerable_ticks.saturating_sub(1);
    if player.invulnerable_ticks > 0 {
        return;
    }

    let rect = player.rect;
    let mut hit = false;
    let registry = &mut state.registry;
    for hostile in registry
        .enemies
        .iter_mut()
        .chain(registry.boss_projectiles.iter_mut())
        .filter(|e| e.alive && e.faction == Faction::Hostile)
        .filter(|e| e.rect.overlaps(&rect))
    {
        hostile.kill();
        hit = true;
    }
    if !hit {
        return;
    }

    let cfg = &state.config.player;
    let damage = cfg.contact_damage;
    player.hp = player.hp.saturating_sub(damage);
    player.invulnerable_ticks = cfg.invulnerability_ticks;
    player.blink_ticks = cfg.blink_ticks;
    state.damage_popup_ticks = cfg.damage_popup_ticks;

    let hp = player.hp;
    log::debug!("Player hit for {} ({} HP left)", damage, hp);
    state.push_event(GameEvent::PlayerDamaged { damage, hp });

    if hp == 0 {
        log::info!("Player down at score {}", state.score);
        stage::apply_signal(state, PhaseSignal::PlayerDown);
    }
}

/// Pass 5: a boss at or below zero HP is removed with its shots
fn check_boss_defeat(state: &mut GameState) {
    let defeated = state.boss.as_ref().is_some_and(|b| b.is_defeated());
    if defeated && boss::defeat_boss(state) {
        stage::apply_signal(state, PhaseSignal::BossDefeated);
    }
}
