//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one tick in a fixed order:
//! quit check, phase machine, player actions, spawns, integration,
//! collisions, pruning, clocks.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::boss;
use super::collision;
use super::entity::{Entity, EntityKind};
use super::geom::Rect;
use super::physics;
use super::spawn;
use super::stage;
use super::state::GameState;
use crate::consts::MUZZLE_OFFSET;

/// Held-key snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump (acts on press)
    pub jump: bool,
    /// Fire the held attack item (acts on press)
    pub attack: bool,
    /// Start the run from the title screen (acts on press)
    pub confirm: bool,
    /// Leave immediately
    pub quit: bool,
    /// External "final stage cleared" flag
    pub stage_clear: bool,
}

impl TickInput {
    /// Keys that are down now but were up on the previous tick
    pub fn pressed_since(&self, prev: &TickInput) -> TickInput {
        TickInput {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            jump: self.jump && !prev.jump,
            attack: self.attack && !prev.attack,
            confirm: self.confirm && !prev.confirm,
            quit: self.quit && !prev.quit,
            stage_clear: self.stage_clear && !prev.stage_clear,
        }
    }
}

/// What the driver loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Quit,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickFlow {
    if input.quit {
        log::info!("Quit requested at tick {}", state.world.time_ticks);
        return TickFlow::Quit;
    }

    state.events.clear();
    let pressed = input.pressed_since(&state.prev_input);
    state.prev_input = *input;

    stage::evaluate(state, input, &pressed);
    if !state.phase.is_simulating() {
        return TickFlow::Continue;
    }

    // Player actions
    physics::apply_horizontal_input(&mut state.player, input.left, input.right);
    if pressed.jump {
        physics::try_jump(&mut state.player);
    }
    if pressed.attack {
        fire_attack(state);
    }

    if let Some(signal) = spawn::run(state) {
        stage::apply_signal(state, signal);
    }

    physics::integrate_player(&mut state.player, &state.world);
    boss::update_boss(state);
    physics::integrate_registry(&mut state.registry, &state.world);

    collision::resolve(state);
    state.registry.prune();

    let background_speed = state.stage_config().background_speed;
    state.world.advance(background_speed);
    state.damage_popup_ticks = state.damage_popup_ticks.saturating_sub(1);

    TickFlow::Continue
}

/// Fire one shot of the held attack item.
///
/// Returns false with nothing spawned when the attack slot is empty or the
/// held item has no motion profile.
pub fn fire_attack(state: &mut GameState) -> bool {
    let Some(def) = state
        .inventory
        .attack()
        .and_then(|id| state.config.items.get(id))
    else {
        return false;
    };
    let Some(profile) = def.attack else {
        log::debug!("Attack item '{}' has no motion profile", def.id);
        return false;
    };
    let item = def.id.clone();
    let sprite = def.sprite.clone();

    let player = &state.player.rect;
    let muzzle = IVec2::new(player.right() + MUZZLE_OFFSET, player.center().y);
    let rect = Rect::from_center(muzzle, state.assets.item_size(&item));

    let id = state.next_entity_id();
    let shot = Entity::new(
        id,
        EntityKind::Projectile {
            item,
            gravity: profile.gravity,
            range_end_x: profile.range.map(|r| muzzle.x + r),
            boss_damage: profile.boss_damage,
        },
        rect,
        sprite,
    )
    .with_velocity(profile.velocity);
    state.registry.projectiles.push(shot);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::inventory::{ARROW, BEAM, ItemId};
    use crate::sim::stage::GamePhase;

    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        for stage in &mut config.stages {
            stage.enemy_spawn_probability = 0.0;
            stage.item_spawn_probability = 0.0;
        }
        config
    }

    fn playing() -> GameState {
        let mut s = GameState::with_builtin_sprites(quiet_config(), 5).unwrap();
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut s, &confirm);
        tick(&mut s, &TickInput::default());
        s
    }

    fn hold(s: &mut GameState, id: &str) {
        let def = s.config.items.get(&ItemId::from(id)).cloned().unwrap();
        s.inventory.pickup(&def, 2);
    }

    #[test]
    fn test_nothing_moves_before_confirm() {
        let mut s = GameState::with_builtin_sprites(quiet_config(), 5).unwrap();
        for _ in 0..10 {
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.phase, GamePhase::Start);
        assert_eq!(s.world.time_ticks, 0);
    }

    #[test]
    fn test_quit_before_any_mutation() {
        let mut s = playing();
        let before = s.world.time_ticks;
        let input = TickInput {
            quit: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut s, &input), TickFlow::Quit);
        assert_eq!(s.world.time_ticks, before);
    }

    #[test]
    fn test_jump_acts_on_press_only() {
        let mut s = playing();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut s, &jump);
        assert_eq!(s.player.jump_count, 1);
        // Held, not pressed again
        tick(&mut s, &jump);
        assert_eq!(s.player.jump_count, 1);

        tick(&mut s, &TickInput::default());
        tick(&mut s, &jump);
        assert_eq!(s.player.jump_count, 2);
    }

    #[test]
    fn test_attack_requires_item() {
        let mut s = playing();
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut s, &attack);
        assert!(s.registry.projectiles.is_empty());

        hold(&mut s, BEAM);
        tick(&mut s, &TickInput::default());
        tick(&mut s, &attack);
        assert_eq!(s.registry.projectiles.len(), 1);
        let shot = &s.registry.projectiles[0];
        assert_eq!(shot.sprite, "beam");
        assert!(matches!(
            &shot.kind,
            EntityKind::Projectile { item, .. } if item.as_str() == BEAM
        ));
    }

    #[test]
    fn test_attack_item_is_reusable() {
        let mut s = playing();
        hold(&mut s, ARROW);
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        for _ in 0..3 {
            tick(&mut s, &attack);
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.registry.projectiles.len(), 3);
        assert_eq!(s.inventory.attack(), Some(&ItemId::from(ARROW)));
    }

    #[test]
    fn test_shot_spawns_at_muzzle() {
        let mut s = playing();
        hold(&mut s, BEAM);
        assert!(fire_attack(&mut s));
        let shot = &s.registry.projectiles[0];
        let expected = IVec2::new(s.player.rect.right() + MUZZLE_OFFSET, s.player.rect.center().y);
        assert_eq!(shot.rect.center(), expected);
        assert!(matches!(
            shot.kind,
            EntityKind::Projectile { range_end_x: Some(x), boss_damage: 100, .. } if x == expected.x + 200
        ));
    }

    #[test]
    fn test_clocks_and_background() {
        let mut s = playing();
        let t0 = s.world.time_ticks;
        for _ in 0..10 {
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.world.time_ticks, t0 + 10);
        assert_eq!(s.world.background_offset, ((t0 + 10) * 4 % 1100) as i32);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut s = GameState::with_builtin_sprites(GameConfig::default(), seed).unwrap();
            let confirm = TickInput {
                confirm: true,
                ..Default::default()
            };
            tick(&mut s, &confirm);
            for i in 0..600 {
                let input = TickInput {
                    jump: i % 40 == 0,
                    right: i % 3 == 0,
                    ..Default::default()
                };
                tick(&mut s, &input);
            }
            (s.score, s.player.hp, s.player.rect, s.registry.len())
        };
        assert_eq!(run(77), run(77));
    }
}
