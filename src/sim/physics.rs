//! Physics integrator
//!
//! Integer positions, float velocities. Vertical motion is integrated as
//! `vy += g; y += floor(vy)`. Horizontal player velocity is set from input
//! every tick, never accumulated.

use glam::IVec2;

use super::entity::{BossShotKind, Entity, EntityKind, Facing, Player, Registry};
use super::state::WorldState;

/// Margin outside the screen where enemies are still kept alive
const ENEMY_CULL_MARGIN: i32 = 50;

/// Set horizontal velocity from the held direction keys.
///
/// Moving forward (right) runs at half speed. Right wins when both are held.
pub fn apply_horizontal_input(player: &mut Player, left: bool, right: bool) {
    player.vel.x = 0.0;
    if left {
        player.vel.x = -player.speed;
        player.facing = Facing::Left;
    }
    if right {
        player.vel.x = player.speed * 0.5;
        player.facing = Facing::Right;
    }
}

/// Start a jump if the jump cap allows it.
///
/// Returns false (and changes nothing) when `jump_count >= max_jump`.
pub fn try_jump(player: &mut Player) -> bool {
    if player.jump_count >= player.max_jump {
        return false;
    }
    player.vel.y = player.jump_impulse;
    player.jump_count += 1;
    true
}

/// Advance the player one tick: horizontal move + clamp, gravity, ground snap
pub fn integrate_player(player: &mut Player, world: &WorldState) {
    player.rect.translate(IVec2::new(player.vel.x.floor() as i32, 0));
    player.rect.clamp_horizontal(world.width);

    player.vel.y += player.gravity;
    player.rect.translate(IVec2::new(0, player.vel.y.floor() as i32));
    if player.rect.top() < 0 {
        player.rect.set_top(0);
    }

    if player.rect.bottom() >= world.ground_y {
        player.rect.set_bottom(world.ground_y);
        player.vel.y = 0.0;
        player.jump_count = 0;
    }

    player.blink_ticks = player.blink_ticks.saturating_sub(1);
}

/// Move every registry entity and mark the ones that left the playfield
pub fn integrate_registry(registry: &mut Registry, world: &WorldState) {
    for enemy in &mut registry.enemies {
        step_linear(enemy);
        let r = enemy.rect;
        if r.right() < -ENEMY_CULL_MARGIN
            || r.left() > world.width + ENEMY_CULL_MARGIN
            || r.top() > world.height + ENEMY_CULL_MARGIN
        {
            enemy.kill();
        }
    }

    for item in &mut registry.items {
        step_linear(item);
        if item.rect.right() < 0 {
            item.kill();
        }
    }

    for shot in &mut registry.projectiles {
        integrate_projectile(shot, world);
    }

    for shot in &mut registry.boss_projectiles {
        step_linear(shot);
        let gone = match shot.kind {
            EntityKind::BossProjectile(BossShotKind::Beam) => shot.rect.right() < 0,
            EntityKind::BossProjectile(BossShotKind::Meteor) => shot.rect.top() > world.height,
            _ => false,
        };
        if gone {
            shot.kill();
        }
    }

    for effect in &mut registry.effects {
        if let Some(life) = effect.lifetime.as_mut() {
            *life = life.saturating_sub(1);
            if *life == 0 {
                effect.kill();
            }
        }
    }
}

fn step_linear(entity: &mut Entity) {
    let delta = IVec2::new(entity.vel.x.floor() as i32, entity.vel.y.floor() as i32);
    entity.rect.translate(delta);
}

/// Player shots: straight or ballistic, limited by range, ground and screen
fn integrate_projectile(shot: &mut Entity, world: &WorldState) {
    let EntityKind::Projectile {
        gravity,
        range_end_x,
        ..
    } = shot.kind
    else {
        return;
    };

    shot.rect.translate(IVec2::new(shot.vel.x.floor() as i32, 0));
    shot.vel.y += gravity;
    shot.rect.translate(IVec2::new(0, shot.vel.y.floor() as i32));

    let r = shot.rect;
    let out_of_range = range_end_x.is_some_and(|end| r.left() >= end);
    let grounded = gravity > 0.0 && r.bottom() >= world.ground_y;
    let off_screen = r.left() > world.width || r.right() < 0 || r.top() > world.height;
    if out_of_range || grounded || off_screen {
        shot.kill();
    }
}
