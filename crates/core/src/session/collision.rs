//! Collision and interaction resolution.
//!
//! Every non-player entity is tested against the local player's hitbox once
//! per frame. Dispatch is mutually exclusive with the enemy flag taking
//! precedence over the item flag, so a single entity resolves at most one
//! interaction per frame. The pass runs in reverse index order: removing an
//! item can never skip or double-visit an entry still ahead of the cursor.

use glam::Vec2;

use crate::entities::{Entity, PlayerState};
use crate::template::ItemKind;

use super::{Session, SoundKind};

pub(crate) fn resolve(session: &mut Session) {
    let Some(mut player_idx) = session.entities.iter().position(Entity::is_local_player) else {
        return;
    };
    let player_hitbox = session.entities[player_idx].hitbox;
    let player_pos = session.entities[player_idx].position;
    let mut shielded = session.entities[player_idx]
        .player
        .as_ref()
        .is_some_and(PlayerState::is_invincible);

    let mut damage_taken = 0;
    let mut hit_source: Option<String> = None;
    let mut picked_up: Vec<(ItemKind, String, Vec2)> = Vec::new();

    for i in (0..session.entities.len()).rev() {
        if i == player_idx {
            continue;
        }
        let entity = &session.entities[i];
        if !entity.hitbox.intersects(&player_hitbox) {
            continue;
        }

        if entity.is_enemy() {
            if !shielded {
                damage_taken = entity.template.damage;
                hit_source = Some(entity.template.id.clone());
                // The first hit grants the grace period; further overlaps
                // this frame land on a shielded player.
                shielded = true;
            }
        } else if let Some(kind) = entity.template.item {
            picked_up.push((kind, entity.template.id.clone(), entity.position));
            session.entities.remove(i);
            if i < player_idx {
                player_idx -= 1;
            }
        }
    }

    if let Some(source) = hit_source {
        let player = &mut session.entities[player_idx];
        player.apply_damage(damage_taken);
        if let Some(state) = player.player.as_mut() {
            state.invincibility = PlayerState::HIT_INVINCIBILITY;
        }
        session.spawn_effect(Session::hit_effect(player_pos));
        session.push_sound(&source, SoundKind::Hit);
    }

    for (kind, template, position) in picked_up {
        collect(&mut session.entities[player_idx], kind);
        session.spawn_effect(Session::pickup_effect(position));
        session.push_sound(&template, SoundKind::Pickup);
    }
}

/// Apply an item's collect behavior to the player.
fn collect(player: &mut Entity, kind: ItemKind) {
    match kind {
        ItemKind::Health { amount } => player.heal(amount),
        ItemKind::Ammo { rounds } => {
            if let Some(state) = player.player.as_mut() {
                state.ammo += rounds;
            }
        }
        ItemKind::Coin { points } => {
            if let Some(state) = player.player.as_mut() {
                state.score += points;
            }
        }
        ItemKind::ExtraLife => {
            if let Some(state) = player.player.as_mut() {
                state.lives += 1;
            }
        }
    }
}
