//! Trigger-zone detection and action dispatch.
//!
//! Static triggers are evaluated in the order the level defines them; the
//! first zone containing the player wins and the rest (including the
//! dynamic exit-entity check) are skipped for that frame.

use crate::level::{Trigger, TriggerAction};

use super::{GameState, Session};

pub(crate) fn run(session: &mut Session) {
    let Some(player) = session.player() else {
        return;
    };
    let player_hitbox = player.hitbox;

    let fired = session.current_level().and_then(|level| {
        level
            .triggers
            .iter()
            .find(|t| t.zone.intersects(&player_hitbox))
            .cloned()
    });

    if let Some(trigger) = fired {
        dispatch(session, &trigger);
        return;
    }

    // No static trigger this frame: an exit-tagged dynamic entity touching
    // the player also completes the level.
    let exit_touched = session
        .entities
        .iter()
        .any(|e| !e.is_local_player() && e.is_exit_trigger() && e.hitbox.intersects(&player_hitbox));
    if exit_touched {
        session.complete_level();
    }
}

fn dispatch(session: &mut Session, trigger: &Trigger) {
    match trigger.action {
        // A targeted next_level jumps straight to the named level; without
        // a target it completes the current one.
        TriggerAction::NextLevel => match &trigger.target {
            Some(id) => {
                session.load_level_by_id(id);
            }
            None => session.complete_level(),
        },
        TriggerAction::Complete => session.complete_level(),
        TriggerAction::Portal
        | TriggerAction::Door
        | TriggerAction::WarpZone
        | TriggerAction::Teleporter
        | TriggerAction::Elevator => match &trigger.target {
            Some(id) => {
                session.load_level_by_id(id);
            }
            None => {
                tracing::warn!(action = ?trigger.action, "transport trigger without target");
            }
        },
        TriggerAction::Cutscene => {
            session.state = GameState::Cutscene;
        }
        TriggerAction::SavePoint => {}
    }
}
