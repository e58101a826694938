//! Enemy movement strategies, keyed by [`AiKind`].
//!
//! Each strategy is a pure function of the entity's current state returning a
//! normalized movement intent; the caller scales it by the template speed.
//! Every variant is currently a stub that holds position - the dispatch and
//! the per-kind seams exist so behaviors can land without touching the
//! update loop.

use glam::Vec2;

use crate::entities::Entity;
use crate::template::AiKind;

/// Movement intent for one frame, as a direction vector.
pub fn movement_intent(kind: AiKind, entity: &Entity) -> Vec2 {
    match kind {
        AiKind::None => Vec2::ZERO,
        AiKind::Walker => walker(entity),
        AiKind::Jumper => jumper(entity),
        AiKind::Shooter => shooter(entity),
        AiKind::Chaser => chaser(entity),
    }
}

// TODO: implement patrol-between-edges once solid collision lands.
fn walker(_entity: &Entity) -> Vec2 {
    Vec2::ZERO
}

fn jumper(_entity: &Entity) -> Vec2 {
    Vec2::ZERO
}

fn shooter(_entity: &Entity) -> Vec2 {
    Vec2::ZERO
}

fn chaser(_entity: &Entity) -> Vec2 {
    Vec2::ZERO
}
