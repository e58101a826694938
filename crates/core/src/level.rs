//! Level definitions and trigger zones.
//!
//! Levels are immutable once ingested; a fresh entity set is derived from the
//! spawn list on every load or reload. Triggers are stateless zones
//! re-evaluated each frame against the player's hitbox.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::Rect;

/// Action fired when the player enters a trigger zone.
///
/// The transport family all resolve a target level id; unrecognized action
/// strings deserialize to `Complete`, treating them as an implicit level
/// completion rather than a fatal data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    NextLevel,
    Portal,
    Door,
    WarpZone,
    Teleporter,
    Elevator,
    Cutscene,
    SavePoint,
    #[serde(other)]
    Complete,
}

impl TriggerAction {
    /// Whether this action transports to a target level by id.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TriggerAction::Portal
                | TriggerAction::Door
                | TriggerAction::WarpZone
                | TriggerAction::Teleporter
                | TriggerAction::Elevator
        )
    }
}

/// A static level-defined trigger zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub zone: Rect,
    pub action: TriggerAction,
    /// Destination level for transport actions.
    #[serde(default)]
    pub target: Option<String>,
}

/// One entity to place when the level loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub template: String,
    pub position: Vec2,
}

/// Background layer scrolled at a fraction of the camera speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub image: String,
    pub factor: f32,
}

/// An immutable level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub background: String,
    /// Where the player starts; falls back to a fixed default when absent.
    #[serde(default)]
    pub player_spawn: Option<Vec2>,
    #[serde(default)]
    pub spawns: Vec<SpawnRecord>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub parallax: Vec<ParallaxLayer>,
}

impl Level {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Ordered collection of levels, addressable by index or id.
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    pub fn new(levels: Vec<Level>) -> Self {
        let mut set = Self::default();
        for level in levels {
            set.insert(level);
        }
        set
    }

    /// Add a level, preserving order. A duplicate id replaces the earlier
    /// definition in place.
    pub fn insert(&mut self, level: Level) {
        if let Some(existing) = self.levels.iter_mut().find(|l| l.id == level.id) {
            *existing = level;
        } else {
            self.levels.push(level);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_string_parses_as_completion() {
        let json = r#"{ "zone": { "min": [0.0, 0.0], "size": [64.0, 64.0] },
                        "action": "victory_dance" }"#;
        let trigger: Trigger = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.action, TriggerAction::Complete);
        assert_eq!(trigger.target, None);
    }

    #[test]
    fn transport_actions_classified() {
        assert!(TriggerAction::Portal.is_transport());
        assert!(TriggerAction::Elevator.is_transport());
        assert!(!TriggerAction::NextLevel.is_transport());
        assert!(!TriggerAction::Cutscene.is_transport());
        assert!(!TriggerAction::SavePoint.is_transport());
    }

    #[test]
    fn duplicate_level_id_replaces_in_place() {
        let mut set = LevelSet::default();
        set.insert(test_support::level("cave"));
        set.insert(test_support::level("summit"));

        let mut replacement = test_support::level("cave");
        replacement.width = 999.0;
        set.insert(replacement);

        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of("cave"), Some(0));
        assert_eq!(set.get(0).unwrap().width, 999.0);
    }
}
