//! Entity templates - immutable blueprints for entity kinds.
//!
//! Templates are loaded once by the external ingestion layer (thin JSON
//! wrapper) and shared by `Arc` across every instance of that kind. They are
//! never mutated after load.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Kind of AI policy an enemy runs.
///
/// Each variant maps to a pure `(entity) -> movement intent` strategy in
/// [`crate::ai`]. All strategies are currently stubs (open extension point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    #[default]
    None,
    Walker,
    Jumper,
    Shooter,
    Chaser,
}

impl AiKind {
    /// Whether this kind has an actual policy attached.
    pub fn is_trivial(&self) -> bool {
        matches!(self, AiKind::None)
    }
}

/// What picking up an item does to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Restore health, capped at the player's template maximum.
    Health { amount: i32 },
    /// Add rounds to the player's ammo pool.
    Ammo { rounds: i32 },
    /// Add points to the player's score.
    Coin { points: u32 },
    /// Grant an extra life.
    ExtraLife,
}

/// A single attack an entity kind can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    pub damage: i32,
    /// Cooldown between uses, in seconds.
    pub cooldown: f32,
    pub range: f32,
}

/// Frame-by-frame animation descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Per-frame display durations, in seconds.
    pub frame_durations: Vec<f32>,
    /// Wrap to frame 0 after the last frame, or hold on it.
    pub looping: bool,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frame_durations.len()
    }
}

/// Immutable blueprint for an entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    /// Damage dealt to the player on contact (enemies only).
    #[serde(default)]
    pub damage: i32,
    /// Movement speed in units per second.
    #[serde(default)]
    pub speed: f32,
    /// Solid entities block movement (platforms, walls).
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub enemy: bool,
    #[serde(default)]
    pub ai: AiKind,
    /// Present on collectible items; drives the pickup effect.
    #[serde(default)]
    pub item: Option<ItemKind>,
    /// Touching the player completes the level (dynamic exit entities).
    #[serde(default)]
    pub exit_trigger: bool,
    /// Texture key for the render collaborator.
    #[serde(default)]
    pub sprite: String,
    #[serde(default)]
    pub animation: Option<Animation>,
    #[serde(default)]
    pub attacks: Vec<AttackSpec>,
}

impl EntityTemplate {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Arena of templates addressed by stable string id.
///
/// Entities hold an `Arc` into this arena, never a copy of the template.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<EntityTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. A duplicate id overwrites the prior entry;
    /// an empty id is rejected before it can poison lookups.
    pub fn insert(&mut self, template: EntityTemplate) -> Result<(), SessionError> {
        if template.id.is_empty() {
            return Err(SessionError::EmptyTemplateId);
        }
        if self
            .templates
            .insert(template.id.clone(), Arc::new(template))
            .is_some()
        {
            tracing::debug!("template overwritten by duplicate id");
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<EntityTemplate>> {
        self.templates.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
