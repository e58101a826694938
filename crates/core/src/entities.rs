//! Runtime entity instances and transient effects.
//!
//! Entities are stored in a plain `Vec` for stable, deterministic iteration
//! order. Each instance holds an `Arc` to its template - defaults are copied
//! at spawn, the blueprint itself is never duplicated.

use std::sync::Arc;

use glam::Vec2;

use crate::ai;
use crate::error::SessionError;
use crate::physics::Rect;
use crate::template::{EntityTemplate, TemplateRegistry};

/// Unique identifier for an entity within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Hands out entity ids, monotonically.
#[derive(Debug, Clone)]
pub struct EntityIdGenerator {
    next_id: u32,
}

impl EntityIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Which peer a player entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSlot {
    Local,
    Remote(String),
}

/// Player-only state layered on top of the base entity.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub ammo: i32,
    pub score: u32,
    pub lives: u32,
    /// Seconds of post-hit invincibility remaining.
    pub invincibility: f32,
    pub slot: PlayerSlot,
}

impl PlayerState {
    pub const STARTING_AMMO: i32 = 50;
    pub const STARTING_LIVES: u32 = 3;
    /// Post-hit grace period so a sustained overlap is not a per-frame drain.
    pub const HIT_INVINCIBILITY: f32 = 1.5;

    pub fn local() -> Self {
        Self {
            ammo: Self::STARTING_AMMO,
            score: 0,
            lives: Self::STARTING_LIVES,
            invincibility: 0.0,
            slot: PlayerSlot::Local,
        }
    }

    pub fn remote(peer_id: impl Into<String>) -> Self {
        Self {
            slot: PlayerSlot::Remote(peer_id.into()),
            ..Self::local()
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }
}

/// A mutable runtime entity.
///
/// The hitbox is derived state: it is recomputed from position + template
/// dimensions at the end of every update and never edited directly.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub template: Arc<EntityTemplate>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: i32,
    pub anim_clock: f32,
    pub frame: usize,
    pub hitbox: Rect,
    /// Present on player entities (local or remote peer).
    pub player: Option<PlayerState>,
}

impl Entity {
    /// Construct an entity from a registered template, copying its defaults.
    pub fn spawn(
        registry: &TemplateRegistry,
        template_id: &str,
        position: Vec2,
        id: EntityId,
    ) -> Result<Self, SessionError> {
        let template = registry
            .get(template_id)
            .ok_or_else(|| SessionError::TemplateNotFound(template_id.to_string()))?;
        Ok(Self::from_template(template, position, id))
    }

    pub fn from_template(template: Arc<EntityTemplate>, position: Vec2, id: EntityId) -> Self {
        let hitbox = Rect::from_pos_size(position, template.size());
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            health: template.max_health,
            anim_clock: 0.0,
            frame: 0,
            hitbox,
            player: None,
            template,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_enemy(&self) -> bool {
        self.template.enemy
    }

    pub fn is_item(&self) -> bool {
        self.template.item.is_some()
    }

    pub fn is_exit_trigger(&self) -> bool {
        self.template.exit_trigger
    }

    pub fn is_local_player(&self) -> bool {
        matches!(
            self.player,
            Some(PlayerState {
                slot: PlayerSlot::Local,
                ..
            })
        )
    }

    /// Peer id if this entity is a remote player.
    pub fn remote_peer(&self) -> Option<&str> {
        match &self.player {
            Some(PlayerState {
                slot: PlayerSlot::Remote(id),
                ..
            }) => Some(id),
            _ => None,
        }
    }

    /// Apply damage, flooring health at zero.
    pub fn apply_damage(&mut self, damage: i32) {
        self.health = (self.health - damage.max(0)).max(0);
    }

    /// Heal up to the template maximum.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.template.max_health);
    }

    /// Advance this entity by one frame.
    ///
    /// Animation clock, AI intent for enemies with a real policy, then an
    /// unconditional hitbox recompute so no frame observes a stale hitbox.
    pub fn update(&mut self, dt: f32) {
        self.advance_animation(dt);

        if self.template.enemy && !self.template.ai.is_trivial() {
            let intent = ai::movement_intent(self.template.ai, self);
            self.velocity = intent * self.template.speed;
            self.position += self.velocity * dt;
        }

        self.hitbox = Rect::from_pos_size(self.position, self.template.size());
    }

    fn advance_animation(&mut self, dt: f32) {
        let template = Arc::clone(&self.template);
        let Some(animation) = template.animation.as_ref() else {
            return;
        };
        if animation.frame_durations.is_empty() {
            return;
        }
        // A cycle with no positive duration can never consume the clock;
        // hold the current frame instead of spinning.
        if animation.frame_durations.iter().sum::<f32>() <= 0.0 {
            return;
        }

        self.anim_clock += dt;
        let last = animation.frame_count() - 1;

        while self.anim_clock >= animation.frame_durations[self.frame.min(last)] {
            self.anim_clock -= animation.frame_durations[self.frame.min(last)];
            if self.frame < last {
                self.frame += 1;
            } else if animation.looping {
                self.frame = 0;
            } else {
                // Hold on the final frame; stop accumulating clock drift.
                self.anim_clock = 0.0;
                break;
            }
        }
    }
}

/// Kind of transient effect, for the render/audio collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Hit,
    Pickup,
    Explosion,
}

/// Transient visual entity; self-terminates when its lifetime elapses.
#[derive(Debug, Clone)]
pub struct Effect {
    pub position: Vec2,
    pub kind: EffectKind,
    /// Total lifetime in seconds.
    pub lifetime: f32,
    pub elapsed: f32,
}

impl Effect {
    pub fn new(position: Vec2, kind: EffectKind, lifetime: f32) -> Self {
        Self {
            position,
            kind,
            lifetime,
            elapsed: 0.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::test_support;
    use crate::template::Animation;

    fn registry_with(templates: Vec<EntityTemplate>) -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        for t in templates {
            registry.insert(t).unwrap();
        }
        registry
    }

    #[test]
    fn spawn_copies_template_defaults() {
        let mut t = test_support::template("grunt");
        t.max_health = 40;
        let registry = registry_with(vec![t]);

        let e = Entity::spawn(&registry, "grunt", Vec2::new(10.0, 20.0), EntityId(1)).unwrap();
        assert_eq!(e.health, 40);
        assert_eq!(e.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn spawn_unknown_template_fails() {
        let registry = TemplateRegistry::new();
        let err = Entity::spawn(&registry, "ghost", Vec2::ZERO, EntityId(1)).unwrap_err();
        assert!(matches!(err, SessionError::TemplateNotFound(id) if id == "ghost"));
    }

    #[test]
    fn hitbox_matches_template_dimensions_anywhere() {
        let registry = registry_with(vec![test_support::template("crate")]);
        for pos in [Vec2::ZERO, Vec2::new(512.0, -40.0), Vec2::new(3.5, 7.25)] {
            let mut e = Entity::spawn(&registry, "crate", pos, EntityId(1)).unwrap();
            e.update(1.0 / 60.0);
            assert_eq!(e.hitbox.size, e.template.size());
            assert_eq!(e.hitbox.min, e.position);
        }
    }

    #[test]
    fn damage_is_floor_clamped() {
        let registry = registry_with(vec![test_support::template("grunt")]);
        let mut e = Entity::spawn(&registry, "grunt", Vec2::ZERO, EntityId(1)).unwrap();

        e.apply_damage(30);
        assert_eq!(e.health, 70);
        e.apply_damage(1000);
        assert_eq!(e.health, 0);
        e.apply_damage(5);
        assert_eq!(e.health, 0);
        // Negative damage is not a heal channel.
        e.apply_damage(-50);
        assert_eq!(e.health, 0);
    }

    #[test]
    fn looping_animation_wraps() {
        let mut t = test_support::template("coin");
        t.animation = Some(Animation {
            frame_durations: vec![0.1, 0.1, 0.1],
            looping: true,
        });
        let registry = registry_with(vec![t]);
        let mut e = Entity::spawn(&registry, "coin", Vec2::ZERO, EntityId(1)).unwrap();

        e.update(0.25);
        assert_eq!(e.frame, 2);
        e.update(0.1);
        assert_eq!(e.frame, 0);
    }

    #[test]
    fn non_looping_animation_clamps_to_last_frame() {
        let mut t = test_support::template("door");
        t.animation = Some(Animation {
            frame_durations: vec![0.1, 0.1, 0.1],
            looping: false,
        });
        let registry = registry_with(vec![t]);
        let mut e = Entity::spawn(&registry, "door", Vec2::ZERO, EntityId(1)).unwrap();

        // Run far past the total duration; the index must hold at N-1.
        for _ in 0..100 {
            e.update(0.1);
        }
        assert_eq!(e.frame, 2);
    }

    #[test]
    fn zero_duration_looping_animation_holds_frame() {
        // All-zero durations can never consume the clock; the update must
        // return instead of cycling the frame index forever.
        let mut t = test_support::template("glitch");
        t.animation = Some(Animation {
            frame_durations: vec![0.0, 0.0],
            looping: true,
        });
        let registry = registry_with(vec![t]);
        let mut e = Entity::spawn(&registry, "glitch", Vec2::ZERO, EntityId(1)).unwrap();

        e.update(1.0 / 60.0);
        assert_eq!(e.frame, 0);
    }

    #[test]
    fn effect_expiry() {
        let mut fx = Effect::new(Vec2::ZERO, EffectKind::Hit, 0.5);
        assert!(!fx.is_expired());
        fx.elapsed = 0.5;
        assert!(fx.is_expired());
    }
}
