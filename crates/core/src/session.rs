//! The game session: state machine, per-frame update loop, level loading.
//!
//! This is the heart of the game. One `Session` owns all mutable gameplay
//! state and is advanced by the external frame driver with one `update` call
//! per frame. No ambient globals - everything threads through this struct so
//! state transitions are unit-testable without a render context.

pub mod collision;
pub mod trigger;

use glam::Vec2;

use crate::entities::{Effect, Entity, EntityIdGenerator, PlayerState};
use crate::error::SessionError;
use crate::input::FrameInput;
use crate::level::{Level, LevelSet};
use crate::template::TemplateRegistry;

/// Top-level gameplay state. Exactly one state is active per frame; the
/// other states' update logic is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
    Cutscene,
}

/// Event-triggered sound cue for the audio collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCue {
    /// Template id of the entity that caused the cue, when one did.
    pub template: String,
    pub kind: SoundKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Hit,
    Pickup,
    LevelComplete,
    PlayerDeath,
}

/// All mutable session state, threaded through update/draw calls.
#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    pub templates: TemplateRegistry,
    pub levels: LevelSet,
    pub level_index: usize,
    /// Level index to load when the player confirms a LevelComplete screen.
    pending_level: usize,
    /// The active entity set. Fully replaced on every level load.
    pub entities: Vec<Entity>,
    pub effects: Vec<Effect>,
    entity_ids: EntityIdGenerator,
    player_template: String,
    /// Advisory flag for the external level editor; set on Tab in the menu,
    /// cleared by whoever consumes it.
    pub editor_requested: bool,
    sounds: Vec<SoundCue>,
}

impl Session {
    /// Where the player lands when a level defines no spawn marker.
    pub const DEFAULT_SPAWN: Vec2 = Vec2::new(64.0, 64.0);

    const HIT_EFFECT_LIFETIME: f32 = 0.4;
    const PICKUP_EFFECT_LIFETIME: f32 = 0.3;

    /// Build a session. The player template must already be registered -
    /// the session cannot exist without it - and at least one level must be
    /// defined.
    pub fn new(
        templates: TemplateRegistry,
        levels: LevelSet,
        player_template: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let player_template = player_template.into();
        if !templates.contains(&player_template) {
            return Err(SessionError::MissingPlayerTemplate(player_template));
        }
        if levels.is_empty() {
            return Err(SessionError::NoLevels);
        }

        Ok(Self {
            state: GameState::Menu,
            templates,
            levels,
            level_index: 0,
            pending_level: 0,
            entities: Vec::new(),
            effects: Vec::new(),
            entity_ids: EntityIdGenerator::new(),
            player_template,
            editor_requested: false,
            sounds: Vec::new(),
        })
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.level_index)
    }

    /// The local player entity, if one is in the active set.
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_local_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_local_player())
    }

    /// The remote player entity for a peer id, if connected.
    pub fn remote_player_mut(&mut self, peer_id: &str) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.remote_peer() == Some(peer_id))
    }

    /// Register a remote peer as a player entity. Invoked by the transport
    /// collaborator when a peer connects. No-op if the peer already exists.
    pub fn add_remote_player(&mut self, peer_id: &str) {
        if self
            .entities
            .iter()
            .any(|e| e.remote_peer() == Some(peer_id))
        {
            return;
        }
        let Some(template) = self.templates.get(&self.player_template) else {
            return;
        };
        let mut remote =
            Entity::from_template(template, Self::DEFAULT_SPAWN, self.entity_ids.next());
        remote.player = Some(PlayerState::remote(peer_id));
        tracing::info!(peer = peer_id, "remote player joined");
        self.entities.push(remote);
    }

    /// Sound cues accumulated since the last drain.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    pub(crate) fn push_sound(&mut self, template: &str, kind: SoundKind) {
        self.sounds.push(SoundCue {
            template: template.to_string(),
            kind,
        });
    }

    /// Advance the session by one frame.
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        match self.state {
            GameState::Menu => self.update_menu(input),
            GameState::Playing => self.update_playing(input, dt),
            GameState::Paused => {
                if input.pressed.escape() {
                    self.set_state(GameState::Playing);
                }
            }
            GameState::LevelComplete => {
                if input.pressed.enter() {
                    self.level_index = self.pending_level;
                    self.load_level(self.level_index);
                    self.set_state(GameState::Playing);
                }
            }
            GameState::GameOver => {
                if input.pressed.enter() {
                    self.entities.clear();
                    self.effects.clear();
                    self.set_state(GameState::Menu);
                }
            }
            GameState::Cutscene => {
                if input.pressed.enter() || input.pressed.space() {
                    self.set_state(GameState::Playing);
                }
            }
        }
    }

    fn update_menu(&mut self, input: &FrameInput) {
        if input.pressed.enter() {
            self.level_index = 0;
            self.load_level(0);
            self.set_state(GameState::Playing);
        } else if input.pressed.tab() {
            // Editor activation is external; the state machine stays put.
            self.editor_requested = true;
        }
    }

    fn update_playing(&mut self, input: &FrameInput, dt: f32) {
        if input.pressed.escape() {
            self.set_state(GameState::Paused);
            return;
        }

        self.move_player(input, dt);

        for entity in &mut self.entities {
            entity.update(dt);
        }
        if let Some(player) = self.player_mut() {
            if let Some(state) = player.player.as_mut() {
                state.invincibility = (state.invincibility - dt).max(0.0);
            }
        }

        collision::resolve(self);

        if self.local_player_dead() {
            self.handle_player_death();
            return;
        }

        trigger::run(self);

        // Age effects in reverse so removal never skips an element.
        for i in (0..self.effects.len()).rev() {
            self.effects[i].elapsed += dt;
            if self.effects[i].is_expired() {
                self.effects.remove(i);
            }
        }
    }

    fn move_player(&mut self, input: &FrameInput, dt: f32) {
        let bounds = match self.current_level() {
            Some(level) => level.bounds(),
            None => return,
        };
        let Some(player) = self.player_mut() else {
            return;
        };

        let dir = Vec2::new(
            input.held.horizontal() as f32,
            input.held.vertical() as f32,
        );
        player.velocity = if dir != Vec2::ZERO {
            dir.normalize() * player.template.speed
        } else {
            Vec2::ZERO
        };
        player.position += player.velocity * dt;
        player.position = bounds.clamp_with_size(player.position, player.template.size());
    }

    fn local_player_dead(&self) -> bool {
        self.player().is_some_and(|p| !p.is_alive())
    }

    fn handle_player_death(&mut self) {
        let template = self
            .player()
            .map(|p| p.template.id.clone())
            .unwrap_or_default();
        self.push_sound(&template, SoundKind::PlayerDeath);

        let lives_left = {
            let Some(player) = self.player_mut() else {
                return;
            };
            let Some(state) = player.player.as_mut() else {
                return;
            };
            state.lives = state.lives.saturating_sub(1);
            state.lives
        };

        if lives_left == 0 {
            tracing::info!("out of lives");
            self.set_state(GameState::GameOver);
            return;
        }

        // A life remains: reload the current level with restored health.
        tracing::info!(lives_left, "player died, reloading level");
        if let Some(player) = self.player_mut() {
            player.health = player.template.max_health;
            if let Some(state) = player.player.as_mut() {
                state.invincibility = PlayerState::HIT_INVINCIBILITY;
            }
        }
        self.load_level(self.level_index);
    }

    /// Mark the current level finished. Moves to GameOver when the next
    /// index runs past the defined levels, otherwise to the LevelComplete
    /// screen with the next level pending.
    pub(crate) fn complete_level(&mut self) {
        let template = self
            .current_level()
            .map(|l| l.id.clone())
            .unwrap_or_default();
        self.push_sound(&template, SoundKind::LevelComplete);

        let next = self.level_index + 1;
        if next >= self.levels.len() {
            tracing::info!("final level complete");
            self.set_state(GameState::GameOver);
        } else {
            self.pending_level = next;
            self.set_state(GameState::LevelComplete);
        }
    }

    /// Load a level by id. Returns false (and changes nothing) when the id
    /// is unknown.
    pub fn load_level_by_id(&mut self, id: &str) -> bool {
        match self.levels.index_of(id) {
            Some(index) => {
                self.level_index = index;
                self.load_level(index);
                true
            }
            None => {
                tracing::warn!(level = id, "unknown level id, ignoring");
                false
            }
        }
    }

    /// Replace the active entity set from a level's spawn records.
    ///
    /// The existing player instance (with its ammo/score/lives) is carried
    /// over and re-added at the level's spawn marker, or the fixed default
    /// when none is defined. Remote player entities are carried over too.
    pub fn load_level(&mut self, index: usize) {
        let Some(level) = self.levels.get(index) else {
            tracing::warn!(index, "load of undefined level index, ignoring");
            return;
        };
        let level_id = level.id.clone();
        let spawn_point = level.player_spawn.unwrap_or(Self::DEFAULT_SPAWN);
        let spawns = level.spawns.clone();

        // Carry player entities (local + remotes) across the rebuild.
        let mut carried: Vec<Entity> = Vec::new();
        let mut i = 0;
        while i < self.entities.len() {
            if self.entities[i].player.is_some() {
                carried.push(self.entities.remove(i));
            } else {
                i += 1;
            }
        }

        self.entities.clear();
        self.effects.clear();

        let mut player = match carried.iter().position(|e| e.is_local_player()) {
            Some(pos) => carried.remove(pos),
            None => {
                // First load of a session: mint the local player.
                let template = match self.templates.get(&self.player_template) {
                    Some(t) => t,
                    None => return,
                };
                let mut p = Entity::from_template(template, spawn_point, self.entity_ids.next());
                p.player = Some(PlayerState::local());
                p
            }
        };
        player.position = spawn_point;
        player.update(0.0);
        self.entities.push(player);
        // Remote peers persist across level changes.
        self.entities.extend(carried);

        for record in &spawns {
            match Entity::spawn(
                &self.templates,
                &record.template,
                record.position,
                self.entity_ids.next(),
            ) {
                Ok(entity) => self.entities.push(entity),
                Err(err) => {
                    // A bad spawn record degrades the level, never the session.
                    tracing::warn!(%err, "skipping spawn record");
                }
            }
        }

        tracing::info!(
            level = %level_id,
            entities = self.entities.len(),
            "level loaded"
        );
    }

    pub(crate) fn spawn_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn hit_effect(position: Vec2) -> Effect {
        Effect::new(
            position,
            crate::entities::EffectKind::Hit,
            Self::HIT_EFFECT_LIFETIME,
        )
    }

    pub(crate) fn pickup_effect(position: Vec2) -> Effect {
        Effect::new(
            position,
            crate::entities::EffectKind::Pickup,
            Self::PICKUP_EFFECT_LIFETIME,
        )
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::input::{FrameInput, HeldInput, PressedKeys};
    use crate::level::SpawnRecord;

    const DT: f32 = 1.0 / 60.0;

    fn press(bits: u16) -> FrameInput {
        FrameInput::with_pressed(bits)
    }

    #[test]
    fn session_requires_player_template() {
        let templates = TemplateRegistry::new();
        let mut levels = LevelSet::default();
        levels.insert(crate::level::test_support::level("a"));
        let err = Session::new(templates, levels, "player").unwrap_err();
        assert!(matches!(err, SessionError::MissingPlayerTemplate(_)));
    }

    #[test]
    fn session_is_debug_formattable() {
        let s = session(1);
        let dump = format!("{s:?}");
        assert!(dump.contains("Menu"));
    }

    #[test]
    fn enter_starts_level_zero() {
        let mut s = session(3);
        assert_eq!(s.state, GameState::Menu);
        assert!(s.player().is_none());

        s.update(&press(PressedKeys::ENTER), DT);
        assert_eq!(s.state, GameState::Playing);
        assert_eq!(s.level_index, 0);
        assert!(s.player().is_some());
    }

    #[test]
    fn tab_in_menu_requests_editor_without_transition() {
        let mut s = session(1);
        s.update(&press(PressedKeys::TAB), DT);
        assert!(s.editor_requested);
        assert_eq!(s.state, GameState::Menu);
    }

    #[test]
    fn escape_toggles_pause() {
        let mut s = playing_session(1);
        s.update(&press(PressedKeys::ESCAPE), DT);
        assert_eq!(s.state, GameState::Paused);
        s.update(&press(PressedKeys::ESCAPE), DT);
        assert_eq!(s.state, GameState::Playing);
    }

    #[test]
    fn paused_frame_freezes_entities() {
        let mut s = playing_session(1);
        spawn_in_level(&mut s, "grunt", 500.0, 100.0);
        s.update(&press(PressedKeys::ESCAPE), DT);

        let before: Vec<_> = s.entities.iter().map(|e| e.position).collect();
        let held = FrameInput {
            held: HeldInput::from_bits(HeldInput::RIGHT),
            pressed: PressedKeys::new(),
        };
        s.update(&held, DT);
        let after: Vec<_> = s.entities.iter().map(|e| e.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn cutscene_resumes_on_enter_or_space() {
        let mut s = playing_session(1);
        s.state = GameState::Cutscene;
        s.update(&press(PressedKeys::SPACE), DT);
        assert_eq!(s.state, GameState::Playing);

        s.state = GameState::Cutscene;
        s.update(&press(PressedKeys::ENTER), DT);
        assert_eq!(s.state, GameState::Playing);
    }

    #[test]
    fn game_over_returns_to_menu() {
        let mut s = playing_session(1);
        s.state = GameState::GameOver;
        s.update(&press(PressedKeys::ENTER), DT);
        assert_eq!(s.state, GameState::Menu);
        assert!(s.entities.is_empty());
    }

    #[test]
    fn load_fully_replaces_entity_set() {
        let mut s = playing_session(2);
        spawn_in_level(&mut s, "grunt", 500.0, 100.0);
        spawn_in_level(&mut s, "item_health", 700.0, 100.0);

        // Give the second level its own spawn list.
        let mut replacement = crate::level::test_support::level("level_1");
        replacement.spawns = vec![SpawnRecord {
            template: "grunt".to_string(),
            position: Vec2::new(300.0, 50.0),
        }];
        s.levels.insert(replacement);

        s.load_level_by_id("level_1");

        // Only the carried player plus level_1 spawns remain.
        assert_eq!(s.entities.len(), 2);
        assert!(s.entities.iter().any(|e| e.is_local_player()));
        assert!(s
            .entities
            .iter()
            .all(|e| e.is_local_player() || e.position == Vec2::new(300.0, 50.0)));
    }

    #[test]
    fn player_stats_survive_level_load() {
        let mut s = playing_session(2);
        if let Some(state) = s.player_mut().unwrap().player.as_mut() {
            state.score = 4200;
            state.ammo = 7;
        }
        s.load_level_by_id("level_1");

        let state = s.player().unwrap().player.as_ref().unwrap();
        assert_eq!(state.score, 4200);
        assert_eq!(state.ammo, 7);
    }

    #[test]
    fn bad_spawn_record_is_skipped_not_fatal() {
        let mut s = session(1);
        let mut lvl = crate::level::test_support::level("level_0");
        lvl.spawns = vec![
            SpawnRecord {
                template: "no_such_template".to_string(),
                position: Vec2::ZERO,
            },
            SpawnRecord {
                template: "grunt".to_string(),
                position: Vec2::new(10.0, 10.0),
            },
        ];
        s.levels.insert(lvl);

        s.update(&press(PressedKeys::ENTER), DT);
        // Player + the one valid record.
        assert_eq!(s.entities.len(), 2);
    }

    #[test]
    fn completing_last_level_is_game_over() {
        // Ten levels, player finishes index 9: no level 10 to load.
        let mut s = playing_session(10);
        s.level_index = 9;
        s.load_level(9);

        s.complete_level();
        assert_eq!(s.state, GameState::GameOver);
    }

    #[test]
    fn completing_mid_level_waits_for_confirm() {
        let mut s = playing_session(3);
        s.complete_level();
        assert_eq!(s.state, GameState::LevelComplete);
        assert_eq!(s.level_index, 0);

        s.update(&press(PressedKeys::ENTER), DT);
        assert_eq!(s.state, GameState::Playing);
        assert_eq!(s.level_index, 1);
    }

    #[test]
    fn death_consumes_life_and_reloads() {
        let mut s = playing_session(2);
        s.player_mut().unwrap().health = 0;
        s.update(&FrameInput::none(), DT);

        assert_eq!(s.state, GameState::Playing);
        let player = s.player().unwrap();
        assert_eq!(player.health, player.template.max_health);
        assert_eq!(player.player.as_ref().unwrap().lives, PlayerState::STARTING_LIVES - 1);
    }

    #[test]
    fn death_without_lives_is_game_over() {
        let mut s = playing_session(2);
        if let Some(state) = s.player_mut().unwrap().player.as_mut() {
            state.lives = 1;
        }
        s.player_mut().unwrap().health = 0;
        s.update(&FrameInput::none(), DT);
        assert_eq!(s.state, GameState::GameOver);
    }

    #[test]
    fn held_input_moves_player_within_bounds() {
        let mut s = playing_session(1);
        let start = s.player().unwrap().position;
        let input = FrameInput {
            held: HeldInput::from_bits(HeldInput::RIGHT),
            pressed: PressedKeys::new(),
        };
        s.update(&input, DT);
        let after = s.player().unwrap().position;
        assert!(after.x > start.x);
        assert_eq!(after.y, start.y);
        // Hitbox kept in lockstep with position.
        assert_eq!(s.player().unwrap().hitbox.min, after);
    }

    #[test]
    fn effects_age_out() {
        let mut s = playing_session(1);
        s.spawn_effect(Session::hit_effect(Vec2::ZERO));
        for _ in 0..30 {
            s.update(&FrameInput::none(), DT);
        }
        assert!(s.effects.is_empty());
    }

    #[test]
    fn remote_player_added_once() {
        let mut s = playing_session(1);
        s.add_remote_player("peer_a");
        s.add_remote_player("peer_a");
        let remotes = s
            .entities
            .iter()
            .filter(|e| e.remote_peer() == Some("peer_a"))
            .count();
        assert_eq!(remotes, 1);
    }

    #[test]
    fn exactly_one_local_player_while_playing() {
        let mut s = playing_session(3);
        s.add_remote_player("peer_a");
        s.load_level_by_id("level_2");
        let locals = s.entities.iter().filter(|e| e.is_local_player()).count();
        assert_eq!(locals, 1);
        // Remote carried across the load as well.
        assert!(s.entities.iter().any(|e| e.remote_peer() == Some("peer_a")));
    }
}
