//! Sidewinder Core - side-scroller simulation.
//!
//! The entity/level model and the per-frame gameplay loop, with no rendering,
//! audio, or I/O of its own. External collaborators drive it:
//!
//! 1. Template/level ingestion hands over validated records (serde/JSON).
//! 2. The frame driver calls [`Session::update`] once per frame with the
//!    current [`FrameInput`].
//! 3. Render/audio sinks read entity positions, frame indices, and drained
//!    sound cues; they never mutate the session.
//! 4. The transport collaborator feeds the replication layer in the
//!    `sidewinder-protocol` crate.
//!
//! All work is synchronous and single-threaded; collections that shrink
//! mid-frame are only mutated through reverse-order passes.

pub mod ai;
pub mod entities;
pub mod error;
pub mod input;
pub mod level;
pub mod physics;
pub mod session;
pub mod settings;
pub mod template;

pub use entities::{Effect, EffectKind, Entity, EntityId, PlayerSlot, PlayerState};
pub use error::SessionError;
pub use input::{FrameInput, HeldInput, PressedKeys};
pub use level::{Level, LevelSet, Trigger, TriggerAction};
pub use physics::Rect;
pub use session::{GameState, Session, SoundCue, SoundKind};
pub use settings::GameSettings;
pub use template::{AiKind, EntityTemplate, ItemKind, TemplateRegistry};
