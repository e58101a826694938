//! Error types for the simulation core.
//!
//! Most data problems are recovered locally (skipped field, ignored record)
//! and never surface here; these variants cover the hard preconditions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Template records must carry a non-empty id.
    #[error("template id must not be empty")]
    EmptyTemplateId,

    /// Spawn referenced a template id that was never registered.
    #[error("unknown template id: {0}")]
    TemplateNotFound(String),

    /// The session cannot start without a player template.
    #[error("player template {0:?} is not registered")]
    MissingPlayerTemplate(String),

    /// A session needs at least one level to play.
    #[error("no levels defined")]
    NoLevels,
}
