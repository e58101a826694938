//! Wire codec for network messages.
//!
//! JSON on the wire: the payload map is loosely typed, so the format has to
//! be self-describing. Transport framing is the collaborator's problem.

use thiserror::Error;

use crate::NetworkMessage;

/// Errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode a message to bytes.
pub fn encode(message: &NetworkMessage) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(message).map_err(CodecError::Encode)
}

/// Decode a message from bytes.
pub fn decode(data: &[u8]) -> Result<NetworkMessage, CodecError> {
    serde_json::from_slice(data).map_err(CodecError::Decode)
}
