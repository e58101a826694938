//! Network message types.
//!
//! One message shape covers both outbound snapshots and inbound updates. The
//! payload is a loosely-typed key/value map - peers may ship numbers as JSON
//! numbers or as strings - so every read goes through a defensive accessor
//! that coerces or bails to `None`, never panics.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminant for all peer messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    PlayerConnect,
    PlayerDisconnect,
    PlayerPosition,
    PlayerState,
    LevelChange,
    EntityUpdate,
}

/// A single peer message, outbound or inbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub sender: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub timestamp_ms: u64,
}

impl NetworkMessage {
    pub fn new(msg_type: MessageType, sender: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            msg_type,
            sender: sender.into(),
            data: Map::new(),
            timestamp_ms,
        }
    }

    /// Builder-style payload field.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// Build the local player's state snapshot.
    pub fn snapshot(
        sender: impl Into<String>,
        position: Vec2,
        health: i32,
        ammo: i32,
        alive: bool,
        timestamp_ms: u64,
    ) -> Self {
        Self::new(MessageType::PlayerState, sender, timestamp_ms)
            .with_field("position", format!("{},{}", position.x, position.y))
            .with_field("health", health)
            .with_field("ammo", ammo)
            .with_field("isAlive", alive)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.as_str()
    }

    /// Numeric field, accepting a JSON number or a numeric string.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.data.get(key)? {
            Value::Number(n) => n.as_f64().map(|v| v as f32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.data.get(key)? {
            Value::Number(n) => n.as_i64().map(|v| v as i32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean field, accepting a JSON bool or "true"/"false" strings.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Two-component position payload in `"x,y"` form. Any malformed
    /// component makes the whole field unusable.
    pub fn position(&self) -> Option<Vec2> {
        let raw = self.get_str("position")?;
        let (x, y) = raw.split_once(',')?;
        Some(Vec2::new(
            x.trim().parse().ok()?,
            y.trim().parse().ok()?,
        ))
    }
}
