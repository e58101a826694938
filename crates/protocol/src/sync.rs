//! Peer state replication.
//!
//! Best-effort synchronization of player state between peers. Outbound
//! snapshots go out on a fixed tick regardless of frame rate; inbound
//! messages sit in an explicit queue and are drained once per update, so no
//! handler ever runs re-entrant in the middle of a gameplay frame.
//!
//! Applying a message is a pure overwrite: replaying the same snapshot is a
//! no-op after the first application.

use std::collections::VecDeque;

use sidewinder_core::{GameState, Session};

use crate::messages::{MessageType, NetworkMessage};

/// Seconds between outbound state snapshots (10 Hz).
pub const SNAPSHOT_INTERVAL: f32 = 0.1;

/// The replication endpoint for one local session.
///
/// The transport collaborator pushes received messages in with
/// [`Replication::enqueue_inbound`] and ships everything it takes from
/// [`Replication::drain_outbound`]. Connection handshake, retry, and backoff
/// all live transport-side; `connected` here is advisory.
pub struct Replication {
    pub connected: bool,
    local_id: String,
    accumulator: f32,
    /// Monotonic message clock in fractional milliseconds, advanced by
    /// update dt. Truncated to whole ms only at snapshot time so sub-ms
    /// frame remainders never drift the timestamps.
    clock_ms: f64,
    inbound: VecDeque<NetworkMessage>,
    outbound: VecDeque<NetworkMessage>,
}

impl Replication {
    pub fn new(local_id: impl Into<String>) -> Self {
        Self {
            connected: false,
            local_id: local_id.into(),
            accumulator: 0.0,
            clock_ms: 0.0,
            inbound: VecDeque::new(),
            outbound: VecDeque::new(),
        }
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    /// Drop to single-player behavior. Queued messages are discarded.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.inbound.clear();
        self.outbound.clear();
    }

    /// Queue a received message for the next update tick.
    pub fn enqueue_inbound(&mut self, message: NetworkMessage) {
        self.inbound.push_back(message);
    }

    /// Take all pending outbound messages for the transport to ship.
    pub fn drain_outbound(&mut self) -> Vec<NetworkMessage> {
        self.outbound.drain(..).collect()
    }

    /// One network tick: drain the inbound queue into the session, then
    /// emit a snapshot if the fixed send interval elapsed.
    pub fn update(&mut self, session: &mut Session, dt: f32) {
        self.clock_ms += f64::from(dt) * 1000.0;

        while let Some(message) = self.inbound.pop_front() {
            apply_message(session, &message);
        }

        self.accumulator += dt;
        if self.accumulator >= SNAPSHOT_INTERVAL {
            self.accumulator = 0.0;
            self.send_snapshot(session);
        }
    }

    fn send_snapshot(&mut self, session: &Session) {
        if !self.connected || session.state != GameState::Playing {
            return;
        }
        let Some(player) = session.player() else {
            return;
        };
        if !player.is_alive() {
            return;
        }
        let ammo = player.player.as_ref().map_or(0, |s| s.ammo);

        self.outbound.push_back(NetworkMessage::snapshot(
            self.local_id.clone(),
            player.position,
            player.health,
            ammo,
            true,
            self.clock_ms as u64,
        ));
    }
}

/// Apply one inbound message to the session.
///
/// Pure dispatch over the message type; malformed fields are skipped and
/// well-formed ones still apply. Never faults.
pub fn apply_message(session: &mut Session, message: &NetworkMessage) {
    match message.msg_type {
        MessageType::PlayerPosition => {
            let Some(position) = message.position() else {
                tracing::debug!(sender = %message.sender, "unparseable position payload");
                return;
            };
            if let Some(remote) = session.remote_player_mut(&message.sender) {
                remote.position = position;
                // Hitbox follows position immediately, same as a local update.
                remote.update(0.0);
            }
        }
        MessageType::PlayerState => {
            if let Some(position) = message.position() {
                if let Some(remote) = session.remote_player_mut(&message.sender) {
                    remote.position = position;
                }
            }
            if let Some(health) = message.get_i32("health") {
                if let Some(remote) = session.remote_player_mut(&message.sender) {
                    remote.health = health.max(0);
                }
            }
            if let Some(ammo) = message.get_i32("ammo") {
                if let Some(remote) = session.remote_player_mut(&message.sender) {
                    if let Some(state) = remote.player.as_mut() {
                        state.ammo = ammo;
                    }
                }
            }
            if let Some(alive) = message.get_bool("isAlive") {
                if let Some(remote) = session.remote_player_mut(&message.sender) {
                    if !alive {
                        remote.health = 0;
                    }
                }
            }
            if let Some(remote) = session.remote_player_mut(&message.sender) {
                remote.update(0.0);
            }
        }
        MessageType::LevelChange => {
            match message.get_str("level") {
                Some(level_id) => {
                    // Unknown ids are ignored inside the session.
                    session.load_level_by_id(level_id);
                }
                None => {
                    tracing::debug!(sender = %message.sender, "level change without level id");
                }
            }
        }
        // Acknowledged, but no state mutation in this core yet.
        MessageType::PlayerConnect | MessageType::PlayerDisconnect | MessageType::EntityUpdate => {
            tracing::debug!(kind = ?message.msg_type, sender = %message.sender, "acknowledged");
        }
    }
}
