//! Player snapshot handed to the host's storage layer.
//!
//! The engine never touches disk. Hosts call [`PlayerSnapshot::to_json`],
//! persist the string however they like, and hand it back through
//! [`PlayerSnapshot::from_json`] on load.

use super::actor::Actor;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Corrupt player snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub version: u32,
    pub actor: Actor,
    /// Host clock at capture time.
    pub saved_at_ms: u64,
}

impl PlayerSnapshot {
    pub fn capture(actor: &Actor, now_ms: u64) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            actor: actor.clone(),
            saved_at_ms: now_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot and rebuilds the derived stats of its actor.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        snapshot.actor.refresh_stats();
        Ok(snapshot)
    }

    /// Actor ready to drop into a world. Transient combat state is reset.
    pub fn restore(self) -> Actor {
        let mut actor = self.actor;
        actor.attack_sequence = 0;
        actor.last_attack_time = None;
        actor.buffs = Default::default();
        actor.locks.clear();
        actor
    }
}
