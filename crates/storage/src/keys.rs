use std::fmt;

use crate::error::StorageError;

/// The fixed set of persisted records. Each holds one JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    /// Hangar calibration offset, integer milliseconds.
    HangarSync,
    /// Vault door sync instant, integer milliseconds or null.
    VaultSync,
    /// `[{id, collected, timerEnd}]`
    CompBoards,
    /// `[{id, claimed}]`
    Ships,
    /// `{printer id: bool}`
    SupervisorCollected,
    /// `{printer id: expiry or null}`
    SupervisorTimers,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::HangarSync,
        StorageKey::VaultSync,
        StorageKey::CompBoards,
        StorageKey::Ships,
        StorageKey::SupervisorCollected,
        StorageKey::SupervisorTimers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HangarSync => "cz-hangar-sync",
            Self::VaultSync => "cz-vault-sync",
            Self::CompBoards => "cz-compboards",
            Self::Ships => "cz-ships",
            Self::SupervisorCollected => "cz-supervisor-collected",
            Self::SupervisorTimers => "cz-supervisor-timers",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StorageError> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| StorageError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
