//! Error types for profile loading

use std::path::PathBuf;

use thiserror::Error;

use crate::load::ProfileSlot;

/// Error type for profile loading
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Neither inline JSON nor a path was given
    #[error("either 'profile_json{n}' or 'profile_path{n}' needs to be set", n = .0.number())]
    Missing(ProfileSlot),

    /// Inline JSON did not parse
    #[error("'profile_json{}' is invalid JSON: {source}", .slot.number())]
    InvalidJson {
        slot: ProfileSlot,
        #[source]
        source: serde_json::Error,
    },

    /// The profile file could not be read or parsed
    #[error("could not read 'profile_path{}' at '{}': {reason}", .slot.number(), .path.display())]
    Unreadable {
        slot: ProfileSlot,
        path: PathBuf,
        reason: String,
    },
}

impl ProfileError {
    /// Status code reported for this error
    ///
    /// 10/11 missing input, 12/14 invalid JSON, 13/15 unreadable file, for
    /// the first and second profile respectively.
    pub fn status(&self) -> u8 {
        match self {
            ProfileError::Missing(slot) => 10 + slot.index(),
            ProfileError::InvalidJson { slot, .. } => 12 + 2 * slot.index(),
            ProfileError::Unreadable { slot, .. } => 13 + 2 * slot.index(),
        }
    }
}

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;
