//! Loading profiles from inline JSON or files

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ProfileError, Result};

/// Position of a profile in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSlot {
    /// The profile compared against
    First,
    /// The profile compared with it
    Second,
}

impl ProfileSlot {
    /// 1-based number used in messages
    pub fn number(&self) -> u8 {
        self.index() + 1
    }

    pub(crate) fn index(&self) -> u8 {
        match self {
            ProfileSlot::First => 0,
            ProfileSlot::Second => 1,
        }
    }
}

impl fmt::Display for ProfileSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile {}", self.number())
    }
}

/// Load a profile, preferring inline JSON over a file path
pub fn load(slot: ProfileSlot, json: Option<&str>, path: Option<&Path>) -> Result<Value> {
    if let Some(json) = json {
        debug!(%slot, "parsing inline profile");
        return serde_json::from_str(json)
            .map_err(|source| ProfileError::InvalidJson { slot, source });
    }

    let path = path.ok_or(ProfileError::Missing(slot))?;
    debug!(%slot, path = %path.display(), "reading profile file");
    let unreadable = |reason: String| ProfileError::Unreadable {
        slot,
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
}
