//! Static identity roster.
//!
//! Loaded once at process start from a JSON file (array of
//! `{"id": "...", "name": "..."}` objects) and immutable afterwards.
//! Resolution is a pure lookup with no side effects.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct RosterEntry {
    id: String,
    name: String,
}

/// Canonical identity as resolved from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: HashMap<String, String>,
}

impl Roster {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read roster file: {}", path))?;
        let entries: Vec<RosterEntry> =
            serde_json::from_str(&raw).with_context(|| format!("Invalid roster JSON: {}", path))?;
        tracing::info!("Roster loaded: {} identities from {}", entries.len(), path);
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (e.id, e.name)),
        ))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Resolve an identity code. Empty or whitespace-only input is simply
    /// not found, never an error.
    pub fn resolve(&self, code: &str) -> Option<Identity> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.entries.get(code).map(|name| Identity {
            id: code.to_string(),
            display_name: name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
