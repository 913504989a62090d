//! Combat logging
//!
//! Append-only ordered record of everything that happened in an encounter.
//! External UIs render entries as-is; the batch runner keeps full logs only
//! for a bounded sample of runs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::engine::Outcome;

/// Types of combat log events for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    /// Damage dealt (direct or tick)
    Damage,
    /// Healing done (direct or tick)
    Healing,
    /// A spell was cast
    SpellCast,
    /// Buff/debuff/dot/hot applied
    EffectApplied,
    /// Timed effect ran out
    EffectExpired,
    /// Combatant died
    Death,
    /// Action failed because its target became invalid
    Fizzle,
    /// Actor skipped its action phase
    Skip,
    /// Encounter event (start, end, round marker)
    MatchEvent,
}

/// A single entry in the combat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub kind: LogKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    /// Human-readable description of the event
    pub message: String,
}

/// The append-only combat log for one encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatLog {
    pub entries: Vec<LogEntry>,
}

/// Metadata wrapped around a saved log for post-match analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub winner: Option<Outcome>,
    pub rounds: u32,
    pub side_a: Vec<String>,
    pub side_b: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct SavedLog<'a> {
    metadata: &'a MatchMetadata,
    entries: &'a [LogEntry],
}

impl CombatLog {
    /// Clear the log for a new encounter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a new entry.
    pub fn log(
        &mut self,
        round: u32,
        kind: LogKind,
        source: Option<String>,
        target: Option<String>,
        value: Option<f32>,
        message: String,
    ) {
        self.entries.push(LogEntry {
            round,
            source,
            target,
            kind,
            value,
            message,
        });
    }

    /// Append an encounter-level event with no source/target.
    pub fn log_event(&mut self, round: u32, message: String) {
        self.log(round, LogKind::MatchEvent, None, None, None, message);
    }

    /// Get entries filtered by event kind.
    pub fn filter_by_kind(&self, kind: LogKind) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// Get only HP-changing events (damage and healing).
    pub fn hp_changes_only(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, LogKind::Damage | LogKind::Healing))
            .collect()
    }

    /// Get the last N entries.
    pub fn recent(&self, count: usize) -> Vec<&LogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Save the log plus match metadata as pretty JSON.
    pub fn save_to_file(&self, metadata: &MatchMetadata, path: &Path) -> Result<(), String> {
        let saved = SavedLog {
            metadata,
            entries: &self.entries,
        };
        let contents = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}
