use bevy::log::info;
use serde::{Deserialize, Serialize};

/// One line of the game log shown to players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleEntry {
    pub round: u32,
    /// Kingdom name, or "System"
    pub actor: String,
    pub title: String,
    pub details: String,
}

/// Append-only log plus the summary of the turn in progress.
/// Derived from engine actions; never read back by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chronicle {
    entries: Vec<ChronicleEntry>,
    turn_summary: Vec<String>,
}

impl Chronicle {
    pub fn record(
        &mut self,
        round: u32,
        actor: impl Into<String>,
        title: impl Into<String>,
        details: impl Into<String>,
    ) {
        let entry = ChronicleEntry {
            round,
            actor: actor.into(),
            title: title.into(),
            details: details.into(),
        };
        info!(
            "[round {}] {} - {}: {}",
            entry.round, entry.actor, entry.title, entry.details
        );
        self.turn_summary
            .push(format!("{}: {}", entry.title, entry.details));
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChronicleEntry] {
        &self.entries
    }

    pub fn turn_summary(&self) -> &[String] {
        &self.turn_summary
    }

    pub(crate) fn start_turn(&mut self) {
        self.turn_summary.clear();
    }
}
