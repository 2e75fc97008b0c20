use std::fmt;

use hadr_core::Species;
use serde::{Deserialize, Serialize};

use crate::scorer::ScorerKind;

/// Score of one species within one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Species the entry belongs to.
    pub species: Species,
    /// Summed score of the species' qualifying steps.
    pub score: f64,
    /// Number of qualifying steps.
    pub steps: u64,
}

/// Flushed event: only species with a nonzero score or step count appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event index assigned by `begin_event`.
    pub event: u64,
    /// Entries in column order.
    pub entries: Vec<RecordEntry>,
}

impl EventRecord {
    /// Full row of scores in column order, zero for absent species.
    pub fn scores(&self) -> [f64; Species::COUNT] {
        let mut row = [0.0; Species::COUNT];
        for entry in &self.entries {
            row[entry.species.index()] = entry.score;
        }
        row
    }

    /// Score of `species`, zero when absent.
    pub fn score(&self, species: Species) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.species == species)
            .map_or(0.0, |entry| entry.score)
    }

    /// Sum over all entries.
    pub fn total_score(&self) -> f64 {
        self.entries.iter().map(|entry| entry.score).sum()
    }
}

/// Read-only snapshot of run-scoped counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    /// Scorer active during the run.
    pub scorer: ScorerKind,
    /// Qualifying steps per species, in column order.
    pub counts: [u64; Species::COUNT],
    /// Events closed with `end_event`.
    pub events: u64,
    /// Events that produced a record.
    pub records: u64,
}

impl RunCounts {
    /// Empty counters for `scorer`.
    pub fn new(scorer: ScorerKind) -> Self {
        Self {
            scorer,
            counts: [0; Species::COUNT],
            events: 0,
            records: 0,
        }
    }

    /// Steps counted for `species`.
    pub fn count(&self, species: Species) -> u64 {
        self.counts[species.index()]
    }

    /// Steps counted over all species.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl fmt::Display for RunCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "boundary crossings ({} events, {} recorded, scorer {})",
            self.events, self.records, self.scorer
        )?;
        for species in Species::ALL {
            writeln!(f, "  {:<12} {:>10}", species.label(), self.count(species))?;
        }
        write!(f, "  {:<12} {:>10}", "total", self.total())
    }
}
