use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::{Species, SpeciesClassifier, StepSnapshot};

use crate::record::{EventRecord, RecordEntry, RunCounts};
use crate::scorer::ScorerKind;

/// Per-worker accumulator of species-resolved boundary scores.
///
/// Event scores live from `begin_event` to `end_event`; step counts are rolled
/// into run counts at every `end_event` and live until `reset_run_counts`.
/// The accumulator is owned by exactly one worker and never locks.
#[derive(Debug, Clone)]
pub struct SpectrumAccumulator {
    classifier: SpeciesClassifier,
    scorer: ScorerKind,
    used_in_run: bool,
    event: u64,
    pending: bool,
    event_scores: [f64; Species::COUNT],
    event_steps: [u64; Species::COUNT],
    run: RunCounts,
}

impl SpectrumAccumulator {
    /// Creates an accumulator scoring total energy.
    pub fn new(classifier: SpeciesClassifier) -> Self {
        Self::with_scorer(classifier, ScorerKind::default())
    }

    /// Creates an accumulator with an explicit scorer.
    pub fn with_scorer(classifier: SpeciesClassifier, scorer: ScorerKind) -> Self {
        log::info!("spectrum accumulator scoring {scorer}");
        Self {
            classifier,
            scorer,
            used_in_run: false,
            event: 0,
            pending: false,
            event_scores: [0.0; Species::COUNT],
            event_steps: [0; Species::COUNT],
            run: RunCounts::new(scorer),
        }
    }

    /// Active scorer.
    pub fn scorer(&self) -> ScorerKind {
        self.scorer
    }

    /// Selects the scorer; refused once a step has been accumulated in this run.
    pub fn configure_scorer(&mut self, kind: ScorerKind) -> Result<(), HadrError> {
        if self.used_in_run {
            return Err(HadrError::ReconfigurationNotAllowed(
                ErrorInfo::new(
                    "scorer_locked",
                    "scorer cannot change after steps were accumulated in the run",
                )
                .with_context("active", self.scorer.name())
                .with_context("requested", kind.name())
                .with_hint("call reset_run_counts before reconfiguring"),
            ));
        }
        if kind != self.scorer {
            log::info!("spectrum accumulator scoring {kind}");
        }
        self.scorer = kind;
        self.run.scorer = kind;
        Ok(())
    }

    /// Selects the scorer by name; unrecognized names score total energy.
    pub fn configure_scorer_named(&mut self, name: &str) -> Result<(), HadrError> {
        self.configure_scorer(ScorerKind::parse_lenient(name))
    }

    /// Opens event `event`, clearing any event-scoped state.
    pub fn begin_event(&mut self, event: u64) {
        if self.pending {
            log::warn!(
                "event {} was never flushed; discarding {} steps",
                self.event,
                self.event_steps.iter().sum::<u64>()
            );
        }
        self.clear_event();
        self.event = event;
    }

    /// Classifies and scores one qualifying step.
    pub fn accumulate(&mut self, step: &StepSnapshot) {
        let species = self.classifier.classify(step.particle);
        let value = self.scorer.score(step);
        let index = species.index();
        self.event_scores[index] += value;
        self.event_steps[index] += 1;
        self.pending = true;
        self.used_in_run = true;
        log::trace!("event {}: {species} +{value}", self.event);
    }

    /// Current score of `species` in the open event.
    pub fn event_score(&self, species: Species) -> f64 {
        self.event_scores[species.index()]
    }

    /// Closes the event, rolling its counts into the run.
    ///
    /// Returns a record only when some species scored or was counted.
    pub fn end_event(&mut self) -> Option<EventRecord> {
        for (run, event) in self.run.counts.iter_mut().zip(self.event_steps) {
            *run += event;
        }
        self.run.events += 1;

        let entries: Vec<RecordEntry> = Species::ALL
            .iter()
            .filter_map(|&species| {
                let index = species.index();
                let (score, steps) = (self.event_scores[index], self.event_steps[index]);
                (score != 0.0 || steps != 0).then_some(RecordEntry {
                    species,
                    score,
                    steps,
                })
            })
            .collect();
        let event = self.event;
        self.clear_event();

        if entries.is_empty() {
            log::debug!("event {event}: nothing crossed the boundary");
            return None;
        }
        self.run.records += 1;
        log::debug!("event {event}: flushed {} species", entries.len());
        Some(EventRecord { event, entries })
    }

    /// Starts a new run: counters are zeroed and the scorer is unlocked.
    pub fn reset_run_counts(&mut self) {
        self.clear_event();
        self.run = RunCounts::new(self.scorer);
        self.used_in_run = false;
    }

    /// Snapshot of the run counters.
    pub fn report_run_counts(&self) -> RunCounts {
        self.run.clone()
    }

    fn clear_event(&mut self) {
        self.event_scores = [0.0; Species::COUNT];
        self.event_steps = [0; Species::COUNT];
        self.pending = false;
    }
}
