#![deny(missing_docs)]
#![doc = "Species-resolved scoring of particles crossing a geometric boundary."]

/// Per-worker spectrum accumulator.
pub mod accumulator;
pub mod config;
/// Step routing and energy channels.
pub mod observer;
/// Event records and run counters.
pub mod record;
/// Scored quantities.
pub mod scorer;
/// Record sinks.
pub mod sink;

pub use accumulator::SpectrumAccumulator;
pub use config::{load_spectrum_config, BoundaryConfig, SpectrumConfig};
pub use observer::{BoundaryRegions, BoundaryStepObserver, EnergySink, EnergyTally, StepRouting};
pub use record::{EventRecord, RecordEntry, RunCounts};
pub use scorer::ScorerKind;
pub use sink::{CsvSpectrumSink, MemorySink, SpectrumSink};
