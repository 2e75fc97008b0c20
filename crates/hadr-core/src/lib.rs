#![deny(missing_docs)]
#![doc = "Core types shared by hadronic model dispatch and boundary spectrum scoring."]

pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
pub mod particles;
pub mod regions;
/// Canonical JSON and YAML helpers.
pub mod serde;
pub mod species;
pub mod step;
pub mod units;

pub use errors::{config_error, serde_error, ErrorInfo, HadrError};
pub use hash::stable_hash_string;
pub use particles::{ParticleEntry, ParticleGroup, ParticleId, ParticleTable};
pub use regions::{RegionId, RegionTable};
pub use species::{Species, SpeciesClassifier};
pub use step::{StepSnapshot, TrackStatus};
pub use units::Energy;
