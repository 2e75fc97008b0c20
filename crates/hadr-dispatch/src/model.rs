use hadr_core::errors::HadrError;
use hadr_core::{ParticleId, TrackStatus};
use serde::{Deserialize, Serialize};

use crate::provider::{Projectile, TargetNucleus};

/// Particle produced by an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secondary {
    /// Identity of the secondary.
    pub particle: ParticleId,
    /// Kinetic energy in MeV.
    pub kinetic_energy: f64,
    /// Unit direction vector.
    pub direction: [f64; 3],
}

/// Outcome of an inelastic interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    /// What happens to the primary.
    pub primary: TrackStatus,
    /// Kinetic energy left to the primary when it survives.
    pub primary_kinetic_energy: f64,
    /// Produced particles handed back to the transport engine.
    pub secondaries: Vec<Secondary>,
    /// Energy deposited at the interaction point.
    pub local_energy_deposit: f64,
}

impl FinalState {
    /// Final state with the primary killed and nothing produced.
    pub fn stop_and_kill() -> Self {
        Self {
            primary: TrackStatus::StopAndKill,
            primary_kinetic_energy: 0.0,
            secondaries: Vec::new(),
            local_energy_deposit: 0.0,
        }
    }

    /// Total kinetic energy carried by the secondaries.
    pub fn secondary_energy(&self) -> f64 {
        self.secondaries.iter().map(|s| s.kinetic_energy).sum()
    }
}

/// Computes the final state of an interaction for one energy domain.
///
/// Implementations are shared read-only between worker threads.
pub trait FinalStateGenerator: Send + Sync {
    /// Model name used in reports.
    fn name(&self) -> &str;

    /// Produces the final state for `projectile` hitting `target`.
    fn apply(&self, projectile: &Projectile, target: &TargetNucleus)
        -> Result<FinalState, HadrError>;
}

/// Kills the primary and deposits its kinetic energy on the spot.
///
/// Stands in for a real model wherever only the dispatch matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsorptionModel {
    name: String,
}

impl AbsorptionModel {
    /// Creates a model reporting itself as `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl FinalStateGenerator for AbsorptionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(
        &self,
        projectile: &Projectile,
        _target: &TargetNucleus,
    ) -> Result<FinalState, HadrError> {
        let mut state = FinalState::stop_and_kill();
        state.local_energy_deposit = projectile.kinetic_energy;
        Ok(state)
    }
}
