//! Per-step snapshot handed over by the transport engine.

use serde::{Deserialize, Serialize};

use crate::particles::ParticleId;
use crate::regions::RegionId;

/// Track disposition after a step or an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// The track keeps being transported.
    #[default]
    Alive,
    /// The track stopped but still has at-rest processes to run.
    StopButAlive,
    /// The track is killed; its secondaries survive.
    StopAndKill,
    /// The track and all of its secondaries are killed.
    KillTrackAndSecondaries,
    /// The track is suspended until the current stack is processed.
    Suspend,
}

impl TrackStatus {
    /// True when the track ends with this step.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TrackStatus::StopAndKill | TrackStatus::KillTrackAndSecondaries
        )
    }
}

/// Kinematics and geometry of one transport step.
///
/// Energies and momenta are in MeV (momentum as MeV/c), lengths in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Identity of the transported particle.
    pub particle: ParticleId,
    /// Kinetic energy of the track.
    pub kinetic_energy: f64,
    /// Magnitude of the track momentum.
    pub momentum: f64,
    /// Total energy of the track.
    pub total_energy: f64,
    /// Region the step started in, `None` outside the geometry.
    pub pre_region: Option<RegionId>,
    /// Region the step ended in, `None` once the track left the world.
    pub post_region: Option<RegionId>,
    /// Energy deposited along the step.
    pub energy_deposit: f64,
    /// Geometric step length.
    pub step_length: f64,
    /// Track status after the step.
    pub status: TrackStatus,
}

impl StepSnapshot {
    /// Builds a snapshot from kinetic energy and rest mass.
    pub fn from_kinematics(particle: ParticleId, kinetic_energy: f64, mass: f64) -> Self {
        let total_energy = kinetic_energy + mass;
        let momentum = (kinetic_energy * (kinetic_energy + 2.0 * mass)).sqrt();
        Self {
            particle,
            kinetic_energy,
            momentum,
            total_energy,
            pre_region: None,
            post_region: None,
            energy_deposit: 0.0,
            step_length: 0.0,
            status: TrackStatus::Alive,
        }
    }

    /// Sets the pre- and post-step regions.
    pub fn with_regions(mut self, pre: Option<RegionId>, post: Option<RegionId>) -> Self {
        self.pre_region = pre;
        self.post_region = post;
        self
    }

    /// Sets the deposited energy.
    pub fn with_deposit(mut self, energy_deposit: f64) -> Self {
        self.energy_deposit = energy_deposit;
        self
    }
}
