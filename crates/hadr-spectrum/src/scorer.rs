use std::fmt;

use hadr_core::StepSnapshot;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Quantity added to a species score for every qualifying step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScorerKind {
    /// Total energy of the track.
    #[default]
    TotalEnergy,
    /// Kinetic energy of the track.
    KineticEnergy,
    /// Magnitude of the track momentum.
    MomentumMagnitude,
}

impl ScorerKind {
    /// Every scorer kind.
    pub const ALL: [ScorerKind; 3] = [
        ScorerKind::TotalEnergy,
        ScorerKind::KineticEnergy,
        ScorerKind::MomentumMagnitude,
    ];

    /// Recognizes short (`te`, `ke`, `momentum`) and long names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "te" | "total_energy" | "totalenergy" => Some(ScorerKind::TotalEnergy),
            "ke" | "kinetic_energy" | "kineticenergy" => Some(ScorerKind::KineticEnergy),
            "momentum" | "momentum_magnitude" | "momentummagnitude" => {
                Some(ScorerKind::MomentumMagnitude)
            }
            _ => None,
        }
    }

    /// Like [`ScorerKind::from_name`] but falls back to total energy.
    pub fn parse_lenient(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("unrecognized scorer `{name}`, scoring total energy");
            ScorerKind::TotalEnergy
        })
    }

    /// Short name used in configuration and reports.
    pub fn name(self) -> &'static str {
        match self {
            ScorerKind::TotalEnergy => "te",
            ScorerKind::KineticEnergy => "ke",
            ScorerKind::MomentumMagnitude => "momentum",
        }
    }

    /// Scores one step.
    pub fn score(self, step: &StepSnapshot) -> f64 {
        match self {
            ScorerKind::TotalEnergy => step.total_energy,
            ScorerKind::KineticEnergy => step.kinetic_energy,
            ScorerKind::MomentumMagnitude => step.momentum,
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ScorerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ScorerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ScorerKind::parse_lenient(&name))
    }
}
