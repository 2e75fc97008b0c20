//! The ten scoring categories and the identity-code classifier.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HadrError};
use crate::particles::{ParticleId, ParticleTable};

/// Closed set of scoring categories. `Other` catches every unlisted identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Neutrons.
    Neutron,
    /// Anti-neutrons.
    AntiNeutron,
    /// Protons.
    Proton,
    /// Anti-protons.
    AntiProton,
    /// Positive pions.
    PionPlus,
    /// Negative pions.
    PionMinus,
    /// Electrons.
    Electron,
    /// Positrons.
    Positron,
    /// Photons.
    Gamma,
    /// Everything else.
    Other,
}

impl Species {
    /// Number of categories.
    pub const COUNT: usize = 10;

    /// All categories in column order.
    pub const ALL: [Species; Species::COUNT] = [
        Species::Neutron,
        Species::AntiNeutron,
        Species::Proton,
        Species::AntiProton,
        Species::PionPlus,
        Species::PionMinus,
        Species::Electron,
        Species::Positron,
        Species::Gamma,
        Species::Other,
    ];

    /// Column index of the category.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Species::index`].
    pub fn from_index(index: usize) -> Option<Species> {
        Species::ALL.get(index).copied()
    }

    /// Identity-table name of the particle the category stands for.
    ///
    /// `Other` has no particle and returns `None`.
    pub fn particle_name(self) -> Option<&'static str> {
        match self {
            Species::Neutron => Some("neutron"),
            Species::AntiNeutron => Some("anti_neutron"),
            Species::Proton => Some("proton"),
            Species::AntiProton => Some("anti_proton"),
            Species::PionPlus => Some("pi+"),
            Species::PionMinus => Some("pi-"),
            Species::Electron => Some("e-"),
            Species::Positron => Some("e+"),
            Species::Gamma => Some("gamma"),
            Species::Other => None,
        }
    }

    /// Output column name used by the spectrum record layout.
    pub fn column(self) -> &'static str {
        match self {
            Species::Neutron => "neutronScore",
            Species::AntiNeutron => "antiNeutronScore",
            Species::Proton => "protonScore",
            Species::AntiProton => "antiProtonScore",
            Species::PionPlus => "pionPlusScore",
            Species::PionMinus => "pionMinusScore",
            Species::Electron => "electronScore",
            Species::Positron => "positronScore",
            Species::Gamma => "gammaScore",
            Species::Other => "othersScore",
        }
    }

    /// Short label for tables and logs.
    pub fn label(self) -> &'static str {
        match self {
            Species::Neutron => "neutron",
            Species::AntiNeutron => "anti_neutron",
            Species::Proton => "proton",
            Species::AntiProton => "anti_proton",
            Species::PionPlus => "pion_plus",
            Species::PionMinus => "pion_minus",
            Species::Electron => "electron",
            Species::Positron => "positron",
            Species::Gamma => "gamma",
            Species::Other => "other",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps identity codes to [`Species`].
///
/// The nine named categories are resolved against the identity table once at
/// construction; classification afterwards is a hash lookup and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesClassifier {
    codes: HashMap<ParticleId, Species>,
}

impl SpeciesClassifier {
    /// Builds the classifier from the engine's identity table.
    pub fn from_table(table: &ParticleTable) -> Result<Self, HadrError> {
        let mut codes = HashMap::with_capacity(Species::COUNT - 1);
        for species in Species::ALL {
            let Some(name) = species.particle_name() else {
                continue;
            };
            let entry = table.find(name).ok_or_else(|| {
                HadrError::Config(
                    ErrorInfo::new(
                        "classifier_missing_particle",
                        "identity table lacks a particle required for classification",
                    )
                    .with_context("particle", name)
                    .with_context("species", species.label()),
                )
            })?;
            codes.insert(entry.id, species);
        }
        log::debug!("species classifier resolved {} identity codes", codes.len());
        Ok(Self { codes })
    }

    /// Classifies an identity code; unmapped codes fall into [`Species::Other`].
    pub fn classify(&self, id: ParticleId) -> Species {
        self.codes.get(&id).copied().unwrap_or(Species::Other)
    }

    /// Returns the code mapped to `species`, if it has one.
    pub fn code_of(&self, species: Species) -> Option<ParticleId> {
        self.codes
            .iter()
            .find(|(_, mapped)| **mapped == species)
            .map(|(id, _)| *id)
    }
}

impl Default for SpeciesClassifier {
    fn default() -> Self {
        let codes = [
            (ParticleId::NEUTRON, Species::Neutron),
            (ParticleId::ANTI_NEUTRON, Species::AntiNeutron),
            (ParticleId::PROTON, Species::Proton),
            (ParticleId::ANTI_PROTON, Species::AntiProton),
            (ParticleId::PION_PLUS, Species::PionPlus),
            (ParticleId::PION_MINUS, Species::PionMinus),
            (ParticleId::ELECTRON, Species::Electron),
            (ParticleId::POSITRON, Species::Positron),
            (ParticleId::GAMMA, Species::Gamma),
        ]
        .into_iter()
        .collect();
        Self { codes }
    }
}
