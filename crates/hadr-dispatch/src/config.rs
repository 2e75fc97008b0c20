//! YAML physics lists.
//!
//! A physics list names, per particle or particle group, the cascade, string and
//! optional high-energy models plus any extra layered bindings. Energies accept
//! units (`"6.1 GeV"`), see [`Energy`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::serde::from_yaml_slice;
use hadr_core::{stable_hash_string, Energy, ParticleGroup};
use serde::{Deserialize, Serialize};

use crate::dispatcher::CoverageWindow;
use crate::provider::TabulatedCrossSection;

/// Complete physics-list configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicsListConfig {
    /// Production window that bindings must cover.
    #[serde(default)]
    pub coverage: CoverageSpec,
    /// Cascade/string overlap band.
    #[serde(default)]
    pub transition: TransitionSpec,
    /// Energy above which high-energy models take over.
    #[serde(default)]
    pub crossover: CrossoverSpec,
    /// Model instances by name; a name missing here is used as its own kind.
    #[serde(default)]
    pub models: BTreeMap<String, ModelSpec>,
    /// Tabulated cross sections defined inline.
    #[serde(default)]
    pub cross_sections: Vec<TabulatedCrossSection>,
    /// Per-particle construction entries, applied in order.
    pub particles: Vec<ParticleSpec>,
}

/// Run window checked for gaps at build time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageSpec {
    /// Lowest production threshold.
    #[serde(default = "CoverageSpec::default_min")]
    pub min_energy: Energy,
    /// Highest energy reachable in the run.
    #[serde(default = "CoverageSpec::default_max")]
    pub max_energy: Energy,
}

impl CoverageSpec {
    fn default_min() -> Energy {
        Energy::ZERO
    }

    fn default_max() -> Energy {
        Energy::from_tev(100.0)
    }

    /// Converts into the dispatcher's window.
    pub fn window(&self) -> Result<CoverageWindow, HadrError> {
        CoverageWindow::new(self.min_energy.mev(), self.max_energy.mev())
    }
}

impl Default for CoverageSpec {
    fn default() -> Self {
        Self {
            min_energy: Self::default_min(),
            max_energy: Self::default_max(),
        }
    }
}

/// Where the string model starts and the cascade model ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionSpec {
    /// Lower edge of the string model.
    #[serde(default = "TransitionSpec::default_string_min")]
    pub string_min: Energy,
    /// Upper edge of the cascade model.
    #[serde(default = "TransitionSpec::default_cascade_max")]
    pub cascade_max: Energy,
}

impl TransitionSpec {
    fn default_string_min() -> Energy {
        Energy::from_gev(3.0)
    }

    fn default_cascade_max() -> Energy {
        Energy::from_gev(6.0)
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            string_min: Self::default_string_min(),
            cascade_max: Self::default_cascade_max(),
        }
    }
}

/// High-energy crossover, overridable per particle name or code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossoverSpec {
    /// Crossover used when a particle has no override.
    #[serde(default = "CrossoverSpec::default_energy")]
    pub default: Energy,
    /// Overrides keyed by particle name or identity code.
    #[serde(default)]
    pub per_particle: BTreeMap<String, Energy>,
}

impl CrossoverSpec {
    fn default_energy() -> Energy {
        Energy::from_gev(6.1)
    }
}

impl Default for CrossoverSpec {
    fn default() -> Self {
        Self {
            default: Self::default_energy(),
            per_particle: BTreeMap::new(),
        }
    }
}

/// Named model instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    /// Generator kind registered in the catalog.
    pub kind: String,
}

/// Models for one particle or one group of particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticleSpec {
    /// Particle name or identity code.
    #[serde(default)]
    pub particle: Option<String>,
    /// Particle group; exclusive with `particle`.
    #[serde(default)]
    pub group: Option<ParticleGroup>,
    /// Default cross section for bindings that name none.
    #[serde(default)]
    pub cross_section: Option<String>,
    /// Low-energy cascade model.
    pub cascade: String,
    /// Mid-energy string model.
    pub string: String,
    /// Model used from the crossover energy upwards.
    #[serde(default)]
    pub high_energy: Option<String>,
    /// Cross section owned by the high-energy binding.
    #[serde(default)]
    pub high_energy_cross_section: Option<String>,
    /// Additional bindings layered after the protocol ones.
    #[serde(default)]
    pub extra: Vec<BindingSpec>,
}

impl ParticleSpec {
    /// Human-readable target for messages.
    pub fn target(&self) -> String {
        match (&self.particle, self.group) {
            (Some(name), _) => name.clone(),
            (None, Some(group)) => format!("group:{}", group_name(group)),
            (None, None) => "<unset>".to_string(),
        }
    }
}

/// Extra binding with an explicit energy domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    /// Model instance name.
    pub model: String,
    /// Inclusive lower edge.
    pub min: Energy,
    /// Exclusive upper edge; open-ended when absent.
    #[serde(default)]
    pub max: Option<Energy>,
    /// Binding-specific cross section.
    #[serde(default)]
    pub cross_section: Option<String>,
}

fn group_name(group: ParticleGroup) -> &'static str {
    match group {
        ParticleGroup::Kaons => "kaons",
        ParticleGroup::Hyperons => "hyperons",
        ParticleGroup::AntiHyperons => "anti-hyperons",
        ParticleGroup::LightAntiIons => "light-anti-ions",
        ParticleGroup::BcHadrons => "bc-hadrons",
    }
}

impl PhysicsListConfig {
    /// Parses and validates a YAML physics list.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, HadrError> {
        let config: PhysicsListConfig = from_yaml_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Kind of the model instance `name`.
    pub fn kind_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.models
            .get(name)
            .map(|spec| spec.kind.as_str())
            .unwrap_or(name)
    }

    /// Checks energy ordering and particle entries.
    pub fn validate(&self) -> Result<(), HadrError> {
        self.coverage.window()?;
        let string_min = self.transition.string_min.mev();
        let cascade_max = self.transition.cascade_max.mev();
        if string_min > cascade_max || cascade_max.is_infinite() {
            return Err(HadrError::Config(
                ErrorInfo::new(
                    "physics_list_transition",
                    "string_min must not exceed a finite cascade_max",
                )
                .with_context("string_min", self.transition.string_min.to_string())
                .with_context("cascade_max", self.transition.cascade_max.to_string()),
            ));
        }
        let crossovers = std::iter::once(("default", self.crossover.default)).chain(
            self.crossover
                .per_particle
                .iter()
                .map(|(name, energy)| (name.as_str(), *energy)),
        );
        for (name, energy) in crossovers {
            // Below cascade_max the cascade binding shadows the crossover band.
            if energy.mev() <= string_min || energy.mev() < cascade_max || energy.is_infinite() {
                return Err(HadrError::Config(
                    ErrorInfo::new(
                        "physics_list_crossover",
                        "crossover must be finite, above string_min and not below cascade_max",
                    )
                    .with_context("particle", name)
                    .with_context("crossover", energy.to_string())
                    .with_context("string_min", self.transition.string_min.to_string())
                    .with_context("cascade_max", self.transition.cascade_max.to_string())
                    .with_hint("raise the crossover or lower transition.cascade_max"),
                ));
            }
        }
        if self.particles.is_empty() {
            return Err(HadrError::Config(ErrorInfo::new(
                "physics_list_empty",
                "physics list declares no particles",
            )));
        }
        for spec in &self.particles {
            if spec.particle.is_some() == spec.group.is_some() {
                return Err(HadrError::Config(
                    ErrorInfo::new(
                        "physics_list_target",
                        "each entry needs exactly one of particle or group",
                    )
                    .with_context("entry", spec.target()),
                ));
            }
            if spec.high_energy.is_none() && spec.high_energy_cross_section.is_some() {
                return Err(HadrError::Config(
                    ErrorInfo::new(
                        "physics_list_high_energy",
                        "high_energy_cross_section set without a high_energy model",
                    )
                    .with_context("entry", spec.target()),
                ));
            }
            for extra in &spec.extra {
                let max = extra.max.map(Energy::mev).unwrap_or(f64::INFINITY);
                if extra.min.mev() >= max {
                    return Err(HadrError::Config(
                        ErrorInfo::new("physics_list_extra", "extra binding needs min < max")
                            .with_context("entry", spec.target())
                            .with_context("model", extra.model.clone()),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Stable hash of the canonical JSON form.
    pub fn config_hash(&self) -> Result<String, HadrError> {
        stable_hash_string(self)
    }
}

/// Reads and validates a physics list from disk.
pub fn load_physics_list<P: AsRef<Path>>(path: P) -> Result<PhysicsListConfig, HadrError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        HadrError::Serde(
            ErrorInfo::new("physics_list_read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    PhysicsListConfig::from_yaml_slice(&bytes)
}
