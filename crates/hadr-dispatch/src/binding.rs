use std::fmt;
use std::sync::Arc;

use hadr_core::errors::{ErrorInfo, HadrError};
use serde::{Deserialize, Serialize};

use crate::model::FinalStateGenerator;
use crate::provider::CrossSectionProvider;

/// Half-open kinetic-energy interval `[min, max)` in MeV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyDomain {
    min: f64,
    max: f64,
}

impl EnergyDomain {
    /// Creates `[min, max)`; `max` may be infinite.
    pub fn new(min: f64, max: f64) -> Result<Self, HadrError> {
        if min.is_nan() || max.is_nan() || min < 0.0 || min.is_infinite() || min >= max {
            return Err(HadrError::Config(
                ErrorInfo::new("domain_invalid", "energy domain must satisfy 0 <= min < max")
                    .with_context("min", min.to_string())
                    .with_context("max", max.to_string()),
            ));
        }
        Ok(Self { min, max })
    }

    /// Creates the open-ended domain `[min, inf)`.
    pub fn open_from(min: f64) -> Result<Self, HadrError> {
        Self::new(min, f64::INFINITY)
    }

    /// Inclusive lower edge.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Exclusive upper edge.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// True when the upper edge is infinite.
    pub fn is_open_ended(&self) -> bool {
        self.max.is_infinite()
    }

    /// Half-open containment test.
    pub fn contains(&self, energy: f64) -> bool {
        self.min <= energy && energy < self.max
    }

    /// True when the domains share some energy.
    pub fn overlaps(&self, other: &EnergyDomain) -> bool {
        self.min < other.max && other.min < self.max
    }
}

impl fmt::Display for EnergyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max.is_infinite() {
            write!(f, "[{}, inf) MeV", self.min)
        } else {
            write!(f, "[{}, {}) MeV", self.min, self.max)
        }
    }
}

/// Position of a binding in the construction protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelRole {
    /// Low-energy intranuclear cascade.
    Cascade,
    /// Mid-energy string fragmentation.
    String,
    /// Specialized model above the crossover energy.
    HighEnergy,
    /// Additional layered binding.
    Custom,
}

/// A final-state generator bound to an energy domain.
pub struct ModelBinding {
    label: String,
    role: ModelRole,
    domain: EnergyDomain,
    generator: Box<dyn FinalStateGenerator>,
    cross_section: Option<Arc<dyn CrossSectionProvider>>,
}

impl ModelBinding {
    /// Binds `generator` to `domain`.
    pub fn new(
        label: impl Into<String>,
        role: ModelRole,
        domain: EnergyDomain,
        generator: Box<dyn FinalStateGenerator>,
    ) -> Self {
        Self {
            label: label.into(),
            role,
            domain,
            generator,
            cross_section: None,
        }
    }

    /// Attaches a binding-specific cross-section provider.
    pub fn with_cross_section(mut self, provider: Arc<dyn CrossSectionProvider>) -> Self {
        self.cross_section = Some(provider);
        self
    }

    /// Configuration label of the binding.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Protocol role.
    pub fn role(&self) -> ModelRole {
        self.role
    }

    /// Energy domain.
    pub fn domain(&self) -> &EnergyDomain {
        &self.domain
    }

    /// Final-state generator owned by this binding.
    pub fn generator(&self) -> &dyn FinalStateGenerator {
        self.generator.as_ref()
    }

    /// Binding-specific cross-section provider, if any.
    pub fn cross_section(&self) -> Option<&Arc<dyn CrossSectionProvider>> {
        self.cross_section.as_ref()
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("label", &self.label)
            .field("role", &self.role)
            .field("domain", &self.domain)
            .field("generator", &self.generator.name())
            .field(
                "cross_section",
                &self.cross_section.as_ref().map(|xs| xs.name().to_string()),
            )
            .finish()
    }
}
