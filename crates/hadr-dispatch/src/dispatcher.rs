use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::ParticleId;
use serde::{Deserialize, Serialize};

use crate::binding::{ModelBinding, ModelRole};
use crate::model::FinalState;
use crate::provider::{CrossSectionProvider, Element, Projectile, TargetNucleus};

/// Energy window every registered particle must cover without gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageWindow {
    /// Lowest energy a projectile can have in the run (production threshold).
    pub min_energy: f64,
    /// Highest energy a projectile can have in the run; may be infinite.
    pub max_energy: f64,
}

impl CoverageWindow {
    /// Creates a window after checking `0 <= min <= max`.
    pub fn new(min_energy: f64, max_energy: f64) -> Result<Self, HadrError> {
        if min_energy.is_nan() || max_energy.is_nan() || min_energy < 0.0 || min_energy > max_energy
        {
            return Err(HadrError::Config(
                ErrorInfo::new("coverage_invalid", "coverage window must satisfy 0 <= min <= max")
                    .with_context("min_energy", min_energy.to_string())
                    .with_context("max_energy", max_energy.to_string()),
            ));
        }
        Ok(Self {
            min_energy,
            max_energy,
        })
    }

    /// The whole non-negative energy axis.
    pub fn unbounded() -> Self {
        Self {
            min_energy: 0.0,
            max_energy: f64::INFINITY,
        }
    }
}

#[derive(Default)]
struct ParticleModels {
    bindings: Vec<ModelBinding>,
    default_cross_section: Option<Arc<dyn CrossSectionProvider>>,
    top: f64,
}

impl ParticleModels {
    /// The binding ending at the top of the axis also owns the top edge itself.
    fn covers(&self, binding: &ModelBinding, energy: f64) -> bool {
        let domain = binding.domain();
        domain.contains(energy) || (energy == self.top && domain.max() == self.top)
    }

    fn first_uncovered(&self, window: &CoverageWindow) -> Option<(f64, f64)> {
        let mut domains: Vec<_> = self.bindings.iter().map(|b| *b.domain()).collect();
        domains.sort_by(|a, b| a.min().total_cmp(&b.min()));
        let mut cursor = window.min_energy;
        for domain in domains {
            if cursor >= window.max_energy {
                break;
            }
            if domain.max() <= cursor {
                continue;
            }
            if domain.min() > cursor {
                return Some((cursor, domain.min().min(window.max_energy)));
            }
            cursor = domain.max();
        }
        if cursor < window.max_energy {
            Some((cursor, window.max_energy))
        } else {
            None
        }
    }
}

/// Collects bindings before freezing them into an [`InteractionDispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    particles: BTreeMap<ParticleId, ParticleModels>,
}

impl DispatcherBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cross-section provider used by bindings that carry none.
    pub fn default_cross_section(
        &mut self,
        particle: ParticleId,
        provider: Arc<dyn CrossSectionProvider>,
    ) -> &mut Self {
        let models = self.particles.entry(particle).or_default();
        if let Some(previous) = &models.default_cross_section {
            log::warn!(
                "particle {particle}: default cross section {} replaced by {}",
                previous.name(),
                provider.name()
            );
        }
        models.default_cross_section = Some(provider);
        self
    }

    /// Appends a binding; registration order is the resolution order.
    pub fn register(&mut self, particle: ParticleId, binding: ModelBinding) -> &mut Self {
        let models = self.particles.entry(particle).or_default();
        if let Some(last) = models.bindings.last() {
            if binding.domain().min() < last.domain().min() {
                log::warn!(
                    "particle {particle}: binding {} starts below {}; \
                     earlier registrations keep precedence",
                    binding.label(),
                    last.label()
                );
            }
        }
        models.bindings.push(binding);
        self
    }

    /// Checks coverage and cross sections, then freezes the bindings.
    pub fn build(self, window: CoverageWindow) -> Result<InteractionDispatcher, HadrError> {
        let mut particles = self.particles;
        for (particle, models) in particles.iter_mut() {
            if let Some((from, to)) = models.first_uncovered(&window) {
                return Err(HadrError::ConfigurationGap(
                    ErrorInfo::new("dispatch_gap", "registered energy domains leave a gap")
                        .with_context("particle", particle.to_string())
                        .with_context("gap_from_mev", from.to_string())
                        .with_context("gap_to_mev", to.to_string())
                        .with_hint("extend a binding or add one covering the gap"),
                ));
            }
            if models.default_cross_section.is_none() {
                let uncovered = models.bindings.iter().find(|b| b.cross_section().is_none());
                if let Some(binding) = uncovered {
                    return Err(HadrError::Config(
                        ErrorInfo::new(
                            "dispatch_missing_cross_section",
                            "binding has no cross section and the particle has no default",
                        )
                        .with_context("particle", particle.to_string())
                        .with_context("binding", binding.label()),
                    ));
                }
            }
            models.top = models
                .bindings
                .iter()
                .map(|b| b.domain().max())
                .fold(0.0, f64::max);
            log::info!(
                "particle {particle}: {} model bindings [{}]",
                models.bindings.len(),
                models
                    .bindings
                    .iter()
                    .map(|b| format!("{} {}", b.label(), b.domain()))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(InteractionDispatcher {
            particles,
            coverage: window,
        })
    }
}

/// Immutable per-particle table of model bindings.
///
/// Built once, then shared read-only between worker threads.
pub struct InteractionDispatcher {
    particles: BTreeMap<ParticleId, ParticleModels>,
    coverage: CoverageWindow,
}

impl InteractionDispatcher {
    /// Returns the first registered binding whose domain contains `kinetic_energy`.
    pub fn resolve(
        &self,
        particle: ParticleId,
        kinetic_energy: f64,
    ) -> Result<&ModelBinding, HadrError> {
        let models = self.models(particle)?;
        if kinetic_energy.is_nan() || kinetic_energy < 0.0 {
            return Err(HadrError::NoApplicableModel(
                ErrorInfo::new("dispatch_invalid_energy", "kinetic energy must be non-negative")
                    .with_context("particle", particle.to_string())
                    .with_context("energy_mev", kinetic_energy.to_string()),
            ));
        }
        models
            .bindings
            .iter()
            .find(|binding| models.covers(binding, kinetic_energy))
            .ok_or_else(|| {
                HadrError::NoApplicableModel(
                    ErrorInfo::new("dispatch_no_model", "no binding covers the energy")
                        .with_context("particle", particle.to_string())
                        .with_context("energy_mev", kinetic_energy.to_string()),
                )
            })
    }

    /// Cross-section provider in charge at `kinetic_energy`.
    pub fn cross_section_provider(
        &self,
        particle: ParticleId,
        kinetic_energy: f64,
    ) -> Result<&dyn CrossSectionProvider, HadrError> {
        let binding = self.resolve(particle, kinetic_energy)?;
        let provider = binding
            .cross_section()
            .or(self.models(particle)?.default_cross_section.as_ref())
            .ok_or_else(|| {
                HadrError::Config(
                    ErrorInfo::new("dispatch_missing_cross_section", "no cross section resolved")
                        .with_context("particle", particle.to_string()),
                )
            })?;
        Ok(provider.as_ref())
    }

    /// Inelastic cross section of `element` for `projectile`, in barn.
    pub fn cross_section(
        &self,
        projectile: &Projectile,
        element: &Element,
    ) -> Result<f64, HadrError> {
        let provider = self.cross_section_provider(projectile.particle, projectile.kinetic_energy)?;
        Ok(provider.cross_section(projectile, element))
    }

    /// Resolves the model for `projectile` and computes the final state.
    pub fn interact(
        &self,
        projectile: &Projectile,
        target: &TargetNucleus,
    ) -> Result<FinalState, HadrError> {
        let binding = self.resolve(projectile.particle, projectile.kinetic_energy)?;
        log::trace!(
            "particle {} at {} MeV -> {}",
            projectile.particle,
            projectile.kinetic_energy,
            binding.label()
        );
        binding.generator().apply(projectile, target)
    }

    /// Bindings of `particle` in registration order.
    pub fn bindings(&self, particle: ParticleId) -> Result<&[ModelBinding], HadrError> {
        Ok(&self.models(particle)?.bindings)
    }

    /// Particles with registered models.
    pub fn particles(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.particles.keys().copied()
    }

    /// True when `particle` has registered models.
    pub fn knows(&self, particle: ParticleId) -> bool {
        self.particles.contains_key(&particle)
    }

    /// Window checked at build time.
    pub fn coverage(&self) -> CoverageWindow {
        self.coverage
    }

    /// Serializable summary of every binding.
    pub fn describe(&self) -> DispatchTable {
        let particles = self
            .particles
            .iter()
            .map(|(particle, models)| ParticleDispatch {
                particle: *particle,
                default_cross_section: models
                    .default_cross_section
                    .as_ref()
                    .map(|xs| xs.name().to_string()),
                bindings: models.bindings.iter().map(BindingSummary::of).collect(),
            })
            .collect();
        DispatchTable {
            min_energy: self.coverage.min_energy,
            max_energy: finite(self.coverage.max_energy),
            particles,
        }
    }

    fn models(&self, particle: ParticleId) -> Result<&ParticleModels, HadrError> {
        self.particles.get(&particle).ok_or_else(|| {
            HadrError::UnknownSpecies(
                ErrorInfo::new("dispatch_unknown_species", "no models registered for particle")
                    .with_context("particle", particle.to_string()),
            )
        })
    }
}

impl fmt::Debug for InteractionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionDispatcher")
            .field("particles", &self.particles.len())
            .field("coverage", &self.coverage)
            .finish_non_exhaustive()
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Reported form of one binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSummary {
    /// Binding label.
    pub label: String,
    /// Generator name.
    pub model: String,
    /// Protocol role.
    pub role: ModelRole,
    /// Inclusive lower edge in MeV.
    pub min_energy: f64,
    /// Exclusive upper edge in MeV, `None` when open-ended.
    pub max_energy: Option<f64>,
    /// Binding-specific cross section, if any.
    pub cross_section: Option<String>,
}

impl BindingSummary {
    /// Summarizes a binding.
    pub fn of(binding: &ModelBinding) -> Self {
        Self {
            label: binding.label().to_string(),
            model: binding.generator().name().to_string(),
            role: binding.role(),
            min_energy: binding.domain().min(),
            max_energy: finite(binding.domain().max()),
            cross_section: binding.cross_section().map(|xs| xs.name().to_string()),
        }
    }
}

/// Reported bindings of one particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDispatch {
    /// Particle identity.
    pub particle: ParticleId,
    /// Default cross section name.
    pub default_cross_section: Option<String>,
    /// Bindings in resolution order.
    pub bindings: Vec<BindingSummary>,
}

/// Reported form of a whole dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchTable {
    /// Lower edge of the checked window in MeV.
    pub min_energy: f64,
    /// Upper edge of the checked window in MeV, `None` when unbounded.
    pub max_energy: Option<f64>,
    /// Per-particle bindings ordered by identity code.
    pub particles: Vec<ParticleDispatch>,
}
