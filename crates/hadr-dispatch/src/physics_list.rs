//! Turns a [`PhysicsListConfig`] into an [`InteractionDispatcher`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::{ParticleId, ParticleTable};

use crate::binding::{EnergyDomain, ModelBinding, ModelRole};
use crate::catalog::ModelCatalog;
use crate::config::{ParticleSpec, PhysicsListConfig};
use crate::dispatcher::{DispatcherBuilder, InteractionDispatcher};

/// Registers every particle entry following the construction protocol.
///
/// Per particle the order is cascade `[0, cascade_max)`, string
/// `[string_min, crossover)`, high energy `[crossover, inf)`, then the extra
/// bindings. Without a high-energy model the string binding is open-ended.
/// Inline cross sections of the config are added to a copy of `catalog`.
pub fn assemble(
    config: &PhysicsListConfig,
    catalog: &ModelCatalog,
    table: &ParticleTable,
) -> Result<InteractionDispatcher, HadrError> {
    config.validate()?;
    let mut catalog = catalog.clone();
    for provider in &config.cross_sections {
        provider.validate()?;
        catalog.register_cross_section(Arc::new(provider.clone()));
    }
    let crossovers = resolve_crossovers(config, table)?;

    let mut builder = DispatcherBuilder::new();
    let mut seen = BTreeSet::new();
    for spec in &config.particles {
        for particle in targets(spec, table)? {
            if !seen.insert(particle) {
                return Err(HadrError::Config(
                    ErrorInfo::new("physics_list_duplicate", "particle configured twice")
                        .with_context("particle", display_name(table, particle)),
                ));
            }
            let crossover = crossovers
                .get(&particle)
                .copied()
                .unwrap_or(config.crossover.default.mev());
            register_particle(
                &mut builder,
                config,
                &catalog,
                table,
                spec,
                particle,
                crossover,
            )?;
        }
    }
    if let Some(unused) = crossovers.keys().find(|particle| !seen.contains(*particle)) {
        return Err(HadrError::Config(
            ErrorInfo::new(
                "physics_list_crossover_unused",
                "per-particle crossover names a particle without a physics list entry",
            )
            .with_context("particle", display_name(table, *unused))
            .with_hint("add a particles entry for it or drop the override"),
        ));
    }
    builder.build(config.coverage.window()?)
}

fn register_particle(
    builder: &mut DispatcherBuilder,
    config: &PhysicsListConfig,
    catalog: &ModelCatalog,
    table: &ParticleTable,
    spec: &ParticleSpec,
    particle: ParticleId,
    crossover: f64,
) -> Result<(), HadrError> {
    let name = display_name(table, particle);
    if let Some(xs) = &spec.cross_section {
        builder.default_cross_section(particle, catalog.cross_section(xs)?);
    }

    let transition = &config.transition;
    let string_domain = match spec.high_energy {
        Some(_) => EnergyDomain::new(transition.string_min.mev(), crossover)?,
        None => EnergyDomain::open_from(transition.string_min.mev())?,
    };
    let mut layout = vec![
        (
            ModelRole::Cascade,
            spec.cascade.as_str(),
            EnergyDomain::new(0.0, transition.cascade_max.mev())?,
            None,
        ),
        (ModelRole::String, spec.string.as_str(), string_domain, None),
    ];
    if let Some(model) = &spec.high_energy {
        layout.push((
            ModelRole::HighEnergy,
            model.as_str(),
            EnergyDomain::open_from(crossover)?,
            spec.high_energy_cross_section.as_deref(),
        ));
    }
    for extra in &spec.extra {
        let max = extra.max.map(|e| e.mev()).unwrap_or(f64::INFINITY);
        layout.push((
            ModelRole::Custom,
            extra.model.as_str(),
            EnergyDomain::new(extra.min.mev(), max)?,
            extra.cross_section.as_deref(),
        ));
    }

    for (role, model, domain, xs) in layout {
        let generator = catalog.instantiate(config.kind_of(model), model, particle)?;
        let mut binding = ModelBinding::new(format!("{name}/{model}"), role, domain, generator);
        if let Some(xs) = xs {
            binding = binding.with_cross_section(catalog.cross_section(xs)?);
        }
        builder.register(particle, binding);
    }
    Ok(())
}

fn targets(spec: &ParticleSpec, table: &ParticleTable) -> Result<Vec<ParticleId>, HadrError> {
    match (&spec.particle, spec.group) {
        (Some(name), None) => Ok(vec![table.resolve(name)?]),
        (None, Some(group)) => Ok(group.members().to_vec()),
        _ => Err(HadrError::Config(
            ErrorInfo::new(
                "physics_list_target",
                "each entry needs exactly one of particle or group",
            )
            .with_context("entry", spec.target()),
        )),
    }
}

fn resolve_crossovers(
    config: &PhysicsListConfig,
    table: &ParticleTable,
) -> Result<BTreeMap<ParticleId, f64>, HadrError> {
    config
        .crossover
        .per_particle
        .iter()
        .map(|(name, energy)| Ok((table.resolve(name)?, energy.mev())))
        .collect()
}

fn display_name(table: &ParticleTable, particle: ParticleId) -> String {
    table
        .name_of(particle)
        .map(str::to_string)
        .unwrap_or_else(|| particle.to_string())
}
