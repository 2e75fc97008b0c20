use std::sync::Arc;

use hadr_core::{ParticleId, TrackStatus};
use hadr_dispatch::{
    AbsorptionModel, CoverageWindow, DispatcherBuilder, Element, EnergyDomain,
    InteractionDispatcher, IsotopeFraction, ModelBinding, ModelRole, Projectile,
    TabulatedCrossSection, TargetNucleus, XsTable,
};
use proptest::prelude::*;

fn flat_xs(name: &str, barn: f64) -> Arc<TabulatedCrossSection> {
    let table = XsTable::new(vec![1.0], vec![barn]).expect("table");
    Arc::new(TabulatedCrossSection::new(name).with_element(26, table))
}

fn binding(label: &str, role: ModelRole, min: f64, max: f64) -> ModelBinding {
    let domain = EnergyDomain::new(min, max).expect("domain");
    ModelBinding::new(label, role, domain, Box::new(AbsorptionModel::new(label)))
}

fn neutron_dispatcher() -> InteractionDispatcher {
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::NEUTRON, flat_xs("default", 0.7))
        .register(
            ParticleId::NEUTRON,
            binding("cascade", ModelRole::Cascade, 0.0, 1000.0),
        )
        .register(
            ParticleId::NEUTRON,
            binding("string", ModelRole::String, 800.0, 6100.0),
        )
        .register(
            ParticleId::NEUTRON,
            binding("high-energy", ModelRole::HighEnergy, 6100.0, f64::INFINITY),
        );
    builder
        .build(CoverageWindow::unbounded())
        .expect("gap-free neutron list")
}

#[test]
fn neutron_protocol_prefers_earliest_registration() {
    let dispatcher = neutron_dispatcher();
    let cases = [
        (0.0, "cascade"),
        (500.0, "cascade"),
        (900.0, "cascade"),
        (1000.0, "string"),
        (6099.9, "string"),
        (6100.0, "high-energy"),
        (6200.0, "high-energy"),
        (1.0e9, "high-energy"),
    ];
    for (energy, expected) in cases {
        let resolved = dispatcher
            .resolve(ParticleId::NEUTRON, energy)
            .expect("resolved");
        assert_eq!(resolved.label(), expected, "energy {energy}");
    }
}

#[test]
fn overlap_resolves_to_first_registered_binding() {
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::PROTON, flat_xs("default", 0.7))
        .register(ParticleId::PROTON, binding("first", ModelRole::Cascade, 0.0, 10.0))
        .register(ParticleId::PROTON, binding("second", ModelRole::String, 5.0, 20.0));
    let dispatcher = builder
        .build(CoverageWindow::new(0.0, 20.0).expect("window"))
        .expect("build");

    assert_eq!(dispatcher.resolve(ParticleId::PROTON, 7.0).expect("7").label(), "first");
    assert_eq!(dispatcher.resolve(ParticleId::PROTON, 10.0).expect("10").label(), "second");
    // The last binding is closed at the top of the axis.
    assert_eq!(dispatcher.resolve(ParticleId::PROTON, 20.0).expect("20").label(), "second");

    let err = dispatcher
        .resolve(ParticleId::PROTON, 25.0)
        .expect_err("above every domain");
    assert_eq!(err.kind(), "no_applicable_model");
    assert_eq!(err.info().code, "dispatch_no_model");
}

#[test]
fn unknown_particle_is_reported() {
    let dispatcher = neutron_dispatcher();
    let err = dispatcher
        .resolve(ParticleId::GAMMA, 100.0)
        .expect_err("no gamma models");
    assert_eq!(err.kind(), "unknown_species");
    assert_eq!(err.info().context.get("particle").map(String::as_str), Some("22"));
    assert!(!dispatcher.knows(ParticleId::GAMMA));
    assert!(dispatcher.knows(ParticleId::NEUTRON));
}

#[test]
fn negative_energy_has_no_model() {
    let dispatcher = neutron_dispatcher();
    for energy in [-1.0, f64::NAN] {
        let err = dispatcher
            .resolve(ParticleId::NEUTRON, energy)
            .expect_err("invalid energy");
        assert_eq!(err.kind(), "no_applicable_model");
        assert_eq!(err.info().code, "dispatch_invalid_energy");
    }
}

#[test]
fn gap_between_domains_fails_the_build() {
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::PION_PLUS, flat_xs("default", 0.5))
        .register(ParticleId::PION_PLUS, binding("low", ModelRole::Cascade, 0.0, 10.0))
        .register(
            ParticleId::PION_PLUS,
            binding("high", ModelRole::String, 12.0, f64::INFINITY),
        );
    let err = builder
        .build(CoverageWindow::unbounded())
        .expect_err("gap between 10 and 12");
    assert_eq!(err.kind(), "configuration_gap");
    let context = &err.info().context;
    assert_eq!(context.get("particle").map(String::as_str), Some("211"));
    assert_eq!(context.get("gap_from_mev").map(String::as_str), Some("10"));
    assert_eq!(context.get("gap_to_mev").map(String::as_str), Some("12"));
}

#[test]
fn coverage_window_edges_are_checked() {
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::PROTON, flat_xs("default", 0.5))
        .register(ParticleId::PROTON, binding("mid", ModelRole::Cascade, 200.0, 1000.0));
    let err = builder
        .build(CoverageWindow::new(100.0, 1000.0).expect("window"))
        .expect_err("nothing below 200 MeV");
    assert_eq!(
        err.info().context.get("gap_to_mev").map(String::as_str),
        Some("200")
    );

    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::PROTON, flat_xs("default", 0.5))
        .register(ParticleId::PROTON, binding("mid", ModelRole::Cascade, 200.0, 1000.0));
    builder
        .build(CoverageWindow::new(250.0, 900.0).expect("window"))
        .expect("window inside the binding");
}

#[test]
fn binding_without_any_cross_section_is_rejected() {
    let mut builder = DispatcherBuilder::new();
    builder.register(
        ParticleId::NEUTRON,
        binding("lonely", ModelRole::Cascade, 0.0, f64::INFINITY),
    );
    let err = builder
        .build(CoverageWindow::unbounded())
        .expect_err("no cross section");
    assert_eq!(err.kind(), "config");
    assert_eq!(err.info().code, "dispatch_missing_cross_section");
}

#[test]
fn invalid_domains_are_rejected() {
    for (min, max) in [(10.0, 10.0), (-1.0, 5.0), (f64::NAN, 1.0), (f64::INFINITY, f64::INFINITY)] {
        let err = EnergyDomain::new(min, max).expect_err("invalid domain");
        assert_eq!(err.info().code, "domain_invalid");
    }
    let open = EnergyDomain::open_from(6100.0).expect("open");
    assert!(open.is_open_ended());
    assert!(open.contains(1.0e12));
    assert!(open.overlaps(&EnergyDomain::new(0.0, 6101.0).expect("domain")));
    assert!(!open.overlaps(&EnergyDomain::new(0.0, 6100.0).expect("domain")));
}

#[test]
fn interact_applies_the_resolved_generator() {
    let dispatcher = neutron_dispatcher();
    let projectile = Projectile::new(ParticleId::NEUTRON, 6200.0);
    let state = dispatcher
        .interact(&projectile, &TargetNucleus { z: 26, a: 56 })
        .expect("final state");
    assert_eq!(state.primary, TrackStatus::StopAndKill);
    assert!(state.primary.is_terminal());
    assert!(!TrackStatus::Alive.is_terminal());
    assert!(state.secondaries.is_empty());
    assert_eq!(state.local_energy_deposit, 6200.0);
    assert_eq!(state.secondary_energy(), 0.0);
}

#[test]
fn binding_cross_section_overrides_the_default() {
    let isotopes = TabulatedCrossSection::new("isotopes")
        .isotope_only()
        .with_element(26, XsTable::new(vec![1.0], vec![9.0]).expect("table"))
        .with_isotope(26, 54, XsTable::new(vec![1.0], vec![0.6]).expect("table"))
        .with_isotope(26, 56, XsTable::new(vec![1.0], vec![0.8]).expect("table"));
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(ParticleId::PION_PLUS, flat_xs("default", 0.5))
        .register(
            ParticleId::PION_PLUS,
            binding("cascade", ModelRole::Cascade, 0.0, 6100.0),
        )
        .register(
            ParticleId::PION_PLUS,
            binding("fluka", ModelRole::HighEnergy, 6100.0, f64::INFINITY)
                .with_cross_section(Arc::new(isotopes)),
        );
    let dispatcher = builder.build(CoverageWindow::unbounded()).expect("build");

    let iron = Element {
        z: 26,
        isotopes: vec![
            IsotopeFraction { a: 54, abundance: 0.25 },
            IsotopeFraction { a: 56, abundance: 0.75 },
        ],
    };
    let low = dispatcher
        .cross_section(&Projectile::new(ParticleId::PION_PLUS, 100.0), &iron)
        .expect("low");
    assert_eq!(low, 0.5);
    let provider = dispatcher
        .cross_section_provider(ParticleId::PION_PLUS, 7000.0)
        .expect("provider");
    assert_eq!(provider.name(), "isotopes");
    let high = dispatcher
        .cross_section(&Projectile::new(ParticleId::PION_PLUS, 7000.0), &iron)
        .expect("high");
    assert!((high - (0.25 * 0.6 + 0.75 * 0.8)).abs() < 1e-12);
}

#[test]
fn xs_table_interpolates_and_clamps() {
    let table = XsTable::new(vec![10.0, 20.0, 40.0], vec![1.0, 2.0, 4.0]).expect("table");
    assert_eq!(table.evaluate(5.0), 1.0);
    assert_eq!(table.evaluate(15.0), 1.5);
    assert_eq!(table.evaluate(20.0), 2.0);
    assert_eq!(table.evaluate(30.0), 3.0);
    assert_eq!(table.evaluate(100.0), 4.0);

    let err = XsTable::new(vec![2.0, 1.0], vec![1.0, 1.0]).expect_err("unordered");
    assert_eq!(err.info().code, "xs_table_order");
    let err = XsTable::new(vec![1.0], vec![]).expect_err("shape");
    assert_eq!(err.info().code, "xs_table_shape");
}

#[test]
fn empty_xs_tables_never_reach_the_dispatcher() {
    let err = XsTable::new(Vec::new(), Vec::new()).expect_err("empty grid");
    assert_eq!(err.info().code, "xs_table_shape");

    let empty = hadr_core::serde::from_yaml_slice::<XsTable>(b"{energies: [], values: []}");
    assert!(empty.is_err());
    let provider = hadr_core::serde::from_yaml_slice::<TabulatedCrossSection>(
        b"name: empty\nelements:\n  26: {energies: [], values: []}\n",
    );
    assert!(provider.is_err());

    let parsed: XsTable =
        hadr_core::serde::from_yaml_slice(b"{energies: [10, 20], values: [1, 3]}").expect("table");
    assert_eq!(parsed.energies(), [10.0, 20.0]);
    assert_eq!(parsed.values(), [1.0, 3.0]);
    let mut builder = DispatcherBuilder::new();
    builder
        .default_cross_section(
            ParticleId::NEUTRON,
            Arc::new(TabulatedCrossSection::new("parsed").with_element(26, parsed)),
        )
        .register(
            ParticleId::NEUTRON,
            binding("all", ModelRole::Cascade, 0.0, f64::INFINITY),
        );
    let dispatcher = builder.build(CoverageWindow::unbounded()).expect("build");
    let iron = Element {
        z: 26,
        isotopes: Vec::new(),
    };
    let xs = dispatcher
        .cross_section(&Projectile::new(ParticleId::NEUTRON, 15.0), &iron)
        .expect("xs");
    assert_eq!(xs, 2.0);
}

#[test]
fn describe_reports_bindings_in_order() {
    let dispatcher = neutron_dispatcher();
    let table = dispatcher.describe();
    assert_eq!(table.min_energy, 0.0);
    assert_eq!(table.max_energy, None);
    assert_eq!(table.particles.len(), 1);
    let neutron = &table.particles[0];
    assert_eq!(neutron.particle, ParticleId::NEUTRON);
    assert_eq!(neutron.default_cross_section.as_deref(), Some("default"));
    let labels: Vec<_> = neutron.bindings.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["cascade", "string", "high-energy"]);
    assert_eq!(neutron.bindings[0].max_energy, Some(1000.0));
    assert_eq!(neutron.bindings[2].max_energy, None);
    assert_eq!(neutron.bindings[2].role, ModelRole::HighEnergy);
}

#[test]
fn dispatcher_is_shared_across_threads() {
    let dispatcher = Arc::new(neutron_dispatcher());
    std::thread::scope(|scope| {
        for worker in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                let energy = 500.0 + 2000.0 * worker as f64;
                dispatcher
                    .resolve(ParticleId::NEUTRON, energy)
                    .expect("resolved on worker");
            });
        }
    });
}

fn partition_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<usize>)> {
    prop::collection::vec(1.0f64..500.0, 1..8).prop_flat_map(|widths| {
        let mut edges = vec![0.0];
        for width in &widths {
            let last = *edges.last().unwrap_or(&0.0);
            edges.push(last + width);
        }
        let order: Vec<usize> = (0..widths.len()).collect();
        (Just(edges), Just(order).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn gap_free_partition_resolves_everywhere(
        (edges, order) in partition_strategy(),
        fraction in 0.0f64..=1.0,
    ) {
        let mut builder = DispatcherBuilder::new();
        builder.default_cross_section(ParticleId::NEUTRON, flat_xs("default", 0.7));
        for &segment in &order {
            let label = format!("segment-{segment}");
            builder.register(
                ParticleId::NEUTRON,
                binding(&label, ModelRole::Custom, edges[segment], edges[segment + 1]),
            );
        }
        let top = *edges.last().unwrap_or(&0.0);
        let dispatcher = builder
            .build(CoverageWindow::new(0.0, top).expect("window"))
            .expect("gap-free");
        let energy = top * fraction;
        let resolved = dispatcher.resolve(ParticleId::NEUTRON, energy).expect("resolved");
        let domain = resolved.domain();
        prop_assert!(domain.contains(energy) || (energy == top && domain.max() == top));
    }

    #[test]
    fn removing_an_inner_segment_is_a_gap(
        (edges, _order) in partition_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(edges.len() > 2);
        let missing = pick.index(edges.len() - 1);
        let mut builder = DispatcherBuilder::new();
        builder.default_cross_section(ParticleId::NEUTRON, flat_xs("default", 0.7));
        for segment in (0..edges.len() - 1).filter(|s| *s != missing) {
            builder.register(
                ParticleId::NEUTRON,
                binding("segment", ModelRole::Custom, edges[segment], edges[segment + 1]),
            );
        }
        let top = *edges.last().unwrap_or(&0.0);
        let err = builder
            .build(CoverageWindow::new(0.0, top).expect("window"))
            .expect_err("gap");
        prop_assert_eq!(err.kind(), "configuration_gap");
    }
}
