use hadr_core::units::{GEV, KEV, TEV};
use hadr_core::{Energy, ParticleId, RegionTable, StepSnapshot};

#[test]
fn energies_parse_with_units() {
    assert_eq!(Energy::parse("6.1 GeV").expect("gev").mev(), 6.1 * GEV);
    assert_eq!(Energy::parse("800").expect("bare").mev(), 800.0);
    assert_eq!(Energy::parse("250keV").expect("kev").mev(), 250.0 * KEV);
    assert_eq!(Energy::parse("100 TeV").expect("tev").mev(), 100.0 * TEV);
    assert!(Energy::parse("inf").expect("inf").is_infinite());
}

#[test]
fn invalid_energies_are_config_errors() {
    assert_eq!(Energy::parse("fast").expect_err("text").kind(), "config");
    assert_eq!(Energy::parse("-3 GeV").expect_err("negative").info().code, "energy_negative");
    assert_eq!(Energy::parse("3 GeVs").expect_err("unit").info().code, "energy_parse");
}

#[test]
fn energy_yaml_accepts_numbers_and_strings() {
    let values: Vec<Energy> =
        serde_yaml::from_str("[1000, \"6.1 GeV\", inf]").expect("yaml energies");
    assert_eq!(values[0].mev(), 1000.0);
    assert_eq!(values[1].mev(), 6100.0);
    assert!(values[2].is_infinite());
    assert_eq!(values[1].to_string(), "6.1 GeV");
    assert_eq!(Energy::INFINITY.to_string(), "inf");
}

#[test]
fn region_handles_are_stable() {
    let mut regions = RegionTable::new();
    let iron = regions.intern("ironboxPV");
    let world = regions.intern("all_PV");
    assert_ne!(iron, world);
    assert_eq!(regions.intern("ironboxPV"), iron);
    assert_eq!(regions.lookup("all_PV"), Some(world));
    assert_eq!(regions.lookup("CALO::CALO"), None);
    assert_eq!(regions.name(world), Some("all_PV"));
    assert_eq!(regions.len(), 2);
}

#[test]
fn kinematics_are_consistent() {
    let step = StepSnapshot::from_kinematics(ParticleId::PROTON, 1000.0, 938.272);
    assert!((step.total_energy - 1938.272).abs() < 1e-9);
    let invariant = step.total_energy.powi(2) - step.momentum.powi(2);
    assert!((invariant.sqrt() - 938.272).abs() < 1e-6);
}
