use hadr_core::{ParticleId, ParticleTable, Species, SpeciesClassifier};
use proptest::prelude::*;

#[test]
fn standard_table_maps_named_species() {
    let classifier = SpeciesClassifier::from_table(&ParticleTable::standard()).expect("classifier");
    assert_eq!(classifier.classify(ParticleId::NEUTRON), Species::Neutron);
    assert_eq!(classifier.classify(ParticleId::ANTI_NEUTRON), Species::AntiNeutron);
    assert_eq!(classifier.classify(ParticleId::PROTON), Species::Proton);
    assert_eq!(classifier.classify(ParticleId::ANTI_PROTON), Species::AntiProton);
    assert_eq!(classifier.classify(ParticleId::PION_PLUS), Species::PionPlus);
    assert_eq!(classifier.classify(ParticleId::PION_MINUS), Species::PionMinus);
    assert_eq!(classifier.classify(ParticleId::ELECTRON), Species::Electron);
    assert_eq!(classifier.classify(ParticleId::POSITRON), Species::Positron);
    assert_eq!(classifier.classify(ParticleId::GAMMA), Species::Gamma);
}

#[test]
fn unlisted_identities_are_other() {
    let classifier = SpeciesClassifier::default();
    assert_eq!(classifier.classify(ParticleId::from_raw(321)), Species::Other);
    assert_eq!(classifier.classify(ParticleId::from_raw(111)), Species::Other);
    assert_eq!(classifier.classify(ParticleId::from_raw(0)), Species::Other);
}

#[test]
fn classifier_follows_the_identity_table() {
    let mut table = ParticleTable::standard();
    table.insert("neutron", ParticleId::from_raw(9_999), 939.565);
    let classifier = SpeciesClassifier::from_table(&table).expect("classifier");
    assert_eq!(classifier.classify(ParticleId::from_raw(9_999)), Species::Neutron);
    assert_eq!(classifier.classify(ParticleId::NEUTRON), Species::Other);
}

#[test]
fn missing_table_entry_is_a_config_error() {
    let mut table = ParticleTable::new();
    table.insert("neutron", ParticleId::NEUTRON, 939.565);
    let err = SpeciesClassifier::from_table(&table).expect_err("incomplete table");
    assert_eq!(err.kind(), "config");
    assert_eq!(err.info().context["particle"], "anti_neutron");
}

#[test]
fn default_matches_standard_table() {
    let from_table = SpeciesClassifier::from_table(&ParticleTable::standard()).expect("classifier");
    assert_eq!(from_table, SpeciesClassifier::default());
}

#[test]
fn species_index_roundtrip() {
    for (idx, species) in Species::ALL.iter().enumerate() {
        assert_eq!(species.index(), idx);
        assert_eq!(Species::from_index(idx), Some(*species));
    }
    assert_eq!(Species::from_index(Species::COUNT), None);
    assert_eq!(Species::Other.column(), "othersScore");
}

proptest! {
    #[test]
    fn classify_is_total_and_stable(code in any::<i32>()) {
        let classifier = SpeciesClassifier::default();
        let first = classifier.classify(ParticleId::from_raw(code));
        let second = classifier.classify(ParticleId::from_raw(code));
        prop_assert_eq!(first, second);
        if first != Species::Other {
            prop_assert_eq!(classifier.code_of(first), Some(ParticleId::from_raw(code)));
        }
    }
}
