use hadr_core::{ParticleId, ParticleTable, Species, SpeciesClassifier, StepSnapshot};
use hadr_spectrum::{ScorerKind, SpectrumAccumulator};
use proptest::prelude::*;

fn step(particle: ParticleId, kinetic_energy: f64) -> StepSnapshot {
    let mass = ParticleTable::standard()
        .entry(particle)
        .map_or(0.0, |entry| entry.mass);
    StepSnapshot::from_kinematics(particle, kinetic_energy, mass)
}

fn accumulator(scorer: ScorerKind) -> SpectrumAccumulator {
    let classifier =
        SpeciesClassifier::from_table(&ParticleTable::standard()).expect("classifier");
    SpectrumAccumulator::with_scorer(classifier, scorer)
}

#[test]
fn scripted_event_is_accounted_per_species() {
    let mut acc = accumulator(ScorerKind::KineticEnergy);
    acc.begin_event(0);
    acc.accumulate(&step(ParticleId::NEUTRON, 10.0));
    acc.accumulate(&step(ParticleId::PROTON, 5.0));
    acc.accumulate(&step(ParticleId::NEUTRON, 3.0));
    assert_eq!(acc.event_score(Species::Neutron), 13.0);

    let record = acc.end_event().expect("record emitted");
    assert_eq!(record.event, 0);
    assert_eq!(record.entries.len(), 2);
    assert_eq!(record.score(Species::Neutron), 13.0);
    assert_eq!(record.score(Species::Proton), 5.0);
    assert_eq!(record.score(Species::Gamma), 0.0);
    assert_eq!(record.entries[0].steps, 2);

    let counts = acc.report_run_counts();
    assert_eq!(counts.count(Species::Neutron), 2);
    assert_eq!(counts.count(Species::Proton), 1);
    assert_eq!(counts.total(), 3);
    assert_eq!(counts.events, 1);
    assert_eq!(counts.records, 1);
}

#[test]
fn empty_event_emits_nothing() {
    let mut acc = accumulator(ScorerKind::TotalEnergy);
    acc.begin_event(7);
    assert!(acc.end_event().is_none());
    let counts = acc.report_run_counts();
    assert_eq!(counts.events, 1);
    assert_eq!(counts.records, 0);
    assert_eq!(counts.total(), 0);
}

#[test]
fn counted_species_with_zero_score_is_recorded() {
    let mut acc = accumulator(ScorerKind::KineticEnergy);
    acc.begin_event(1);
    acc.accumulate(&step(ParticleId::GAMMA, 0.0));
    let record = acc.end_event().expect("counted step produces a record");
    assert_eq!(record.entries.len(), 1);
    assert_eq!(record.entries[0].species, Species::Gamma);
    assert_eq!(record.entries[0].score, 0.0);
    assert_eq!(record.entries[0].steps, 1);
}

#[test]
fn scorers_pick_the_step_quantity() {
    let proton = step(ParticleId::PROTON, 100.0);
    for (kind, expected) in [
        (ScorerKind::TotalEnergy, proton.total_energy),
        (ScorerKind::KineticEnergy, 100.0),
        (ScorerKind::MomentumMagnitude, proton.momentum),
    ] {
        let mut acc = accumulator(kind);
        acc.begin_event(0);
        acc.accumulate(&proton);
        assert_eq!(acc.event_score(Species::Proton), expected, "{kind}");
    }
    assert!(proton.total_energy > 1000.0);
}

#[test]
fn scorer_names_are_lenient() {
    assert_eq!(ScorerKind::parse_lenient("te"), ScorerKind::TotalEnergy);
    assert_eq!(ScorerKind::parse_lenient("KE"), ScorerKind::KineticEnergy);
    assert_eq!(ScorerKind::parse_lenient("momentum"), ScorerKind::MomentumMagnitude);
    assert_eq!(ScorerKind::parse_lenient("kinetic_energy"), ScorerKind::KineticEnergy);
    assert_eq!(ScorerKind::parse_lenient("bogus"), ScorerKind::TotalEnergy);
    assert_eq!(ScorerKind::from_name("bogus"), None);
    for kind in ScorerKind::ALL {
        assert_eq!(ScorerKind::from_name(kind.name()), Some(kind));
    }
}

#[test]
fn scorer_is_locked_after_first_use_until_reset() {
    let mut acc = accumulator(ScorerKind::TotalEnergy);
    acc.configure_scorer(ScorerKind::KineticEnergy)
        .expect("unused accumulator can change scorer");
    acc.begin_event(0);
    acc.accumulate(&step(ParticleId::NEUTRON, 1.0));
    let err = acc
        .configure_scorer(ScorerKind::MomentumMagnitude)
        .expect_err("locked");
    assert_eq!(err.kind(), "reconfiguration_not_allowed");
    assert_eq!(acc.scorer(), ScorerKind::KineticEnergy);
    acc.end_event();

    acc.reset_run_counts();
    assert_eq!(acc.report_run_counts().total(), 0);
    acc.configure_scorer_named("momentum").expect("unlocked after reset");
    assert_eq!(acc.scorer(), ScorerKind::MomentumMagnitude);
    assert_eq!(acc.report_run_counts().scorer, ScorerKind::MomentumMagnitude);
}

#[test]
fn unflushed_event_is_discarded_by_begin_event() {
    let mut acc = accumulator(ScorerKind::KineticEnergy);
    acc.begin_event(0);
    acc.accumulate(&step(ParticleId::NEUTRON, 50.0));
    acc.begin_event(1);
    acc.accumulate(&step(ParticleId::PROTON, 2.0));
    let record = acc.end_event().expect("record");
    assert_eq!(record.event, 1);
    assert_eq!(record.score(Species::Neutron), 0.0);
    let counts = acc.report_run_counts();
    assert_eq!(counts.count(Species::Neutron), 0);
    assert_eq!(counts.count(Species::Proton), 1);
}

#[test]
fn unlisted_particles_score_as_other() {
    let mut acc = accumulator(ScorerKind::KineticEnergy);
    acc.begin_event(0);
    acc.accumulate(&step(ParticleId::from_raw(321), 4.0));
    acc.accumulate(&step(ParticleId::from_raw(13), 6.0));
    let record = acc.end_event().expect("record");
    assert_eq!(record.score(Species::Other), 10.0);
    assert_eq!(record.scores()[Species::Other.index()], 10.0);
}

#[test]
fn run_counts_render_as_table() {
    let mut acc = accumulator(ScorerKind::KineticEnergy);
    acc.begin_event(0);
    acc.accumulate(&step(ParticleId::NEUTRON, 1.0));
    acc.end_event();
    let text = acc.report_run_counts().to_string();
    assert!(text.contains("1 events"));
    assert!(text.contains("scorer ke"));
    assert!(text
        .lines()
        .any(|line| line.trim_start().starts_with("neutron") && line.ends_with('1')));
    assert_eq!(text.lines().count(), Species::COUNT + 2);
}

const CODES: [i32; 12] = [2112, -2112, 2212, -2212, 211, -211, 11, -11, 22, 13, 321, 111];

fn event_strategy() -> impl Strategy<Value = Vec<Vec<(usize, f64)>>> {
    prop::collection::vec(
        prop::collection::vec((0..CODES.len(), 0.0f64..1.0e4), 0..20),
        1..12,
    )
}

proptest! {
    #[test]
    fn event_scores_sum_to_step_total(events in event_strategy()) {
        let mut acc = accumulator(ScorerKind::KineticEnergy);
        let mut expected_score = 0.0;
        let mut expected_steps = 0u64;
        let mut recorded_score = 0.0;
        let mut recorded = 0u64;
        for (index, steps) in events.iter().enumerate() {
            acc.begin_event(index as u64);
            for (code, energy) in steps {
                acc.accumulate(&step(ParticleId::from_raw(CODES[*code]), *energy));
                expected_score += energy;
                expected_steps += 1;
            }
            if let Some(record) = acc.end_event() {
                recorded_score += record.total_score();
                recorded += 1;
            } else {
                prop_assert!(steps.is_empty());
            }
        }
        let counts = acc.report_run_counts();
        prop_assert_eq!(counts.total(), expected_steps);
        prop_assert_eq!(counts.events, events.len() as u64);
        prop_assert_eq!(counts.records, recorded);
        prop_assert!((recorded_score - expected_score).abs() <= 1e-9 * expected_score.max(1.0));
    }
}
