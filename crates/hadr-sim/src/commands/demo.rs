use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use hadr_core::errors::{serde_error, HadrError};
use hadr_core::serde::to_canonical_json_bytes;
use hadr_core::{
    ParticleId, ParticleTable, RegionId, RegionTable, SpeciesClassifier, StepSnapshot,
};
use hadr_dispatch::{InteractionDispatcher, Projectile, TargetNucleus};
use hadr_spectrum::{
    load_spectrum_config, BoundaryRegions, BoundaryStepObserver, CsvSpectrumSink, EnergyTally,
    RunCounts, ScorerKind, SpectrumAccumulator, SpectrumSink,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use siphasher::sip::SipHasher13;

use super::{load_physics, print_json, write_json};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// YAML physics list.
    #[arg(long, default_value = "configs/physics_list.yaml")]
    pub physics_list: PathBuf,
    /// YAML spectrum configuration.
    #[arg(long, default_value = "configs/spectrum.yaml")]
    pub config: PathBuf,
    /// Number of events over all workers.
    #[arg(long, default_value_t = 200)]
    pub events: u64,
    /// Number of workers, each with its own accumulator.
    #[arg(long, default_value_t = 4)]
    pub threads: usize,
    /// Master seed; worker seeds are derived from it.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Output directory.
    #[arg(long)]
    pub out: PathBuf,
}

const PRIMARIES: [ParticleId; 4] = [
    ParticleId::PION_PLUS,
    ParticleId::PION_MINUS,
    ParticleId::PROTON,
    ParticleId::NEUTRON,
];

const LEAKING: [ParticleId; 10] = [
    ParticleId::NEUTRON,
    ParticleId::NEUTRON,
    ParticleId::NEUTRON,
    ParticleId::PROTON,
    ParticleId::PION_PLUS,
    ParticleId::PION_MINUS,
    ParticleId::GAMMA,
    ParticleId::GAMMA,
    ParticleId::ELECTRON,
    ParticleId::from_raw(321),
];

const IRON: TargetNucleus = TargetNucleus { z: 26, a: 56 };

/// Shared read-only inputs of every worker.
struct DemoContext {
    dispatcher: Arc<InteractionDispatcher>,
    table: ParticleTable,
    classifier: SpeciesClassifier,
    scorer: ScorerKind,
    boundary: BoundaryRegions,
    ironbox: RegionId,
    world: RegionId,
    calo: RegionId,
    events: u64,
    threads: usize,
    master_seed: u64,
    out: PathBuf,
}

#[derive(Debug, Serialize)]
struct WorkerReport {
    worker: usize,
    seed: u64,
    run_counts: RunCounts,
    leakage: f64,
    deposit: f64,
    model_usage: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize)]
struct DemoSummary {
    physics_hash: String,
    master_seed: u64,
    threads: usize,
    run_counts: RunCounts,
    leakage: f64,
    deposit: f64,
    model_usage: BTreeMap<String, u64>,
    workers: Vec<WorkerReport>,
}

/// Seed of worker `worker`, stable for a given master seed.
pub fn derive_worker_seed(master_seed: u64, worker: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(worker);
    hasher.finish()
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    if args.threads == 0 {
        return Err("--threads must be at least 1".into());
    }
    let physics = load_physics(&args.physics_list)?;
    let spectrum = load_spectrum_config(&args.config)?;
    fs::create_dir_all(&args.out)?;

    let mut regions = RegionTable::new();
    let boundary = BoundaryRegions::resolve(&spectrum.boundary, &mut regions);
    let calo_name = spectrum
        .boundary
        .deposit_exclusions
        .first()
        .map_or("CALO::CALO", String::as_str);
    let context = DemoContext {
        dispatcher: Arc::new(physics.dispatcher),
        classifier: SpeciesClassifier::from_table(&physics.table)?,
        table: physics.table,
        scorer: spectrum.scorer,
        ironbox: boundary.contained(),
        world: boundary.outer(),
        calo: regions.intern(calo_name),
        boundary,
        events: args.events,
        threads: args.threads,
        master_seed: args.seed,
        out: args.out.clone(),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()?;
    let workers: Result<Vec<WorkerReport>, HadrError> = pool.install(|| {
        (0..args.threads)
            .into_par_iter()
            .map(|worker| run_worker(worker, &context))
            .collect()
    });
    let workers = workers?;

    let summary = merge(physics.config_hash, &context, workers);
    log::info!("merged boundary counts\n{}", summary.run_counts);
    write_json(&args.out.join("summary.json"), &summary)?;
    print_json(&summary)
}

fn run_worker(worker: usize, context: &DemoContext) -> Result<WorkerReport, HadrError> {
    let seed = derive_worker_seed(context.master_seed, worker as u64);
    let mut rng = StdRng::seed_from_u64(seed);
    let dispatcher = Arc::clone(&context.dispatcher);
    let dir = context.out.join(format!("worker-{worker}"));
    fs::create_dir_all(&dir).map_err(|err| serde_error("demo_output_dir", err))?;

    let mut accumulator =
        SpectrumAccumulator::with_scorer(context.classifier.clone(), context.scorer);
    let mut sink = CsvSpectrumSink::create(dir.join("spectrum.csv"))?;
    let mut leakage = EnergyTally::new();
    let mut deposit = EnergyTally::new();
    let (mut leaked_total, mut deposited_total) = (0.0, 0.0);
    let mut model_usage = BTreeMap::new();

    let events = (worker as u64..context.events).step_by(context.threads);
    for event in events {
        accumulator.begin_event(event);
        let primary = PRIMARIES[rng.gen_range(0..PRIMARIES.len())];
        let energy = 1.0e3 * 10f64.powf(rng.gen_range(0.0..2.0));
        let binding = dispatcher.resolve(primary, energy)?;
        *model_usage.entry(binding.label().to_string()).or_insert(0) += 1;
        let state = dispatcher.interact(&Projectile::new(primary, energy), &IRON)?;

        let mut available = state.local_energy_deposit;
        let mut observer = BoundaryStepObserver::new(
            &context.boundary,
            &mut accumulator,
            &mut leakage,
            &mut deposit,
        );
        let leaving = |particle: ParticleId, kinetic_energy: f64| {
            let mass = context.table.entry(particle).map_or(0.0, |entry| entry.mass);
            StepSnapshot::from_kinematics(particle, kinetic_energy, mass)
                .with_regions(Some(context.ironbox), Some(context.world))
        };
        // A surviving primary punches through the box.
        if !state.primary.is_terminal() {
            observer.on_step(&leaving(primary, state.primary_kinetic_energy));
        }
        for _ in 0..rng.gen_range(0..8) {
            let particle = LEAKING[rng.gen_range(0..LEAKING.len())];
            let kinetic_energy = available * rng.gen_range(0.0..0.2);
            available -= kinetic_energy;
            observer.on_step(&leaving(particle, kinetic_energy));
        }
        let in_box = available * rng.gen::<f64>();
        let deposits = [(context.ironbox, in_box), (context.calo, available - in_box)];
        for (region, energy_deposit) in deposits {
            let step = StepSnapshot::from_kinematics(primary, 0.0, 0.0)
                .with_regions(Some(region), Some(region))
                .with_deposit(energy_deposit);
            observer.on_step(&step);
        }

        if let Some(record) = accumulator.end_event() {
            sink.commit(&record)?;
        }
        leaked_total += leakage.take().sum();
        deposited_total += deposit.take().sum();
    }
    sink.finish()?;

    let report = WorkerReport {
        worker,
        seed,
        run_counts: accumulator.report_run_counts(),
        leakage: leaked_total,
        deposit: deposited_total,
        model_usage,
    };
    write_worker_report(&dir, &report)?;
    log::debug!("worker {worker} finished {} events", report.run_counts.events);
    Ok(report)
}

fn write_worker_report(dir: &Path, report: &WorkerReport) -> Result<(), HadrError> {
    let bytes = to_canonical_json_bytes(&report.run_counts)?;
    fs::write(dir.join("run_counts.json"), bytes)
        .map_err(|err| serde_error("demo_output_write", err))
}

/// Sums the per-worker results in worker order.
fn merge(physics_hash: String, context: &DemoContext, workers: Vec<WorkerReport>) -> DemoSummary {
    let mut run_counts = RunCounts::new(context.scorer);
    let mut model_usage = BTreeMap::new();
    let (mut leakage, mut deposit) = (0.0, 0.0);
    for report in &workers {
        for (total, count) in run_counts.counts.iter_mut().zip(report.run_counts.counts) {
            *total += count;
        }
        run_counts.events += report.run_counts.events;
        run_counts.records += report.run_counts.records;
        leakage += report.leakage;
        deposit += report.deposit;
        for (label, uses) in &report.model_usage {
            *model_usage.entry(label.clone()).or_insert(0) += uses;
        }
    }
    DemoSummary {
        physics_hash,
        master_seed: context.master_seed,
        threads: context.threads,
        run_counts,
        leakage,
        deposit,
        model_usage,
        workers,
    }
}
