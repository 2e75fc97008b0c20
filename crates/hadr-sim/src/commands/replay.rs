use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use hadr_core::serde::to_yaml_string;
use hadr_core::{
    stable_hash_string, ParticleTable, RegionTable, SpeciesClassifier, StepSnapshot, TrackStatus,
};
use hadr_spectrum::{
    load_spectrum_config, BoundaryRegions, BoundaryStepObserver, CsvSpectrumSink, EnergyTally,
    RunCounts, SpectrumAccumulator, SpectrumConfig, SpectrumSink,
};
use serde::{Deserialize, Serialize};

use super::write_json;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// YAML spectrum configuration.
    #[arg(long, default_value = "configs/spectrum.yaml")]
    pub config: PathBuf,
    /// CSV of scripted steps, grouped by event.
    #[arg(long)]
    pub steps: PathBuf,
    /// Output directory.
    #[arg(long)]
    pub out: PathBuf,
    /// Overrides the configured scorer (`te`, `ke`, `momentum`).
    #[arg(long)]
    pub scorer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StepRow {
    event: u64,
    particle: String,
    kinetic_energy: f64,
    momentum: f64,
    total_energy: f64,
    #[serde(default)]
    pre_region: String,
    #[serde(default)]
    post_region: String,
    #[serde(default)]
    energy_deposit: f64,
    #[serde(default)]
    step_length: f64,
    #[serde(default)]
    status: Option<TrackStatus>,
}

impl StepRow {
    fn into_snapshot(
        self,
        table: &ParticleTable,
        regions: &mut RegionTable,
    ) -> Result<StepSnapshot, Box<dyn Error>> {
        let mut region = |name: &str| (!name.is_empty()).then(|| regions.intern(name));
        Ok(StepSnapshot {
            particle: table.resolve(&self.particle)?,
            kinetic_energy: self.kinetic_energy,
            momentum: self.momentum,
            total_energy: self.total_energy,
            pre_region: region(&self.pre_region),
            post_region: region(&self.post_region),
            energy_deposit: self.energy_deposit,
            step_length: self.step_length,
            status: self.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct EnergyRow {
    event: u64,
    leakage: f64,
    leakage_entries: u64,
    deposit: f64,
    deposit_entries: u64,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    config_hash: String,
    steps: u64,
    run_counts: RunCounts,
}

struct EventOutputs {
    spectrum: CsvSpectrumSink<fs::File>,
    energy: csv::Writer<fs::File>,
}

pub fn run(args: &ReplayArgs) -> Result<(), Box<dyn Error>> {
    let mut config = load_spectrum_config(&args.config)?;
    fs::create_dir_all(&args.out)?;

    let table = ParticleTable::standard();
    let mut regions = RegionTable::new();
    let boundary = BoundaryRegions::resolve(&config.boundary, &mut regions);
    let mut accumulator =
        SpectrumAccumulator::with_scorer(SpeciesClassifier::from_table(&table)?, config.scorer);
    if let Some(name) = &args.scorer {
        accumulator.configure_scorer_named(name)?;
        config.scorer = accumulator.scorer();
    }
    let config_hash = write_effective_config(&args.out, &config)?;
    let mut outputs = EventOutputs {
        spectrum: CsvSpectrumSink::create(args.out.join("spectrum.csv"))?,
        energy: csv::Writer::from_path(args.out.join("energy.csv"))?,
    };
    let mut leakage = EnergyTally::new();
    let mut deposit = EnergyTally::new();

    let mut reader = csv::Reader::from_path(&args.steps)?;
    let mut current = None;
    let mut steps = 0u64;
    for row in reader.deserialize() {
        let row: StepRow = row?;
        if current != Some(row.event) {
            if let Some(event) = current {
                flush(event, &mut accumulator, &mut leakage, &mut deposit, &mut outputs)?;
            }
            accumulator.begin_event(row.event);
            current = Some(row.event);
        }
        let step = row.into_snapshot(&table, &mut regions)?;
        BoundaryStepObserver::new(&boundary, &mut accumulator, &mut leakage, &mut deposit)
            .on_step(&step);
        steps += 1;
    }
    if let Some(event) = current {
        flush(event, &mut accumulator, &mut leakage, &mut deposit, &mut outputs)?;
    }
    outputs.spectrum.finish()?;
    outputs.energy.flush()?;

    let run_counts = accumulator.report_run_counts();
    println!("{run_counts}");
    write_report(
        &args.out,
        &ReplayReport {
            config_hash,
            steps,
            run_counts,
        },
    )
}

fn flush(
    event: u64,
    accumulator: &mut SpectrumAccumulator,
    leakage: &mut EnergyTally,
    deposit: &mut EnergyTally,
    outputs: &mut EventOutputs,
) -> Result<(), Box<dyn Error>> {
    if let Some(record) = accumulator.end_event() {
        outputs.spectrum.commit(&record)?;
    }
    let (leaked, deposited) = (leakage.take(), deposit.take());
    outputs.energy.serialize(EnergyRow {
        event,
        leakage: leaked.sum(),
        leakage_entries: leaked.entries(),
        deposit: deposited.sum(),
        deposit_entries: deposited.entries(),
    })?;
    Ok(())
}

fn write_report(out: &Path, report: &ReplayReport) -> Result<(), Box<dyn Error>> {
    write_json(&out.join("run_counts.json"), report)
}

/// Records the configuration actually used, scorer override included.
fn write_effective_config(out: &Path, config: &SpectrumConfig) -> Result<String, Box<dyn Error>> {
    fs::write(out.join("config.yaml"), to_yaml_string(config)?)?;
    Ok(stable_hash_string(config)?)
}
