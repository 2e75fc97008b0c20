use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use hadr_core::serde::from_json_slice;
use hadr_core::ParticleId;
use hadr_dispatch::{DispatchTable, TransitionSpec};
use serde::{Deserialize, Serialize};

use super::{load_physics, print_json, write_json};

#[derive(Args, Debug)]
pub struct TableArgs {
    /// YAML physics list.
    #[arg(long, default_value = "configs/physics_list.yaml")]
    pub physics_list: PathBuf,
    /// Also write the table to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Table written by an earlier run; particles whose bindings differ are listed.
    #[arg(long)]
    pub baseline: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableReport {
    config_hash: String,
    transition: TransitionSpec,
    table: DispatchTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    baseline: Option<BaselineDiff>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BaselineDiff {
    config_hash: String,
    changed: Vec<ParticleId>,
}

pub fn run(args: &TableArgs) -> Result<(), Box<dyn Error>> {
    let physics = load_physics(&args.physics_list)?;
    let mut report = TableReport {
        config_hash: physics.config_hash.clone(),
        transition: physics.config.transition,
        table: physics.dispatcher.describe(),
        baseline: None,
    };
    if let Some(path) = &args.baseline {
        let previous: TableReport = from_json_slice(&fs::read(path)?)?;
        report.baseline = Some(BaselineDiff {
            changed: changed_particles(&previous.table, &report.table),
            config_hash: previous.config_hash,
        });
    }
    if let Some(path) = &args.out {
        write_json(path, &report)?;
    }
    print_json(&report)
}

/// Particles present in only one table or bound differently in the two.
fn changed_particles(before: &DispatchTable, after: &DispatchTable) -> Vec<ParticleId> {
    let codes: BTreeSet<ParticleId> = before
        .particles
        .iter()
        .chain(&after.particles)
        .map(|entry| entry.particle)
        .collect();
    codes
        .into_iter()
        .filter(|code| {
            let old = before.particles.iter().find(|entry| entry.particle == *code);
            let new = after.particles.iter().find(|entry| entry.particle == *code);
            old != new
        })
        .collect()
}
