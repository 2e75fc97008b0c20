use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    demo::{self, DemoArgs},
    replay::{self, ReplayArgs},
    resolve::{self, ResolveArgs},
    table::{self, TableArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "hadr-sim",
    about = "Hadronic model dispatch and boundary spectrum scoring CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the model binding for one particle at one energy.
    Resolve(ResolveArgs),
    /// Print the full dispatch table of a physics list.
    Table(TableArgs),
    /// Replay scripted steps through the boundary observer.
    Replay(ReplayArgs),
    /// Run a synthetic multi-worker simulation.
    Demo(DemoArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Resolve(args) => resolve::run(&args),
        Command::Table(args) => table::run(&args),
        Command::Replay(args) => replay::run(&args),
        Command::Demo(args) => demo::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
