#![warn(clippy::pedantic, rust_2018_idioms)]

mod config;
mod league;
mod matchup;
mod probability;
mod prompt;
mod recommend;
mod report;
mod score;
mod stats;
mod util;

use crate::config::{Command, Config};
use crate::matchup::{Analysis, MatchContext};
use crate::probability::Simulator;
use crate::prompt::Console;
use crate::report::FormReport;
use crate::score::Model;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let simulator = Simulator::new(config.simulations);
    let mut rng = config.rng();
    info!(simulations = simulator.simulations, seed = ?config.seed, "starting");

    match config.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(stdin.lock(), stdout.lock())
                .run(&simulator, &mut rng)
                .context("console session failed")?;
        }
        Command::Form { path, json } => {
            let context = MatchContext::load(&path)?;
            let analysis = Analysis::run(&context, Model::Full, &simulator, &mut rng)?;
            let report = FormReport::new(&context, &analysis);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", report)?;
            }
        }
    }
    Ok(())
}
