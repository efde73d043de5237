/*
 * This file is part of pt104.
 *
 * Copyright (C) 2025 pt104 contributors
 *
 * pt104 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * pt104 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with pt104. If not, see <https://www.gnu.org/licenses/>.
 */

//! Subcommand implementations
//!
//! Each handler writes its output to the given writer so the commands can be
//! exercised without a terminal.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use pt104_core::{
    format_value, resistance_ratio, validate_reference_resistance, Clock, ManualClock,
    MonotonicClock, TemperatureSolver,
};
use tracing::info;

use crate::cli::{ConfigCommands, ConvertCommands, SampleArgs};
use crate::config::{load_config, save_config, validate_config, AcquisitionConfig};
use crate::session::{simulated_transport, SampleRecord, Session};

pub fn run_sample(config_file: &Path, args: &SampleArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mut cfg = load_config(config_file)
        .with_context(|| format!("Failed to load {} (try `pt104 config init`)", config_file.display()))?;
    if let Some(samples) = args.samples {
        cfg.samples = samples;
    }

    if args.instant {
        sample_with_clock(&cfg, ManualClock::new(), args.json, out)
    } else {
        sample_with_clock(&cfg, MonotonicClock, args.json, out)
    }
}

fn sample_with_clock<C: Clock>(
    cfg: &AcquisitionConfig,
    clock: C,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let transport = simulated_transport(cfg)?;
    let mut session = Session::start(transport, clock, cfg)?;
    if session.channels().is_empty() {
        bail!("No channels with a sensor configured");
    }

    let unit = cfg.display.temperature_unit;
    let precision = cfg.display.precision;
    let mut write_error = None;

    let failures = session.run(cfg.samples, |round, index, result| {
        let line = match result {
            Ok(value) if json => serde_json::to_string(&SampleRecord::new(round, *value))
                .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
            Ok(value) => format!("[{round}] {index}: {}", format_value(value, unit, precision)),
            Err(e) if json => serde_json::json!({
                "round": round,
                "channel": index.get(),
                "error": e.to_string(),
            })
            .to_string(),
            Err(e) => format!("[{round}] {index}: error: {e}"),
        };
        if write_error.is_none() {
            if let Err(e) = writeln!(out, "{line}") {
                write_error = Some(e);
            }
        }
    });

    session.finish()?;
    if let Some(e) = write_error {
        return Err(e).context("Failed to write sample output");
    }
    if failures > 0 {
        info!("{} read(s) failed", failures);
    }
    Ok(())
}

pub fn run_convert(command: &ConvertCommands, out: &mut impl Write) -> anyhow::Result<()> {
    match *command {
        ConvertCommands::Ratio { ratio, r0 } => {
            let mut solver = TemperatureSolver::new();
            let solution = solver.solve(ratio, solver.tolerance(), solver.max_iterations(), None)?;
            writeln!(
                out,
                "{:.6} °C ({} iterations)",
                solution.temperature, solution.iterations
            )?;
            if let Some(r0) = r0 {
                let r0 = validate_reference_resistance(r0)?;
                writeln!(out, "{:.6} Ω at R0 = {} Ω", ratio * r0, r0)?;
            }
        }
        ConvertCommands::Temperature { temperature, r0 } => {
            if !temperature.is_finite() {
                bail!("Temperature must be a finite number");
            }
            writeln!(out, "ratio {:.9}", resistance_ratio(temperature))?;
            if let Some(r0) = r0 {
                let r0 = validate_reference_resistance(r0)?;
                writeln!(out, "{:.6} Ω at R0 = {} Ω", TemperatureSolver::resistance(temperature, r0), r0)?;
            }
        }
    }
    Ok(())
}

pub fn run_config(config_file: &Path, command: &ConfigCommands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let cfg = load_config(config_file)
                .with_context(|| format!("Failed to load {}", config_file.display()))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&cfg)?)?;
        }
        ConfigCommands::Validate => {
            let cfg = load_config(config_file)
                .with_context(|| format!("Invalid configuration {}", config_file.display()))?;
            let channels = validate_config(&cfg)?;
            writeln!(out, "{}: OK ({} channel(s))", config_file.display(), channels.len())?;
        }
        ConfigCommands::Init { force } => {
            if config_file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", config_file.display());
            }
            save_config(config_file, &AcquisitionConfig::example())?;
            writeln!(out, "Wrote {}", config_file.display())?;
        }
    }
    Ok(())
}
