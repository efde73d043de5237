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

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pt104_core::constants::solver as solver_const;
use pt104_core::{
    validate_channel_assignments, validate_max_iterations, validate_tolerance, ChannelIndex,
    MainsFrequency, Pt104Error, Result, SensorType, SimulatedInput, TemperatureSolver,
    TemperatureUnit, WireConfiguration,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "PT104_CONFIG";

fn default_samples() -> u32 { 10 }
fn default_wiring() -> WireConfiguration { WireConfiguration::FourWire }
fn default_tolerance() -> f64 { solver_const::DEFAULT_TOLERANCE }
fn default_max_iterations() -> u32 { solver_const::DEFAULT_MAX_ITERATIONS }
fn default_precision() -> usize { 3 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel number, 1-4
    pub channel: u8,
    pub sensor: SensorType,
    #[serde(default = "default_wiring")]
    pub wiring: WireConfiguration,
    #[serde(default)]
    pub low_pass_filter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSettings {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySettings {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::default(),
            precision: default_precision(),
        }
    }
}

/// Inputs for the simulated transport, keyed by channel number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    #[serde(default)]
    pub inputs: BTreeMap<u8, SimulatedInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcquisitionConfig {
    #[serde(default)]
    pub mains: MainsFrequency,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            mains: MainsFrequency::default(),
            channels: Vec::new(),
            samples: default_samples(),
            solver: SolverSettings::default(),
            display: DisplaySettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Starter configuration written by `pt104 config init`
    pub fn example() -> Self {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, SimulatedInput::Temperature(21.5));
        inputs.insert(2, SimulatedInput::Temperature(-40.0));
        Self {
            channels: vec![
                ChannelConfig {
                    channel: 1,
                    sensor: SensorType::Pt100,
                    wiring: WireConfiguration::FourWire,
                    low_pass_filter: false,
                },
                ChannelConfig {
                    channel: 2,
                    sensor: SensorType::Pt1000,
                    wiring: WireConfiguration::ThreeWire,
                    low_pass_filter: true,
                },
            ],
            simulation: SimulationSettings { inputs },
            ..Self::default()
        }
    }

    /// Solver configured from the `solver` section
    pub fn solver(&self) -> TemperatureSolver {
        TemperatureSolver::new()
            .with_tolerance(self.solver.tolerance)
            .with_max_iterations(self.solver.max_iterations)
    }
}

/// Resolve the configuration file location
///
/// `--config`, then `$PT104_CONFIG`, then the XDG config directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("pt104").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config").join("pt104").join("config.json");
    }
    PathBuf::from("/etc/pt104/config.json")
}

/// Check a configuration and return the validated channel indices in file order
pub fn validate_config(cfg: &AcquisitionConfig) -> Result<Vec<ChannelIndex>> {
    validate_tolerance(cfg.solver.tolerance)?;
    validate_max_iterations(cfg.solver.max_iterations)?;
    if cfg.samples == 0 {
        return Err(Pt104Error::invalid_config("samples", "must be at least 1"));
    }

    let numbers: Vec<u8> = cfg.channels.iter().map(|c| c.channel).collect();
    let channels = validate_channel_assignments(&numbers)?;

    for number in cfg.simulation.inputs.keys() {
        ChannelIndex::new(*number).map_err(|e| {
            Pt104Error::invalid_config("simulation.inputs", e.to_string())
        })?;
    }
    Ok(channels)
}

pub fn load_config(path: &Path) -> Result<AcquisitionConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: AcquisitionConfig = serde_json::from_str(&data)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &AcquisitionConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json)?;
    Ok(())
}
