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

//! Command Line Interface
//!
//! Argument definitions for the `pt104` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pt104")]
#[command(version)]
#[command(about = "PT-104 RTD data logger acquisition and conversion")]
#[command(long_about = "PT-104 RTD data logger acquisition and conversion

Configures the four channels of a PT-104 logger, waits out the device's
scan cycle and converts raw counts to temperature, resistance or voltage.
Platinum sensors are solved with the Callendar-Van Dusen equation.

EXAMPLES:
    pt104 config init                  Write a starter configuration
    pt104 config show                  Print the active configuration
    pt104 sample --samples 5           Read five rounds from every channel
    pt104 sample --json --instant      JSON lines without real-time waits
    pt104 convert ratio 1.385          Temperature for a resistance ratio
    pt104 convert temperature -40 --r0 1000

ENVIRONMENT VARIABLES:
    PT104_LOG=debug        Log filter (overrides --verbose)
    PT104_CONFIG=PATH      Configuration file location

FILES:
    ~/.config/pt104/config.json        Acquisition configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: $PT104_CONFIG or ~/.config/pt104/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire values from the configured channels
    Sample(SampleArgs),

    /// Callendar-Van Dusen conversions
    #[command(subcommand, about = "Convert between resistance ratio and temperature")]
    Convert(ConvertCommands),

    /// Configuration management
    #[command(subcommand, about = "Show, validate or create the configuration file")]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Number of rounds to read (overrides the configuration)
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Print one JSON object per value
    #[arg(long)]
    pub json: bool,

    /// Use a simulated clock instead of waiting for the scan cycle
    #[arg(long)]
    pub instant: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConvertCommands {
    /// Temperature (°C) for a resistance ratio R/R0
    Ratio {
        #[arg(allow_negative_numbers = true)]
        ratio: f64,
        /// Also print the resistance for this nominal R0 (ohms)
        #[arg(long)]
        r0: Option<f64>,
    },

    /// Resistance ratio for a temperature (°C)
    Temperature {
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
        /// Also print the resistance for this nominal R0 (ohms)
        #[arg(long)]
        r0: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration as JSON
    Show,

    /// Check the configuration file
    Validate,

    /// Write a starter configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
