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

//! Tracing subscriber setup for the `pt104` binary
//!
//! Library crates only emit `tracing` events; this is the one place a
//! subscriber is installed. Output goes to stderr so `--json` output on
//! stdout stays machine readable.

use std::env;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PT104_LOG";

/// Filter directive: `$PT104_LOG` if set, otherwise `debug` with `--verbose`, else `info`
pub fn log_filter(verbose: bool, env_value: Option<String>) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ if verbose => "debug".to_string(),
        _ => "info".to_string(),
    }
}

pub fn init_logging(verbose: bool) {
    let filter = log_filter(verbose, env::var(LOG_ENV).ok());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(&filter))
        .init();
}
