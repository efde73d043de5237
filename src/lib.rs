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

//! pt104 - PT-104 RTD data logger front end
//!
//! Configuration handling, acquisition sessions and the subcommands of the
//! `pt104` binary. Conversion and scanning live in `pt104_core`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logger;
pub mod session;

#[cfg(test)]
pub mod test_utils;
