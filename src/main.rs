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

use clap::Parser;

use pt104::cli::{Cli, Commands};
use pt104::commands::{run_config, run_convert, run_sample};
use pt104::config::config_path;
use pt104::logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logging(cli.verbose);

    let config_file = config_path(cli.config.as_deref());
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Sample(args) => run_sample(&config_file, args, &mut stdout),
        Commands::Convert(command) => run_convert(command, &mut stdout),
        Commands::Config(command) => run_config(&config_file, command, &mut stdout),
    }
}
