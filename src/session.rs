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

//! Acquisition session
//!
//! Applies an [`AcquisitionConfig`] to a scanner, reads rounds from every
//! configured channel and releases the device when done.

use pt104_core::{
    ChannelIndex, ChannelScanner, Clock, DeviceTransport, PhysicalValue, ReadError, Result,
    SimulatedTransport,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{validate_config, AcquisitionConfig};

/// One converted value as printed by `pt104 sample --json`
#[derive(Debug, Clone, Serialize)]
pub struct SampleRecord {
    pub round: u32,
    #[serde(flatten)]
    pub value: PhysicalValue,
    pub units: &'static str,
}

impl SampleRecord {
    pub fn new(round: u32, value: PhysicalValue) -> Self {
        Self {
            round,
            units: value.units(),
            value,
        }
    }
}

/// Simulated transport fed from the `simulation` section
pub fn simulated_transport(cfg: &AcquisitionConfig) -> Result<SimulatedTransport> {
    let mut transport = SimulatedTransport::new();
    for (&number, &input) in &cfg.simulation.inputs {
        transport.set_input(ChannelIndex::new(number)?, input);
    }
    Ok(transport)
}

pub struct Session<T: DeviceTransport, C: Clock> {
    scanner: ChannelScanner<T, C>,
    channels: Vec<ChannelIndex>,
}

impl<T: DeviceTransport, C: Clock> Session<T, C> {
    /// Configure and activate every channel in `cfg`
    pub fn start(transport: T, clock: C, cfg: &AcquisitionConfig) -> Result<Self> {
        let channels = validate_config(cfg)?;
        let mut scanner = ChannelScanner::with_solver(transport, clock, cfg.solver());

        scanner.set_mains(cfg.mains)?;
        for (index, channel) in channels.iter().zip(&cfg.channels) {
            scanner.configure(*index, channel.sensor, channel.wiring);
            scanner.set_low_pass_filter(*index, channel.low_pass_filter);
        }

        match scanner.info() {
            Ok(info) => info!("Connected to {} {}", info.variant_info, info.batch_and_serial),
            Err(e) => warn!("Unit info unavailable: {}", e),
        }

        let active = scanner.activate_all()?;
        info!("Session started with {} active channel(s)", active);

        let channels = channels
            .into_iter()
            .filter(|index| scanner.channel(*index).is_active())
            .collect();
        Ok(Self { scanner, channels })
    }

    /// Channels read by every round, in configuration order
    pub fn channels(&self) -> &[ChannelIndex] {
        &self.channels
    }

    pub fn scanner(&self) -> &ChannelScanner<T, C> {
        &self.scanner
    }

    /// Read every active channel once
    ///
    /// A failing channel does not stop the round; its error takes its slot.
    pub fn read_round(&mut self) -> Vec<(ChannelIndex, std::result::Result<PhysicalValue, ReadError>)> {
        let mut results = Vec::with_capacity(self.channels.len());
        for &index in &self.channels {
            let result = self.scanner.read(index);
            if let Err(e) = &result {
                warn!("{} read failed: {}", index, e);
            }
            results.push((index, result));
        }
        results
    }

    /// Read `rounds` rounds, handing each result to `on_result`
    ///
    /// Returns the number of failed reads.
    pub fn run<F>(&mut self, rounds: u32, mut on_result: F) -> usize
    where
        F: FnMut(u32, ChannelIndex, &std::result::Result<PhysicalValue, ReadError>),
    {
        let mut failures = 0;
        for round in 1..=rounds {
            debug!("Round {}/{}", round, rounds);
            for (index, result) in self.read_round() {
                if result.is_err() {
                    failures += 1;
                }
                on_result(round, index, &result);
            }
        }
        failures
    }

    /// Deactivate all channels and close the transport
    pub fn finish(self) -> Result<()> {
        self.scanner.shutdown()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::create_test_config;
    use pt104_core::{ManualClock, SensorType, SimulatedInput, TransportCall};
    use std::time::Duration;

    #[test]
    fn test_session_reads_every_channel() {
        let cfg = create_test_config();
        let clock = ManualClock::new();
        let mut session = Session::start(simulated_transport(&cfg).unwrap(), clock, &cfg).unwrap();
        assert_eq!(session.channels().len(), 3);

        let round = session.read_round();
        let values: Vec<f64> = round.iter().map(|(_, r)| r.as_ref().unwrap().value).collect();
        assert!((values[0] - 25.0).abs() < 0.01);
        assert!((values[1] + 40.0).abs() < 0.01);
        assert_eq!(values[2], 1e-3);
        session.finish().unwrap();
    }

    #[test]
    fn test_session_timing_follows_scan_cycle() {
        let cfg = create_test_config();
        let clock = ManualClock::new();
        let start = clock.now();
        let mut session = Session::start(simulated_transport(&cfg).unwrap(), clock.clone(), &cfg).unwrap();

        // Channel 4 was the third activation: max(3.0, 3 × 1.7) s
        session.read_round();
        assert_eq!(clock.now() - start, Duration::from_millis(5100));

        // Channel 1 was rearmed at 3.0 s for 3 × 0.75 s
        let failures = session.run(1, |_, _, _| {});
        assert_eq!(failures, 0);
        assert!(clock.now() - start >= Duration::from_millis(5250));
        session.finish().unwrap();
    }

    #[test]
    fn test_session_counts_failures_and_continues() {
        let mut cfg = create_test_config();
        cfg.simulation.inputs.remove(&2);
        let mut session =
            Session::start(simulated_transport(&cfg).unwrap(), ManualClock::new(), &cfg).unwrap();

        let mut seen = Vec::new();
        let failures = session.run(2, |round, index, result| seen.push((round, index.get(), result.is_ok())));
        assert_eq!(failures, 2);
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], (1, 2, false));
        assert_eq!(seen[5], (2, 4, true));
        session.finish().unwrap();
    }

    #[test]
    fn test_off_channels_are_skipped() {
        let mut cfg = create_test_config();
        cfg.channels[1].sensor = SensorType::Off;
        let session = Session::start(simulated_transport(&cfg).unwrap(), ManualClock::new(), &cfg).unwrap();
        assert_eq!(session.channels().iter().map(|c| c.get()).collect::<Vec<_>>(), vec![1, 4]);
        session.finish().unwrap();
    }

    #[test]
    fn test_finish_releases_device() {
        let cfg = create_test_config();
        let transport = simulated_transport(&cfg).unwrap();
        let log = transport.call_log();
        let session = Session::start(transport, ManualClock::new(), &cfg).unwrap();
        session.finish().unwrap();

        let calls = log.calls();
        assert_eq!(calls.last(), Some(&TransportCall::Close));
        let offs = calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Configure { sensor_type: SensorType::Off, .. }))
            .count();
        assert_eq!(offs, 3);
    }

    #[test]
    fn test_sample_record_json() {
        let cfg = create_test_config();
        let mut session =
            Session::start(simulated_transport(&cfg).unwrap(), ManualClock::new(), &cfg).unwrap();
        let (_, result) = session.read_round().remove(2);
        let record = SampleRecord::new(1, result.unwrap());

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["round"], 1);
        assert_eq!(json["channel"], 4);
        assert_eq!(json["sensor_type"], "differential_115mv");
        assert_eq!(json["raw_counts"], 1_000_000);
        assert_eq!(json["units"], "mV");
        session.finish().unwrap();
    }

    #[test]
    fn test_simulated_transport_rejects_bad_channel() {
        let mut cfg = create_test_config();
        cfg.simulation.inputs.insert(9, SimulatedInput::Counts(0));
        assert!(simulated_transport(&cfg).is_err());
    }
}
