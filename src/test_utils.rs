/*
 * Test utilities and fixtures for pt104
 *
 * Shared helpers for the unit tests of the binary crate: configurations,
 * temporary config files and scanners wired to the simulated transport.
 */

#[cfg(test)]
pub mod test_utils {
    use crate::config::{AcquisitionConfig, ChannelConfig, SimulationSettings};
    use pt104_core::{
        ChannelIndex, ChannelScanner, ManualClock, SensorType, SimulatedInput, SimulatedTransport,
        WireConfiguration,
    };
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    /// Two platinum channels and one voltage channel with simulated inputs
    pub fn create_test_config() -> AcquisitionConfig {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, SimulatedInput::Temperature(25.0));
        inputs.insert(2, SimulatedInput::Temperature(-40.0));
        inputs.insert(4, SimulatedInput::Counts(1_000_000));

        AcquisitionConfig {
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
                ChannelConfig {
                    channel: 4,
                    sensor: SensorType::DifferentialVoltage115mV,
                    wiring: WireConfiguration::TwoWire,
                    low_pass_filter: false,
                },
            ],
            samples: 3,
            simulation: SimulationSettings { inputs },
            ..AcquisitionConfig::default()
        }
    }

    /// Writes `contents` to a temporary file; keep the handle alive while the path is used
    pub fn create_temp_config_file(contents: &str) -> (NamedTempFile, PathBuf) {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes()).expect("Failed to write temp file");
        let path = file.path().to_path_buf();
        (file, path)
    }

    /// Scanner over a simulated PT100 at `celsius` on channel 1, plus its clock handle
    pub fn create_simulated_scanner(celsius: f64) -> (ChannelScanner<SimulatedTransport, ManualClock>, ManualClock) {
        let ch1 = ChannelIndex::new(1).unwrap();
        let transport = SimulatedTransport::new().with_input(ch1, SimulatedInput::Temperature(celsius));
        let clock = ManualClock::new();
        let mut scanner = ChannelScanner::with_clock(transport, clock.clone());
        scanner.configure(ch1, SensorType::Pt100, WireConfiguration::FourWire);
        (scanner, clock)
    }
}
