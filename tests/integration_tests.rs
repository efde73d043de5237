/*
 * Integration tests for pt104
 *
 * These tests drive the channel scanner end to end through the simulated
 * transport and a manual clock, and check the configuration round trip of
 * the binary crate.
 */

use std::time::Duration;

use pt104::config::{config_path, load_config, save_config, AcquisitionConfig, CONFIG_ENV};
use pt104::session::{simulated_transport, Session};
use pt104_core::{
    ChannelIndex, ChannelScanner, ChannelState, Clock, ManualClock, ReadError, SensorType,
    SimulatedInput, SimulatedTransport, TransportCall, TransportError, WireConfiguration,
};
use serial_test::serial;
use tempfile::TempDir;

fn ch(number: u8) -> ChannelIndex {
    ChannelIndex::new(number).unwrap()
}

fn scanner(transport: SimulatedTransport) -> (ChannelScanner<SimulatedTransport, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (ChannelScanner::with_clock(transport, clock.clone()), clock)
}

#[test]
fn test_pt100_at_boiling_point() {
    // 138.506 Ω on a four-wire PT100
    let transport = SimulatedTransport::new().with_input(ch(1), SimulatedInput::Counts(138_506));
    let (mut scanner, clock) = scanner(transport);
    let start = clock.now();

    scanner.configure(ch(1), SensorType::Pt100, WireConfiguration::FourWire);
    scanner.activate(ch(1)).unwrap();
    let value = scanner.read(ch(1)).unwrap();

    assert!((value.value - 100.0).abs() < 0.01, "got {}", value.value);
    assert_eq!(value.units(), "°C");
    assert_eq!(value.raw_counts, 138_506);
    assert_eq!(clock.now() - start, Duration::from_secs(3));
    assert_eq!(scanner.channel(ch(1)).state(), ChannelState::Active);
}

#[test]
fn test_differential_voltage_reading() {
    let transport = SimulatedTransport::new().with_input(ch(3), SimulatedInput::Counts(1_000_000));
    let (mut scanner, _) = scanner(transport);

    scanner.configure(ch(3), SensorType::DifferentialVoltage115mV, WireConfiguration::TwoWire);
    scanner.activate(ch(3)).unwrap();
    let value = scanner.read(ch(3)).unwrap();

    assert_eq!(value.value, 1e-3);
    assert_eq!(value.units(), "mV");
}

#[test]
fn test_four_channel_activation_delay() {
    let mut transport = SimulatedTransport::new();
    for index in ChannelIndex::all() {
        transport.set_input(index, SimulatedInput::Temperature(20.0));
    }
    let (mut scanner, clock) = scanner(transport);
    for index in ChannelIndex::all() {
        scanner.set_sensor_type(index, SensorType::Pt1000);
    }
    scanner.activate_all().unwrap();

    let start = clock.now();
    scanner.read(ch(4)).unwrap();
    assert_eq!(clock.now() - start, Duration::from_millis(6800));
}

#[test]
fn test_steady_state_spacing_with_two_channels() {
    let transport = SimulatedTransport::new()
        .with_input(ch(1), SimulatedInput::Temperature(0.0))
        .with_input(ch(2), SimulatedInput::Temperature(50.0));
    let (mut scanner, clock) = scanner(transport);
    scanner.set_sensor_type(ch(1), SensorType::Pt100);
    scanner.set_sensor_type(ch(2), SensorType::Pt100);
    scanner.activate_all().unwrap();

    scanner.read(ch(1)).unwrap();
    let first = clock.now();
    scanner.read(ch(1)).unwrap();
    assert_eq!(clock.now() - first, Duration::from_millis(1500));
}

#[test]
fn test_read_errors_before_activation_and_after_switch_off() {
    let transport = SimulatedTransport::new().with_input(ch(2), SimulatedInput::Temperature(10.0));
    let (mut scanner, _) = scanner(transport);

    assert!(matches!(scanner.read(ch(2)), Err(ReadError::ChannelNotActive { channel: 2 })));

    scanner.set_sensor_type(ch(2), SensorType::Pt100);
    scanner.activate(ch(2)).unwrap();
    scanner.set_sensor_type(ch(2), SensorType::Off);
    assert!(matches!(scanner.read(ch(2)), Err(ReadError::SensorDisabled { channel: 2 })));
}

#[test]
fn test_missing_input_keeps_schedule() {
    let (mut scanner, _) = scanner(SimulatedTransport::new());
    scanner.set_sensor_type(ch(1), SensorType::Resistance375);
    scanner.activate(ch(1)).unwrap();
    let deadline = scanner.channel(ch(1)).next_eligible_read_time();

    let err = scanner.read(ch(1)).unwrap_err();
    assert!(matches!(err, ReadError::Transport(TransportError::NoSamplesAvailable { channel: 1 })));
    assert_eq!(scanner.channel(ch(1)).next_eligible_read_time(), deadline);
    assert_eq!(scanner.channel(ch(1)).state(), ChannelState::Activating);
}

#[test]
fn test_bounded_wait_leaves_state_untouched() {
    let transport = SimulatedTransport::new().with_input(ch(1), SimulatedInput::Temperature(37.0));
    let log = transport.call_log();
    let (mut scanner, clock) = scanner(transport);
    scanner.set_sensor_type(ch(1), SensorType::Pt100);
    scanner.activate(ch(1)).unwrap();
    let before = log.len();

    let err = scanner.read_within(ch(1), Duration::from_millis(500)).unwrap_err();
    assert!(matches!(err, ReadError::NotReady { channel: 1, .. }));
    assert_eq!(log.len(), before);

    clock.advance(Duration::from_millis(2600));
    let value = scanner.read_within(ch(1), Duration::from_millis(500)).unwrap();
    assert!((value.value - 37.0).abs() < 0.01);
}

#[test]
fn test_shutdown_order() {
    let transport = SimulatedTransport::new();
    let log = transport.call_log();
    let (mut scanner, _) = scanner(transport);
    scanner.configure(ch(1), SensorType::Pt100, WireConfiguration::ThreeWire);
    scanner.configure(ch(3), SensorType::Resistance10k, WireConfiguration::TwoWire);
    assert_eq!(scanner.activate_all().unwrap(), 2);
    scanner.shutdown().unwrap();

    let calls = log.calls();
    assert_eq!(
        &calls[2..],
        &[
            TransportCall::Configure {
                channel: ch(1),
                sensor_type: SensorType::Off,
                wiring: WireConfiguration::ThreeWire,
            },
            TransportCall::Configure {
                channel: ch(3),
                sensor_type: SensorType::Off,
                wiring: WireConfiguration::TwoWire,
            },
            TransportCall::Close,
        ]
    );
}

#[test]
fn test_drop_releases_device() {
    let transport = SimulatedTransport::new();
    let log = transport.call_log();
    {
        let (mut scanner, _) = scanner(transport);
        scanner.set_sensor_type(ch(2), SensorType::Pt1000);
        scanner.activate(ch(2)).unwrap();
    }
    assert_eq!(log.calls().last(), Some(&TransportCall::Close));
}

#[test]
fn test_session_from_saved_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    save_config(&path, &AcquisitionConfig::example()).unwrap();

    let cfg = load_config(&path).unwrap();
    let transport = simulated_transport(&cfg).unwrap();
    let log = transport.call_log();
    let mut session = Session::start(transport, ManualClock::new(), &cfg).unwrap();

    let failures = session.run(cfg.samples, |_, index, result| {
        let expected = if index.get() == 1 { 21.5 } else { -40.0 };
        let value = result.as_ref().unwrap().value;
        assert!((value - expected).abs() < 0.01, "{index}: {value}");
    });
    assert_eq!(failures, 0);
    session.finish().unwrap();

    assert!(log.calls().contains(&TransportCall::SetMains { is_sixty_hertz: false }));
    assert!(log.calls().contains(&TransportCall::ReadRaw { channel: ch(2), low_pass_filter: true }));
}

#[test]
#[serial]
fn test_config_path_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.json");
    let previous = std::env::var(CONFIG_ENV).ok();

    std::env::set_var(CONFIG_ENV, &path);
    assert_eq!(config_path(None), path);

    match previous {
        Some(v) => std::env::set_var(CONFIG_ENV, v),
        None => std::env::remove_var(CONFIG_ENV),
    }
}

#[test]
fn test_live_sensor_change_converts_with_device_mode() {
    let transport = SimulatedTransport::new().with_input(ch(1), SimulatedInput::Counts(109_735));
    let log = transport.call_log();
    let (mut scanner, _) = scanner(transport);
    scanner.configure(ch(1), SensorType::Pt100, WireConfiguration::FourWire);
    scanner.activate(ch(1)).unwrap();
    scanner.set_sensor_type(ch(1), SensorType::DifferentialVoltage115mV);

    let value = scanner.read(ch(1)).unwrap();
    assert_eq!(value.sensor_type, SensorType::Pt100);
    assert_eq!(value.units(), "°C");
    assert!((value.value - 25.0).abs() < 0.01, "got {}", value.value);

    let configured: Vec<SensorType> = log
        .calls()
        .iter()
        .filter_map(|call| match call {
            TransportCall::Configure { sensor_type, .. } => Some(*sensor_type),
            _ => None,
        })
        .collect();
    assert_eq!(configured, vec![SensorType::Pt100]);
}
