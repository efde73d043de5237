//! Channel scanner for a PT-104 logger
//!
//! Owns the four channels of one device together with the transport handle
//! and enforces the device's scan-cycle timing.
//!
//! # Timing Rules
//!
//! The device converts active channels round-robin through a single ADC, so
//! a channel only has a fresh value once per cycle:
//!
//! - **Activation**: the first read after (re)configuring a channel waits
//!   `max(3.0, 1.7 × active channels)` seconds for the calibration cycle.
//! - **Steady state**: after every successful transport read the next read
//!   of that channel waits `0.75 × active channels` seconds.
//!
//! The timer is only rearmed after a transport round-trip succeeds. A read
//! that fails, or is never issued, leaves the schedule untouched.
//!
//! # Teardown
//!
//! Every active channel is switched off before the transport is closed, so the
//! next user finds the device idle. [`ChannelScanner::shutdown`] does this
//! explicitly and reports errors; dropping the scanner does it best-effort.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::timing;
use crate::data::{ChannelIndex, MainsFrequency, PhysicalValue, SensorType, UnitInfo, WireConfiguration};
use crate::engine::TemperatureSolver;
use crate::error::{ChannelError, ReadError, TransportError};
use crate::hw::channel::Channel;
use crate::hw::clock::{Clock, MonotonicClock};
use crate::hw::transport::DeviceTransport;

pub struct ChannelScanner<T: DeviceTransport, C: Clock = MonotonicClock> {
    transport: T,
    clock: C,
    channels: [Channel; 4],
    info: Option<UnitInfo>,
    closed: bool,
}

impl<T: DeviceTransport> ChannelScanner<T, MonotonicClock> {
    /// Create a scanner on an open transport using the system clock
    pub fn new(transport: T) -> Self {
        Self::with_clock(transport, MonotonicClock)
    }
}

impl<T: DeviceTransport, C: Clock> ChannelScanner<T, C> {
    pub fn with_clock(transport: T, clock: C) -> Self {
        Self::with_solver(transport, clock, TemperatureSolver::new())
    }

    /// Create a scanner whose channels each get a copy of `solver`
    pub fn with_solver(transport: T, clock: C, solver: TemperatureSolver) -> Self {
        let channels = std::array::from_fn(|slot| Channel::new(ChannelIndex::from_slot(slot), solver.clone()));
        Self {
            transport,
            clock,
            channels,
            info: None,
            closed: false,
        }
    }

    pub fn channel(&self, index: ChannelIndex) -> &Channel {
        &self.channels[index.slot()]
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// Number of channels currently being scanned by the device
    pub fn active_channel_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_active()).count()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Set the sensor type and wiring of a channel
    ///
    /// The device only learns about the change on the next activation.
    pub fn configure(&mut self, index: ChannelIndex, sensor_type: SensorType, wiring: WireConfiguration) {
        self.set_sensor_type(index, sensor_type);
        self.set_wiring(index, wiring);
    }

    pub fn set_sensor_type(&mut self, index: ChannelIndex, sensor_type: SensorType) {
        let channel = &mut self.channels[index.slot()];
        if channel.is_active() && channel.sensor_type() != sensor_type {
            warn!(
                "{} is active as {}; {} applies at next activation",
                index,
                channel.device_sensor_type(),
                sensor_type
            );
        }
        debug!("{} sensor type: {}", index, sensor_type);
        channel.set_sensor_type(sensor_type);
    }

    pub fn set_wiring(&mut self, index: ChannelIndex, wiring: WireConfiguration) {
        debug!("{} wiring: {} wires", index, wiring.wire_count());
        self.channels[index.slot()].set_wiring(wiring);
    }

    pub fn set_low_pass_filter(&mut self, index: ChannelIndex, enabled: bool) {
        debug!("{} low pass filter: {}", index, enabled);
        self.channels[index.slot()].set_low_pass_filter(enabled);
    }

    /// Inform the device of the local mains frequency
    pub fn set_mains(&mut self, frequency: MainsFrequency) -> Result<(), TransportError> {
        self.transport.set_mains_frequency(frequency.is_sixty_hertz())?;
        info!("Mains frequency set to {}", if frequency.is_sixty_hertz() { "60 Hz" } else { "50 Hz" });
        Ok(())
    }

    /// Unit identification, fetched once and cached
    pub fn info(&mut self) -> Result<&UnitInfo, TransportError> {
        let info = match self.info.take() {
            Some(info) => info,
            None => self.transport.unit_info()?,
        };
        Ok(self.info.insert(info))
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Start conversions on a channel
    ///
    /// No-op when the channel is already active; its timer is not reset.
    pub fn activate(&mut self, index: ChannelIndex) -> Result<(), ChannelError> {
        let channel = &self.channels[index.slot()];
        if channel.is_active() {
            debug!("{} already active", index);
            return Ok(());
        }

        let sensor_type = channel.sensor_type();
        let wiring = channel.wiring();
        if sensor_type == SensorType::Off {
            return Err(ChannelError::SensorDisabled { channel: index.get() });
        }

        self.transport.configure_channel(index, sensor_type, wiring)?;

        let active = self.active_channel_count() + 1;
        let settle = timing::activation_delay(active);
        let deadline = self.clock.now() + settle;
        self.channels[index.slot()].mark_activated(deadline);

        info!(
            "{} activated as {} ({} wires), first value in {:?} ({} active)",
            index,
            sensor_type,
            wiring.wire_count(),
            settle,
            active
        );
        Ok(())
    }

    /// Stop conversions on a channel. Idempotent.
    pub fn deactivate(&mut self, index: ChannelIndex) -> Result<(), ChannelError> {
        let channel = &self.channels[index.slot()];
        if !channel.is_active() {
            return Ok(());
        }

        let wiring = channel.wiring();
        self.transport.configure_channel(index, SensorType::Off, wiring)?;
        self.channels[index.slot()].mark_deactivated();

        info!("{} deactivated ({} active)", index, self.active_channel_count());
        Ok(())
    }

    /// Activate every channel that has a sensor configured
    ///
    /// Returns how many channels are active afterwards.
    pub fn activate_all(&mut self) -> Result<usize, ChannelError> {
        for index in ChannelIndex::all() {
            if self.channel(index).sensor_type() != SensorType::Off {
                self.activate(index)?;
            }
        }
        Ok(self.active_channel_count())
    }

    /// Deactivate every active channel
    ///
    /// Keeps going after a failure and returns the first error.
    pub fn deactivate_all(&mut self) -> Result<(), ChannelError> {
        let mut first_error = None;
        for index in ChannelIndex::all() {
            if let Err(e) = self.deactivate(index) {
                warn!("Failed to deactivate {}: {}", index, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Read a fresh value, blocking until the channel's next conversion
    pub fn read(&mut self, index: ChannelIndex) -> Result<PhysicalValue, ReadError> {
        if let Some(deadline) = self.check_readable(index)? {
            self.clock.sleep_until(deadline);
        }
        self.acquire(index)
    }

    /// Read a fresh value if one is due within `max_wait`
    ///
    /// Returns [`ReadError::NotReady`] without waiting and without touching
    /// the schedule when the conversion is further away.
    pub fn read_within(&mut self, index: ChannelIndex, max_wait: Duration) -> Result<PhysicalValue, ReadError> {
        if let Some(deadline) = self.check_readable(index)? {
            let remaining = deadline.saturating_duration_since(self.clock.now());
            if remaining > max_wait {
                return Err(ReadError::NotReady { channel: index.get(), remaining });
            }
            self.clock.sleep_until(deadline);
        }
        self.acquire(index)
    }

    fn check_readable(&self, index: ChannelIndex) -> Result<Option<std::time::Instant>, ReadError> {
        let channel = &self.channels[index.slot()];
        if !channel.is_active() {
            return Err(ReadError::ChannelNotActive { channel: index.get() });
        }
        if channel.sensor_type() == SensorType::Off {
            return Err(ReadError::SensorDisabled { channel: index.get() });
        }
        Ok(channel.next_eligible_read_time())
    }

    fn acquire(&mut self, index: ChannelIndex) -> Result<PhysicalValue, ReadError> {
        let low_pass_filter = self.channels[index.slot()].low_pass_filter();
        let raw_counts = self.transport.read_raw(index, low_pass_filter)?;

        let interval = timing::conversion_interval(self.active_channel_count());
        let next_read = self.clock.now() + interval;

        let channel = &mut self.channels[index.slot()];
        channel.rearm(next_read);
        debug!("{} raw {} counts, next conversion in {:?}", index, raw_counts, interval);

        let value = channel.convert(raw_counts)?;
        Ok(PhysicalValue {
            channel: index,
            sensor_type: channel.device_sensor_type(),
            raw_counts,
            value,
        })
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Deactivate all channels, then close the transport
    pub fn shutdown(mut self) -> Result<(), ChannelError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), ChannelError> {
        self.closed = true;
        let deactivated = self.deactivate_all();
        let closed = self.transport.close();
        // A closed device scans nothing, whatever the failed deactivations left behind
        for channel in self.channels.iter_mut().filter(|c| c.is_active()) {
            channel.mark_deactivated();
        }
        info!("Device released");
        deactivated?;
        closed?;
        Ok(())
    }
}

impl<T: DeviceTransport, C: Clock> Drop for ChannelScanner<T, C> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.teardown() {
            warn!("Device teardown failed: {}", e);
        }
    }
}
