//! Device transport capability
//!
//! The scanner talks to the physical logger only through this trait. The
//! USB and Ethernet driver bindings implement it; so does the in-process
//! [`SimulatedTransport`](crate::hw::SimulatedTransport).
//!
//! Implementations own connection handling, byte-level framing, lead-wire
//! compensation and EEPROM calibration. Raw counts returned by
//! [`DeviceTransport::read_raw`] are already compensated; the scanner only
//! scales them.

use crate::data::{ChannelIndex, SensorType, UnitInfo, WireConfiguration};
use crate::error::TransportError;

#[cfg_attr(test, mockall::automock)]
pub trait DeviceTransport {
    /// Set the measurement mode of one channel. `SensorType::Off` stops conversions on it.
    fn configure_channel(
        &mut self,
        channel: ChannelIndex,
        sensor_type: SensorType,
        wiring: WireConfiguration,
    ) -> Result<(), TransportError>;

    /// Signed raw counts of the most recent conversion on `channel`
    fn read_raw(&mut self, channel: ChannelIndex, low_pass_filter: bool) -> Result<i64, TransportError>;

    /// Tell the device's noise filter the local mains frequency
    fn set_mains_frequency(&mut self, is_sixty_hertz: bool) -> Result<(), TransportError>;

    /// Identification strings of the connected unit
    fn unit_info(&mut self) -> Result<UnitInfo, TransportError>;

    /// Release the device handle
    fn close(&mut self) -> Result<(), TransportError>;
}

impl<T: DeviceTransport + ?Sized> DeviceTransport for Box<T> {
    fn configure_channel(
        &mut self,
        channel: ChannelIndex,
        sensor_type: SensorType,
        wiring: WireConfiguration,
    ) -> Result<(), TransportError> {
        (**self).configure_channel(channel, sensor_type, wiring)
    }

    fn read_raw(&mut self, channel: ChannelIndex, low_pass_filter: bool) -> Result<i64, TransportError> {
        (**self).read_raw(channel, low_pass_filter)
    }

    fn set_mains_frequency(&mut self, is_sixty_hertz: bool) -> Result<(), TransportError> {
        (**self).set_mains_frequency(is_sixty_hertz)
    }

    fn unit_info(&mut self) -> Result<UnitInfo, TransportError> {
        (**self).unit_info()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}
