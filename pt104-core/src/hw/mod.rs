//! Hardware interaction modules
//!
//! Contains the transport capability, the scan-cycle clock, per-channel
//! state and the channel scanner that ties them together.

mod channel;
mod clock;
mod scanner;
mod simulated;
mod transport;

pub use channel::{Channel, ChannelState};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use scanner::ChannelScanner;
pub use simulated::{CallLog, SimulatedInput, SimulatedTransport, TransportCall};
pub use transport::DeviceTransport;
