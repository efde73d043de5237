//! Unified error handling for the PT-104 toolkit
//!
//! This crate provides every error type used across the PT-104 components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.
//!
//! The layering follows the data flow: the transport reports [`TransportError`],
//! the temperature solver reports [`SolverError`], the channel scanner wraps both
//! into [`ChannelError`] (configuration) and [`ReadError`] (acquisition), and
//! [`Pt104Error`] collects everything for application code.

use std::io;
use std::time::Duration;

/// Result type alias using Pt104Error
pub type Result<T> = std::result::Result<T, Pt104Error>;

/// Failure of the Callendar-Van Dusen inverse solver
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Newton-Raphson did not converge for ratio {ratio} after {iterations} iterations")]
    DidNotConverge {
        ratio: f64,
        iterations: u32,
    },

    #[error("Derivative vanished at {temperature}°C while solving ratio {ratio}")]
    DerivativeUnderflow {
        temperature: f64,
        ratio: f64,
    },

    #[error("Resistance ratio is not a finite number: {0}")]
    InvalidRatio(f64),
}

/// Errors reported by a device transport (USB/Ethernet driver binding)
///
/// The scanner never interprets these; it aborts the current call and hands
/// them back unchanged.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Device is not connected")]
    NotConnected,

    #[error("Device returned status {code:#010x}: {message}")]
    Status {
        code: u32,
        message: String,
    },

    #[error("Transport rejected channel {0}")]
    InvalidChannel(u8),

    #[error("No samples available on channel {channel}")]
    NoSamplesAvailable {
        channel: u8,
    },

    #[error("Transport I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from channel configuration, activation and deactivation
#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("Invalid channel index {0} (must be 1-4)")]
    InvalidChannel(u8),

    #[error("Channel {channel} has no sensor configured")]
    SensorDisabled {
        channel: u8,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors from reading a converted value off a channel
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("Channel {channel} is not active")]
    ChannelNotActive {
        channel: u8,
    },

    #[error("Channel {channel} has no sensor configured")]
    SensorDisabled {
        channel: u8,
    },

    #[error("Channel {channel} has no fresh conversion for another {remaining:?}")]
    NotReady {
        channel: u8,
        remaining: Duration,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl ReadError {
    /// True for errors caused by calling the scanner in the wrong state
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotActive { .. } | Self::SensorDisabled { .. }
        )
    }
}

/// Unified error type for all PT-104 operations
#[derive(thiserror::Error, Debug)]
pub enum Pt104Error {
    // ============================================================================
    // Acquisition Errors
    // ============================================================================
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Read(#[from] ReadError),

    // ============================================================================
    // I/O and Configuration Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },
}

impl Pt104Error {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
