//! Error types re-exported from the `pt104-error` crate

pub use pt104_error::{
    ChannelError, Pt104Error, ReadError, Result, SolverError, TransportError,
};
