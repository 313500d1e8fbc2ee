//! Control-layer errors.
//!
//! Per-vehicle actuation failures are NOT errors at this level: a vehicle
//! that cannot brake in time, or that left the network between query and
//! command, is logged and the run continues.  `ControlError` covers the
//! failures that must abort the run instead.

use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Error, Debug)]
pub enum ControlError {
    /// A configuration value that cannot produce a sound controller.
    #[error("invalid control configuration: {0}")]
    Config(String),

    /// A strategy name that matches none of the four known strategies.
    #[error("unknown strategy '{0}' (expected fifo, right-of-way, phase, or grid)")]
    UnknownStrategy(String),
}
