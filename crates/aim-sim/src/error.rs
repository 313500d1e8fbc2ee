//! Run-level errors.

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] aim_core::CoreError),

    #[error(transparent)]
    Control(#[from] aim_control::ControlError),
}
