//! GPIO-specific error type.

use std::path::PathBuf;

use acctl_domain::error::AcCtlError;

/// Errors originating from the sysfs GPIO layer.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// Reading or writing a sysfs attribute failed.
    #[error("gpio io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `value` attribute held something other than `0` or `1`.
    #[error("unexpected gpio value {value:?} in {path}")]
    UnexpectedValue { path: PathBuf, value: String },
}

impl From<GpioError> for AcCtlError {
    fn from(err: GpioError) -> Self {
        Self::Hardware(Box::new(err))
    }
}
