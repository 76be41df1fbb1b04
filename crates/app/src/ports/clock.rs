//! Time source port — local wall-clock time, when known.

use std::future::Future;
use std::sync::Arc;

use acctl_domain::error::AcCtlError;
use acctl_domain::time::LocalTime;

/// Provides local wall-clock time.
///
/// Returning `None` from [`now`](Self::now) means "not synchronized yet";
/// callers defer time-dependent work instead of guessing.
pub trait TimeSource: Send + Sync {
    /// Current local time, or `None` while unsynchronized.
    fn now(&self) -> Option<LocalTime>;

    /// Ask the source to re-establish synchronization.
    ///
    /// Returns the time after the attempt (still `None` if it did not help).
    fn resync(&self) -> impl Future<Output = Result<Option<LocalTime>, AcCtlError>> + Send;
}

impl<T: TimeSource> TimeSource for Arc<T> {
    fn now(&self) -> Option<LocalTime> {
        (**self).now()
    }

    fn resync(&self) -> impl Future<Output = Result<Option<LocalTime>, AcCtlError>> + Send {
        (**self).resync()
    }
}
