//! Storage port — the durable key-value substrate.
//!
//! Values are small integers addressed by `(namespace, key)`. Every `put` is
//! independently durable; no multi-key transaction is assumed.

use std::future::Future;
use std::sync::Arc;

use acctl_domain::error::AcCtlError;

/// Durable integer key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, AcCtlError>> + Send;

    /// Write (insert or overwrite) a value.
    fn put(
        &self,
        namespace: &str,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), AcCtlError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for Arc<T> {
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<i64>, AcCtlError>> + Send {
        (**self).get(namespace, key)
    }

    fn put(
        &self,
        namespace: &str,
        key: &str,
        value: i64,
    ) -> impl Future<Output = Result<(), AcCtlError>> + Send {
        (**self).put(namespace, key, value)
    }
}
