use crate::error::Result;

/// Abstract interface for raw key-value I/O.
///
/// Values are opaque strings (JSON text in practice). All methods take `&self`;
/// backends that need mutation use interior mutability since medlog is
/// single-threaded.
pub trait StorageBackend {
    /// Read the value under `key`. `Ok(None)` when the key was never written
    /// or has been removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
