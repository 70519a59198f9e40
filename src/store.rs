use crate::error::Error;

/// Persistence gateway for downloaded images.
///
/// Callers never use an implementation from two tasks at once; a batch writes
/// its rows one at a time after every download has finished.
pub trait ImageStore {
    /// Create the backing table if it does not exist. Calling it again is a no-op.
    fn ensure_schema(&mut self) -> Result<(), Error>;

    /// Write one `(name, data)` row as its own unit of work.
    fn insert(&mut self, name: &str, data: &[u8]) -> Result<(), Error>;
}
