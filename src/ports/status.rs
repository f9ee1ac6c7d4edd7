use crate::domain::Status;

/// Port for reading the persisted proxy configuration.
///
/// Reads are synchronous snapshots of in-memory state and must not mutate it.
pub trait StatusPort: Send + Sync {
    fn status(&self) -> Status;
}
