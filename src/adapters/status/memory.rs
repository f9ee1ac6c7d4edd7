use std::sync::RwLock;

use crate::domain::Status;
use crate::ports::StatusPort;

/// Status held in memory, replaced wholesale by whoever owns the configuration.
#[derive(Default)]
pub struct MemoryStatusStore {
    status: RwLock<Status>,
}

impl MemoryStatusStore {
    pub fn new(status: Status) -> Self {
        Self {
            status: RwLock::new(status),
        }
    }

    pub fn set(&self, status: Status) {
        *self.status.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }
}

impl StatusPort for MemoryStatusStore {
    fn status(&self) -> Status {
        self.status.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}
