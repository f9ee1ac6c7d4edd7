mod confy_store;
mod memory;

pub use confy_store::{ConfyStatusStore, StatusStoreError, StatusWatcher};
pub use memory::MemoryStatusStore;
