mod backend;
mod file_storage;
mod local_store;
mod models;

pub use backend::{MemoryBackend, StorageError, StoreBackend};
pub use file_storage::FileBackend;
pub use local_store::LocalStore;
pub use models::*;
