pub mod codec;
pub mod config_io;
pub mod persistence;

pub use persistence::{FileStore, MemoryStore, PersistenceAdapter, StorageError};
