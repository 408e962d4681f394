pub(crate) mod file_store;
pub(crate) mod key_value_store;
pub(crate) mod memory_store;

pub use file_store::FileStore;
pub use key_value_store::KeyValueStore;
pub use memory_store::MemoryStore;
