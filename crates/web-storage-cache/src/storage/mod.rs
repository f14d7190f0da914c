//! String storage backends the cache helper reads and writes through

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// A persistent dictionary from text keys to text values
pub trait StorageBackend: Send + Sync {
    /// Read the text stored at `key`, `None` if nothing is stored
    fn read_text(&self, key: &str) -> Result<Option<String>>;

    /// Store `text` at `key`, replacing anything already there
    fn write_text(&self, key: &str, text: &str) -> Result<()>;
}
