pub mod error;
pub mod json;
pub mod keys;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use json::{load_json, load_json_items, save_json};
pub use keys::StorageKey;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::*;
