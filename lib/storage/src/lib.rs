pub mod annoy;
pub mod catalog;
pub mod loader;
pub mod snapshot;

pub use annoy::{load_annoy, parse_annoy};
pub use catalog::{load_catalog, read_catalog};
pub use loader::{load_index, load_knowledge_base, StorageConfig};
pub use snapshot::{decode_index, encode_index, save_index, IndexSnapshot};
