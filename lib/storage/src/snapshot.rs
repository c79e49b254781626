// Native index artifact: magic header followed by a bincode body
use faqx_core::{Error, NeighborSearch, Result, VectorIndex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Magic bytes identifying a native faqx index file
pub const MAGIC: [u8; 8] = *b"FAQXIDX1";

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub dim: usize,
    /// Row-major, `count * dim` values
    pub vectors: Vec<f32>,
}

impl IndexSnapshot {
    pub fn from_index(index: &VectorIndex) -> Self {
        Self {
            dim: index.dim(),
            vectors: index.as_flat().to_vec(),
        }
    }

    pub fn into_index(self) -> Result<VectorIndex> {
        VectorIndex::from_flat(self.dim, self.vectors)
    }
}

/// True when `bytes` starts with the native magic.
pub fn is_native(bytes: &[u8]) -> bool {
    bytes.len() >= MAGIC.len() && bytes[..MAGIC.len()] == MAGIC
}

pub fn encode_index(index: &VectorIndex) -> Result<Vec<u8>> {
    let body = bincode::serialize(&IndexSnapshot::from_index(index))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    let mut out = Vec::with_capacity(MAGIC.len() + body.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn decode_index(bytes: &[u8]) -> Result<VectorIndex> {
    if !is_native(bytes) {
        return Err(Error::MalformedIndex("missing FAQXIDX1 header".to_string()));
    }
    let snapshot: IndexSnapshot = bincode::deserialize(&bytes[MAGIC.len()..])
        .map_err(|e| Error::MalformedIndex(format!("corrupt index body: {}", e)))?;
    snapshot.into_index()
}

/// Write the index through a temporary file and rename it into place.
pub fn save_index<P: AsRef<Path>>(path: P, index: &VectorIndex) -> Result<()> {
    let path = path.as_ref();
    let data = encode_index(index)?;
    let temp_file = path.with_extension("tmp");
    fs::write(&temp_file, &data)?;
    fs::rename(&temp_file, path)?;
    Ok(())
}
