//! Reader for Annoy index files built with the Euclidean metric.
//!
//! # Layout
//!
//! ```text
//! Every node is 16 + 4 * D bytes, little endian:
//!
//! Offset   Size    Type        Description
//! ─────────────────────────────────────────────
//! 0x00     4       i32         n_descendants
//! 0x04     4       f32         hyperplane offset
//! 0x08     8       [i32; 2]    children
//! 0x10     4 * D   [f32]       vector
//! ```
//!
//! Item `i` is node `i`. The trailing nodes are the tree roots and carry the
//! item count in `n_descendants`. Only the item vectors are kept; queries are
//! answered by an exhaustive scan.

use faqx_core::{Error, Result, VectorIndex};
use std::path::Path;

/// Bytes preceding the vector in every node
pub const NODE_HEADER_SIZE: usize = 16;

#[inline]
pub fn node_size(dim: usize) -> usize {
    NODE_HEADER_SIZE + dim * std::mem::size_of::<f32>()
}

pub fn load_annoy<P: AsRef<Path>>(path: P, dim: usize) -> Result<VectorIndex> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::MalformedIndex(format!("cannot read {}: {}", path.display(), e)))?;
    parse_annoy(&bytes, dim)
}

pub fn parse_annoy(bytes: &[u8], dim: usize) -> Result<VectorIndex> {
    if dim == 0 {
        return Err(Error::MalformedIndex("dimension must be positive".to_string()));
    }
    let stride = node_size(dim);
    if bytes.is_empty() || bytes.len() % stride != 0 {
        return Err(Error::MalformedIndex(format!(
            "{} bytes is not a whole number of {}-dimensional nodes",
            bytes.len(),
            dim
        )));
    }

    let n_nodes = bytes.len() / stride;
    let last = &bytes[(n_nodes - 1) * stride..];
    let n_items = read_i32(last, 0);
    if n_items < 1 || n_items as usize > n_nodes {
        return Err(Error::MalformedIndex(format!(
            "root reports {} items but the file holds {} nodes",
            n_items, n_nodes
        )));
    }
    let n_items = n_items as usize;

    let mut vectors = Vec::with_capacity(n_items * dim);
    for node in bytes.chunks_exact(stride).take(n_items) {
        vectors.extend(
            node[NODE_HEADER_SIZE..]
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );
    }

    VectorIndex::from_flat(dim, vectors)
}

#[inline]
fn read_i32(node: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        node[offset],
        node[offset + 1],
        node[offset + 2],
        node[offset + 3],
    ])
}
