use crate::annoy::parse_annoy;
use crate::catalog::load_catalog;
use crate::snapshot::{decode_index, is_native};
use faqx_core::{Error, KnowledgeBase, NeighborSearch, Result, VectorIndex, DEFAULT_EMBEDDING_DIM};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where the startup artifacts live and what shape they must have.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub catalog_path: PathBuf,
    pub index_path: PathBuf,
    pub dim: usize,
}

impl StorageConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(catalog_path: P, index_path: Q) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            index_path: index_path.into(),
            dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }
}

/// Read an index artifact in either supported encoding.
pub fn load_index<P: AsRef<Path>>(path: P, dim: usize) -> Result<VectorIndex> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::MalformedIndex(format!("cannot read {}: {}", path.display(), e)))?;

    let index = if is_native(&bytes) {
        decode_index(&bytes)?
    } else {
        parse_annoy(&bytes, dim)?
    };

    if index.dim() != dim {
        return Err(Error::MalformedIndex(format!(
            "{} holds {}-dimensional vectors, expected {}",
            path.display(),
            index.dim(),
            dim
        )));
    }
    Ok(index)
}

/// Load the catalog and its index and pair them. Any inconsistency is fatal.
pub fn load_knowledge_base(config: &StorageConfig) -> Result<KnowledgeBase> {
    let catalog = load_catalog(&config.catalog_path)?;
    info!(
        "Loaded catalog {:?}: {} entries across {} products",
        config.catalog_path,
        catalog.len(),
        catalog.product_count()
    );

    let index = load_index(&config.index_path, config.dim)?;
    info!(
        "Loaded index {:?}: {} vectors of dimension {}",
        config.index_path,
        index.len(),
        index.dim()
    );

    KnowledgeBase::new(catalog, Arc::new(index))
}
