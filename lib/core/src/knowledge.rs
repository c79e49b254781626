use crate::{Catalog, Error, NeighborSearch, Result};
use std::sync::Arc;

/// The catalog and its embedding index, paired once at startup and shared
/// read-only by every request.
#[derive(Clone)]
pub struct KnowledgeBase {
    catalog: Arc<Catalog>,
    index: Arc<dyn NeighborSearch>,
}

impl KnowledgeBase {
    /// Pair a catalog with its index. Row `i` of the index must be the
    /// embedding of catalog entry `i`, so the row counts have to agree.
    pub fn new(catalog: Catalog, index: Arc<dyn NeighborSearch>) -> Result<Self> {
        if catalog.len() != index.len() {
            return Err(Error::MalformedIndex(format!(
                "index holds {} vectors but the catalog has {} entries",
                index.len(),
                catalog.len()
            )));
        }
        Ok(Self {
            catalog: Arc::new(catalog),
            index,
        })
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn index(&self) -> &dyn NeighborSearch {
        self.index.as_ref()
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("entries", &self.catalog.len())
            .field("products", &self.catalog.product_count())
            .field("dim", &self.index.dim())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QaEntry, VectorIndex};

    fn catalog(rows: usize) -> Catalog {
        let entries = (0..rows)
            .map(|i| QaEntry::new("P1", "Kayak", format!("q{}", i), format!("a{}", i)))
            .collect();
        Catalog::from_entries(entries).unwrap()
    }

    #[test]
    fn test_row_counts_must_agree() {
        let index = Arc::new(VectorIndex::from_rows(2, vec![vec![0.0, 1.0]]).unwrap());
        let err = KnowledgeBase::new(catalog(2), index).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex(_)));
    }

    #[test]
    fn test_pairs_catalog_and_index() {
        let index = Arc::new(VectorIndex::from_rows(2, vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap());
        let kb = KnowledgeBase::new(catalog(2), index).unwrap();
        assert_eq!(kb.catalog().len(), 2);
        assert_eq!(kb.index().len(), 2);
        assert_eq!(kb.dim(), 2);
    }
}
