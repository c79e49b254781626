use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One curated question/answer pair. Its identity is its ordinal in the
/// [`Catalog`], which is also the row of its embedding in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    pub product_id: String,
    pub product_name: String,
    pub question: String,
    pub answer: String,
}

impl QaEntry {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A product known to the catalog together with the ordinals of its entries.
#[derive(Debug, Clone)]
struct ProductSlot {
    name: String,
    ordinals: Vec<usize>,
}

/// Immutable table of QA entries.
///
/// Both derived mappings (product to ordinals, product to display name) are
/// built in a single pass, so a product id is present in both or in neither.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<QaEntry>,
    products: AHashMap<String, ProductSlot>,
    /// Product ids in order of first appearance
    product_order: Vec<String>,
}

impl Catalog {
    /// Build the catalog from rows in dataset order.
    ///
    /// A product id that appears with two different display names is
    /// rejected; repeated identical names collapse into one.
    pub fn from_entries(entries: Vec<QaEntry>) -> Result<Self> {
        let mut products: AHashMap<String, ProductSlot> = AHashMap::new();
        let mut product_order = Vec::new();

        for (ordinal, entry) in entries.iter().enumerate() {
            match products.get_mut(&entry.product_id) {
                Some(slot) => {
                    if slot.name != entry.product_name {
                        return Err(Error::MalformedCatalog(format!(
                            "product {:?} has conflicting names {:?} and {:?} (row {})",
                            entry.product_id, slot.name, entry.product_name, ordinal
                        )));
                    }
                    slot.ordinals.push(ordinal);
                }
                None => {
                    product_order.push(entry.product_id.clone());
                    products.insert(
                        entry.product_id.clone(),
                        ProductSlot {
                            name: entry.product_name.clone(),
                            ordinals: vec![ordinal],
                        },
                    );
                }
            }
        }

        Ok(Self {
            entries,
            products,
            product_order,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entry(&self, ordinal: usize) -> Option<&QaEntry> {
        self.entries.get(ordinal)
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    /// Ordinals of every entry for `product_id`, in dataset order.
    /// `None` when the product is unknown.
    pub fn candidates(&self, product_id: &str) -> Option<&[usize]> {
        self.products.get(product_id).map(|slot| slot.ordinals.as_slice())
    }

    pub fn display_name(&self, product_id: &str) -> Option<&str> {
        self.products.get(product_id).map(|slot| slot.name.as_str())
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.product_order.len()
    }

    /// `(product_id, display name)` pairs in order of first appearance.
    pub fn products(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.product_order.iter().filter_map(move |id| {
            self.products
                .get(id)
                .map(|slot| (id.as_str(), slot.name.as_str()))
        })
    }

    /// Known questions for a product, in dataset order.
    pub fn questions(&self, product_id: &str) -> Vec<&str> {
        self.candidates(product_id)
            .unwrap_or_default()
            .iter()
            .filter_map(|&ordinal| self.entries.get(ordinal))
            .map(|entry| entry.question.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_entries(vec![
            QaEntry::new("P1", "Sea Kayak", "How long is the warranty?", "Two years."),
            QaEntry::new("P2", "Paddle", "Is it adjustable?", "Yes."),
            QaEntry::new("P1", "Sea Kayak", "What is it made of?", "Polyethylene."),
        ])
        .unwrap()
    }

    #[test]
    fn test_product_mappings() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.product_count(), 2);
        assert_eq!(catalog.candidates("P1"), Some(&[0, 2][..]));
        assert_eq!(catalog.candidates("P2"), Some(&[1][..]));
        assert_eq!(catalog.candidates("P3"), None);
        assert_eq!(catalog.display_name("P1"), Some("Sea Kayak"));
        assert_eq!(catalog.display_name("P3"), None);
    }

    #[test]
    fn test_products_keep_first_appearance_order() {
        let catalog = sample();
        let products: Vec<(&str, &str)> = catalog.products().collect();
        assert_eq!(products, vec![("P1", "Sea Kayak"), ("P2", "Paddle")]);
    }

    #[test]
    fn test_questions_for_product() {
        let catalog = sample();
        assert_eq!(
            catalog.questions("P1"),
            vec!["How long is the warranty?", "What is it made of?"]
        );
        assert!(catalog.questions("missing").is_empty());
    }

    #[test]
    fn test_conflicting_names_rejected() {
        let err = Catalog::from_entries(vec![
            QaEntry::new("P1", "Sea Kayak", "q1", "a1"),
            QaEntry::new("P1", "River Kayak", "q2", "a2"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::MalformedCatalog(_)));
    }

    #[test]
    fn test_every_named_product_has_candidates() {
        let catalog = sample();
        for (id, _) in catalog.products() {
            assert!(!catalog.candidates(id).unwrap().is_empty());
        }
    }
}
