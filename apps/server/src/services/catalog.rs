//! Read-only item catalog backing the item lookup route.

use std::collections::BTreeMap;

use crate::models::Item;

/// Fixed in-memory catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn new(items: impl IntoIterator<Item = (String, Item)>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// The sample items shipped with the scaffold.
    pub fn with_samples() -> Self {
        Self::new([
            (
                "foo".to_string(),
                Item {
                    name: "Foo".to_string(),
                    price: 50.2,
                    description: None,
                },
            ),
            (
                "bar".to_string(),
                Item {
                    name: "Bar".to_string(),
                    price: 62.0,
                    description: Some("The bartenders".to_string()),
                },
            ),
            (
                "baz".to_string(),
                Item {
                    name: "Baz".to_string(),
                    price: 50.2,
                    description: Some("There goes my baz".to_string()),
                },
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_lookup() {
        let catalog = ItemCatalog::with_samples();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("foo").map(|i| i.name.as_str()), Some("Foo"));
        assert!(catalog.get("nope").is_none());

        let ids: Vec<&str> = catalog.list().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["bar", "baz", "foo"]);
    }
}
