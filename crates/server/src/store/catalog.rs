//! Catalog store: products and their category list, persisted as one
//! document.

use std::sync::Arc;

use entre_nous_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DocumentStore, StoreError, load_json, save_json};

/// Document name for the catalog.
pub const CATALOG_DOC: &str = "products.json";

/// Image path substituted when a product is created without one.
pub const PLACEHOLDER_IMAGE: &str = "/uploads/placeholder.jpg";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "entre_nous_core::price::as_number")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
}

/// The whole persisted catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
}

impl Default for Catalog {
    /// The catalog seeded on first run, and substituted when the document on
    /// disk cannot be read.
    fn default() -> Self {
        let placeholder = |id: i64, name: &str, price: Decimal, category: &str| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            image: PLACEHOLDER_IMAGE.to_string(),
            category: category.to_string(),
        };

        Self {
            products: vec![
                placeholder(1, "Demon Slayer Tanjiro Figure", Decimal::new(8999, 2), "Figures"),
                placeholder(2, "Attack on Titan Hoodie", Decimal::new(6500, 2), "Apparel"),
                placeholder(
                    3,
                    "Naruto Shippuden Manga Box Set",
                    Decimal::new(19999, 2),
                    "Manga",
                ),
                placeholder(4, "Jujutsu Kaisen Gojo Figure", Decimal::new(12500, 2), "Figures"),
            ],
            categories: ["Figures", "Apparel", "Manga", "Posters", "Accessories", "Plush"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    /// Defaults to [`PLACEHOLDER_IMAGE`] when absent.
    pub image: Option<String>,
    pub category: String,
}

/// Partial update: `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Repository for the catalog document.
///
/// Every operation reads the document, mutates it in memory, and writes it
/// back whole. See the module docs for the single-writer caveat.
#[derive(Clone)]
pub struct CatalogStore {
    store: Arc<dyn DocumentStore>,
}

impl CatalogStore {
    /// Create a catalog store over the given document backend.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write the default catalog if no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the seed document cannot be written.
    pub fn seed(&self) -> Result<(), StoreError> {
        if self.store.load(CATALOG_DOC)?.is_none() {
            save_json(self.store.as_ref(), CATALOG_DOC, &Catalog::default())?;
        }
        Ok(())
    }

    /// The full current catalog. Falls back to the built-in default catalog
    /// if the document is missing or corrupt.
    #[must_use]
    pub fn list(&self) -> Catalog {
        self.read()
    }

    /// Look up a single product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.read().products.into_iter().find(|p| p.id == id)
    }

    /// Create a product, assigning the next id (max existing + 1, or 1 for an
    /// empty catalog). Ids are never reused after deletion because the
    /// maximum only grows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be persisted.
    pub fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut catalog = self.read();

        let id = catalog
            .products
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(ProductId::new(1), |max| max.next());

        let product = Product {
            id,
            name: new.name,
            price: new.price,
            image: new.image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category: new.category,
        };

        catalog.products.push(product.clone());
        self.write(&catalog)?;
        Ok(product)
    }

    /// Merge `patch` over an existing product. Returns `Ok(None)` if no
    /// product has the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be persisted.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>, StoreError> {
        let mut catalog = self.read();

        let Some(product) = catalog.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }

        let updated = product.clone();
        self.write(&catalog)?;
        Ok(Some(updated))
    }

    /// Remove a product, returning the removed record, or `Ok(None)` if no
    /// product has the given id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be persisted.
    pub fn delete(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut catalog = self.read();

        let Some(index) = catalog.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let removed = catalog.products.remove(index);
        self.write(&catalog)?;
        Ok(Some(removed))
    }

    /// The current category list.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.read().categories
    }

    /// Append a category if it is not already present, returning the full
    /// list. Adding an existing category is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be persisted.
    pub fn add_category(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let mut catalog = self.read();

        if !catalog.categories.iter().any(|c| c == name) {
            catalog.categories.push(name.to_string());
            self.write(&catalog)?;
        }

        Ok(catalog.categories)
    }

    fn read(&self) -> Catalog {
        load_json(self.store.as_ref(), CATALOG_DOC).unwrap_or_default()
    }

    fn write(&self, catalog: &Catalog) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), CATALOG_DOC, catalog)
    }
}
