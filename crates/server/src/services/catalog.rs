//! Seeded in-memory product catalog.
//!
//! Quotes are cached via `moka` with a short TTL, mirroring how a remote
//! catalog would be fronted. Out-of-stock products are listed but quote as
//! unavailable - availability is this catalog's decision, the cart only
//! surfaces it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rust_decimal::Decimal;

use bugstore_core::ProductId;
use bugstore_commerce::{Catalog, CollaboratorError, ProductQuote};

/// Cached quote TTL.
const QUOTE_TTL: Duration = Duration::from_secs(300);

/// One seeded product.
#[derive(Debug, Clone)]
struct SeedProduct {
    name: &'static str,
    image: Option<&'static str>,
    /// Price in dollars, as a decimal string to keep cents exact.
    price: &'static str,
    in_stock: bool,
}

/// The BugStore demo inventory.
const SEED_PRODUCTS: &[(i64, SeedProduct)] = &[
    (1, SeedProduct { name: "Giant Stag Beetle", image: Some("/img/stag-beetle.jpg"), price: "45.00", in_stock: true }),
    (2, SeedProduct { name: "Blue Death Feigning Beetle", image: Some("/img/bdf-beetle.jpg"), price: "22.50", in_stock: true }),
    (3, SeedProduct { name: "Orchid Mantis", image: Some("/img/orchid-mantis.jpg"), price: "85.00", in_stock: true }),
    (4, SeedProduct { name: "Hercules Beetle Larva", image: Some("/img/hercules-larva.jpg"), price: "30.00", in_stock: true }),
    (5, SeedProduct { name: "Goliath Birdeater", image: Some("/img/goliath.jpg"), price: "150.00", in_stock: true }),
    (6, SeedProduct { name: "Leaf Cutter Ant Colony", image: Some("/img/leafcutter.jpg"), price: "200.00", in_stock: true }),
    (7, SeedProduct { name: "Jumping Spider", image: Some("/img/jumping-spider.jpg"), price: "35.00", in_stock: true }),
    (8, SeedProduct { name: "Rainbow Stag Beetle", image: Some("/img/rainbow-stag.jpg"), price: "60.00", in_stock: false }),
    (9, SeedProduct { name: "Pet Firefly Pair", image: None, price: "19.99", in_stock: true }),
];

/// In-memory catalog seeded with the demo inventory.
pub struct SeededCatalog {
    products: HashMap<ProductId, SeedProduct>,
    quotes: Cache<ProductId, ProductQuote>,
}

impl SeededCatalog {
    /// Build the catalog from the demo seed data.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: SEED_PRODUCTS
                .iter()
                .map(|(id, product)| (ProductId::new(*id), product.clone()))
                .collect(),
            quotes: Cache::builder().time_to_live(QUOTE_TTL).build(),
        }
    }
}

impl Default for SeededCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for SeededCatalog {
    async fn unit_price(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductQuote>, CollaboratorError> {
        let Some(product) = self.products.get(&product_id) else {
            return Ok(None);
        };
        if !product.in_stock {
            return Ok(None);
        }

        let name = product.name;
        let image = product.image;
        let price = product.price;
        let quote = self
            .quotes
            .try_get_with(product_id, async move {
                let unit_price = price.parse::<Decimal>().map_err(|e| {
                    CollaboratorError::Unavailable(format!("bad seed price for {product_id}: {e}"))
                })?;
                Ok::<_, CollaboratorError>(ProductQuote {
                    product_id,
                    name: name.to_string(),
                    image: image.map(String::from),
                    unit_price,
                })
            })
            .await
            .map_err(|e: std::sync::Arc<CollaboratorError>| {
                CollaboratorError::Unavailable(e.to_string())
            })?;

        Ok(Some(quote))
    }
}
