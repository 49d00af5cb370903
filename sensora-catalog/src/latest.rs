use crate::product::{CatalogProduct, ProductKind};
use crate::repository::ProductRepository;
use crate::CatalogResult;

/// Cross-kind feed for the storefront main page.
pub struct LatestProducts;

impl LatestProducts {
    /// How many products each kind contributes to the feed.
    pub const PER_KIND: i64 = 5;

    /// For each supplied kind name, in order, append that kind's newest
    /// products (at most [`Self::PER_KIND`], newest first). Blocks are
    /// concatenated, never interleaved by recency across kinds. Unknown
    /// kind names contribute nothing.
    pub async fn get_products_for_main_page(
        repo: &dyn ProductRepository,
        kind_names: &[&str],
    ) -> CatalogResult<Vec<CatalogProduct>> {
        let mut products = Vec::new();
        for name in kind_names {
            let Some(kind) = ProductKind::from_name(name) else {
                tracing::warn!(kind = %name, "unknown product kind, skipping");
                continue;
            };
            let block = repo.latest_products(kind, Self::PER_KIND).await?;
            products.extend(block);
        }
        Ok(products)
    }
}
