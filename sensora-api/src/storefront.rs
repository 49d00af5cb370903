use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use sensora_catalog::{CatalogProduct, LatestProducts, ProductKind};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/main-page", get(main_page))
}

#[derive(Debug, Deserialize)]
struct MainPageQuery {
    /// Comma-separated kind names; defaults to every known kind, sensors first.
    kinds: Option<String>,
}

/// GET /v1/main-page?kinds=temperature_sensor,frequency_converter
async fn main_page(
    State(state): State<AppState>,
    Query(query): Query<MainPageQuery>,
) -> Result<Json<Vec<CatalogProduct>>, AppError> {
    let kinds = query
        .kinds
        .unwrap_or_else(|| ProductKind::ALL.map(ProductKind::name).join(","));
    let names: Vec<&str> = kinds
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    let feed = LatestProducts::get_products_for_main_page(state.products.as_ref(), &names).await?;
    Ok(Json(feed))
}
