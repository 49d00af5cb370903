use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use sensora_cart::cart::{validate_qty, Cart, CartLine, NewCartLine};
use sensora_cart::customer::{Customer, NewCustomer};
use sensora_cart::CartError;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/customers", post(create_customer))
        .route("/v1/customers/{id}", get(get_customer))
        .route("/v1/carts", post(create_cart))
        .route("/v1/carts/{id}", get(get_cart))
        .route("/v1/carts/{id}/items", post(add_item))
        .route("/v1/carts/{id}/recompute", post(recompute_totals))
        .route("/v1/cart-items/{id}/qty", put(set_item_qty))
        .route("/v1/cart-items/{id}", axum::routing::delete(remove_item))
}

#[derive(Debug, Deserialize)]
struct CreateCartRequest {
    customer_id: i64,
}

#[derive(Debug, Deserialize)]
struct SetQtyRequest {
    qty: i32,
}

/// POST /v1/customers
async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = state.customers.create_customer(req).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /v1/customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customers
        .get_customer(id)
        .await?
        .ok_or(CartError::CustomerNotFound(id))?;
    Ok(Json(customer))
}

/// POST /v1/carts
async fn create_cart(
    State(state): State<AppState>,
    Json(req): Json<CreateCartRequest>,
) -> Result<(StatusCode, Json<Cart>), AppError> {
    state
        .customers
        .get_customer(req.customer_id)
        .await?
        .ok_or(CartError::CustomerNotFound(req.customer_id))?;
    let cart = state.carts.create_cart(req.customer_id).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// GET /v1/carts/{id}
async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Cart>, AppError> {
    let cart = state
        .carts
        .get_cart(id)
        .await?
        .ok_or(CartError::CartNotFound(id))?;
    Ok(Json(cart))
}

/// POST /v1/carts/{id}/items
///
/// Resolves the generic (kind, id) reference through the catalog and prices
/// the line at the product's current unit price.
async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<i64>,
    Json(req): Json<NewCartLine>,
) -> Result<(StatusCode, Json<CartLine>), AppError> {
    validate_qty(req.qty)?;
    let cart = state
        .carts
        .get_cart(cart_id)
        .await?
        .ok_or(CartError::CartNotFound(cart_id))?;
    let product = state
        .products
        .get_product(req.product)
        .await?
        .ok_or(CartError::UnknownProduct(req.product))?;
    let total = CartLine::line_total(product.price(), req.qty);
    let line = state
        .carts
        .add_line(cart_id, cart.owner_id, req.product, req.qty, total)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PUT /v1/cart-items/{id}/qty
///
/// Updates the quantity only. The line's cached total and the cart's totals
/// go stale until POST /v1/carts/{id}/recompute.
async fn set_item_qty(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
    Json(req): Json<SetQtyRequest>,
) -> Result<Json<CartLine>, AppError> {
    validate_qty(req.qty)?;
    state.carts.set_line_qty(line_id, req.qty).await?;
    let line = state
        .carts
        .get_line(line_id)
        .await?
        .ok_or(CartError::LineNotFound(line_id))?;
    Ok(Json(line))
}

/// DELETE /v1/cart-items/{id}
async fn remove_item(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.carts.remove_line(line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/carts/{id}/recompute
///
/// The one place cart totals are refreshed: reprices every line at the
/// product's current unit price, then recomputes and saves the cart's
/// denormalized totals. Lines whose product has vanished keep their cached
/// total.
async fn recompute_totals(
    State(state): State<AppState>,
    Path(cart_id): Path<i64>,
) -> Result<Json<Cart>, AppError> {
    let mut cart = state
        .carts
        .get_cart(cart_id)
        .await?
        .ok_or(CartError::CartNotFound(cart_id))?;

    for line in &mut cart.lines {
        match state.products.get_product(line.product).await? {
            Some(product) => {
                let total = CartLine::line_total(product.price(), line.qty);
                if total != line.total_price {
                    state.carts.set_line_total(line.id, total).await?;
                    line.total_price = total;
                }
            }
            None => {
                tracing::warn!(
                    line_id = line.id,
                    kind = %line.product.kind,
                    product_id = line.product.id,
                    "cart line references a missing product, keeping cached total"
                );
            }
        }
    }

    cart.recompute_totals();
    state
        .carts
        .save_totals(cart.id, cart.total_products, cart.total_price)
        .await?;
    Ok(Json(cart))
}
