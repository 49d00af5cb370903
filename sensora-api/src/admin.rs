use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use sensora_cart::cart::{Cart, CartLine};
use sensora_cart::customer::Customer;
use sensora_catalog::product::{
    FrequencyConverter, NewFrequencyConverter, NewTemperatureSensor, TemperatureSensor,
};
use sensora_catalog::reference::{
    Category, Manufacturer, NewCategory, NewManufacturer, NewSeries, Series,
};

use crate::error::AppError;
use crate::registry::AdminEntry;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/registry", get(list_registry))
        .route("/v1/admin/category-choices/{entity}", get(category_choices))
        .route(
            "/v1/admin/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/v1/admin/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route(
            "/v1/admin/manufacturers",
            get(list_manufacturers).post(create_manufacturer),
        )
        .route(
            "/v1/admin/manufacturers/{id}",
            get(get_manufacturer)
                .put(update_manufacturer)
                .delete(delete_manufacturer),
        )
        .route("/v1/admin/series", get(list_series).post(create_series))
        .route(
            "/v1/admin/series/{id}",
            get(get_series).put(update_series).delete(delete_series),
        )
        .route(
            "/v1/admin/temperature-sensors",
            get(list_sensors).post(create_sensor),
        )
        .route(
            "/v1/admin/temperature-sensors/{id}",
            get(get_sensor).put(update_sensor).delete(delete_sensor),
        )
        .route(
            "/v1/admin/frequency-converters",
            get(list_converters).post(create_converter),
        )
        .route(
            "/v1/admin/frequency-converters/{id}",
            get(get_converter).put(update_converter).delete(delete_converter),
        )
        .route("/v1/admin/customers", get(list_customers))
        .route("/v1/admin/customers/{id}", get(get_customer))
        .route("/v1/admin/carts", get(list_carts))
        .route("/v1/admin/cart-products", get(list_cart_products))
}

// ============================================================================
// Registration table
// ============================================================================

/// GET /v1/admin/registry
async fn list_registry(State(state): State<AppState>) -> Json<Vec<AdminEntry>> {
    Json(state.admin.entries().to_vec())
}

/// GET /v1/admin/category-choices/{entity}
///
/// The selectable categories for an entity's admin form. Product kinds with
/// a pinned category slug get only that category; everything else gets the
/// unrestricted list.
async fn category_choices(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<Category>>, AppError> {
    let entry = state
        .admin
        .entry_for_path(&entity)
        .ok_or_else(|| AppError::NotFound(format!("no admin entity at {entity:?}")))?;
    match entry.category_slug_filter {
        Some(slug) => {
            let choices = state.reference.get_category_by_slug(slug).await?;
            Ok(Json(choices.into_iter().collect()))
        }
        None => Ok(Json(state.reference.list_categories().await?)),
    }
}

// ============================================================================
// Reference data
// ============================================================================

/// POST /v1/admin/categories
async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.reference.create_category(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /v1/admin/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.reference.list_categories().await?))
}

/// GET /v1/admin/categories/{id}
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .reference
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category not found: {id}")))?;
    Ok(Json(category))
}

/// PUT /v1/admin/categories/{id}
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewCategory>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.reference.update_category(id, req).await?))
}

/// DELETE /v1/admin/categories/{id}
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.reference.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/admin/manufacturers
async fn create_manufacturer(
    State(state): State<AppState>,
    Json(req): Json<NewManufacturer>,
) -> Result<(StatusCode, Json<Manufacturer>), AppError> {
    let manufacturer = state.reference.create_manufacturer(req).await?;
    Ok((StatusCode::CREATED, Json(manufacturer)))
}

/// GET /v1/admin/manufacturers
async fn list_manufacturers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Manufacturer>>, AppError> {
    Ok(Json(state.reference.list_manufacturers().await?))
}

/// GET /v1/admin/manufacturers/{id}
async fn get_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Manufacturer>, AppError> {
    let manufacturer = state
        .reference
        .get_manufacturer(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("manufacturer not found: {id}")))?;
    Ok(Json(manufacturer))
}

/// PUT /v1/admin/manufacturers/{id}
async fn update_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewManufacturer>,
) -> Result<Json<Manufacturer>, AppError> {
    Ok(Json(state.reference.update_manufacturer(id, req).await?))
}

/// DELETE /v1/admin/manufacturers/{id}
///
/// Cascades to the manufacturer's series and their products.
async fn delete_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.reference.delete_manufacturer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/admin/series
async fn create_series(
    State(state): State<AppState>,
    Json(req): Json<NewSeries>,
) -> Result<(StatusCode, Json<Series>), AppError> {
    let series = state.reference.create_series(req).await?;
    Ok((StatusCode::CREATED, Json(series)))
}

/// GET /v1/admin/series
async fn list_series(State(state): State<AppState>) -> Result<Json<Vec<Series>>, AppError> {
    Ok(Json(state.reference.list_series().await?))
}

/// GET /v1/admin/series/{id}
async fn get_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Series>, AppError> {
    let series = state
        .reference
        .get_series(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("series not found: {id}")))?;
    Ok(Json(series))
}

/// PUT /v1/admin/series/{id}
async fn update_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewSeries>,
) -> Result<Json<Series>, AppError> {
    Ok(Json(state.reference.update_series(id, req).await?))
}

/// DELETE /v1/admin/series/{id}
async fn delete_series(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.reference.delete_series(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Product kinds
// ============================================================================

/// POST /v1/admin/temperature-sensors
async fn create_sensor(
    State(state): State<AppState>,
    Json(req): Json<NewTemperatureSensor>,
) -> Result<(StatusCode, Json<TemperatureSensor>), AppError> {
    let sensor = state.products.create_sensor(req).await?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

/// GET /v1/admin/temperature-sensors
async fn list_sensors(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemperatureSensor>>, AppError> {
    Ok(Json(state.products.list_sensors().await?))
}

/// GET /v1/admin/temperature-sensors/{id}
async fn get_sensor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemperatureSensor>, AppError> {
    let sensor = state
        .products
        .get_sensor(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("temperature sensor not found: {id}")))?;
    Ok(Json(sensor))
}

/// PUT /v1/admin/temperature-sensors/{id}
async fn update_sensor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewTemperatureSensor>,
) -> Result<Json<TemperatureSensor>, AppError> {
    Ok(Json(state.products.update_sensor(id, req).await?))
}

/// DELETE /v1/admin/temperature-sensors/{id}
async fn delete_sensor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.products.delete_sensor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/admin/frequency-converters
async fn create_converter(
    State(state): State<AppState>,
    Json(req): Json<NewFrequencyConverter>,
) -> Result<(StatusCode, Json<FrequencyConverter>), AppError> {
    let converter = state.products.create_converter(req).await?;
    Ok((StatusCode::CREATED, Json(converter)))
}

/// GET /v1/admin/frequency-converters
async fn list_converters(
    State(state): State<AppState>,
) -> Result<Json<Vec<FrequencyConverter>>, AppError> {
    Ok(Json(state.products.list_converters().await?))
}

/// GET /v1/admin/frequency-converters/{id}
async fn get_converter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FrequencyConverter>, AppError> {
    let converter = state
        .products
        .get_converter(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("frequency converter not found: {id}")))?;
    Ok(Json(converter))
}

/// PUT /v1/admin/frequency-converters/{id}
async fn update_converter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewFrequencyConverter>,
) -> Result<Json<FrequencyConverter>, AppError> {
    Ok(Json(state.products.update_converter(id, req).await?))
}

/// DELETE /v1/admin/frequency-converters/{id}
async fn delete_converter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.products.delete_converter(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Customers and carts (read-only management views)
// ============================================================================

/// GET /v1/admin/customers
async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_customers().await?))
}

/// GET /v1/admin/customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customers
        .get_customer(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer not found: {id}")))?;
    Ok(Json(customer))
}

/// GET /v1/admin/carts
async fn list_carts(State(state): State<AppState>) -> Result<Json<Vec<Cart>>, AppError> {
    Ok(Json(state.carts.list_carts().await?))
}

/// GET /v1/admin/cart-products
async fn list_cart_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLine>>, AppError> {
    Ok(Json(state.carts.list_lines().await?))
}
