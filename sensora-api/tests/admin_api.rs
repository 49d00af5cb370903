use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use sensora_api::{app, AdminRegistry, AppState};
use sensora_store::MemStore;

fn test_state() -> AppState {
    let store = Arc::new(MemStore::new());
    AppState {
        reference: store.clone(),
        products: store.clone(),
        customers: store.clone(),
        carts: store,
        admin: Arc::new(AdminRegistry::standard()),
    }
}

async fn send(
    state: &AppState,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates one category/manufacturer/series chain, returning their ids.
async fn seed_catalog_refs(state: &AppState, category_slug: &str) -> (i64, i64, i64) {
    let (status, category) = send(
        state,
        "POST",
        "/v1/admin/categories",
        Some(json!({"name": "Seeded category", "slug": category_slug})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, manufacturer) = send(
        state,
        "POST",
        "/v1/admin/manufacturers",
        Some(json!({"name": "Adis Engineering", "slug": "adis-engineering"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, series) = send(
        state,
        "POST",
        "/v1/admin/series",
        Some(json!({
            "name": "TS series",
            "slug": "ts-series",
            "manufacturer_id": manufacturer["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        category["id"].as_i64().unwrap(),
        manufacturer["id"].as_i64().unwrap(),
        series["id"].as_i64().unwrap(),
    )
}

fn sensor_payload(slug: &str, refs: (i64, i64, i64), price: &str) -> Value {
    json!({
        "category_id": refs.0,
        "manufacturer_id": refs.1,
        "series_id": refs.2,
        "title": format!("Sensor {slug}"),
        "slug": slug,
        "price": price,
        "temp_range": "-50..+150",
    })
}

fn converter_payload(slug: &str, refs: (i64, i64, i64), price: &str) -> Value {
    json!({
        "category_id": refs.0,
        "manufacturer_id": refs.1,
        "series_id": refs.2,
        "title": format!("Converter {slug}"),
        "slug": slug,
        "price": price,
        "power": "2.2kW",
        "current": "5.6A",
        "voltage": "380V",
        "ip_case": "IP20",
    })
}

#[tokio::test]
async fn test_category_choices_are_scoped_per_product_kind() {
    let state = test_state();
    for (name, slug) in [
        ("Duct temperature sensors", "duct-temp-sensor"),
        ("Frequency converters", "fr-converter"),
        ("Enclosures", "enclosures"),
    ] {
        let (status, _) = send(
            &state,
            "POST",
            "/v1/admin/categories",
            Some(json!({"name": name, "slug": slug})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, choices) = send(
        &state,
        "GET",
        "/v1/admin/category-choices/temperature-sensors",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(choices.as_array().unwrap().len(), 1);
    assert_eq!(choices[0]["slug"], "duct-temp-sensor");

    let (status, choices) = send(
        &state,
        "GET",
        "/v1/admin/category-choices/frequency-converters",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(choices.as_array().unwrap().len(), 1);
    assert_eq!(choices[0]["slug"], "fr-converter");

    // Every other entity gets the unrestricted choice set.
    let (status, choices) = send(&state, "GET", "/v1/admin/category-choices/series", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(choices.as_array().unwrap().len(), 3);

    let (status, _) = send(&state, "GET", "/v1/admin/category-choices/widgets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_main_page_keeps_per_kind_blocks() {
    let state = test_state();
    let refs = seed_catalog_refs(&state, "duct-temp-sensor").await;

    for i in 1..=6 {
        let (status, _) = send(
            &state,
            "POST",
            "/v1/admin/temperature-sensors",
            Some(sensor_payload(&format!("ts-{i}"), refs, "999.00")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    for i in 1..=2 {
        let (status, _) = send(
            &state,
            "POST",
            "/v1/admin/frequency-converters",
            Some(converter_payload(&format!("fc-{i}"), refs, "1500.00")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, feed) = send(&state, "GET", "/v1/main-page", None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    // Sensor block capped at 5, then the converter block; never interleaved.
    assert_eq!(feed.len(), 7);
    assert!(feed[..5].iter().all(|p| p["kind"] == "temperature_sensor"));
    assert!(feed[5..].iter().all(|p| p["kind"] == "frequency_converter"));
    let sensor_ids: Vec<i64> = feed[..5].iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert!(sensor_ids.windows(2).all(|w| w[0] > w[1]));

    // Unknown kind names contribute nothing and do not error.
    let (status, feed) = send(
        &state,
        "GET",
        "/v1/main-page?kinds=frequency_converter,pressure_sensor",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|p| p["kind"] == "frequency_converter"));
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict() {
    let state = test_state();
    let body = json!({"name": "Enclosures", "slug": "enclosures"});
    let (status, _) = send(&state, "POST", "/v1/admin/categories", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, error) = send(&state, "POST", "/v1/admin/categories", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].as_str().unwrap().contains("enclosures"));
}

#[tokio::test]
async fn test_manufacturer_delete_cascades_through_series_to_products() {
    let state = test_state();
    let refs = seed_catalog_refs(&state, "duct-temp-sensor").await;
    let (status, _) = send(
        &state,
        "POST",
        "/v1/admin/temperature-sensors",
        Some(sensor_payload("ts-cascade", refs, "999.00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &state,
        "DELETE",
        &format!("/v1/admin/manufacturers/{}", refs.1),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, series) = send(&state, "GET", "/v1/admin/series", None).await;
    assert!(series.as_array().unwrap().is_empty());
    let (_, sensors) = send(&state, "GET", "/v1/admin/temperature-sensors", None).await;
    assert!(sensors.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_totals_refresh_only_on_explicit_recompute() {
    let state = test_state();
    let refs = seed_catalog_refs(&state, "duct-temp-sensor").await;
    let (status, sensor) = send(
        &state,
        "POST",
        "/v1/admin/temperature-sensors",
        Some(sensor_payload("ts-cart", refs, "1250.50")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, customer) = send(
        &state,
        "POST",
        "/v1/customers",
        Some(json!({
            "user_id": uuid::Uuid::new_v4(),
            "phone": "+70000000000",
            "company": "OOO Vent",
            "legal_address": "Moscow, Tverskaya 1",
            "actual_address": "Moscow, Tverskaya 1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, cart) = send(
        &state,
        "POST",
        "/v1/carts",
        Some(json!({"customer_id": customer["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = cart["id"].as_i64().unwrap();

    let (status, line) = send(
        &state,
        "POST",
        &format!("/v1/carts/{cart_id}/items"),
        Some(json!({
            "product": {"kind": "temperature_sensor", "id": sensor["id"]},
            "qty": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["total_price"], "1250.50");
    let line_id = line["id"].as_i64().unwrap();

    // Quantity change alone leaves the cached totals stale.
    let (status, stale) = send(
        &state,
        "PUT",
        &format!("/v1/cart-items/{line_id}/qty"),
        Some(json!({"qty": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stale["qty"], 3);
    assert_eq!(stale["total_price"], "1250.50");

    let (_, cart) = send(&state, "GET", &format!("/v1/carts/{cart_id}"), None).await;
    assert_eq!(cart["total_products"], 0);

    // The explicit recompute reprices the line and refreshes the caches.
    let (status, cart) = send(
        &state,
        "POST",
        &format!("/v1/carts/{cart_id}/recompute"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["total_products"], 3);
    assert_eq!(cart["total_price"], "3751.50");
    assert_eq!(cart["lines"][0]["total_price"], "3751.50");

    let (status, _) = send(
        &state,
        "PUT",
        &format!("/v1/cart-items/{line_id}/qty"),
        Some(json!({"qty": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registry_lists_every_managed_entity() {
    let state = test_state();
    let (status, entries) = send(&state, "GET", "/v1/admin/registry", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 8);

    let sensors = entries
        .iter()
        .find(|e| e["path"] == "temperature-sensors")
        .unwrap();
    assert_eq!(sensors["category_slug_filter"], "duct-temp-sensor");
    let categories = entries.iter().find(|e| e["path"] == "categories").unwrap();
    assert_eq!(categories["category_slug_filter"], Value::Null);
}
