//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Catalog
//! GET    /api/collections                 - Collection listing
//! GET    /api/collections/{handle}        - Collection detail (filters, sort)
//! GET    /api/products/featured           - Featured products
//! GET    /api/products/{handle}           - Product detail + default selection
//! POST   /api/products/{handle}/variant   - Resolve an option selection
//! GET    /api/search?q=                   - Product search
//!
//! # Cart
//! GET    /api/cart                        - Cart with totals
//! POST   /api/cart/items                  - Add a product variant
//! PATCH  /api/cart/items/{variant_id}     - Set quantity
//! DELETE /api/cart/items/{variant_id}     - Remove item
//! DELETE /api/cart                        - Clear cart
//! POST   /api/cart/checkout               - Create a checkout
//! ```

pub mod cart;
pub mod collections;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, patch, post},
};
use serde::{Deserialize, Deserializer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Deserialize empty query values as `None` for optional parsed fields.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/featured", get(products::featured))
        .route("/{handle}", get(products::show))
        .route("/{handle}/variant", post(products::resolve_variant))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{variant_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/search", get(search::search))
}

/// Full application router with state and HTTP tracing.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! A fake Storefront API and helpers for driving the router.

    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::CartConfig;
    use crate::shopify::StorefrontClient;
    use crate::state::AppState;

    fn variant(id: u32, size: &str, available: bool) -> Value {
        json!({
            "id": format!("gid://shopify/ProductVariant/{id}"),
            "title": size,
            "availableForSale": available,
            "price": {"amount": "25.00", "currencyCode": "USD"},
            "compareAtPrice": null,
            "selectedOptions": [{"name": "Size", "value": size}]
        })
    }

    fn tee() -> Value {
        json!({
            "id": "gid://shopify/Product/1",
            "handle": "tee",
            "title": "Tee",
            "description": "A tee",
            "descriptionHtml": "<p>A tee</p>",
            "availableForSale": true,
            "productType": "Shirts",
            "vendor": "Acme",
            "priceRange": {
                "minVariantPrice": {"amount": "25.00", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "25.00", "currencyCode": "USD"}
            },
            "images": {"edges": [{"node": {"url": "https://cdn.example.com/tee.jpg", "altText": null, "width": 800, "height": 800}}]},
            "options": [{"name": "Size", "optionValues": [{"name": "S"}, {"name": "M"}, {"name": "L"}]}],
            "variants": {"edges": [
                {"node": variant(11, "S", true)},
                {"node": variant(12, "M", true)},
                {"node": variant(13, "L", false)}
            ]}
        })
    }

    fn summary() -> Value {
        json!({
            "id": "gid://shopify/Product/1",
            "handle": "tee",
            "title": "Tee",
            "description": "A tee",
            "availableForSale": true,
            "priceRange": {"minVariantPrice": {"amount": "25.00", "currencyCode": "USD"}},
            "images": {"edges": []},
            "variants": {"edges": [{"node": {
                "id": "gid://shopify/ProductVariant/11",
                "title": "S",
                "availableForSale": true,
                "price": {"amount": "25.00", "currencyCode": "USD"}
            }}]}
        })
    }

    async fn graphql(Json(body): Json<Value>) -> Json<Value> {
        let data = match body["operationName"].as_str().unwrap_or_default() {
            "GetProductByHandle" => {
                if body["variables"]["handle"] == "tee" {
                    json!({"product": tee()})
                } else {
                    json!({"product": null})
                }
            }
            "GetProducts" => json!({"products": {"edges": [{"node": summary()}]}}),
            "GetCollections" => json!({"collections": {"edges": [{"node": {
                "id": "gid://shopify/Collection/1",
                "handle": "shirts",
                "title": "Shirts",
                "description": "All shirts",
                "image": null
            }}]}}),
            "GetCollectionByHandle" => json!({"collection": {
                "id": "gid://shopify/Collection/1",
                "handle": "shirts",
                "title": "Shirts",
                "description": "All shirts",
                "image": null,
                "products": {"edges": [{"node": summary()}]}
            }}),
            "CreateCheckout" => {
                let lines = &body["variables"]["input"]["lines"];
                if lines[0]["quantity"].as_u64() > Some(10) {
                    json!({"cartCreate": {"cart": null, "userErrors": [
                        {"code": "INVALID", "field": ["input", "lines"], "message": "Not enough stock"}
                    ]}})
                } else {
                    json!({"cartCreate": {
                        "cart": {"id": "gid://shopify/Cart/1", "checkoutUrl": "https://shop.example.com/checkouts/1"},
                        "userErrors": []
                    }})
                }
            }
            other => return Json(json!({"errors": [{"message": format!("unknown operation {other}")}]})),
        };
        Json(json!({ "data": data }))
    }

    /// Application state wired to a fake Storefront API and a temp cart dir.
    pub struct TestApp {
        pub state: AppState,
        pub cart_dir: TempDir,
    }

    impl TestApp {
        pub async fn spawn() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, Router::new().route("/graphql", post(graphql)))
                    .await
                    .unwrap();
            });

            let cart_dir = tempfile::tempdir().unwrap();
            let client =
                StorefrontClient::with_endpoint(format!("http://{addr}/graphql"), "test-token");
            let state = AppState::new(
                client,
                &CartConfig {
                    storage_dir: cart_dir.path().to_path_buf(),
                    checkout_timeout: Duration::from_secs(5),
                },
            );

            Self { state, cart_dir }
        }

        /// Send a request through the full router, returning status and JSON body.
        pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = super::app(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                    Value::String(String::from_utf8_lossy(&bytes).into_owned())
                })
            };
            (status, json)
        }
    }
}
