//! Shopify Storefront API client implementation.
//!
//! Sends hand-written GraphQL documents through `graphql_client` wire types
//! with `reqwest` 0.13 for HTTP. Caches products and collections using
//! `moka` (5-minute TTL).

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use rust_decimal::prelude::ToPrimitive;
use shopfront_core::{Checkout, CheckoutLineInput, Product};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    ALL_COLLECTIONS_HANDLE, CollectionFilters, CollectionPage, CollectionSummary, ProductSummary,
};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::CacheValue;
use conversions::{
    convert_collection, convert_collection_summary, convert_product, convert_product_summaries,
};
use queries::{
    CartInput, CartLineInput, CreateCheckout, CreateCheckoutVariables, GetCollectionByHandle,
    GetCollectionByHandleVariables, GetCollections, GetCollectionsVariables, GetProductByHandle,
    GetProductByHandleVariables, GetProducts, GetProductsVariables, PriceRangeFilter,
    ProductFilter,
};

/// Largest page Shopify serves for a connection.
const MAX_PAGE_SIZE: u32 = 250;
const PRODUCT_IMAGE_COUNT: i64 = 10;
const PRODUCT_VARIANT_COUNT: i64 = 100;

/// Response bodies are truncated to this many characters in logs and errors.
const BODY_PREVIEW_LEN: usize = 500;

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_LEN).collect()
}

fn page_size(first: u32) -> i64 {
    i64::from(first.clamp(1, MAX_PAGE_SIZE))
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to collections, products and checkout creation.
/// Products and collections are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self::with_endpoint(config.api_url.as_str(), config.token())
    }

    /// Create a client for an arbitrary GraphQL endpoint.
    ///
    /// Skips config validation; used for local fakes and proxies.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token: access_token.into(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Storefront-Access-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&response_text),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %preview(&response_text),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get the first `first` collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self, first: u32) -> Result<Vec<CollectionSummary>, ShopifyError> {
        let first = page_size(first);
        let cache_key = format!("collections:{first}");

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<GetCollections>(GetCollectionsVariables { first })
            .await?;

        let collections: Vec<CollectionSummary> = data
            .collections
            .into_nodes()
            .map(convert_collection_summary)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(collections.clone()))
            .await;

        Ok(collections)
    }

    /// Get a collection by its handle, with filtered and sorted products.
    ///
    /// The handle `all` lists every collection instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is empty, the collection is not found
    /// or the API request fails.
    #[instrument(skip(self, filters), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
        filters: &CollectionFilters,
        first: u32,
    ) -> Result<CollectionPage, ShopifyError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(ShopifyError::InvalidInput(
                "collection handle is required".to_string(),
            ));
        }

        if handle == ALL_COLLECTIONS_HANDLE {
            let collections = self.get_collections(MAX_PAGE_SIZE).await?;
            return Ok(CollectionPage::all_collections(collections));
        }

        let first = page_size(first);
        let cache_key = format!("collection:{handle}:{first}:{filters:?}");

        if let Some(CacheValue::Collection(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*page);
        }

        let variables = GetCollectionByHandleVariables {
            handle: handle.to_string(),
            first,
            sort_key: filters.sort_key,
            reverse: filters.reverse,
            filters: price_filter(filters).into_iter().collect(),
        };

        let data = self.execute::<GetCollectionByHandle>(variables).await?;

        let collection_data = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        let page = CollectionPage::Collection(convert_collection(collection_data)?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collection(Box::new(page.clone())))
            .await;

        Ok(page)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(ShopifyError::InvalidInput(
                "product handle is required".to_string(),
            ));
        }

        let cache_key = format!("product:{handle}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = GetProductByHandleVariables {
            handle: handle.to_string(),
            image_count: PRODUCT_IMAGE_COUNT,
            variant_count: PRODUCT_VARIANT_COUNT,
        };

        let data = self.execute::<GetProductByHandle>(variables).await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_data)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the first `first` products in the store's default order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_featured_products(
        &self,
        first: u32,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        let first = page_size(first);
        let cache_key = format!("featured:{first}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(GetProductsVariables { first, query: None })
            .await?;

        let products = convert_product_summaries(data.products.into_nodes())?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Search products. Results are never cached.
    ///
    /// A blank query returns no products without calling the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: &str,
        first: u32,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let variables = GetProductsVariables {
            first: page_size(first),
            query: Some(query.to_string()),
        };

        let data = self.execute::<GetProducts>(variables).await?;

        convert_product_summaries(data.products.into_nodes())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Create a hosted checkout for the given lines.
    ///
    /// # Errors
    ///
    /// Returns `UserError` with the first user error message if Shopify
    /// rejects the input, or another error if the request fails.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_checkout(
        &self,
        lines: &[CheckoutLineInput],
    ) -> Result<Checkout, ShopifyError> {
        if lines.is_empty() {
            return Err(ShopifyError::InvalidInput(
                "checkout requires at least one line".to_string(),
            ));
        }

        let variables = CreateCheckoutVariables {
            input: CartInput {
                lines: lines
                    .iter()
                    .map(|line| CartLineInput {
                        merchandise_id: line.variant_id.to_string(),
                        quantity: line.quantity.get(),
                    })
                    .collect(),
            },
        };

        let data = self.execute::<CreateCheckout>(variables).await?;

        let payload = data.cart_create.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError::message("No cartCreate payload")])
        })?;

        if let Some(first) = payload.user_errors.into_iter().next() {
            debug!(
                code = ?first.code,
                field = ?first.field,
                "Checkout rejected with user error"
            );
            return Err(ShopifyError::UserError(first.message));
        }

        let cart = payload.cart.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError::message("Failed to create checkout")])
        })?;

        Ok(Checkout {
            id: cart.id,
            web_url: cart.checkout_url,
        })
    }
}

fn price_filter(filters: &CollectionFilters) -> Option<ProductFilter> {
    if !filters.has_price_range() {
        return None;
    }
    Some(ProductFilter {
        price: PriceRangeFilter {
            min: filters.price_min.and_then(|d| d.to_f64()),
            max: filters.price_max.and_then(|d| d.to_f64()),
        },
    })
}
