//! GraphQL operations for the Shopify Storefront API.
//!
//! Documents are written by hand and wired into `graphql_client` through
//! manual `GraphQLQuery` impls. Response structs mirror the wire shape
//! exactly; conversion into domain types happens in `conversions`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::shopify::types::ProductCollectionSortKey;

macro_rules! product_summary_fragment {
    () => {
        r"
fragment ProductSummaryFields on Product {
  id
  handle
  title
  description
  availableForSale
  priceRange {
    minVariantPrice { amount currencyCode }
  }
  images(first: 1) {
    edges { node { url altText width height } }
  }
  variants(first: 1) {
    edges {
      node {
        id
        title
        availableForSale
        price { amount currencyCode }
      }
    }
  }
}
"
    };
}

macro_rules! operation {
    ($name:ident, $operation:literal, $document:expr, $variables:ty, $data:ty) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $variables;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $operation,
                }
            }
        }
    };
}

// =============================================================================
// Shared Wire Types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinPriceRange {
    pub min_variant_price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub available_for_sale: bool,
    pub price_range: MinPriceRange,
    pub images: Connection<ImageNode>,
    pub variants: Connection<VariantSummaryNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummaryNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyV2,
}

// =============================================================================
// Collections
// =============================================================================

const GET_COLLECTIONS: &str = r"
query GetCollections($first: Int!) {
  collections(first: $first) {
    edges {
      node {
        id
        handle
        title
        description
        image { url altText width height }
      }
    }
  }
}
";

#[derive(Debug, Clone, Serialize)]
pub struct GetCollectionsVariables {
    pub first: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCollectionsData {
    pub collections: Connection<CollectionSummaryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSummaryNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<ImageNode>,
}

operation!(
    GetCollections,
    "GetCollections",
    GET_COLLECTIONS,
    GetCollectionsVariables,
    GetCollectionsData
);

const GET_COLLECTION_BY_HANDLE: &str = concat!(
    r"
query GetCollectionByHandle(
  $handle: String!
  $first: Int!
  $sortKey: ProductCollectionSortKeys
  $reverse: Boolean
  $filters: [ProductFilter!]
) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    image { url altText width height }
    products(first: $first, sortKey: $sortKey, reverse: $reverse, filters: $filters) {
      edges { node { ...ProductSummaryFields } }
    }
  }
}
",
    product_summary_fragment!()
);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionByHandleVariables {
    pub handle: String,
    pub first: i64,
    pub sort_key: ProductCollectionSortKey,
    pub reverse: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ProductFilter>,
}

/// `ProductFilter` input; only the price range is used.
#[derive(Debug, Clone, Serialize)]
pub struct ProductFilter {
    pub price: PriceRangeFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceRangeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCollectionByHandleData {
    pub collection: Option<CollectionNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<ImageNode>,
    pub products: Connection<ProductSummaryNode>,
}

operation!(
    GetCollectionByHandle,
    "GetCollectionByHandle",
    GET_COLLECTION_BY_HANDLE,
    GetCollectionByHandleVariables,
    GetCollectionByHandleData
);

// =============================================================================
// Products
// =============================================================================

const GET_PRODUCT_BY_HANDLE: &str = r"
query GetProductByHandle($handle: String!, $imageCount: Int!, $variantCount: Int!) {
  product(handle: $handle) {
    id
    handle
    title
    description
    descriptionHtml
    availableForSale
    productType
    vendor
    priceRange {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
    images(first: $imageCount) {
      edges { node { url altText width height } }
    }
    options {
      name
      optionValues { name }
    }
    variants(first: $variantCount) {
      edges {
        node {
          id
          title
          availableForSale
          price { amount currencyCode }
          compareAtPrice { amount currencyCode }
          selectedOptions { name value }
        }
      }
    }
  }
}
";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductByHandleVariables {
    pub handle: String,
    pub image_count: i64,
    pub variant_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProductByHandleData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub vendor: String,
    pub price_range: PriceRangeNode,
    pub images: Connection<ImageNode>,
    #[serde(default)]
    pub options: Vec<ProductOptionNode>,
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyV2,
    pub max_variant_price: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionNode {
    pub name: String,
    #[serde(default)]
    pub option_values: Vec<OptionValueNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionValueNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyV2,
    pub compare_at_price: Option<MoneyV2>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOptionNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

operation!(
    GetProductByHandle,
    "GetProductByHandle",
    GET_PRODUCT_BY_HANDLE,
    GetProductByHandleVariables,
    GetProductByHandleData
);

const GET_PRODUCTS: &str = concat!(
    r"
query GetProducts($first: Int!, $query: String) {
  products(first: $first, query: $query) {
    edges { node { ...ProductSummaryFields } }
  }
}
",
    product_summary_fragment!()
);

#[derive(Debug, Clone, Serialize)]
pub struct GetProductsVariables {
    pub first: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetProductsData {
    pub products: Connection<ProductSummaryNode>,
}

operation!(
    GetProducts,
    "GetProducts",
    GET_PRODUCTS,
    GetProductsVariables,
    GetProductsData
);

// =============================================================================
// Checkout
// =============================================================================

const CREATE_CHECKOUT: &str = r"
mutation CreateCheckout($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      id
      checkoutUrl
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutVariables {
    pub input: CartInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutData {
    pub cart_create: Option<CartCreatePayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreatePayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

operation!(
    CreateCheckout,
    "CreateCheckout",
    CREATE_CHECKOUT,
    CreateCheckoutVariables,
    CreateCheckoutData
);
