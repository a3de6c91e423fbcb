//! Wire-to-domain conversions.
//!
//! Every conversion is fallible: ids, prices and currency codes are parsed
//! into validated core types and a bad value surfaces as
//! `ShopifyError::InvalidData` instead of a zero price or blank id.

use std::str::FromStr;

use rust_decimal::Decimal;
use shopfront_core::{
    CurrencyCode, Image, Money, PriceRange, Product, ProductId, ProductOption, ProductVariant,
    SelectedOption, VariantId,
};

use crate::shopify::ShopifyError;
use crate::shopify::types::{Collection, CollectionSummary, ProductSummary, VariantSummary};

use super::queries::{
    CollectionNode, CollectionSummaryNode, ImageNode, MoneyV2, ProductNode, ProductSummaryNode,
    VariantNode, VariantSummaryNode,
};

fn invalid(what: &str, err: impl std::fmt::Display) -> ShopifyError {
    ShopifyError::InvalidData(format!("{what}: {err}"))
}

// =============================================================================
// Scalars
// =============================================================================

pub fn convert_money(money: MoneyV2) -> Result<Money, ShopifyError> {
    let amount = Decimal::from_str(&money.amount)
        .map_err(|e| invalid(&format!("price amount {:?}", money.amount), e))?;
    let currency_code =
        CurrencyCode::parse(&money.currency_code).map_err(|e| invalid("currency code", e))?;
    Ok(Money::new(amount, currency_code))
}

pub fn convert_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
        width: image.width.and_then(|w| u32::try_from(w).ok()),
        height: image.height.and_then(|h| u32::try_from(h).ok()),
    }
}

fn product_id(id: String) -> Result<ProductId, ShopifyError> {
    ProductId::parse(id).map_err(|e| invalid("product id", e))
}

fn variant_id(id: String) -> Result<VariantId, ShopifyError> {
    VariantId::parse(id).map_err(|e| invalid("variant id", e))
}

// =============================================================================
// Products
// =============================================================================

fn convert_variant(variant: VariantNode) -> Result<ProductVariant, ShopifyError> {
    Ok(ProductVariant {
        id: variant_id(variant.id)?,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        price: convert_money(variant.price)?,
        compare_at_price: variant.compare_at_price.map(convert_money).transpose()?,
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption::new(o.name, o.value))
            .collect(),
    })
}

pub fn convert_product(product: ProductNode) -> Result<Product, ShopifyError> {
    Ok(Product {
        id: product_id(product.id)?,
        handle: product.handle,
        title: product.title,
        description: product.description,
        description_html: product.description_html,
        available_for_sale: product.available_for_sale,
        product_type: product.product_type,
        vendor: product.vendor,
        price_range: PriceRange {
            min_variant_price: convert_money(product.price_range.min_variant_price)?,
            max_variant_price: convert_money(product.price_range.max_variant_price)?,
        },
        images: product.images.into_nodes().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .into_nodes()
            .map(convert_variant)
            .collect::<Result<_, _>>()?,
    })
}

fn convert_variant_summary(variant: VariantSummaryNode) -> Result<VariantSummary, ShopifyError> {
    Ok(VariantSummary {
        id: variant_id(variant.id)?,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        price: convert_money(variant.price)?,
    })
}

pub fn convert_product_summary(product: ProductSummaryNode) -> Result<ProductSummary, ShopifyError> {
    Ok(ProductSummary {
        id: product_id(product.id)?,
        handle: product.handle,
        title: product.title,
        description: product.description,
        available_for_sale: product.available_for_sale,
        min_price: convert_money(product.price_range.min_variant_price)?,
        featured_image: product.images.into_nodes().next().map(convert_image),
        first_variant: product
            .variants
            .into_nodes()
            .next()
            .map(convert_variant_summary)
            .transpose()?,
    })
}

pub fn convert_product_summaries(
    products: impl Iterator<Item = ProductSummaryNode>,
) -> Result<Vec<ProductSummary>, ShopifyError> {
    products.map(convert_product_summary).collect()
}

// =============================================================================
// Collections
// =============================================================================

pub fn convert_collection_summary(collection: CollectionSummaryNode) -> CollectionSummary {
    CollectionSummary {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
    }
}

pub fn convert_collection(collection: CollectionNode) -> Result<Collection, ShopifyError> {
    Ok(Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
        products: convert_product_summaries(collection.products.into_nodes())?,
    })
}
