//! Shopfront CLI - catalog lookups and cart management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront collections list
//! shopfront collections show shirts --price-min 10 --sort-key price
//! shopfront products show tee --option Size=M
//! shopfront search "linen shirt"
//!
//! # Work with the local cart
//! shopfront cart add tee --option Size=M --quantity 2
//! shopfront cart update gid://shopify/ProductVariant/12 3
//! shopfront cart checkout
//! ```
//!
//! # Commands
//!
//! - `collections` - List collections or show one with filters
//! - `products` - Show a product (with option picks) or the featured list
//! - `search` - Free-text product search
//! - `cart` - Show, edit, clear or check out the persisted cart
//!
//! Reads the same environment as the storefront server
//! (`SHOPIFY_STOREFRONT_API_URL`, `SHOPIFY_STOREFRONT_ACCESS_TOKEN`,
//! `SHOPFRONT_CART_DIR`). The server owns the cart file while it runs, so
//! use the `cart` commands when it is stopped.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_core::OptionSelection;

mod commands;

use commands::catalog::SortKey;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse collections
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Look up products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Search products by free text
    Search {
        /// Search terms
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        first: u32,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// List collections
    List {
        /// Maximum number of collections
        #[arg(short, long, default_value_t = 50)]
        first: u32,
    },
    /// Show a collection and its products (`all` lists every collection)
    Show {
        /// Collection handle
        handle: String,

        /// Minimum variant price
        #[arg(long)]
        price_min: Option<rust_decimal::Decimal>,

        /// Maximum variant price
        #[arg(long)]
        price_max: Option<rust_decimal::Decimal>,

        /// Sort order for the products
        #[arg(long, value_enum, default_value_t = SortKey::CollectionDefault)]
        sort_key: SortKey,

        /// Reverse the sort order
        #[arg(long)]
        reverse: bool,

        /// Maximum number of products
        #[arg(short, long, default_value_t = 24)]
        first: u32,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Show a product and the variant resolved from the option picks
    Show {
        /// Product handle
        handle: String,

        /// Option pick as `Name=Value` (repeatable)
        #[arg(short, long = "option", value_parser = commands::parse_option)]
        options: Vec<(String, String)>,
    },
    /// List featured products
    Featured {
        /// Maximum number of products
        #[arg(short, long, default_value_t = 8)]
        first: u32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product variant
    Add {
        /// Product handle
        handle: String,

        /// Option pick as `Name=Value` (repeatable)
        #[arg(short, long = "option", value_parser = commands::parse_option)]
        options: Vec<(String, String)>,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart item
    Update {
        /// Variant id (`gid://shopify/ProductVariant/...`)
        variant_id: String,

        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove an item
    Remove {
        /// Variant id (`gid://shopify/ProductVariant/...`)
        variant_id: String,
    },
    /// Empty the cart
    Clear,
    /// Create a checkout and print its URL
    Checkout,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Collections { action } => match action {
            CollectionAction::List { first } => commands::catalog::list_collections(first).await?,
            CollectionAction::Show {
                handle,
                price_min,
                price_max,
                sort_key,
                reverse,
                first,
            } => {
                let filters = commands::catalog::filters(price_min, price_max, sort_key, reverse)?;
                commands::catalog::show_collection(&handle, &filters, first).await?;
            }
        },
        Commands::Products { action } => match action {
            ProductAction::Show { handle, options } => {
                commands::catalog::show_product(&handle, &selection(options)).await?;
            }
            ProductAction::Featured { first } => commands::catalog::featured(first).await?,
        },
        Commands::Search { query, first } => commands::catalog::search(&query, first).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                handle,
                options,
                quantity,
            } => commands::cart::add(&handle, &selection(options), quantity).await?,
            CartAction::Update {
                variant_id,
                quantity,
            } => commands::cart::update(&variant_id, quantity).await?,
            CartAction::Remove { variant_id } => commands::cart::remove(&variant_id).await?,
            CartAction::Clear => commands::cart::clear().await?,
            CartAction::Checkout => commands::cart::checkout().await?,
        },
    }
    Ok(())
}

fn selection(options: Vec<(String, String)>) -> OptionSelection {
    options.into_iter().collect()
}
