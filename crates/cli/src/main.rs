use anyhow::{anyhow, bail, Context, Result};
use api_client::{ApiClient, ApiConfig};
use cart::{
    variant_item_id, AddOutcome, CartConfig, CartStore, DecrementOutcome, FileStore, KeyValueStore,
    NewCartItem,
};
use catalog::{format_price, parser::id_from_scalar, Catalog, Product, ProductId, RawScalar};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{FilterState, SortOrder};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use storefront::{Facets, Storefront};
use tracing::warn;

/// Storefront - browse the catalog and manage a cart from the terminal
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse a product catalog and manage a persisted cart", long_about = None)]
struct Cli {
    /// Catalog JSON file (a product array or {products, categories, seasons}).
    /// Takes precedence over --api-url.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Origin serving /api/products, /api/categories and /api/seasons
    #[arg(long, env = "STOREFRONT_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the product API
    #[arg(long, env = "STOREFRONT_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, filtered and sorted
    Browse {
        /// Category id to include (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Only products offered in this color
        #[arg(long)]
        color: Option<String>,

        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<String>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<String>,

        /// price_asc, price_desc, newest or name_asc
        #[arg(long)]
        sort: Option<String>,

        /// Show at most this many products
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show category, color and price summaries for the whole catalog
    Facets,

    /// Manage the persisted cart
    Cart {
        /// Directory holding cart.json
        #[arg(long, env = "STOREFRONT_CART_DIR", default_value = ".storefront")]
        cart_dir: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a catalog product to the cart
    Add {
        /// Product id
        product_id: i64,

        /// Variant label (size, color), kept as a separate line
        #[arg(long)]
        variant: Option<String>,

        /// Units to add
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Delete a line regardless of quantity
    Remove {
        /// Cart item id, e.g. "12" or "12:M"
        item_id: String,
    },

    /// Take one unit off a line
    Decrement {
        /// Cart item id, e.g. "12" or "12:M"
        item_id: String,
    },

    /// Empty the cart
    Clear,

    /// Print the cart
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Browse {
            categories,
            color,
            min_price,
            max_price,
            sort,
            limit,
        } => {
            let state = build_filter_state(
                categories,
                color.as_deref(),
                min_price.as_deref(),
                max_price.as_deref(),
                sort.as_deref(),
            );
            let storefront = load_storefront(&cli).await?;
            handle_browse(&storefront, &state, *limit)?
        }
        Commands::Facets => {
            let storefront = load_storefront(&cli).await?;
            print_facets(&storefront.facets(), storefront.catalog());
        }
        Commands::Cart { cart_dir, action } => handle_cart(&cli, cart_dir, action).await?,
    }

    Ok(())
}

/// Load the catalog from a file or the product API
async fn load_storefront(cli: &Cli) -> Result<Storefront> {
    let start = Instant::now();

    let storefront = if let Some(path) = &cli.catalog {
        println!("Loading catalog from {}...", path.display());
        let catalog = Catalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
        Storefront::from_catalog(catalog)
    } else if let Some(url) = &cli.api_url {
        println!("Fetching catalog from {}...", url);
        let mut config = ApiConfig::new(url.clone());
        config.timeout = Duration::from_secs(cli.timeout_secs);
        if let Some(token) = &cli.token {
            config = config.with_token(token.clone());
        }
        let client = ApiClient::new(&config).context("Failed to configure product API client")?;
        Storefront::load(&client).await?
    } else {
        bail!(
            "No catalog source: pass --catalog FILE or --api-url URL (or set STOREFRONT_API_URL)"
        );
    };

    println!(
        "{} Loaded {} products in {:?}",
        "✓".green(),
        storefront.catalog().products().len(),
        start.elapsed()
    );
    Ok(storefront)
}

/// Turn raw flag values into a filter state.
///
/// Category ids may carry padding or a trailing `.0`; anything that is not
/// an integer is skipped. An unknown sort token falls back to catalog order.
fn build_filter_state(
    categories: &[String],
    color: Option<&str>,
    min_price: Option<&str>,
    max_price: Option<&str>,
    sort: Option<&str>,
) -> FilterState {
    let ids: Vec<i64> = categories
        .iter()
        .filter_map(|raw| {
            let id = id_from_scalar(&RawScalar::from(raw.as_str()));
            if id.is_none() {
                warn!("Ignoring category id {:?}", raw);
            }
            id
        })
        .collect();

    let mut state = FilterState::new()
        .with_categories(&ids)
        .with_price_range(min_price.unwrap_or(""), max_price.unwrap_or(""));

    if let Some(color) = color {
        state = state.with_color(color);
    }
    if let Some(token) = sort {
        let order = SortOrder::from_token(token);
        if order == SortOrder::Unsorted && !token.trim().is_empty() {
            warn!("Unknown sort {:?}, keeping catalog order", token);
        }
        state = state.with_sort(order);
    }
    state
}

/// Handle the 'browse' command
fn handle_browse(storefront: &Storefront, state: &FilterState, limit: Option<usize>) -> Result<()> {
    let visible = storefront.visible(state)?;
    let shown = limit.unwrap_or(visible.len()).min(visible.len());

    println!(
        "{}",
        format!("Products ({} of {}):", shown, visible.len()).bold().blue()
    );
    for (rank, product) in visible.iter().take(shown).enumerate() {
        print_product(rank + 1, product, storefront.catalog());
    }
    Ok(())
}

fn print_product(rank: usize, product: &Product, catalog: &Catalog) {
    let price = product
        .price
        .map(|p| format!("${}", format_price(p)))
        .unwrap_or_else(|| "n/a".to_string());
    let category = product
        .category
        .map(|id| {
            catalog
                .get_category(id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("category {id}"))
        })
        .unwrap_or_else(|| "uncategorized".to_string());

    println!(
        "{}. [{}] {} - {} ({})",
        rank.to_string().green(),
        product.id,
        product.name.bold(),
        price,
        category
    );
    if !product.colors.is_empty() {
        println!("   Colors: {}", product.colors.join(", "));
    }
}

fn print_facets(facets: &Facets, catalog: &Catalog) {
    println!("{}", format!("{} products", facets.total).bold().blue());

    println!("{}", "Categories:".bold());
    for facet in &facets.categories {
        let name = facet.name.as_deref().unwrap_or("(unknown)");
        println!("{}{} [{}]: {}", "• ".green(), name, facet.id, facet.count);
    }
    if facets.uncategorized > 0 {
        println!("{}uncategorized: {}", "• ".green(), facets.uncategorized);
    }

    println!("{}", "Colors:".bold());
    for facet in &facets.colors {
        println!("{}{}: {}", "• ".cyan(), facet.color, facet.count);
    }

    if let Some((lo, hi)) = facets.price_range {
        println!(
            "{} ${} - ${}",
            "Price range:".bold(),
            format_price(lo),
            format_price(hi)
        );
    }

    let seasons = catalog.seasons();
    if !seasons.is_empty() {
        println!("{}", "Seasons:".bold());
        for season in seasons {
            println!("{}{} [{}]", "• ".yellow(), season.name, season.id);
        }
    }
}

/// Handle the 'cart' command
async fn handle_cart(cli: &Cli, cart_dir: &Path, action: &CartAction) -> Result<()> {
    let storage = FileStore::open(cart_dir)
        .with_context(|| format!("Failed to open cart directory {}", cart_dir.display()))?;
    let mut cart = CartStore::initialize(storage, CartConfig::default());

    match action {
        CartAction::Add {
            product_id,
            variant,
            quantity,
        } => {
            let storefront = load_storefront(cli).await?;
            let product = storefront
                .catalog()
                .get_product(ProductId::new(*product_id))
                .ok_or_else(|| anyhow!("Product {} not found", product_id))?;
            let item = cart_item_for(product, variant.as_deref());

            for _ in 0..*quantity {
                match cart.add_item(item.clone()) {
                    AddOutcome::Rejected(reason) => {
                        bail!("Cannot add {}: {}", item.name, reason)
                    }
                    AddOutcome::Added | AddOutcome::Incremented { .. } => {}
                }
            }
            let in_cart = cart.line(&item.item_id).map_or(0, |l| l.quantity);
            println!(
                "{} {} (x{} in cart)",
                "Added".green(),
                item.name,
                in_cart
            );
        }
        CartAction::Remove { item_id } => {
            if cart.remove_item(item_id) {
                println!("{} {}", "Removed".green(), item_id);
            } else {
                println!("{} is not in the cart", item_id);
            }
        }
        CartAction::Decrement { item_id } => match cart.decrement_item(item_id) {
            DecrementOutcome::Decremented { quantity } => {
                println!("{} now x{}", item_id, quantity)
            }
            DecrementOutcome::Removed => println!("{} {}", "Removed".green(), item_id),
            DecrementOutcome::Missing => println!("{} is not in the cart", item_id),
        },
        CartAction::Clear => {
            cart.clear();
            println!("{}", "Cart cleared".green());
        }
        CartAction::Show => {}
    }

    print_cart(&cart);
    Ok(())
}

/// Build the add-to-cart event for a catalog product.
///
/// A product without a valid price yields an item the cart rejects.
fn cart_item_for(product: &Product, variant: Option<&str>) -> NewCartItem {
    let item_id = variant_item_id(product.id, variant);
    let name = match variant.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("{} ({})", product.name, v),
        None => product.name.clone(),
    };
    let price = product
        .price
        .map_or_else(|| RawScalar::from(""), |p| RawScalar::from(p.to_string()));
    NewCartItem::new(item_id, name, price)
}

fn print_cart<S: KeyValueStore>(cart: &CartStore<S>) {
    print!("{}", "Cart:\n".bold().blue());
    if cart.is_empty() {
        println!("  (empty)");
        return;
    }
    for line in cart.lines() {
        println!(
            "  {} {} x{} @ ${} = ${}",
            line.item_id.dimmed(),
            line.name,
            line.quantity,
            format_price(line.unit_price),
            format_price(line.subtotal())
        );
    }
    println!(
        "{} items, total {}",
        cart.count(),
        format!("${}", cart.formatted_total()).bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CategoryId, Decimal};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_flags() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--catalog",
            "catalog.json",
            "browse",
            "--category",
            "1",
            "--category",
            "2",
            "--min-price",
            "60",
            "--sort",
            "price-asc",
        ])
        .unwrap();

        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
        match cli.command {
            Commands::Browse {
                categories, sort, ..
            } => {
                assert_eq!(categories, vec!["1", "2"]);
                assert_eq!(sort.as_deref(), Some("price-asc"));
            }
            _ => panic!("expected browse"),
        }
    }

    #[test]
    fn test_cart_add_rejects_zero_quantity() {
        let result = Cli::try_parse_from([
            "storefront",
            "cart",
            "add",
            "3",
            "--quantity",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_filter_state() {
        let categories = vec!["1".to_string(), " 2 ".to_string(), "shirts".to_string()];
        let state = build_filter_state(
            &categories,
            Some("Red"),
            Some("60"),
            Some("abc"),
            Some("price_desc"),
        );

        assert_eq!(state.categories, vec![CategoryId::new(1), CategoryId::new(2)]);
        assert_eq!(state.active_color().as_deref(), Some("red"));
        assert_eq!(state.min_price, Some(Decimal::new(60, 0)));
        assert_eq!(state.max_price, None);
        assert_eq!(state.sort, SortOrder::PriceDesc);

        let state = build_filter_state(&[], None, None, None, Some("bogus"));
        assert!(state.is_neutral());
    }

    #[test]
    fn test_cart_item_for_product() {
        let product = Product::new(12, "Tee").with_price(Decimal::new(2999, 2));

        let item = cart_item_for(&product, Some("M"));
        assert_eq!(item.item_id, "12:M");
        assert_eq!(item.name, "Tee (M)");
        assert_eq!(item.price, RawScalar::from("29.99"));

        let item = cart_item_for(&Product::new(4, "Mystery"), None);
        assert_eq!(item.item_id, "4");
        assert_eq!(item.price, RawScalar::from(""));
    }
}
