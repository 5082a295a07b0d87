use anyhow::Context;
use clap::{Parser, Subcommand};
use dealink_catalog::CatalogClient;
use dealink_core::{
    build_key, links, normalize, render::pretty_json, resolve, select, AppConfig, ProductRecord,
};

#[derive(Debug, Parser)]
#[command(name = "dealink")]
#[command(about = "Build, inspect and resolve deal keys")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the deal key for a product
    Key {
        #[arg(long)]
        supermarket: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        name: String,
        /// Current price, e.g. 1.99
        #[arg(long)]
        price: f64,
    },
    /// Print the normalized slug of arbitrary text
    Normalize {
        text: String,
    },
    /// Fetch the catalog and print the debug report for a raw key
    Resolve {
        key: String,
        /// Catalog URL (defaults to the server's configured catalog)
        #[arg(long, env = "DEALINK_CATALOG_URL")]
        catalog_url: Option<String>,
        #[arg(long, default_value = "5")]
        timeout_secs: u64,
    },
    /// Print the share URL and deep link for a raw key
    Link {
        key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Key {
            supermarket,
            brand,
            name,
            price,
        } => {
            let product = ProductRecord {
                supermarket,
                brand,
                name,
                price,
                old_price: None,
                category: String::new(),
                image_url: None,
            };
            println!("{}", build_key(&product));
        }
        Commands::Normalize { text } => println!("{}", normalize(&text)),
        Commands::Resolve {
            key,
            catalog_url,
            timeout_secs,
        } => run_resolve(&key, catalog_url, timeout_secs).await?,
        Commands::Link { key } => {
            let config = dealink_core::load_app_config()?;
            println!("{}", links::canonical_url(&config.public_base_url, &key));
            println!("{}", links::deep_link_url(&config.deep_link_base, &key));
        }
    }

    Ok(())
}

async fn run_resolve(
    raw_key: &str,
    catalog_url: Option<String>,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let config = load_config_for_resolve(catalog_url.as_deref())?;
    let catalog_url = catalog_url.unwrap_or_else(|| config.catalog_url.clone());

    let client = CatalogClient::new(catalog_url, timeout_secs, &config.user_agent)?;
    let catalog = client.fetch().await?;

    let normalized_key = normalize(raw_key);
    let outcome = resolve(&normalized_key, &catalog);
    match outcome.pass() {
        Some(pass) => tracing::info!(
            key = %normalized_key,
            %pass,
            catalog_size = catalog.len(),
            "deal key matched"
        ),
        None => tracing::info!(
            key = %normalized_key,
            catalog_size = catalog.len(),
            "no match"
        ),
    }

    let payload = select(raw_key, outcome, true, &config);
    println!("{}", pretty_json(&payload.report)?);
    Ok(())
}

/// `resolve` only needs the public base URL for defaults, so an explicit
/// catalog URL lets it run without any server configuration.
fn load_config_for_resolve(catalog_url: Option<&str>) -> anyhow::Result<AppConfig> {
    let base = std::env::var("DEALINK_PUBLIC_BASE_URL").ok();
    let fallback_base = catalog_url.map(origin_of).transpose()?;

    let config = dealink_core::build_app_config(|key| {
        if key == "DEALINK_PUBLIC_BASE_URL" {
            return base
                .clone()
                .or_else(|| fallback_base.clone())
                .ok_or(std::env::VarError::NotPresent);
        }
        std::env::var(key)
    })?;
    Ok(config)
}

/// `https://host/path/x.json?v=2` → `https://host`.
fn origin_of(url: &str) -> anyhow::Result<String> {
    let parsed = reqwest::Url::parse(url).with_context(|| format!("invalid catalog URL: {url}"))?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        anyhow::bail!("catalog URL has no host: {url}");
    }
    Ok(origin.ascii_serialization())
}
