pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
pub use config::Config;
use db::Store;
use models::{JutsuDraft, JutsuFilter, MAX_PAGE_SIZE};
use services::{CatalogService, ImageService, SeaOrmCatalogService};
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "jutsudex")?
            .extra_field("env", "production")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" | "-d" | "--daemon" => run_server(config, prometheus_handle).await,

        "list" | "ls" | "l" => {
            let search = (args.len() > 2).then(|| args[2..].join(" "));
            cmd_list(&config, search).await
        }

        "add" | "a" => {
            if args.len() < 4 {
                println!("Usage: jutsudex add <name> <description> [element] [category] [rank]");
                println!("Example: jutsudex add \"Rasengan\" \"A spinning sphere of chakra.\" wind offensive A");
                return Ok(());
            }
            cmd_add(
                &config,
                &args[2],
                &args[3],
                args.get(4).map(String::as_str),
                args.get(5).map(String::as_str),
                args.get(6).map(String::as_str),
            )
            .await
        }

        "remove" | "rm" | "r" => {
            if args.len() < 3 {
                println!("Usage: jutsudex remove <jutsu_id>");
                println!("Use 'jutsudex list' to see IDs");
                return Ok(());
            }
            let id_str = &args[2];
            cmd_remove(&config, id_str).await
        }

        "stats" => cmd_stats(&config).await,

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Jutsudex - Jutsu Catalog Server");
    println!("A self-hosted catalog of ninja techniques");
    println!();
    println!("USAGE:");
    println!("  jutsudex <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the web server (UI + REST API)");
    println!("  list [query]      List catalog entries, optionally filtered");
    println!("  add <name> <description> [element] [category] [rank]");
    println!("                    Add a jutsu to the catalog");
    println!("  remove, rm <id>   Remove a jutsu from the catalog");
    println!("  stats             Show catalog statistics");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  jutsudex add \"Chidori\" \"A blade of lightning chakra.\" lightning offensive A");
    println!("  jutsudex list chidori             # Search by name or description");
    println!("  jutsudex stats                    # Counts per element/category/rank");
    println!("  jutsudex serve                    # Start the web server");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure database, server port, etc.");
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Jutsudex v{} starting in server mode...",
        env!("CARGO_PKG_VERSION")
    );

    let shared = Arc::new(SharedState::new(config.clone()).await?);
    let api_state = api::create_app_state(shared, prometheus_handle).await?;

    let port = config.server.port;
    let app = api::router(api_state).await;
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Web Server running at http://0.0.0.0:{}", port);
    info!("Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_list(config: &Config, search: Option<String>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let filter = JutsuFilter {
        search,
        page_size: MAX_PAGE_SIZE,
        ..JutsuFilter::default()
    };
    let page = store.list_jutsus(&filter).await?;

    if page.items.is_empty() {
        println!("No jutsus in the catalog.");
        println!();
        println!("Add one with: jutsudex add <name> <description>");
        return Ok(());
    }

    println!("Catalog ({} total)", page.total);
    println!("{:-<70}", "");

    for jutsu in &page.items {
        println!(
            "• {} [{}] — {} / {}",
            jutsu.name,
            jutsu.rank.as_tag(),
            jutsu.element.label(),
            jutsu.category.label()
        );
        println!("  ID: {} | Added: {}", jutsu.id, jutsu.created_at);
    }

    if page.total > page.items.len() as u64 {
        println!();
        println!(
            "... and {} more (showing first {})",
            page.total - page.items.len() as u64,
            page.items.len()
        );
    }

    Ok(())
}

async fn cmd_add(
    config: &Config,
    name: &str,
    description: &str,
    element: Option<&str>,
    category: Option<&str>,
    rank: Option<&str>,
) -> anyhow::Result<()> {
    use models::{Category, Element, Rank};

    let element = match element {
        Some(tag) => Element::from_tag(tag)
            .ok_or_else(|| anyhow::anyhow!("Unknown element '{tag}'"))?,
        None => Element::default(),
    };
    let category = match category {
        Some(tag) => Category::from_tag(tag)
            .ok_or_else(|| anyhow::anyhow!("Unknown category '{tag}'"))?,
        None => Category::default(),
    };
    let rank = match rank {
        Some(tag) => {
            Rank::from_tag(tag).ok_or_else(|| anyhow::anyhow!("Unknown rank '{tag}'"))?
        }
        None => Rank::default(),
    };

    let store = Store::new(&config.general.database_path).await?;
    let images = Arc::new(ImageService::new(config.general.images_path.clone()));
    let catalog = SeaOrmCatalogService::new(store, images);

    let jutsu = catalog
        .create(JutsuDraft {
            name: name.to_string(),
            description: description.to_string(),
            element,
            category,
            rank,
            image_url: None,
        })
        .await?;

    println!("✓ Added: {} (ID: {})", jutsu.name, jutsu.id);
    println!("  Element:  {}", jutsu.element.label());
    println!("  Category: {}", jutsu.category.label());
    println!("  Rank:     {}", jutsu.rank.label());

    Ok(())
}

async fn cmd_remove(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let id: i32 = match id_str.parse() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid jutsu ID: {}", id_str);
            println!("Use 'jutsudex list' to see jutsu IDs.");
            return Ok(());
        }
    };

    if let Some(jutsu) = store.get_jutsu(id).await? {
        println!("Remove '{}' (ID: {}) from the catalog?", jutsu.name, jutsu.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim().eq_ignore_ascii_case("y") {
            let images = Arc::new(ImageService::new(config.general.images_path.clone()));
            let catalog = SeaOrmCatalogService::new(store, images);
            catalog.delete(id).await?;
            println!("✓ Removed: {}", jutsu.name);
        } else {
            println!("Cancelled.");
        }
    } else {
        println!("Jutsu with ID {} not found in the catalog.", id);
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let total = store.total_jutsus().await?;
    if total == 0 {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!("Catalog Statistics ({} jutsus)", total);
    println!("{:-<70}", "");

    println!("By element:");
    for (element, count) in store.count_by_element().await? {
        println!("  {:<12} {}", element.label(), count);
    }

    println!();
    println!("By category:");
    for (category, count) in store.count_by_category().await? {
        println!("  {:<14} {}", category.label(), count);
    }

    println!();
    println!("By rank:");
    for (rank, count) in store.count_by_rank().await? {
        println!("  {:<8} {}", rank.label(), count);
    }

    println!();
    println!("Recently added:");
    for jutsu in store.recently_created(5).await? {
        println!("  • {} ({})", jutsu.name, jutsu.created_at);
    }

    Ok(())
}
