//! Kitchen CLI
//!
//! Command-line client for the Kitchen cooking game, playing against a
//! local file-backed ledger.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kitchen_app::menu::{difficulty_stars, label_items, short_address};
use kitchen_app::{AppConfig, KitchenController};
use kitchen_core::{OrderId, OrderStatus};
use kitchen_ledger::{FileLedger, LocalWallet, WalletSigner};
use kitchen_orders::OrderStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(version)]
#[command(about = "Kitchen - collaborative cooking game orders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "kitchen.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all orders, newest first
    List,

    /// Create a new order as head chef
    Create {
        /// Difficulty, 1 to 3
        #[arg(short, long, default_value = "1")]
        difficulty: u8,

        /// Quantities for burger, pizza, sushi, ice cream
        #[arg(short, long, value_delimiter = ',', default_value = "0,0,0,0")]
        items: Vec<i64>,
    },

    /// Mark one of your orders completed
    Complete {
        /// Order id
        id: String,
    },

    /// Mark one of your orders failed
    Fail {
        /// Order id
        id: String,
    },

    /// Sign and reveal the ingredients of an order
    Reveal {
        /// Order id
        id: String,
    },

    /// Order statistics
    Stats,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate a new wallet key
    Keygen {
        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool, config: &AppConfig) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false),
            )
            .init();
    }
}

fn expand_path(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

fn load_wallet(config: &AppConfig) -> anyhow::Result<Option<LocalWallet>> {
    let key_path = expand_path(&config.wallet.key_path);
    if !key_path.exists() {
        return Ok(None);
    }
    let seed = std::fs::read_to_string(&key_path)
        .with_context(|| format!("reading wallet key {:?}", key_path))?;
    Ok(Some(LocalWallet::from_hex(&seed, config.ledger.chain_id)?))
}

fn format_time(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn status_badge(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "⏳ pending",
        OrderStatus::Completed => "✅ completed",
        OrderStatus::Failed => "❌ failed",
    }
}

fn print_orders(controller: &KitchenController) {
    let orders = &controller.state().orders;
    if orders.is_empty() {
        println!("No orders yet. Create the first one with `kitchen create`.");
        return;
    }

    for order in orders {
        let mine = if controller.is_chef(&order.chef) { " (you)" } else { "" };
        println!(
            "{}  {}  chef {}{}  {}  {}",
            order.id,
            format_time(order.created_at),
            short_address(&order.chef),
            mine,
            difficulty_stars(order.difficulty),
            status_badge(order.status)
        );
    }
}

fn print_toast(controller: &KitchenController) {
    let toast = &controller.state().transaction;
    if toast.visible {
        println!("{}", toast.message);
    }
}

async fn open_controller(config: &AppConfig) -> anyhow::Result<KitchenController> {
    let ledger_path = expand_path(&config.ledger.snapshot_path);
    let ledger = Arc::new(FileLedger::open(&ledger_path, &config.ledger.contract_address)?);
    tracing::debug!("Using ledger snapshot {:?}", ledger.path());

    let store = OrderStore::new(ledger.clone()).with_config(config.sync.clone());
    let mut controller = KitchenController::new(store, config.ui.clone(), config.reveal.clone());

    if let Some(wallet) = load_wallet(config)? {
        controller.connect_wallet(Arc::new(wallet), ledger);
    }

    controller.init().await;
    Ok(controller)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(Some(&expand_path(&cli.config)))?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Init { force } => {
            let config_path = expand_path(&cli.config);
            if config_path.exists() && !force {
                anyhow::bail!("{:?} already exists (use --force to replace it)", config_path);
            }
            std::fs::write(&config_path, toml::to_string_pretty(&AppConfig::default())?)?;
            println!("Configuration written to {:?}", config_path);
        }

        Commands::Keygen { force } => {
            let key_path = expand_path(&config.wallet.key_path);
            if key_path.exists() && !force {
                anyhow::bail!("{:?} already exists (use --force to replace it)", key_path);
            }
            if let Some(parent) = key_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let wallet = LocalWallet::random(config.ledger.chain_id);
            std::fs::write(&key_path, wallet.seed_hex())?;

            println!("Wallet key written to {:?}", key_path);
            println!("Address: {}", wallet.address());
        }

        Commands::List => {
            let controller = open_controller(&config).await?;
            print_orders(&controller);
        }

        Commands::Create { difficulty, items } => {
            let mut controller = open_controller(&config).await?;
            controller.open_order_modal();
            controller.set_draft_difficulty(difficulty)?;
            for (slot, quantity) in items.into_iter().enumerate() {
                controller.set_draft_item(slot, quantity)?;
            }

            let result = controller.submit_order().await;
            print_toast(&controller);
            let order = result?;
            println!("Order id: {}", order.id);
        }

        Commands::Complete { id } => {
            let mut controller = open_controller(&config).await?;
            let result = controller.complete_order(&OrderId::new(id)).await;
            print_toast(&controller);
            result?;
        }

        Commands::Fail { id } => {
            let mut controller = open_controller(&config).await?;
            let result = controller.fail_order(&OrderId::new(id)).await;
            print_toast(&controller);
            result?;
        }

        Commands::Reveal { id } => {
            let mut controller = open_controller(&config).await?;
            controller.select_order(&OrderId::new(id))?;

            println!("Check your wallet to sign the reveal request...");
            if let Some(items) = controller.toggle_reveal().await? {
                for (food, quantity) in label_items(&items) {
                    println!("  {} {:<10} x{}", food.emoji, food.name, quantity);
                }
            }
        }

        Commands::Stats => {
            let controller = open_controller(&config).await?;
            let stats = controller.stats();

            println!("Total orders: {}", stats.total);
            for status in [OrderStatus::Completed, OrderStatus::Failed, OrderStatus::Pending] {
                let count = match status {
                    OrderStatus::Pending => stats.pending,
                    OrderStatus::Completed => stats.completed,
                    OrderStatus::Failed => stats.failed,
                };
                println!(
                    "  {:<12} {:>4}  ({:.0}%)",
                    status_badge(status),
                    count,
                    stats.percent(status)
                );
            }
        }
    }

    Ok(())
}
