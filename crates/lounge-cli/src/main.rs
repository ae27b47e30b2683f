// ============================================================================
// lounge - terminal driver for the member lounge page
// ============================================================================
// Usage:
//   lounge render [--query "denied=true"]   Render the home page, no wallet
//   lounge status [--query ...]             Connect wallet, check membership, render
//   lounge enter [--open]                   Connect wallet and enter the lounge
//
// Global: --format text|html|json selects how the page is printed.
// Configuration comes from LOUNGE_* environment variables (a .env file is
// loaded first); --wallet-rpc and --site-url override them.
// ============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lounge_core::{
    AccessApiClient, Erc1155BalanceReader, HomeQuery, HomeView, InjectedWallet, LoungeConfig,
    Notice, PageController,
};
use std::sync::Arc;
use tracing::{info, warn};

mod navigator;

use navigator::BrowserNavigator;

/// Member lounge page driver
#[derive(Parser)]
#[command(name = "lounge", version, about = "Connect a wallet and enter the NFT-gated member lounge")]
struct Cli {
    /// Wallet provider JSON-RPC URL (overrides LOUNGE_WALLET_RPC_URL)
    #[arg(long, global = true)]
    wallet_rpc: Option<String>,

    /// Site base URL serving /api/request_access and /lounge (overrides LOUNGE_SITE_URL)
    #[arg(long, global = true)]
    site_url: Option<String>,

    /// Output format for rendered pages
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the home page without connecting a wallet
    Render {
        /// Home route query string, e.g. "denied=true"
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Connect the wallet, check membership and render the home page
    Status {
        /// Home route query string, e.g. "denied=true"
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Connect the wallet and attempt to enter the private lounge
    Enter {
        /// Open the lounge URL in the default browser
        #[arg(long)]
        open: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
    Json,
}

fn init_logging() {
    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("lounge=debug".parse().expect("static directive"))
        .add_directive("lounge_core=debug".parse().expect("static directive"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<LoungeConfig> {
    let mut config = LoungeConfig::from_env().context("Invalid lounge configuration")?;
    if let Some(url) = &cli.wallet_rpc {
        config.wallet_rpc_url = url.clone();
    }
    if let Some(url) = &cli.site_url {
        config.site_url = url.clone();
    }
    config.validate().context("Invalid lounge configuration")?;
    Ok(config)
}

fn build_page(config: LoungeConfig, open_browser: bool) -> Result<PageController> {
    let site = config.site_base()?;

    let wallet = Arc::new(InjectedWallet::new(&config.wallet_rpc_url, config.chain_id));
    let balances = Arc::new(Erc1155BalanceReader::new(&config.node_rpc_url));
    let nonces = Arc::new(AccessApiClient::new(&site)?);
    let navigator = Arc::new(BrowserNavigator::new(site, open_browser));

    Ok(PageController::new(config, wallet, balances, nonces, navigator))
}

fn print_view(view: &HomeView, format: Format) -> Result<()> {
    match format {
        Format::Text => print!("{}", view),
        Format::Html => print!("{}", view.to_html()),
        Format::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }
    Ok(())
}

fn notice_line(notice: &Notice) -> String {
    format!(
        "[{}] {:?}: {}",
        notice.raised_at.format("%H:%M:%S"),
        notice.kind,
        notice.message
    )
}

fn report_notices(page: &PageController) {
    for notice in page.notices() {
        warn!("{}", notice_line(notice));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::Render { query } => cmd_render(config, &query, format),
        Commands::Status { query } => cmd_status(config, &query, format).await,
        Commands::Enter { open } => cmd_enter(config, open, format).await,
    }
}

fn cmd_render(config: LoungeConfig, query: &str, format: Format) -> Result<()> {
    let page = build_page(config, false)?;
    print_view(&page.view(&HomeQuery::parse(query)), format)
}

async fn cmd_status(config: LoungeConfig, query: &str, format: Format) -> Result<()> {
    let mut page = build_page(config, false)?;

    // Connection failures are shown on the page as a notice
    if let Err(e) = page.connect().await {
        warn!("Continuing without wallet: {}", e);
    }
    report_notices(&page);

    if let Some(session) = page.session() {
        info!(
            "{} membership: {}",
            session.address,
            page.membership_status().display_name()
        );
    }

    print_view(&page.view(&HomeQuery::parse(query)), format)
}

async fn cmd_enter(config: LoungeConfig, open_browser: bool, format: Format) -> Result<()> {
    let mut page = build_page(config, open_browser)?;

    if let Err(e) = page.connect().await {
        report_notices(&page);
        print_view(&page.view(&HomeQuery::default()), format)?;
        anyhow::bail!("Wallet connection failed: {}", e);
    }

    match page.enter_lounge().await {
        Ok(target) => {
            println!("Lounge entry signed. Target: {}", target);
            Ok(())
        }
        Err(e) => {
            report_notices(&page);
            print_view(&page.view(&HomeQuery::default()), format)?;
            anyhow::bail!("Lounge entry failed: {}", e);
        }
    }
}
