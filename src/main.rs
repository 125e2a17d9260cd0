mod access;
mod chain;
mod commands;
mod config;
mod db;
mod format;
mod models;
mod reads;
mod session;
mod validation;
mod writes;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::chain::evm::EvmTipJar;
use crate::config::{NetworkArgs, WalletArgs};
use crate::db::Journal;
use crate::session::Session;
use crate::validation::PRESET_AMOUNTS;

#[derive(Parser, Debug)]
#[command(name = "coffeechain")]
#[command(about = "Support creators with ETH tips on Coffee Chain", long_about = None)]
struct Cli {
    /// Local journal of submitted transactions
    #[arg(long, env = "COFFEECHAIN_DB", default_value = "coffeechain.db")]
    db_path: String,

    /// Print views as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Return once the transaction is accepted instead of waiting for inclusion
    #[arg(long, global = true)]
    no_wait: bool,

    #[command(flatten)]
    network: NetworkArgs,

    #[command(flatten)]
    wallet: WalletArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the connected wallet
    Wallet,
    /// Register the connected wallet as a creator
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        about: String,
    },
    /// Change the connected creator's username or bio
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        about: Option<String>,
    },
    /// Send a tip to a creator, by address or username
    Tip {
        creator: String,
        /// Name shown next to the tip
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        message: String,
        /// Custom amount in ETH; overrides --preset
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, default_value = PRESET_AMOUNTS[0], value_parser = PRESET_AMOUNTS)]
        preset: String,
    },
    /// Withdraw the connected creator's balance
    Withdraw,
    /// Show a creator page, by address or username
    Profile { creator: String },
    /// Stats and supports for the connected creator
    Dashboard {
        #[arg(long, default_value_t = 0)]
        page: u64,
    },
    /// Page through a creator's supports
    History {
        creator: String,
        #[arg(long, default_value_t = 0)]
        page: u64,
    },
    /// Settle and list transactions submitted from this machine
    Status {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

impl Commands {
    /// Read-only views never touch the local journal.
    fn needs_journal(&self) -> bool {
        matches!(
            self,
            Self::Register { .. }
                | Self::Update { .. }
                | Self::Tip { .. }
                | Self::Withdraw
                | Self::Status { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let wait = !cli.no_wait;

    let signer = cli.wallet.signer()?;
    let session = Session::new(
        signer.as_ref().map(|s| s.address()),
        cli.network.chain_id,
        cli.wallet.project_id.clone(),
    );
    let jar = EvmTipJar::connect(
        &cli.network.rpc_url,
        cli.network.contract,
        cli.network.price_feed,
        signer,
        cli.network.confirmations,
    )?;
    let journal = cli
        .command
        .needs_journal()
        .then(|| Journal::open(&cli.db_path))
        .transpose()?;
    let journal = || {
        journal
            .as_ref()
            .ok_or_else(|| anyhow!("ジャーナルが開かれていません: path={}", cli.db_path))
    };

    match cli.command {
        Commands::Wallet => commands::wallet::run(&jar, &session, cli.json).await,
        Commands::Register { name, about } => {
            commands::register::run(&jar, &session, journal()?, &name, &about, wait)
                .await
                .map(drop)
        }
        Commands::Update { name, about } => commands::update::run(
            &jar,
            &session,
            journal()?,
            name.as_deref(),
            about.as_deref(),
            wait,
        )
        .await
        .map(drop),
        Commands::Tip {
            creator,
            name,
            message,
            amount,
            preset,
        } => {
            let request = commands::tip::TipRequest {
                creator: &creator,
                supporter_name: &name,
                message: &message,
                custom_amount: amount.as_deref(),
                preset: &preset,
            };
            commands::tip::run(&jar, &session, journal()?, &request, wait)
                .await
                .map(drop)
        }
        Commands::Withdraw => commands::withdraw::run(&jar, &session, journal()?, wait)
            .await
            .map(drop),
        Commands::Profile { creator } => commands::profile::run(&jar, &creator, cli.json).await,
        Commands::Dashboard { page } => {
            commands::dashboard::run(&jar, &session, page, cli.json).await
        }
        Commands::History { creator, page } => {
            commands::history::run(&jar, &creator, page, cli.json).await
        }
        Commands::Status { limit } => {
            commands::status::run(&jar, journal()?, limit, cli.json).await
        }
    }
}
