//! licverify: operator console for license verification requests.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use licverify_api::{BackendApi, BackendClient};
use licverify_chain::{detect_wallet, ChainClient};
use licverify_console::{
    Action, ActionOutcome, ApprovalView, LicenseListView, NotificationListView,
};
use licverify_types::RequestId;
use licverify_utils::LogFormat;

use crate::config::ConsoleConfig;

#[derive(Parser)]
#[command(name = "licverify", about = "Review and record license verification requests")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "LICVERIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the verification backend.
    #[arg(long, env = "LICVERIFY_BACKEND_URL")]
    backend_url: Option<String>,

    /// Backend request timeout in seconds.
    #[arg(long, env = "LICVERIFY_REQUEST_TIMEOUT")]
    timeout: Option<u64>,

    /// Wallet JSON-RPC endpoint (e.g. a desktop wallet or a dev node).
    #[arg(long, env = "LICVERIFY_WALLET_RPC_URL")]
    wallet_rpc_url: Option<String>,

    /// Sign locally with this hex private key instead of the wallet.
    #[arg(long, env = "LICVERIFY_WALLET_PRIVATE_KEY", hide_env_values = true)]
    wallet_private_key: Option<String>,

    /// Address of the verification contract.
    #[arg(long, env = "LICVERIFY_CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LICVERIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "LICVERIFY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List notifications, newest first.
    Notifications,
    /// List stored driver's licenses.
    Licenses,
    /// Mark a notification as read.
    MarkRead { id: String },
    /// Approve a verification request.
    Approve { id: String },
    /// Decline a verification request.
    Decline { id: String },
    /// Record the verification on chain through the wallet.
    Record { id: String },
    /// Show the on-chain verification record.
    ChainStatus { id: String },
}

impl Cli {
    /// Merge flags over the file configuration.
    fn resolve_config(&self) -> anyhow::Result<ConsoleConfig> {
        let mut config = match &self.config {
            Some(path) => ConsoleConfig::from_toml_file(path)?,
            None => ConsoleConfig::default(),
        };
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
        if let Some(url) = &self.wallet_rpc_url {
            config.wallet_rpc_url = Some(url.clone());
        }
        if let Some(key) = &self.wallet_private_key {
            config.wallet_private_key = Some(key.clone());
        }
        if let Some(address) = &self.contract_address {
            config.contract_address = address.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

fn exit_code(outcome: &ActionOutcome) -> ExitCode {
    match outcome {
        ActionOutcome::Success(_) => ExitCode::SUCCESS,
        ActionOutcome::Error(_) | ActionOutcome::Busy => ExitCode::FAILURE,
    }
}

/// Navigate from the notification list to the approval view and run one action.
async fn review(
    config: &ConsoleConfig,
    backend: Arc<dyn BackendApi>,
    id: String,
    action: Action,
) -> anyhow::Result<ExitCode> {
    let id = RequestId::from(id);

    let list = NotificationListView::new();
    list.load(backend.as_ref()).await;
    if let Some(error) = list.error() {
        return Err(anyhow!("{error}"));
    }
    let notification = list
        .open(&id)
        .ok_or_else(|| anyhow!("notification {id} not found"))?;

    let wallet = detect_wallet(
        config.wallet_rpc_url.as_deref(),
        config.wallet_private_key.as_deref(),
    )?;
    let chain = Arc::new(ChainClient::new(wallet, config.contract()?, backend.clone()));
    tracing::info!(
        request_id = %id,
        ?action,
        contract = %chain.contract_address(),
        wallet = chain.is_wallet_available(),
        "opening approval view"
    );
    let view = ApprovalView::open(notification, backend, chain).await;

    let outcome = match action {
        Action::Accept => view.accept().await,
        Action::Decline => view.decline().await,
        Action::RecordOnChain => view.record_on_chain().await,
        Action::CheckStatus => view.check_status().await,
    };
    print!("{}", view.render());
    Ok(exit_code(&outcome))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    licverify_utils::init_logging(config.log_format, &config.log_level);

    let backend: Arc<dyn BackendApi> = Arc::new(
        BackendClient::new(config.backend_url.clone(), config.request_timeout())
            .context("failed to set up backend client")?,
    );
    tracing::debug!(backend = %config.backend_url, "backend client ready");

    match cli.command {
        Command::Notifications => {
            let view = NotificationListView::new();
            view.load(backend.as_ref()).await;
            print!("{}", view.render());
            Ok(if view.error().is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Licenses => {
            let view = LicenseListView::new();
            view.load(backend.as_ref()).await;
            print!("{}", view.render());
            Ok(if view.error().is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::MarkRead { id } => {
            let id = RequestId::from(id);
            let view = NotificationListView::new();
            view.mark_read(backend.as_ref(), &id).await?;
            println!("Notification {id} marked as read.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Approve { id } => review(&config, backend, id, Action::Accept).await,
        Command::Decline { id } => review(&config, backend, id, Action::Decline).await,
        Command::Record { id } => review(&config, backend, id, Action::RecordOnChain).await,
        Command::ChainStatus { id } => review(&config, backend, id, Action::CheckStatus).await,
    }
}
