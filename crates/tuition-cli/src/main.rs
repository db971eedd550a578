use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tuition_application::{AuthUseCase, HistoryUseCase, PaymentFlow, PaymentFlowSettings};
use tuition_infrastructure::{ConfigService, MemorySessionStore};
use tuition_interaction::HttpBankingGateway;

mod commands;
mod logging;
mod presenter;
mod repl;

use presenter::ConsolePresenter;

#[derive(Parser)]
#[command(name = "tuition")]
#[command(about = "Tuition Pay - pay tuition debts with OTP confirmation", long_about = None)]
struct Cli {
    /// Backend base URL, overriding the config file and environment
    #[arg(long)]
    base_url: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config();
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }

    let _log_guard = logging::init(&config.log_level, cli.log_stderr)?;
    tracing::info!("[Main] Starting against {}", config.api_base_url);

    let gateway = Arc::new(HttpBankingGateway::from_config(&config)?);
    let sessions = Arc::new(MemorySessionStore::new());
    let presenter = Arc::new(ConsolePresenter::new());

    let flow = Arc::new(PaymentFlow::new(
        gateway.clone(),
        sessions.clone(),
        presenter.clone(),
        PaymentFlowSettings::from_config(&config),
    ));
    let auth = AuthUseCase::new(gateway.clone(), sessions.clone()).with_payment_flow(flow.clone());
    let history = HistoryUseCase::new(gateway, sessions);

    repl::run(repl::App {
        auth,
        flow,
        history,
        presenter,
        base_url: config.api_base_url.clone(),
    })
    .await
}
