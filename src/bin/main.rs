use tallybot::bot::transport::{OperatorId, TelegramApi};
use tallybot::bot::{Handler, run};
use tallybot::config::Config;
use tallybot::reconcile::Reconciler;
use tallybot::store::GithubStore;
use tallybot::telemetry;

#[tokio::main]
async fn main() {
    telemetry::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_bot(&config).await {
        tracing::error!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run_bot(config: &Config) -> tallybot::Result<()> {
    tracing::info!(
        repo = %config.repo,
        path = %config.data_path,
        admins = config.admin_ids.len(),
        "starting"
    );
    if config.admin_ids.is_empty() {
        tracing::warn!("operator allow-list is empty; every message will be ignored");
    }
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is DISABLED for the store client");
    }

    let store = GithubStore::new(
        config.repo.clone(),
        config.github_token.clone(),
        config.http_timeout,
        config.accept_invalid_certs,
    )?;
    let reconciler = Reconciler::new(store, config.data_path.clone(), config.max_retries);
    let admins = config.admin_ids.iter().copied().map(OperatorId).collect();
    let handler = Handler::new(reconciler, admins);

    let api = TelegramApi::new(&config.bot_token, config.poll_timeout, config.http_timeout)?;

    tokio::select! {
        _ = run::run(&api, &handler) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }
    Ok(())
}
