//! CashFlow overdue-reminder sweeper binary entrypoint.

use std::time::Duration;

use cashflow_common::config::AppConfig;
use cashflow_common::redis_store::RedisStore;
use cashflow_ledger::invoices::InvoiceService;
use cashflow_notifier::email::ResendMailer;
use cashflow_notifier::service::NotificationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashflow_notifier=info,cashflow_ledger=info".into()),
        )
        .json()
        .init();

    tracing::info!("CashFlow notifier starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to the record store
    let store = RedisStore::connect(&config.redis_url).await?;

    // Email delivery requires Resend credentials
    let mailer = ResendMailer::from_config(&config)?;

    // Restore the sent-reminder history
    let mut service = NotificationService::new();
    service.load_history(&store).await;
    tracing::info!(
        known_sends = service.sent_count(),
        "Notification history loaded"
    );

    let period = Duration::from_secs(config.notifier_poll_interval_secs);
    tracing::info!(period_secs = config.notifier_poll_interval_secs, "Starting sweep loop");

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = run_sweep_loop(&mut service, &store, &mailer, period) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Sweep loop exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("CashFlow notifier stopped.");
    Ok(())
}

/// Periodically load the invoice collection and dispatch reminders for
/// overdue invoices that have not been notified yet.
async fn run_sweep_loop(
    service: &mut NotificationService,
    store: &RedisStore,
    mailer: &ResendMailer,
    period: Duration,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;

        let invoices = InvoiceService::list(store).await?;
        let sent = service.process_overdue(&invoices, store, mailer).await;
        if sent > 0 {
            tracing::info!(sent, "Overdue reminders dispatched");
        }
    }
}
