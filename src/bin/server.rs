use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

use followup::api::{self, ApiState};
use followup::app::App;
use followup::core::{Clock, Config, SystemClock};
use followup::features::activity::{category, ActivityLog};
use followup::features::mailer::Mailer;
use followup::features::reminders::ReminderScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting follow-up reminder service...");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let activity = ActivityLog::new(clock.clone());
    let mailer = build_mailer(&config, activity.clone()).await;
    let app = App::new(clock, activity, mailer);

    app.activity
        .append(category::SYSTEM, "service started")
        .await;

    // Start the reminder scheduler
    let scheduler = ReminderScheduler::new(&app);
    tokio::spawn(scheduler.clone().run());

    let listener = TcpListener::bind(&config.http_bind)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.http_bind))?;
    let addr = listener.local_addr().context("failed to get local addr")?;
    info!("HTTP API listening on http://{addr}/api");

    let router = api::router(ApiState { app, scheduler });
    if let Err(e) = axum::serve(listener, router).await {
        error!("HTTP server failed: {e}");
        return Err(anyhow::anyhow!("HTTP server failed: {}", e));
    }

    Ok(())
}

/// Select the mail dispatcher mode once for the life of the process.
async fn build_mailer(config: &Config, activity: ActivityLog) -> Mailer {
    match &config.smtp {
        #[cfg(feature = "smtp")]
        Some(settings) => {
            use followup::features::mailer::smtp::SmtpMailTransport;

            match SmtpMailTransport::connect(settings) {
                Ok(transport) => {
                    info!(
                        "SMTP credentials configured for {}:{}, verifying transport...",
                        settings.host, settings.port
                    );
                    // Falls back to simulated mode internally if
                    // verification fails
                    Mailer::live(Arc::new(transport), activity).await
                }
                Err(e) => {
                    error!("invalid SMTP settings: {e:#}, using simulated mail mode");
                    Mailer::simulated(activity)
                }
            }
        }
        #[cfg(not(feature = "smtp"))]
        Some(_) => {
            log::warn!("SMTP settings present but this build has no smtp feature, using simulated mail mode");
            Mailer::simulated(activity)
        }
        None => {
            info!("no SMTP credentials configured, mail dispatcher in simulated mode");
            Mailer::simulated(activity)
        }
    }
}
