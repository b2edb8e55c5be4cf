use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use banter_client::ClientConfig;
use banter_storage::FileStorage;
use banter_store::{AppState, IdleMonitor};
use banter_types::SessionSignal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=debug".into()),
        )
        .init();

    // Config
    let base_url =
        std::env::var("BANTER_API_URL").unwrap_or_else(|_| "http://localhost:8000/api".into());
    let request_timeout = env_secs("BANTER_REQUEST_TIMEOUT_SECS", 30)?;
    let retry_timeout = env_secs("BANTER_RETRY_TIMEOUT_SECS", 60)?;
    let idle_timeout = env_secs("BANTER_IDLE_TIMEOUT_SECS", 30)?;
    let storage_path = std::env::var("BANTER_STORAGE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| FileStorage::default_path());

    // Shared state
    let storage = Arc::new(FileStorage::open(&storage_path)?);
    let app = Arc::new(AppState::new(
        ClientConfig {
            base_url,
            request_timeout,
            retry_timeout,
        },
        storage,
    ));

    // Restore the persisted session, if the server still honors it
    match app.session.check_session().await {
        Some(user) => info!("signed in as {} <{}>", user.name, user.email),
        None => info!("no active session, sign-in required"),
    }

    // Inactivity monitor; released on every exit path when dropped
    let monitor = {
        let app = app.clone();
        IdleMonitor::start(idle_timeout, move || {
            app.signal(SessionSignal::IdleTimeout);
        })
    };

    let mut signals = app.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            signal = signals.recv() => match signal {
                Ok(SessionSignal::Expired) => {
                    warn!("session expired, sign-in required");
                }
                Ok(SessionSignal::IdleTimeout) => {
                    info!("inactive too long, signing out");
                    app.session.logout().await;
                }
                Err(_) => break,
            },
        }
    }

    drop(monitor);
    Ok(())
}

fn env_secs(name: &str, default: u64) -> anyhow::Result<Duration> {
    let secs = match std::env::var(name) {
        Ok(raw) => raw.parse()?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}
