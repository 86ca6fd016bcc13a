//! Meeting join worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meetbot_browser::MeetBrowser;
use meetbot_queue::JobQueue;
use meetbot_store::FirestoreMeetingStore;
use meetbot_worker::{Worker, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("meetbot=info".parse().unwrap())
        .add_directive("chromiumoxide=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting meetbot-worker");

    // Load configuration
    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    // Create queue client and verify connectivity
    let queue = match JobQueue::from_env() {
        Ok(q) => q,
        Err(e) => {
            error!("Failed to create job queue: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = queue.ping().await {
        error!("Failed to reach Redis: {}", e);
        std::process::exit(1);
    }

    // Create status store
    let store = match FirestoreMeetingStore::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create status store: {}", e);
            std::process::exit(1);
        }
    };

    // Browser session is created lazily by the first job
    let browser = MeetBrowser::new(config.session.clone(), config.join.clone());

    let mut worker = Worker::new(config, queue, store, browser);

    // Signal handlers request cooperative shutdown
    let shutdown = worker.shutdown_handle();
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("Received shutdown signal");
        shutdown.signal();
    });

    worker.run().await;

    info!("Worker shutdown complete");
}

/// Resolve on SIGINT or SIGTERM.
async fn wait_for_termination() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
