use std::sync::Arc;

use anyhow::Context;

use onboard_dash::config::DashboardConfig;
use onboard_dash::dashboard::controller::spawn_auto_refresh;
use onboard_dash::dashboard::{dashboard_routes, Dashboard};
use onboard_dash::feed::OnboardingFeed;
use onboard_dash::notify::Notifier;
use onboard_dash::service::{InMemoryOnboarding, OnboardingService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; keep the guard alive for the non-blocking file writer
    let _log_guard = init_tracing();

    let port: u16 = std::env::var("ONBOARD_DASH_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let config = DashboardConfig::from_env();

    eprintln!("📋 Onboard Dash v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Dashboard WS: ws://0.0.0.0:{}/ws", port);
    eprintln!("   Dashboard API: http://0.0.0.0:{}/api/dashboard", port);
    eprintln!("   Bulk onboard limit: {}", config.bulk_onboard_limit);
    match config.auto_refresh {
        Some(every) => eprintln!("   Auto refresh: every {}s\n", every.as_secs()),
        None => eprintln!("   Auto refresh: disabled\n"),
    }

    // The demo wires the in-memory backend; a real deployment injects its
    // own OnboardingService implementation here.
    let service: Arc<dyn OnboardingService> = Arc::new(InMemoryOnboarding::seeded());
    let feed = OnboardingFeed::new(Arc::clone(&service), config.feed_capacity);
    let notifier = Notifier::new(config.toast_capacity);
    let dashboard = Dashboard::new(service, Arc::clone(&feed), notifier, config.clone());

    // First emission of the subscription
    dashboard.load().await;

    if let Some(every) = config.auto_refresh {
        let _refresh_handle = spawn_auto_refresh(Arc::clone(&dashboard), every);
    }

    let app = dashboard_routes(dashboard, feed);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .context("Failed to bind dashboard server port")?;
    tracing::info!(port, "Dashboard server started");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Ok(dir) = std::env::var("ONBOARD_DASH_LOG_DIR") {
        let appender = tracing_appender::rolling::daily(dir, "onboard-dash.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        None
    }
}
