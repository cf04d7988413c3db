//! Profile viewer binary
//!
//! Shows the profile for the login given as the first argument, then one
//! profile per line read from stdin. An empty line returns to the placeholder.

use profile_viewer::{GithubClient, ProfileFetcher, ProfileView, ViewerConfig};
use request_lifecycle_core::subject::Subject;
use request_lifecycle_runtime::metrics::MetricsServer;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut metrics = config.metrics_addr.map(MetricsServer::new);
    if let Some(server) = metrics.as_mut() {
        server.start()?;
    }

    let client = GithubClient::from_config(&config)?;
    let initial = std::env::args().nth(1).and_then(|raw| Subject::parse(&raw));

    let mut view = ProfileView::mount(client, initial).await;
    show(&mut view, &config).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if view.submit(&line).await {
            show(&mut view, &config).await;
        }
    }

    let request = view.unmount();
    if let Err(error) = request.shutdown_default().await {
        tracing::warn!(error = %error, "Requests still running at exit");
    }

    Ok(())
}

/// Print the current presentation, and again once the request settles
async fn show<F: ProfileFetcher>(view: &mut ProfileView<F>, config: &ViewerConfig) {
    let before = view.present().await;
    println!("{}\n", before.render(config.format));

    // The HTTP client enforces the same timeout; allow a little slack
    let limit = config.timeout() + Duration::from_secs(1);
    if let Err(error) = view.settled(limit).await {
        tracing::warn!(error = %error, "Request did not settle");
        return;
    }

    let after = view.present().await;
    if after != before {
        println!("{}\n", after.render(config.format));
    }
}
