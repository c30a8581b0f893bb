use geoquery_server::config::Config;
use geoquery_server::db::connect_postgis;
use geoquery_server::server::{AppState, build_app};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize Prometheus metrics recorder (must be done before any metrics are recorded)
    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoquery=debug,geoquery_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    config.validate()?;
    info!(
        "Loaded configuration: host={}, port={}, reference_table={}, error_detail={:?}",
        config.host, config.port, config.database.reference_table, config.error_detail
    );

    // Exhausting the connection budget ends the process with a non-zero status
    let store = connect_postgis(&config.database).await?;

    let app_state = AppState::new(Arc::new(store))
        .with_error_detail(config.error_detail)
        .with_prometheus(prometheus_handle);

    let app = build_app(app_state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("geoquery server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
