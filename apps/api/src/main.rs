use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yoga_asana_api::{app::Application, Config, Result};

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "yoga_asana_api=info,actix_web=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[actix_web::main]
async fn main() -> Result<()> {
    // `.env` first so RUST_LOG set there applies to the subscriber
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::load()?;
    info!(
        "Starting yoga-asana-api v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );
    tracing::debug!(?config, "Resolved configuration");

    Application::new(&config).run().await
}
