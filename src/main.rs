//! Folio server binary.
//!
//! Wires configuration, storage selection, and the HTTP router together,
//! then serves until interrupted.

use clap::Parser;

use folio::config::Config;
use folio::http::{self, AppState};
use folio::{storage, APP_NAME, APP_VERSION, HTTP_BIND_ADDRESS_DEFAULT};

/// Portfolio site backend API
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Portfolio site backend - projects, testimonials, contact submissions")]
#[command(version)]
struct Cli {
    /// HTTP bind address
    #[arg(short, long, default_value = HTTP_BIND_ADDRESS_DEFAULT)]
    bind: String,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,tower_http=debug",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("{} v{}", APP_NAME, APP_VERSION);

    let config = Config::from_env(cli.bind);
    let storage = storage::connect(config.database_url.as_deref()).await?;

    let app = http::router(AppState::new(storage));

    let addr: std::net::SocketAddr = config.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(http::shutdown_signal())
        .await?;

    Ok(())
}
