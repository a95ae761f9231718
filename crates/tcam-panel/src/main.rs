//! Service entrypoint.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HTTP control panel for thermal sensor core registers.
#[derive(Parser, Debug)]
#[command(name = "tcam-panel", version, about)]
struct Args {
    /// Address to bind the HTTP listener on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: std::net::SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tcam_panel=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("control panel listening on {}", args.listen);
    axum::serve(listener, tcam_panel::router()).await?;
    Ok(())
}
