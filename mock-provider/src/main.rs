use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_provider::Interaction;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let interactions: Vec<Interaction> = match std::env::var("MOCK_PROVIDER_INTERACTIONS") {
        Ok(path) => serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?,
        Err(_) => Vec::new(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "1234".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, interactions = interactions.len(), "mock provider listening");
    mock_provider::run(listener, interactions).await?;
    Ok(())
}
