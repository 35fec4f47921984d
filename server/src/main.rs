use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = format!("127.0.0.1:{}", todo_server::config::port());
    let listener = TcpListener::bind(&addr).await?;
    info!("todo API listening on http://{addr}");
    info!("health check at http://{addr}/api/health");
    todo_server::run(listener).await
}
