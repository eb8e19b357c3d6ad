use std::net::SocketAddr;
use tracing::info;
use bookshelf::catalog::controller::build_router;
use bookshelf::catalog::factory;
use bookshelf::core::controller::AppState;
use bookshelf::core::domain::Configuration;
use bookshelf::utils::logs::{setup_tracing, LogFormat};

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env();
    setup_tracing(&config, LogFormat::Json);

    // one catalog for the lifetime of the process, shared by every request
    let catalog = factory::create_catalog_service(&config).await?;
    info!("library started with {} books", catalog.list_books().await.len());

    let addr: SocketAddr = config.http_addr.parse()?;
    let app = build_router(AppState::new(config, catalog));

    info!("listening on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
