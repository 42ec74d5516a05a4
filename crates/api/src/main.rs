use std::sync::Arc;

use anyhow::Context;

use vitrine_api::app::services::CatalogService;
use vitrine_infra::{InMemoryCatalogStore, LocalFileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vitrine_api::telemetry::init();

    let addr = std::env::var("VITRINE_ADDR").unwrap_or_else(|_| {
        tracing::info!("VITRINE_ADDR not set; using 0.0.0.0:8080");
        "0.0.0.0:8080".to_string()
    });
    let uploads_dir = std::env::var("VITRINE_UPLOADS_DIR").unwrap_or_else(|_| {
        tracing::info!("VITRINE_UPLOADS_DIR not set; using ./uploads");
        "./uploads".to_string()
    });

    let store = Arc::new(InMemoryCatalogStore::new());
    let files = Arc::new(LocalFileStore::new(&uploads_dir).context("preparing uploads dir")?);
    let service = Arc::new(CatalogService::new(store, files));

    if std::env::var("VITRINE_SEED_DEMO").is_ok() {
        let count = vitrine_api::seed::demo_catalog(&service).context("seeding demo catalog")?;
        tracing::info!(products = count, "seeded demo catalog");
    }

    let app = vitrine_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
