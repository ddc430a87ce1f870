use anyhow::Context;

use shoplist_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shoplist_observability::init();

    let settings = Settings::load().context("failed to load settings")?;
    tracing::info!(db_path = %settings.db_path.display(), "opening database");

    let app = shoplist_api::app::build_app(&settings).await?;

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
