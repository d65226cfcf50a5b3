mod fetch;
mod purchases;
mod resource_client;
mod stores;

use client::Request;
use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client
        .request_empty(&Request::get("/health_check"))
        .await?;

    Ok(())
}
