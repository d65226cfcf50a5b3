use std::net::TcpListener;
use std::time::Duration;

use client::{APIClient, ClientConfig, ClientError, Request};
use payloads::{CategoryId, Product, ProductId};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{assert_status_code, milk_draft, spawn_app};

#[tokio::test]
async fn create_read_update_delete_product() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();

    let milk = app.create_milk().await?;
    assert_eq!(milk.product_id, ProductId(1));
    assert_eq!(milk.price, dec!(2.5));
    assert_eq!(milk.category.as_ref().map(|c| c.category.as_str()), Some("Dairy"));

    let fetched = app.client.get_product(milk.product_id).await?;
    assert_eq!(fetched, milk);

    // saving with an id updates in place
    let mut draft = payloads::ProductDraft::from(milk.clone());
    draft.price = dec!(2.75);
    draft.stock = 38;
    let updated = app.client.save_product(&draft).await?;
    assert_eq!(updated.product_id, milk.product_id);
    assert_eq!(updated.price, dec!(2.75));
    assert_eq!(app.client.list_products().await?.len(), 1);

    app.client.delete_product(milk.product_id).await?;
    let result = app.client.get_product(milk.product_id).await;
    assert_eq!(result.unwrap_err().to_string(), "Product 1 not found");

    Ok(())
}

#[tokio::test]
async fn products_by_category() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    app.create_milk().await?;
    app.create_bread().await?;

    let dairy = app.client.list_products_by_category(CategoryId(1)).await?;
    assert_eq!(dairy.len(), 1);
    assert_eq!(dairy[0].name, "Milk");

    let result = app.client.list_products_by_category(CategoryId(9)).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn invalid_product_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let mut draft = payloads::ProductDraft::new("  ", dec!(1), 1);
    let result = app.client.save_product(&draft).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    draft.name = "Eggs".into();
    draft.price = dec!(-1);
    match app.client.save_product(&draft).await {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Price cannot be negative");
        }
        _ => panic!("Expected APIError"),
    }

    Ok(())
}

#[tokio::test]
async fn stubbed_product_list_is_returned_unchanged() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.stub(
        "/products/all",
        200,
        r#"[{"productId":1,"name":"Milk","price":2.5,"stock":10,"active":true}]"#,
    );

    let products = app.client.list_products().await?;
    assert_eq!(
        products,
        vec![Product {
            product_id: ProductId(1),
            name: "Milk".into(),
            category_id: None,
            barcode: None,
            price: dec!(2.5),
            stock: 10,
            active: true,
            category: None,
        }]
    );

    Ok(())
}

#[tokio::test]
async fn server_message_becomes_the_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.stub("/products/all", 404, r#"{"message":"not found"}"#);

    let err = app.client.list_products().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "not found");

    // no message in the body
    app.stub("/products/all", 500, "<html>oops</html>");
    let err = app.client.list_products().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");

    Ok(())
}

#[tokio::test]
async fn malformed_success_body() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.stub("/products/all", 200, "not json");
    let result = app.client.list_products().await;
    assert!(matches!(result, Err(ClientError::MalformedResponse(_))));

    app.stub("/products/all", 200, "");
    let result = app.client.list_products().await;
    assert!(matches!(result, Err(ClientError::MalformedResponse(_))));

    Ok(())
}

#[tokio::test]
async fn network_failure() -> anyhow::Result<()> {
    // nothing listens on a port we just released
    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let client =
        APIClient::new(ClientConfig::new(format!("http://127.0.0.1:{port}/api")));

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.to_string(), "Network error. Please check your connection.");

    Ok(())
}

#[tokio::test]
async fn slow_response_times_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_millis(500));
    let client =
        app.client_with(|config| config.with_timeout(Some(Duration::from_millis(100))));

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)));
    assert_eq!(err.to_string(), "The server took longer than 100 ms to respond.");

    // without a timeout the same request completes
    let patient = app.client_with(|config| config.with_timeout(None));
    assert!(patient.list_products().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn cancelled_request_resolves_immediately() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_secs(5));
    let cancel = client::CancellationToken::new();

    let request = Request::get("/products/all");
    let (result, _) = tokio::join!(
        app.client.request_with_cancel::<Vec<Product>>(&request, &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        }
    );
    assert!(matches!(result, Err(ClientError::Cancelled)));

    // an already cancelled token never reaches the server
    let request = Request::get("/products/1");
    let result = app
        .client
        .request_with_cancel::<Vec<Product>>(&request, &cancel)
        .await;
    assert!(result.unwrap_err().is_cancelled());
    assert!(app.requests_to("/products/1").is_empty());

    Ok(())
}

#[tokio::test]
async fn query_params_are_encoded_on_the_wire() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let request = Request::get("/products/all")
        .param("active", true)
        .param("q", "pan & leche")
        .param("page", 2);
    let products: Vec<Product> = app.client.request(&request).await?;
    assert!(products.is_empty());

    let recorded = app.requests_to("/products/all");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "GET");
    assert_eq!(recorded[0].query, "active=true&page=2&q=pan+%26+leche");

    Ok(())
}

#[tokio::test]
async fn json_body_and_content_type_are_sent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();

    app.client.save_product(&milk_draft()).await?;

    let recorded = app.requests_to("/products/save");
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(recorded[0].header("content-type"), Some("application/json"));

    Ok(())
}

#[tokio::test]
async fn caller_headers_override_defaults() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(|config| config.with_header("X-Store", "north"));

    client.list_products().await?;
    let request = Request::get("/products/all")
        .header("x-store", "south")
        .header("Content-Type", "text/plain");
    client.request::<Vec<Product>>(&request).await?;

    let recorded = app.requests_to("/products/all");
    assert_eq!(recorded[0].header("x-store"), Some("north"));
    assert_eq!(recorded[1].header("x-store"), Some("south"));
    assert_eq!(recorded[1].header("content-type"), Some("text/plain"));

    Ok(())
}

#[tokio::test]
async fn session_cookie_is_kept_across_requests() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.list_products().await?;
    app.open_session(&app.client).await?;
    app.client.list_products().await?;

    let recorded = app.requests_to("/products/all");
    assert_eq!(recorded[0].header("cookie"), None);
    let cookie = recorded[1].header("cookie").unwrap_or_default();
    assert!(cookie.contains("market_session=mock-session"), "{cookie}");

    Ok(())
}

#[tokio::test]
async fn dashboard_summary_counts_both_collections() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;
    app.create_bread().await?;
    app.create_purchase_of(&milk).await?;

    let summary = app.client.dashboard_summary().await?;
    assert_eq!(summary.product_count, 2);
    assert_eq!(summary.purchase_count, 1);

    app.stub("/purchases/all", 503, r#"{"message":"maintenance"}"#);
    let err = app.client.dashboard_summary().await.unwrap_err();
    assert_eq!(err.to_string(), "maintenance");

    Ok(())
}

#[tokio::test]
async fn cancelled_dashboard_summary_stops_both_lists() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_secs(5));
    app.set_delay("/purchases/all", Duration::from_secs(5));
    let cancel = client::CancellationToken::new();

    let (result, _) = tokio::join!(
        app.client.dashboard_summary_with_cancel(&cancel),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        }
    );
    assert!(result.unwrap_err().is_cancelled());

    Ok(())
}

#[tokio::test]
async fn custom_endpoints_are_used() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = app.client_with(|config| {
        let mut endpoints = config.endpoints.clone();
        endpoints.products.list = "/products/category/1".into();
        config.with_endpoints(endpoints)
    });
    app.seed_catalog();
    app.create_milk().await?;
    app.create_bread().await?;

    let products = client.list_products().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Milk");

    Ok(())
}
