use payloads::{ClientId, PurchaseDraft, PurchaseId, PurchaseStatus};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{assert_status_code, purchase_draft, spawn_app, test_client};

#[tokio::test]
async fn create_read_delete_purchase() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;

    let purchase = app.create_purchase_of(&milk).await?;
    assert_eq!(purchase.purchase_id, PurchaseId(1));
    assert_eq!(purchase.status, PurchaseStatus::Completed);
    assert_eq!(purchase.total(), dec!(5.0));
    assert_eq!(purchase.client_label(), "Sam Rivera");
    assert_eq!(purchase.items[0].product.as_ref(), Some(&milk));

    let fetched = app.client.get_purchase(purchase.purchase_id).await?;
    assert_eq!(fetched, purchase);

    app.client.delete_purchase(purchase.purchase_id).await?;
    let err = app.client.get_purchase(purchase.purchase_id).await.unwrap_err();
    assert_eq!(err.to_string(), "Purchase 1 not found");
    assert!(app.client.list_purchases().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn purchases_by_client() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;
    let bread = app.create_bread().await?;
    app.create_purchase_of(&milk).await?;
    app.create_purchase_of(&bread).await?;

    // an unknown client still buys, without an expanded record
    let stranger = ClientId("999".into());
    let purchase = app
        .client
        .create_purchase(&purchase_draft(&stranger, &bread, 1))
        .await?;
    assert_eq!(purchase.client, None);
    assert_eq!(purchase.client_label(), "999");

    let mine = app
        .client
        .list_purchases_by_client(&test_client().client_id)
        .await?;
    assert_eq!(mine.len(), 2);
    assert_eq!(app.client.list_purchases().await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn cart_draft_is_accepted_by_the_server() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;
    let bread = app.create_bread().await?;

    let clients = app.client.list_clients().await?;
    assert_eq!(clients, vec![test_client()]);

    let mut draft = PurchaseDraft::new(clients[0].client_id.clone(), "CARD");
    draft.add_product(&milk, 1);
    draft.add_product(&bread, 2);
    draft.add_product(&milk, 1);
    draft.check()?;

    let purchase = app.client.create_purchase(&draft).await?;
    assert_eq!(purchase.items.len(), 2);
    assert_eq!(purchase.items[0].quantity, 2);
    assert_eq!(purchase.total(), dec!(7.4));
    assert_eq!(purchase.payment_method, "CARD");
    assert_eq!(purchase.client_label(), "Sam Rivera");

    Ok(())
}

#[tokio::test]
async fn client_id_is_encoded_in_the_path() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;
    let walk_in = ClientId("ana maria?".into());
    app.client
        .create_purchase(&purchase_draft(&walk_in, &milk, 1))
        .await?;

    let theirs = app.client.list_purchases_by_client(&walk_in).await?;
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].client_id, walk_in);
    assert_eq!(app.requests_to("/purchases/client/ana%20maria%3F").len(), 1);

    Ok(())
}

#[tokio::test]
async fn invalid_purchase_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;

    let mut draft = purchase_draft(&test_client().client_id, &milk, 0);
    let result = app.client.create_purchase(&draft).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    draft.items.clear();
    let err = app.client.create_purchase(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "A purchase needs at least one item");

    let mut draft = purchase_draft(&test_client().client_id, &milk, 1);
    app.client.delete_product(milk.product_id).await?;
    draft.comment = Some("milk is gone".into());
    let result = app.client.create_purchase(&draft).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}
