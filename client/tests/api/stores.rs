use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use client::{
    MemoryStorage, ResourceState, ResourceStore, SnapshotCache, SnapshotStorage,
};
use payloads::{Product, Purchase};
use test_helpers::{bread_draft, milk_draft, purchase_draft, spawn_app, test_client};

type Seen<R> = Rc<RefCell<Vec<ResourceState<R>>>>;

fn watched<R: client::Resource>(store: ResourceStore<R>) -> (ResourceStore<R>, Seen<R>) {
    let seen: Seen<R> = Rc::default();
    let sink = seen.clone();
    let store = store.with_listener(move |state| sink.borrow_mut().push(state.clone()));
    (store, seen)
}

#[tokio::test]
async fn save_then_list_contains_the_record() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let (products, seen) = watched(ResourceStore::<Product>::new(app.client.clone()));

    assert!(products.list().await?.is_empty());
    let bread = products.save(&bread_draft()).await?;

    let state = products.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.find(bread.product_id), Some(&bread));
    assert!(products.list().await?.contains(&bread));

    // every operation raised loading and cleared it again
    let seen = seen.borrow();
    assert!(seen.iter().any(|state| state.loading));
    assert!(!seen.last().map(|state| state.loading).unwrap_or(true));

    Ok(())
}

#[tokio::test]
async fn delete_refreshes_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let products = ResourceStore::<Product>::new(app.client.clone());
    let milk = products.save(&milk_draft()).await?;
    let bread = products.save(&bread_draft()).await?;
    assert_eq!(products.state().items.len(), 2);

    products.delete(milk.product_id).await?;

    let state = products.state();
    assert_eq!(state.items, vec![bread]);
    assert_eq!(app.requests_to("/products/all").len(), 3);

    Ok(())
}

#[tokio::test]
async fn list_in_flight_does_not_overwrite_a_save() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    // the first list answers with the empty catalog, 300 ms late
    app.set_delay("/products/all", Duration::from_millis(300));
    let products = ResourceStore::<Product>::new(app.client.clone());

    let (listed, saved) = tokio::join!(products.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.clear_delay("/products/all");
        products.save(&bread_draft()).await
    });
    let bread = saved?;
    assert!(listed.unwrap_err().is_cancelled());

    let state = products.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.items, vec![bread]);

    // the held response arrives and changes nothing
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(products.state(), state);

    Ok(())
}

#[tokio::test]
async fn newer_list_supersedes_an_older_one() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    app.set_delay("/products/all", Duration::from_millis(300));
    let products = ResourceStore::<Product>::new(app.client.clone());

    let (older, newer) = tokio::join!(products.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.clear_delay("/products/all");
        app.create_milk().await?;
        products.list().await.map_err(anyhow::Error::from)
    });
    assert!(older.unwrap_err().is_cancelled());
    assert_eq!(newer?.len(), 1);
    assert_eq!(products.state().items.len(), 1);
    assert!(!products.state().loading);

    Ok(())
}

#[tokio::test]
async fn failed_operation_is_recorded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.stub("/products/all", 500, r#"{"message":"database unavailable"}"#);
    let products = ResourceStore::<Product>::new(app.client.clone());

    let err = products.list().await.unwrap_err();
    assert_eq!(err.to_string(), "database unavailable");
    let state = products.state();
    assert_eq!(state.error.as_deref(), Some("database unavailable"));
    assert!(!state.loading);

    // the next operation starts from a clean error
    app.clear_stub("/products/all");
    products.list().await?;
    assert_eq!(products.state().error, None);

    Ok(())
}

#[tokio::test]
async fn failed_refresh_does_not_fail_the_save() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    app.stub("/products/all", 503, "");
    let products = ResourceStore::<Product>::new(app.client.clone());

    let milk = products.save(&milk_draft()).await?;
    assert_eq!(app.client.get_product(milk.product_id).await?, milk);

    let state = products.state();
    assert_eq!(state.error.as_deref(), Some("Request failed with status 503"));
    assert!(state.items.is_empty());
    assert!(!state.loading);

    Ok(())
}

#[tokio::test]
async fn teardown_freezes_the_state() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_millis(300));
    let (products, seen) = watched(ResourceStore::<Product>::new(app.client.clone()));

    let (result, _) = tokio::join!(products.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        products.teardown();
    });
    assert!(result.unwrap_err().is_cancelled());
    tokio::time::sleep(Duration::from_millis(400)).await;

    // only the start of the list was ever published
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].loading);

    // nothing runs after teardown
    assert!(products.list().await.unwrap_err().is_cancelled());
    assert_eq!(seen.borrow().len(), 1);

    Ok(())
}

#[tokio::test]
async fn snapshot_seeds_the_next_store() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    app.create_milk().await?;
    let storage: Rc<dyn SnapshotStorage> = Rc::new(MemoryStorage::default());
    let cache = || SnapshotCache::new(storage.clone(), "products", Duration::from_secs(60));

    let first = ResourceStore::<Product>::new(app.client.clone()).with_cache(cache());
    assert!(first.state().items.is_empty());
    first.list().await?;
    drop(first);

    let second = ResourceStore::<Product>::new(app.client.clone()).with_cache(cache());
    let state = second.state();
    assert!(state.from_cache);
    assert_eq!(state.items.len(), 1);

    app.create_bread().await?;
    second.list().await?;
    let state = second.state();
    assert!(!state.from_cache);
    assert_eq!(state.items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn purchase_store() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    let milk = app.create_milk().await?;
    let purchases = ResourceStore::<Purchase>::new(app.client.clone());

    let draft = purchase_draft(&test_client().client_id, &milk, 3);
    let purchase = purchases.save(&draft).await?;
    assert_eq!(purchases.state().items, vec![purchase.clone()]);
    assert_eq!(app.requests_to("/purchases/create").len(), 1);

    purchases.delete(purchase.purchase_id).await?;
    assert!(purchases.state().items.is_empty());
    assert_eq!(app.requests_to("/purchases/delete/1")[0].method, "DELETE");

    Ok(())
}
