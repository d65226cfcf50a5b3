use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use client::{FetchState, Fetcher, Request};
use payloads::{Product, ProductId};
use rust_decimal::dec;
use test_helpers::spawn_app;

type States = Rc<RefCell<Vec<FetchState<Vec<Product>>>>>;

/// Collects every published state.
fn recorder() -> (States, impl Fn(FetchState<Vec<Product>>) + 'static) {
    let states: States = Rc::default();
    let sink = states.clone();
    (states, move |state| sink.borrow_mut().push(state))
}

fn last(states: &States) -> FetchState<Vec<Product>> {
    states.borrow().last().cloned().unwrap_or_default()
}

#[tokio::test]
async fn successful_fetch_publishes_loading_then_data() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.stub(
        "/products/all",
        200,
        r#"[{"productId":1,"name":"Milk","price":2.5,"stock":10,"active":true}]"#,
    );
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    fetcher.update(Request::get("/products/all")).unwrap().await;

    let states = states.borrow();
    assert_eq!(states.len(), 3);
    assert_eq!(states[0], FetchState::Idle);
    assert_eq!(states[1], FetchState::Loading);
    let products = states[2].data().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_id, ProductId(1));
    assert_eq!(products[0].price, dec!(2.5));

    Ok(())
}

#[tokio::test]
async fn failed_fetch_publishes_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.stub("/products/all", 404, r#"{"message":"not found"}"#);
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    fetcher.update(Request::get("/products/all")).unwrap().await;

    let state = last(&states);
    assert_eq!(state, FetchState::Error("not found".into()));
    assert_eq!(state.data(), None);
    assert!(!state.is_loading());

    app.stub("/products/all", 200, "{oops");
    fetcher.refetch().unwrap().await;
    let message = last(&states).error().unwrap_or_default().to_string();
    assert!(message.starts_with("Unexpected response from the server"));

    Ok(())
}

#[tokio::test]
async fn same_descriptor_is_not_fetched_again() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    let request = Request::get("/products/all").param("active", true);
    fetcher.update(request.clone()).unwrap().await;
    assert!(fetcher.update(request.clone()).is_none());
    assert_eq!(app.requests_to("/products/all").len(), 1);
    assert_eq!(states.borrow().len(), 3);

    // a changed parameter is a new descriptor
    fetcher
        .update(request.param("active", false))
        .unwrap()
        .await;
    assert_eq!(app.requests_to("/products/all").len(), 2);

    // refetch repeats the current one
    fetcher.refetch().unwrap().await;
    let recorded = app.requests_to("/products/all");
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[2].query, "active=false");

    Ok(())
}

#[tokio::test]
async fn teardown_stops_state_changes() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_millis(300));
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    let pending = fetcher.update(Request::get("/products/all")).unwrap();
    tokio::join!(pending, async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        fetcher.teardown();
    });

    // let the delayed response arrive
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(
        *states.borrow(),
        vec![FetchState::Idle, FetchState::Loading]
    );
    assert!(fetcher.request().is_none());

    Ok(())
}

#[tokio::test]
async fn dropping_the_fetcher_cancels() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_delay("/products/all", Duration::from_millis(300));
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    let pending = fetcher.update(Request::get("/products/all")).unwrap();
    drop(fetcher);
    pending.await;

    assert_eq!(*states.borrow(), vec![FetchState::Idle]);

    Ok(())
}

#[tokio::test]
async fn stale_descriptor_outcome_is_discarded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_catalog();
    app.create_milk().await?;
    app.create_bread().await?;
    app.set_delay("/products/all", Duration::from_millis(300));
    let (states, set_state) = recorder();
    let mut fetcher = Fetcher::<Vec<Product>, _>::new(app.client.clone(), set_state);

    let slow = fetcher.update(Request::get("/products/all")).unwrap();
    tokio::join!(slow, async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = fetcher.update(Request::get("/products/category/1"));
        fast.unwrap().await;
    });
    tokio::time::sleep(Duration::from_millis(400)).await;

    let states = states.borrow();
    assert_eq!(states.len(), 4);
    assert_eq!(states[1], FetchState::Loading);
    assert_eq!(states[2], FetchState::Loading);
    let products = states[3].data().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Milk");

    Ok(())
}

#[tokio::test]
async fn run_fetch_skips_cancelled_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (states, set_state) = recorder();
    let cancel = client::CancellationToken::new();
    cancel.cancel();

    let request = Request::get("/products/all");
    client::run_fetch::<Vec<Product>, _>(&app.client, &request, &cancel, &set_state)
        .await;

    assert!(states.borrow().is_empty());
    assert!(app.requests_to("/products/all").is_empty());

    Ok(())
}
