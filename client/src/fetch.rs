//! Request state bound to the lifetime of a single view.
//!
//! [`Fetcher`] keeps the descriptor of the request a view currently shows and
//! the token that cancels it. UI frameworks drive the returned futures on
//! their own executor and publish each [`FetchState`] through the callback
//! given at construction.

use std::marker::PhantomData;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{APIClient, ClientError, Request};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    /// Human-readable message for the view.
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True once the request has succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }
}

/// Run one request, publishing `Loading` and then the outcome.
///
/// Nothing is published once `cancel` has fired, including outcomes that
/// were already on their way.
pub async fn run_fetch<T, F>(
    client: &APIClient,
    request: &Request,
    cancel: &CancellationToken,
    set_state: &F,
) where
    T: DeserializeOwned,
    F: Fn(FetchState<T>) + ?Sized,
{
    if cancel.is_cancelled() {
        return;
    }
    set_state(FetchState::Loading);

    let result = client.request_with_cancel::<T>(request, cancel).await;
    if cancel.is_cancelled() {
        return;
    }

    match result {
        Ok(data) => set_state(FetchState::Success(data)),
        Err(ClientError::Cancelled) => {}
        Err(e) => set_state(FetchState::Error(e.to_string())),
    }
}

/// Owns the request shown by one view.
pub struct Fetcher<T, F> {
    client: APIClient,
    set_state: Rc<F>,
    request: Option<Request>,
    cancel: CancellationToken,
    _data: PhantomData<fn() -> T>,
}

impl<T, F> Fetcher<T, F>
where
    T: DeserializeOwned + 'static,
    F: Fn(FetchState<T>) + 'static,
{
    /// Publishes `Idle`.
    pub fn new(client: APIClient, set_state: F) -> Self {
        set_state(FetchState::Idle);
        Self {
            client,
            set_state: Rc::new(set_state),
            request: None,
            cancel: CancellationToken::new(),
            _data: PhantomData,
        }
    }

    /// Switch to a new descriptor. Returns the future to drive, or `None`
    /// when the descriptor is equal to the current one.
    pub fn update(
        &mut self,
        request: Request,
    ) -> Option<LocalBoxFuture<'static, ()>> {
        if self.request.as_ref() == Some(&request) {
            return None;
        }
        self.request = Some(request.clone());
        Some(self.restart(request))
    }

    /// Fetch the current descriptor again.
    pub fn refetch(&mut self) -> Option<LocalBoxFuture<'static, ()>> {
        let request = self.request.clone()?;
        Some(self.restart(request))
    }

    /// Cancel whatever is in flight. Later outcomes are dropped.
    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.request = None;
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    fn restart(&mut self, request: Request) -> LocalBoxFuture<'static, ()> {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();

        let client = self.client.clone();
        let cancel = self.cancel.clone();
        let set_state = self.set_state.clone();
        async move {
            run_fetch(&client, &request, &cancel, &*set_state).await;
        }
        .boxed_local()
    }
}

impl<T, F> Drop for Fetcher<T, F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
