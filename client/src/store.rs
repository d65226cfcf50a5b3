//! Per-view collections of products and purchases with list, save and
//! delete operations.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use payloads::{Product, ProductDraft, ProductId, Purchase, PurchaseDraft, PurchaseId};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;

use crate::config::{Endpoints, ResourceRoutes, fill};
use crate::{APIClient, ClientError, Request, SnapshotCache};

/// A record type the API exposes as a collection.
pub trait Resource: Clone + Serialize + DeserializeOwned + 'static {
    type Id: fmt::Display + Copy + PartialEq + 'static;
    /// Partial record accepted by the save route.
    type Draft: Serialize;

    fn id(&self) -> Self::Id;
    fn routes(endpoints: &Endpoints) -> &ResourceRoutes;
}

impl Resource for Product {
    type Id = ProductId;
    type Draft = ProductDraft;

    fn id(&self) -> ProductId {
        self.product_id
    }

    fn routes(endpoints: &Endpoints) -> &ResourceRoutes {
        &endpoints.products
    }
}

impl Resource for Purchase {
    type Id = PurchaseId;
    type Draft = PurchaseDraft;

    fn id(&self) -> PurchaseId {
        self.purchase_id
    }

    fn routes(endpoints: &Endpoints) -> &ResourceRoutes {
        &endpoints.purchases
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
    /// `items` came from a snapshot and no list has succeeded since.
    pub from_cache: bool,
}

impl<R> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            from_cache: false,
        }
    }
}

impl<R: Resource> ResourceState<R> {
    pub fn find(&self, id: R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }
}

struct Inner<R> {
    state: ResourceState<R>,
    /// Operations in flight; `loading` is true while this is non-zero.
    pending: usize,
}

type Listener<R> = Rc<dyn Fn(&ResourceState<R>)>;

/// Collection state owned by one view.
///
/// `save` and `delete` refresh the list before they resolve, so once
/// `loading` is false the items reflect the mutation. Only the newest list
/// is applied; an older one still in flight is cancelled.
pub struct ResourceStore<R: Resource> {
    client: APIClient,
    inner: RefCell<Inner<R>>,
    listener: Option<Listener<R>>,
    cache: Option<SnapshotCache>,
    cancel: CancellationToken,
    /// Child of `cancel` for the newest list; older lists are cancelled.
    list_cancel: RefCell<CancellationToken>,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(client: APIClient) -> Self {
        let cancel = CancellationToken::new();
        Self {
            client,
            inner: RefCell::new(Inner {
                state: ResourceState::default(),
                pending: 0,
            }),
            listener: None,
            cache: None,
            list_cancel: RefCell::new(cancel.child_token()),
            cancel,
        }
    }

    /// Called with the new state after every change.
    pub fn with_listener(
        mut self,
        listener: impl Fn(&ResourceState<R>) + 'static,
    ) -> Self {
        self.listener = Some(Rc::new(listener));
        self
    }

    /// Seed the items from a fresh snapshot and keep it updated after every
    /// successful list.
    pub fn with_cache(mut self, cache: SnapshotCache) -> Self {
        if let Some(items) = cache.load::<Vec<R>>() {
            let mut inner = self.inner.borrow_mut();
            inner.state.items = items;
            inner.state.from_cache = true;
        }
        self.cache = Some(cache);
        self
    }

    pub fn state(&self) -> ResourceState<R> {
        self.inner.borrow().state.clone()
    }

    /// Cancel in-flight operations. The state is frozen from here on.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Replace the items. Fails with `Cancelled` when a later list or a
    /// mutation's refresh supersedes it.
    pub async fn list(&self) -> Result<Vec<R>, ClientError> {
        self.track(self.fetch_list()).await
    }

    /// Create or update a record, then refresh the list.
    ///
    /// A failed refresh is recorded in the state but does not fail the save,
    /// which the server has already accepted.
    pub async fn save(&self, draft: &R::Draft) -> Result<R, ClientError> {
        self.track(async {
            let routes = R::routes(&self.client.config.endpoints);
            let request = Request::post(&routes.save).json(draft)?;
            let saved: R = self
                .client
                .request_with_cancel(&request, &self.cancel)
                .await?;
            self.refresh().await?;
            Ok(saved)
        })
        .await
    }

    /// Delete a record, then refresh the list.
    pub async fn delete(&self, id: R::Id) -> Result<(), ClientError> {
        self.track(async {
            let routes = R::routes(&self.client.config.endpoints);
            let request = Request::delete(fill(&routes.delete, id));
            self.client
                .request_empty_with_cancel(&request, &self.cancel)
                .await?;
            self.refresh().await
        })
        .await
    }

    async fn refresh(&self) -> Result<(), ClientError> {
        match self.fetch_list().await {
            Ok(_) => Ok(()),
            // a newer list, started after the mutation, publishes instead
            Err(e) if e.is_cancelled() && !self.cancel.is_cancelled() => Ok(()),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                self.update(|inner| inner.state.error = Some(e.to_string()));
                Ok(())
            }
        }
    }

    /// Fetch the list and publish it unless a newer list has started in
    /// the meantime, in which case this one resolves to `Cancelled`.
    async fn fetch_list(&self) -> Result<Vec<R>, ClientError> {
        let routes = R::routes(&self.client.config.endpoints);
        let request = Request::get(&routes.list);
        let token = self.supersede_lists();
        let items: Vec<R> =
            self.client.request_with_cancel(&request, &token).await?;

        if let Some(cache) = &self.cache {
            cache.save(&items);
        }
        self.update(|inner| {
            inner.state.items = items.clone();
            inner.state.from_cache = false;
        });
        Ok(items)
    }

    /// Account for one operation in `loading` and `error`.
    async fn track<T>(
        &self,
        operation: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        self.update(|inner| {
            inner.pending += 1;
            inner.state.loading = true;
            inner.state.error = None;
        });

        let result = operation.await;
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        self.update(|inner| {
            inner.pending = inner.pending.saturating_sub(1);
            inner.state.loading = inner.pending > 0;
            if let Err(e) = &result
                && !e.is_cancelled()
            {
                inner.state.error = Some(e.to_string());
            }
        });
        result
    }

    fn supersede_lists(&self) -> CancellationToken {
        let token = self.cancel.child_token();
        let previous = self.list_cancel.replace(token.clone());
        previous.cancel();
        token
    }

    fn update(&self, change: impl FnOnce(&mut Inner<R>)) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            change(&mut inner);
            inner.state.clone()
        };
        if let Some(listener) = &self.listener {
            listener(&snapshot);
        }
    }
}

impl<R: Resource> Drop for ResourceStore<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
