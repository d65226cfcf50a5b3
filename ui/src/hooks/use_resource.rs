use std::rc::Rc;
use std::time::Duration;

use client::{Resource, ResourceState, ResourceStore, SnapshotCache};
use payloads::{Product, Purchase};
use yew::prelude::*;

use crate::get_api_client;
use crate::storage::LocalStorage;

/// Snapshots only bridge the first paint after a reload.
const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Hook return type for a collection of records
pub struct ResourceHookReturn<R: Resource> {
    pub state: ResourceState<R>,
    pub actions: ResourceActions<R>,
}

impl<R: Resource> ResourceHookReturn<R> {
    /// Returns true if this is the initial load (no data, no error, loading)
    pub fn is_initial_loading(&self) -> bool {
        self.state.loading
            && self.state.items.is_empty()
            && self.state.error.is_none()
    }
}

/// Operations on the component's store. Outcomes are not reported once the
/// component is gone.
pub struct ResourceActions<R: Resource> {
    store: Rc<ResourceStore<R>>,
}

impl<R: Resource> Clone for ResourceActions<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Resource> ResourceActions<R> {
    pub fn refetch(&self) {
        let store = self.store.clone();
        yew::platform::spawn_local(async move {
            let _ = store.list().await;
        });
    }

    pub fn save(&self, draft: R::Draft, done: Callback<Result<R, String>>)
    where
        R::Draft: 'static,
    {
        let store = self.store.clone();
        yew::platform::spawn_local(async move {
            match store.save(&draft).await {
                Err(e) if e.is_cancelled() => {}
                result => done.emit(result.map_err(|e| e.to_string())),
            }
        });
    }

    pub fn delete(&self, id: R::Id, done: Callback<Result<(), String>>) {
        let store = self.store.clone();
        yew::platform::spawn_local(async move {
            match store.delete(id).await {
                Err(e) if e.is_cancelled() => {}
                result => done.emit(result.map_err(|e| e.to_string())),
            }
        });
    }
}

/// A store owned by the calling component. Lists on mount and tears down
/// on unmount.
#[hook]
fn use_resource<R>(snapshot_key: &'static str) -> ResourceHookReturn<R>
where
    R: Resource,
{
    let state = use_state(ResourceState::<R>::default);

    let store = {
        let setter = state.setter();
        use_memo((), move |_| {
            let cache = SnapshotCache::new(
                Rc::new(LocalStorage),
                snapshot_key,
                SNAPSHOT_MAX_AGE,
            );
            // a snapshot, if any, is published with the first list
            ResourceStore::new(get_api_client())
                .with_cache(cache)
                .with_listener(move |next: &ResourceState<R>| {
                    setter.set(next.clone())
                })
        })
    };

    let actions = ResourceActions { store };
    {
        let actions = actions.clone();
        use_effect_with((), move |_| {
            actions.refetch();
            move || actions.store.teardown()
        });
    }

    ResourceHookReturn {
        state: (*state).clone(),
        actions,
    }
}

#[hook]
pub fn use_products() -> ResourceHookReturn<Product> {
    use_resource("market.products")
}

#[hook]
pub fn use_purchases() -> ResourceHookReturn<Purchase> {
    use_resource("market.purchases")
}
