use client::{FetchState, Fetcher, Request};
use serde::de::DeserializeOwned;
use yew::prelude::*;

use crate::get_api_client;

/// Generic fetch hook return type
pub struct FetchHookReturn<T> {
    pub state: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

impl<T> FetchHookReturn<T> {
    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// - Idle or loading: "Loading {context}..."
    /// - Failed: "Error loading {context}: ..."
    /// - Fetched: the render function, given the data
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T) -> Html,
    {
        match &self.state {
            FetchState::Success(data) => render_fn(data),
            FetchState::Error(error) => html! {
                <div class="p-4 rounded-md bg-red-50 \
                           dark:bg-red-900/20 border \
                           border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 \
                              dark:text-red-400">
                        {format!("Error loading {context}: {error}")}
                    </p>
                </div>
            },
            FetchState::Idle | FetchState::Loading => html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Loading {context}...")}
                    </p>
                </div>
            },
        }
    }
}

/// Fetch `request` while the component is mounted.
///
/// The request runs again whenever the descriptor changes (compared
/// structurally) or `refetch` is emitted. The previous request is cancelled
/// first, and nothing is published after unmount.
///
/// # Example
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_product(product_id: ProductId) -> FetchHookReturn<Product> {
///     use_fetch(Request::get(format!("/products/{product_id}")))
/// }
/// ```
#[hook]
pub fn use_fetch<T>(request: Request) -> FetchHookReturn<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let state = use_state(FetchState::<T>::default);
    let generation = use_state(|| 0_u32);

    {
        let setter = state.setter();
        use_effect_with((request, *generation), move |(request, _)| {
            let mut fetcher = Fetcher::<T, _>::new(get_api_client(), move |next| {
                setter.set(next)
            });
            if let Some(task) = fetcher.update(request.clone()) {
                yew::platform::spawn_local(task);
            }
            move || fetcher.teardown()
        });
    }

    let refetch = {
        let generation = generation.clone();
        Callback::from(move |_| generation.set(generation.wrapping_add(1)))
    };

    FetchHookReturn {
        is_loading: state.is_loading(),
        error: state.error().map(str::to_string),
        state: (*state).clone(),
        refetch,
    }
}
