use client::{CancellationToken, DashboardSummary, FetchState};
use yew::prelude::*;

use crate::get_api_client;

/// Hook return type for the dashboard counts
pub struct DashboardHookReturn {
    pub product_count: Option<usize>,
    pub purchase_count: Option<usize>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

/// Product and purchase counts, fetched together on mount and on refetch.
#[hook]
pub fn use_dashboard() -> DashboardHookReturn {
    let state = use_state(FetchState::<DashboardSummary>::default);
    let generation = use_state(|| 0_u32);

    {
        let state = state.clone();
        use_effect_with(*generation, move |_| {
            let cancel = CancellationToken::new();
            state.set(FetchState::Loading);
            {
                let cancel = cancel.clone();
                yew::platform::spawn_local(async move {
                    let result = get_api_client()
                        .dashboard_summary_with_cancel(&cancel)
                        .await;
                    if cancel.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(summary) => state.set(FetchState::Success(summary)),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => state.set(FetchState::Error(e.to_string())),
                    }
                });
            }
            move || cancel.cancel()
        });
    }

    let refetch = {
        let generation = generation.clone();
        Callback::from(move |_| generation.set(generation.wrapping_add(1)))
    };

    let summary = state.data();
    DashboardHookReturn {
        product_count: summary.map(|summary| summary.product_count),
        purchase_count: summary.map(|summary| summary.purchase_count),
        is_loading: state.is_loading(),
        error: state.error().map(str::to_string),
        refetch,
    }
}
