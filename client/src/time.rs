//! Timers that work both in the browser and under tokio.

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await
}

/// Resolves after the timeout, or never when there is none.
pub(crate) async fn deadline(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(duration) => {
            sleep(duration).await;
            duration
        }
        None => futures::future::pending().await,
    }
}
