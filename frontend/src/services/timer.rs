//! Poll delay on the browser event loop.

use std::time::Duration;

use async_trait::async_trait;
use docflow_core::Pause;

/// [`Pause`] backed by a `setTimeout` future.
pub struct BrowserPause;

#[async_trait(?Send)]
impl Pause for BrowserPause {
    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
