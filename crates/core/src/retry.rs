//! Shared retry/backoff helper
//!
//! Used by both the TTS adapters (retrying a failed synthesis call a
//! bounded number of times with exponential backoff) and the LLM
//! scriptwriter's validation-retry loop.

use std::future::Future;
use std::time::Duration;

/// Retry `op` up to `max_retries` additional times beyond the first
/// attempt, doubling `initial_backoff` after each failure.
pub async fn with_retries<T, E, F, Fut>(
    max_retries: u32,
    initial_backoff: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    let mut backoff = initial_backoff;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_retries {
                    return Err(err);
                }
                tracing::warn!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying after failure");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &'static str> = with_retries(2, Duration::from_millis(1), |attempt| {
            let calls = &calls;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err("transient")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let result: Result<u32, &'static str> =
            with_retries(1, Duration::from_millis(1), |_| async { Err("always fails") }).await;
        assert_eq!(result, Err("always fails"));
    }
}
