//! Exponential-backoff retry for storage operations that may transiently fail.

use std::future::Future;
use std::time::Duration;

use crate::StorageError;

/// Retries `operation` up to `max_attempts` times, doubling the delay after
/// each failure starting from `base_delay`. Returns the first success or the
/// last error once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(max_attempts: u32, base_delay: Duration, mut operation: F) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < max_attempts => {
                let delay = base_delay * 2u32.pow(attempt);
                tracing::warn!(attempt, error = %err, "storage operation failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(3, Duration::from_millis(1), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StorageError::Internal(anyhow::anyhow!("transient")))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let result: Result<(), StorageError> = with_retry(2, Duration::from_millis(1), || async {
            Err(StorageError::Internal(anyhow::anyhow!("always fails")))
        })
        .await;
        assert!(result.is_err());
    }
}
