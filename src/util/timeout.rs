//! Timeout and abort helpers for the transport layer.

use std::future::Future;
use std::time::Duration;

use crate::error::StreamParamsError;
use crate::signal::AbortSignal;

/// Wrap a future with an optional timeout. `None` waits indefinitely.
pub async fn with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, StreamParamsError>>,
) -> Result<T, StreamParamsError> {
    let Some(duration) = duration else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(StreamParamsError::Timeout(
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

/// Race a future against an optional abort signal.
///
/// A signal that is already aborted wins without polling the future.
pub async fn with_abort<T>(
    signal: Option<&AbortSignal>,
    future: impl Future<Output = Result<T, StreamParamsError>>,
) -> Result<T, StreamParamsError> {
    let Some(signal) = signal else {
        return future.await;
    };
    tokio::select! {
        biased;
        _ = signal.aborted() => Err(StreamParamsError::Aborted),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::AbortController;

    #[tokio::test(start_paused = true)]
    async fn timeout_elapses() {
        let result = with_timeout(Some(Duration::from_secs(60)), async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok::<_, StreamParamsError>(())
        })
        .await;
        assert!(matches!(result, Err(StreamParamsError::Timeout(60_000))));
    }

    #[tokio::test]
    async fn no_timeout_passes_through() {
        let result = with_timeout(None, async { Ok::<_, StreamParamsError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn aborted_signal_wins() {
        let controller = AbortController::new();
        controller.abort();
        let signal = controller.signal();
        let result = with_abort(Some(&signal), async { Ok::<_, StreamParamsError>(1) }).await;
        assert!(matches!(result, Err(StreamParamsError::Aborted)));
    }

    #[tokio::test]
    async fn abort_during_wait() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let pending = with_abort(Some(&signal), async {
            std::future::pending::<()>().await;
            Ok::<_, StreamParamsError>(())
        });
        controller.abort();
        assert!(matches!(pending.await, Err(StreamParamsError::Aborted)));
    }
}
