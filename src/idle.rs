//! Idle timeout for long-lived streaming responses.
//!
//! The controller aborts its own signal once no data has arrived for the
//! configured duration. It does not start on construction: the transport
//! arms it with [`IdleTimeoutController::reset`] when the stream opens and
//! again on every chunk, or hands the stream to [`guard_stream`] which keeps
//! its own clock and only counts time spent waiting on the provider.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Sleep};

use crate::error::StreamParamsError;
use crate::signal::{AbortController, AbortSignal};
use crate::types::ConfigValue;
use crate::util::normalize::timeout_minutes_to_ms;

/// Self-aborting cancellation source driven by stream inactivity.
#[derive(Debug)]
pub struct IdleTimeoutController {
    duration: Duration,
    controller: AbortController,
    timer: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl IdleTimeoutController {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            controller: AbortController::new(),
            timer: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    /// Build a controller from a user-configured minute value.
    ///
    /// Returns `None` when the idle timeout is disabled (unset, zero, or not
    /// a number).
    pub fn from_minutes(minutes: impl Into<ConfigValue>) -> Option<Self> {
        timeout_minutes_to_ms(minutes).map(|ms| Self::new(Duration::from_millis(ms)))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// The signal aborted when the idle clock expires.
    pub fn signal(&self) -> AbortSignal {
        self.controller.signal()
    }

    pub fn is_timed_out(&self) -> bool {
        self.controller.is_aborted()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Start or restart the idle clock.
    ///
    /// No-op after the timeout fired or the controller was disposed, and
    /// outside a tokio runtime.
    pub fn reset(&self) {
        if self.is_disposed() || self.is_timed_out() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("idle timeout reset outside a tokio runtime; timer not armed");
            return;
        };

        let mut timer = self.lock_timer();
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        // dispose() may have run while we waited for the lock
        if self.is_disposed() {
            return;
        }
        let duration = self.duration;
        let idle_timeout_ms = self.duration_ms();
        let token = self.controller.cancellation_token();
        *timer = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            tracing::debug!(idle_timeout_ms, "stream idle timeout fired");
            token.cancel();
        }));
    }

    /// Clear any pending timer. Safe to call repeatedly and before the clock
    /// was ever started.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(timer) = self.lock_timer().take() {
            timer.abort();
        }
    }

    /// Abort the signal now, as if the idle clock had expired.
    pub(crate) fn time_out(&self) {
        if self.is_disposed() || self.is_timed_out() {
            return;
        }
        tracing::debug!(idle_timeout_ms = self.duration_ms(), "stream idle timeout fired");
        self.controller.abort();
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for IdleTimeoutController {
    fn drop(&mut self) {
        self.dispose();
    }
}

enum Next<T> {
    Item(Option<T>),
    IdleTimeout,
    Aborted,
}

/// Wrap a response stream with idle-timeout and abort handling.
///
/// The idle clock only runs while the guard waits on `stream`: it is re-armed
/// each time the consumer polls, so a slow consumer never trips it. The
/// stream ends with [`StreamParamsError::IdleTimeout`] if the idle clock
/// fires, or [`StreamParamsError::Aborted`] if `abort` fires for any other
/// reason. An item that is already available always wins over both. The
/// controller is disposed when the stream ends.
pub fn guard_stream<S, T>(
    stream: S,
    idle: Option<Arc<IdleTimeoutController>>,
    abort: Option<AbortSignal>,
) -> BoxStream<'static, Result<T, StreamParamsError>>
where
    S: Stream<Item = Result<T, StreamParamsError>> + Send + 'static,
    T: Send + 'static,
{
    let stream = async_stream::stream! {
        let mut inner = Box::pin(stream);
        let idle_signal = idle.as_ref().map(|controller| controller.signal());
        let idle_duration = idle.as_ref().map(|controller| controller.duration());
        let mut idle_timer = idle_duration.map(|duration| Box::pin(tokio::time::sleep(duration)));

        loop {
            if let (Some(timer), Some(duration)) = (idle_timer.as_mut(), idle_duration) {
                if let Some(deadline) = Instant::now().checked_add(duration) {
                    timer.as_mut().reset(deadline);
                }
            }

            let next = tokio::select! {
                biased;
                item = inner.next() => Next::Item(item),
                _ = elapsed(idle_timer.as_mut()) => {
                    if let Some(controller) = &idle {
                        controller.time_out();
                    }
                    Next::IdleTimeout
                }
                _ = wait_for(idle_signal.as_ref()) => Next::IdleTimeout,
                _ = wait_for(abort.as_ref()) => Next::Aborted,
            };

            match next {
                Next::Item(Some(item)) => {
                    yield item;
                }
                Next::Item(None) => break,
                Next::IdleTimeout => {
                    let ms = idle.as_ref().map(|c| c.duration_ms()).unwrap_or_default();
                    yield Err(StreamParamsError::IdleTimeout(ms));
                    break;
                }
                Next::Aborted => {
                    yield Err(StreamParamsError::Aborted);
                    break;
                }
            }
        }

        if let Some(controller) = &idle {
            controller.dispose();
        }
    };
    stream.boxed()
}

async fn elapsed(timer: Option<&mut Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn wait_for(signal: Option<&AbortSignal>) {
    match signal {
        Some(signal) => signal.aborted().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_for_zero_or_missing_minutes() {
        assert!(IdleTimeoutController::from_minutes(0).is_none());
        assert!(IdleTimeoutController::from_minutes(ConfigValue::Absent).is_none());
        assert!(IdleTimeoutController::from_minutes(ConfigValue::Invalid).is_none());
        assert!(IdleTimeoutController::from_minutes(-3).is_none());
    }

    #[test]
    fn enabled_controller_reports_duration() {
        let controller = IdleTimeoutController::from_minutes(10).unwrap();
        assert_eq!(controller.duration_ms(), 600_000);
        assert!(!controller.is_timed_out());
    }

    #[test]
    fn dispose_without_start_is_idempotent() {
        let controller = IdleTimeoutController::new(Duration::from_secs(1));
        controller.dispose();
        controller.dispose();
        assert!(controller.is_disposed());
        assert!(!controller.signal().is_aborted());
    }

    #[test]
    fn reset_outside_runtime_does_not_arm() {
        let controller = IdleTimeoutController::new(Duration::from_millis(1));
        controller.reset();
        std::thread::sleep(Duration::from_millis(5));
        assert!(!controller.is_timed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_duration_once_armed() {
        let controller = IdleTimeoutController::new(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!controller.is_timed_out(), "not armed by construction");

        controller.reset();
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(!controller.is_timed_out());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(controller.signal().is_aborted());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_postpones_expiry() {
        let controller = IdleTimeoutController::new(Duration::from_secs(60));
        controller.reset();
        tokio::time::sleep(Duration::from_secs(45)).await;
        controller.reset();
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert!(!controller.is_timed_out());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(controller.is_timed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_timer() {
        let controller = IdleTimeoutController::new(Duration::from_secs(60));
        controller.reset();
        controller.dispose();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!controller.is_timed_out());

        controller.reset();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!controller.is_timed_out(), "reset after dispose is a no-op");
    }
}
