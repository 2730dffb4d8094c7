//! Cooperative cancellation signals.
//!
//! An [`AbortController`] owns the right to abort; the [`AbortSignal`]s it
//! hands out can only observe. Several signals can be folded into one with
//! [`build_combined_abort_signal`], which aborts as soon as any of its inputs
//! does.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Owner side of a cancellation source.
#[derive(Debug, Default)]
pub struct AbortController {
    token: Arc<CancellationToken>,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal observing this controller.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: SignalInner::Token(Arc::clone(&self.token)),
        }
    }

    /// Abort every signal handed out by this controller. Idempotent.
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Shared handle for timers owned by the same component.
    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        CancellationToken::clone(&self.token)
    }
}

/// Observer side of one or more cancellation sources.
///
/// Once aborted, a signal stays aborted.
#[derive(Clone)]
pub struct AbortSignal {
    inner: SignalInner,
}

#[derive(Clone)]
enum SignalInner {
    Token(Arc<CancellationToken>),
    /// Logical OR. Always holds at least two tokens and never nests.
    Any(Arc<[Arc<CancellationToken>]>),
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        match &self.inner {
            SignalInner::Token(token) => token.is_cancelled(),
            SignalInner::Any(tokens) => tokens.iter().any(|token| token.is_cancelled()),
        }
    }

    /// Wait until the signal is aborted.
    ///
    /// For a combined signal this resolves on the first constituent abort.
    pub async fn aborted(&self) {
        match &self.inner {
            SignalInner::Token(token) => token.cancelled().await,
            SignalInner::Any(tokens) => {
                let waits = tokens.iter().map(|token| Box::pin(token.cancelled()));
                futures::future::select_all(waits).await;
            }
        }
    }

    /// Whether this signal was derived from several sources.
    pub fn is_combined(&self) -> bool {
        matches!(self.inner, SignalInner::Any(_))
    }

    /// Whether both signals observe exactly the same controllers.
    ///
    /// Two signals handed out by one controller share a source, and so does a
    /// lone signal passed through [`build_combined_abort_signal`].
    pub fn same_source(&self, other: &AbortSignal) -> bool {
        let ours = self.tokens();
        let theirs = other.tokens();
        ours.len() == theirs.len() && ours.iter().zip(theirs).all(|(a, b)| Arc::ptr_eq(a, b))
    }

    fn tokens(&self) -> &[Arc<CancellationToken>] {
        match &self.inner {
            SignalInner::Token(token) => std::slice::from_ref(token),
            SignalInner::Any(tokens) => &tokens[..],
        }
    }

    fn into_tokens(self) -> Vec<Arc<CancellationToken>> {
        match self.inner {
            SignalInner::Token(token) => vec![token],
            SignalInner::Any(tokens) => tokens.to_vec(),
        }
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .field("sources", &self.tokens().len())
            .finish()
    }
}

/// Merge optional signals into one.
///
/// - no signals: `None`
/// - one signal: that signal, unwrapped
/// - several: a signal aborted iff any input is aborted
///
/// Inputs are only observed, never aborted. Combined inputs are flattened so
/// repeated merging does not build deeper structures.
pub fn build_combined_abort_signal<I>(signals: I) -> Option<AbortSignal>
where
    I: IntoIterator<Item = Option<AbortSignal>>,
{
    let mut valid: Vec<AbortSignal> = signals.into_iter().flatten().collect();
    match valid.len() {
        0 => None,
        1 => valid.pop(),
        _ => {
            let tokens: Vec<Arc<CancellationToken>> =
                valid.into_iter().flat_map(AbortSignal::into_tokens).collect();
            Some(AbortSignal {
                inner: SignalInner::Any(tokens.into()),
            })
        }
    }
}
