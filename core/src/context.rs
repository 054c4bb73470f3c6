//! Per-call cancellation and deadlines.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Cancellation scope for one client call.
///
/// The default context never fires. A call whose context fires before the
/// transport answers returns [`Error::Cancelled`] or
/// [`Error::DeadlineExceeded`] instead of the transport's own error.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token: Some(token),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Add a deadline `timeout` from now, keeping any earlier one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    pub fn token(&self) -> Option<&CancellationToken> {
        self.token.as_ref()
    }

    /// The reason this context has fired, if it has.
    pub fn err(&self) -> Option<Error> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(Error::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(Error::DeadlineExceeded);
        }
        None
    }

    /// Resolve once the context fires. Pending forever for the background context.
    pub async fn done(&self) -> Error {
        let cancelled = async {
            match &self.token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = cancelled => Error::Cancelled,
            _ = expired => Error::DeadlineExceeded,
        }
    }
}
