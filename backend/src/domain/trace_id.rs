//! Correlation identifier shared by a request, its log lines and its errors.
//!
//! The [`Trace`](crate::Trace) middleware opens one scope per HTTP request.
//! Code awaited inside that scope, store adapters included, reads the
//! identifier through [`TraceId::current`] without threading it through
//! every port. Spawned tasks do not inherit the scope.

use std::fmt;
use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Identifier echoed in the `trace-id` header and in error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Reuse an identifier minted upstream, or mint a fresh one.
    ///
    /// Gateways in front of the API may already stamp a `trace-id`. It is
    /// adopted only when it parses as a UUID so arbitrary header text never
    /// reaches logs or error bodies.
    ///
    /// # Examples
    /// ```
    /// use donation_backend::TraceId;
    ///
    /// let upstream = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    /// assert_eq!(TraceId::adopt_or_generate(Some(upstream)).to_string(), upstream);
    /// assert_ne!(TraceId::adopt_or_generate(Some("req-42")).to_string(), "req-42");
    /// ```
    #[must_use]
    pub fn adopt_or_generate(upstream: Option<&str>) -> Self {
        upstream
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map_or_else(|| Self(Uuid::new_v4()), Self)
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with this identifier in scope.
    pub async fn scope<Fut>(self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
