//! Request-scoped trace identifier for correlating logs and error bodies.
//!
//! The identifier lives in Tokio task-local storage, so it is visible to
//! everything awaited inside [`TraceId::scope`]. Task-locals are not inherited
//! by spawned tasks; wrap the spawned future in [`TraceId::scope`] (or use
//! [`TraceId::in_current_scope`]) to carry it across.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use message_board::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::debug!(trace_id = %id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the current trace identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Execute the provided future with the supplied trace identifier in scope.
    ///
    /// # Examples
    /// ```
    /// use message_board::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Wrap `fut` so it observes the caller's trace identifier, if any, when
    /// it is polled on another task.
    ///
    /// The identifier is captured when this function is called, not when the
    /// returned future is first polled.
    pub fn in_current_scope<Fut>(fut: Fut) -> impl Future<Output = Fut::Output>
    where
        Fut: Future,
    {
        let captured = Self::current();
        async move {
            match captured {
                Some(trace_id) => TRACE_ID.scope(trace_id, fut).await,
                None => fut.await,
            }
        }
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[test]
    fn from_str_round_trips() {
        let uuid = Uuid::nil();
        let trace_id: TraceId = uuid.to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.as_uuid(), &uuid);
    }

    #[tokio::test]
    async fn spawned_tasks_inherit_scope_when_wrapped() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move {
            let wrapped = TraceId::in_current_scope(async { TraceId::current() });
            tokio::spawn(wrapped).await.expect("task completes")
        })
        .await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn spawned_tasks_lose_scope_when_not_wrapped() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("task completes")
        })
        .await;
        assert_eq!(observed, None);
    }
}
