//! Refresh routines a poller drives

use async_trait::async_trait;
use dispatch_client::ApiResult;
use std::future::Future;
use std::sync::Arc;

/// One full reload of a view
///
/// Each call fetches everything the view shows and returns the new
/// snapshot. Implementations must not mutate shared state themselves; the
/// poller decides whether a result is applied.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    /// Snapshot type the view renders
    type Output: Send + Sync + 'static;

    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch a fresh snapshot
    async fn refresh(&self) -> ApiResult<Self::Output>;
}

#[async_trait]
impl<R: Refresh + ?Sized> Refresh for Arc<R> {
    type Output = R::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn refresh(&self) -> ApiResult<Self::Output> {
        (**self).refresh().await
    }
}

/// Closure-backed [`Refresh`]
pub struct FnRefresh<F> {
    name: String,
    f: F,
}

impl<F> FnRefresh<F> {
    /// Wrap `f` under `name`
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut, T> Refresh for FnRefresh<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn refresh(&self) -> ApiResult<T> {
        (self.f)().await
    }
}
