//! Deferred view loading.
//!
//! A [`ComponentLoader`] wraps an async factory that produces a [`ViewModule`]. The first
//! successful load is cached and every later load returns the same module; a failed load
//! leaves the cache empty so the next navigation retries.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::OnceCell;

use super::error::LoadError;
use crate::component::traits::{AnyComponent, Component};

/// A loaded view: knows its name and how to mount a fresh component instance.
pub trait ViewModule: Send + Sync + 'static {
    /// Human-readable view name.
    fn name(&self) -> &str;

    /// Create a new component instance for this view.
    fn mount(&self) -> Box<dyn AnyComponent>;
}

/// Future returned by a loader factory.
pub type LoadFuture = BoxFuture<'static, Result<Arc<dyn ViewModule>, LoadError>>;

/// A [`ViewModule`] built from a component constructor.
pub struct ComponentModule<C> {
    name: &'static str,
    build: fn() -> C,
}

impl<C: Component> ComponentModule<C> {
    pub fn new(name: &'static str, build: fn() -> C) -> Self {
        Self { name, build }
    }
}

impl<C: Component> ViewModule for ComponentModule<C> {
    fn name(&self) -> &str {
        self.name
    }

    fn mount(&self) -> Box<dyn AnyComponent> {
        Box::new((self.build)())
    }
}

/// Async factory for a view module, loaded on first use and cached thereafter.
#[derive(Clone)]
pub struct ComponentLoader {
    factory: Arc<dyn Fn() -> LoadFuture + Send + Sync>,
    module: Arc<OnceCell<Arc<dyn ViewModule>>>,
}

impl ComponentLoader {
    /// Wrap an async factory. The factory runs at most once per successful load.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn ViewModule>, LoadError>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || -> LoadFuture { factory().boxed() }),
            module: Arc::new(OnceCell::new()),
        }
    }

    /// A loader whose module is already available.
    pub fn ready(module: Arc<dyn ViewModule>) -> Self {
        let cached = Arc::clone(&module);
        Self {
            factory: Arc::new(move || -> LoadFuture {
                let module = Arc::clone(&module);
                async move { Ok(module) }.boxed()
            }),
            module: Arc::new(OnceCell::new_with(Some(cached))),
        }
    }

    /// Resolve the module, running the factory only if nothing is cached yet.
    ///
    /// Concurrent callers share a single factory invocation.
    pub async fn load(&self) -> Result<Arc<dyn ViewModule>, LoadError> {
        self.module
            .get_or_try_init(|| (self.factory)())
            .await
            .map(Arc::clone)
    }

    /// The cached module, if a load already succeeded.
    pub fn loaded(&self) -> Option<Arc<dyn ViewModule>> {
        self.module.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.module.initialized()
    }
}

impl fmt::Debug for ComponentLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentLoader")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
