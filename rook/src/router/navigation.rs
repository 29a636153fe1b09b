//! The navigation handle.
//!
//! # Responsibilities
//! - Compile route records into an immutable, ranked table
//! - Resolve browser URLs and application locations to routes
//! - Run navigations: resolve, load the view, commit to history
//! - Publish the committed route to subscribers
//!
//! # Design Decisions
//! - The table is read-only after construction; only history and the current route change
//! - A navigation that is overtaken while its view loads is dropped, never committed
//! - Rejected navigations leave history and the current route untouched

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use snafu::prelude::*;
use tokio::sync::watch;

use super::error::{
    CancelledSnafu, DuplicateNameSnafu, DuplicatePathSnafu, DuplicatedSnafu, LoadFailedSnafu,
    NavigationFailure, NoHistorySnafu, NotFoundSnafu, RouterError,
    UnknownRouteSnafu,
};
use super::history::{History, HistoryMode};
use super::loader::{ComponentLoader, ViewModule};
use super::location::Location;
use super::path::{Params, PathOptions, PathPattern};
use super::record::RouteRecord;
use crate::state::Entity;

/// Input of [`create_router`].
#[derive(Debug)]
pub struct RouterOptions {
    pub history: History,
    pub routes: Vec<RouteRecord>,
    pub path_options: PathOptions,
}

impl RouterOptions {
    pub fn new(history: History, routes: Vec<RouteRecord>) -> Self {
        Self {
            history,
            routes,
            path_options: PathOptions::default(),
        }
    }

    /// Match static segments case-sensitively.
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.path_options.sensitive = sensitive;
        self
    }

    /// Make trailing slashes significant.
    pub fn strict(mut self, strict: bool) -> Self {
        self.path_options.strict = strict;
        self
    }
}

/// A location matched against the route table.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// Name of the matched record.
    pub name: String,
    /// Pattern of the matched record.
    pub pattern: String,
    /// Matched application path.
    pub path: String,
    /// Path plus query and hash.
    pub full_path: String,
    /// Browser URL for this location.
    pub href: String,
    pub params: Params,
    pub query: Vec<(String, String)>,
    pub hash: Option<String>,
    loader: ComponentLoader,
}

impl ResolvedRoute {
    /// The loader of the matched record.
    pub fn loader(&self) -> &ComponentLoader {
        &self.loader
    }
}

/// A committed navigation.
#[derive(Clone)]
pub struct Navigation {
    /// Increases with every commit; views use it to detect a route change.
    pub id: u64,
    pub route: ResolvedRoute,
    pub module: Arc<dyn ViewModule>,
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigation")
            .field("id", &self.id)
            .field("route", &self.route.name)
            .field("full_path", &self.route.full_path)
            .field("module", &self.module.name())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Commit {
    Push,
    Replace,
    Traverse(isize),
}

struct CompiledRoute {
    pattern: PathPattern,
    name: String,
    loader: ComponentLoader,
}

/// Navigation handle: route table, history and the currently committed route.
pub struct Router {
    routes: Vec<CompiledRoute>,
    path_options: PathOptions,
    history: Mutex<History>,
    current: Entity<Option<Navigation>>,
    pending: AtomicU64,
    commits: AtomicU64,
    ready: watch::Sender<bool>,
}

/// Compile a route table. Fails on duplicate paths, duplicate names and malformed patterns.
pub fn create_router(options: RouterOptions) -> Result<Router, RouterError> {
    let RouterOptions {
        history,
        routes,
        path_options,
    } = options;

    let mut shapes: HashMap<String, String> = HashMap::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut compiled = Vec::with_capacity(routes.len());

    for record in routes {
        let pattern = PathPattern::parse(&record.path)?;
        let shape = pattern.shape(path_options);
        if let Some(existing) = shapes.get(&shape) {
            return DuplicatePathSnafu {
                existing: existing.clone(),
                duplicate: record.path,
            }
            .fail();
        }
        if !names.insert(record.name.clone()) {
            return DuplicateNameSnafu { name: record.name }.fail();
        }
        shapes.insert(shape, record.path.clone());

        tracing::debug!(path = %record.path, name = %record.name, "Compiled route");
        compiled.push(CompiledRoute {
            pattern,
            name: record.name,
            loader: record.loader,
        });
    }

    // Stable sort: equal scores keep declaration order.
    compiled.sort_by(|a, b| b.pattern.score().cmp(&a.pattern.score()));

    tracing::info!(
        routes = compiled.len(),
        base = %history.base(),
        mode = ?history.mode(),
        "Route table ready"
    );

    let (ready, _) = watch::channel(false);
    Ok(Router {
        routes: compiled,
        path_options,
        history: Mutex::new(history),
        current: Entity::new(None),
        pending: AtomicU64::new(0),
        commits: AtomicU64::new(0),
        ready,
    })
}

impl Router {
    // --- Table ---

    /// `(name, pattern)` of every route, highest rank first.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes
            .iter()
            .map(|r| (r.name.as_str(), r.pattern.source()))
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.iter().any(|r| r.name == name)
    }

    /// The normalized base the table is mounted under.
    pub fn base(&self) -> String {
        self.history().base().to_string()
    }

    pub fn mode(&self) -> HistoryMode {
        self.history().mode()
    }

    // --- Resolution ---

    /// Resolve a browser URL. `None` if it lies outside the base or matches no route.
    pub fn resolve(&self, url: &str) -> Option<ResolvedRoute> {
        let location = self.history().strip_base(url)?;
        self.resolve_location(&location)
    }

    /// Resolve an application location such as `/` or `/games?x=1`.
    pub fn resolve_location(&self, location: &str) -> Option<ResolvedRoute> {
        let location = Location::absolute(location).ok()?;
        self.match_location(&location)
    }

    /// Build the location of a named route.
    pub fn resolve_named(&self, name: &str, params: &Params) -> Result<ResolvedRoute, RouterError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name == name)
            .context(UnknownRouteSnafu { name })?;
        let path = route
            .pattern
            .build(params)
            .map_err(|param| RouterError::MissingParam {
                name: name.to_string(),
                param,
            })?;
        Ok(ResolvedRoute {
            name: route.name.clone(),
            pattern: route.pattern.source().to_string(),
            href: self.href(&path),
            full_path: path.clone(),
            path,
            params: params.clone(),
            query: Vec::new(),
            hash: None,
            loader: route.loader.clone(),
        })
    }

    /// The browser URL for an application location.
    pub fn href(&self, location: &str) -> String {
        self.history().create_href(location)
    }

    fn match_location(&self, location: &Location) -> Option<ResolvedRoute> {
        self.routes.iter().find_map(|route| {
            let params = route.pattern.matches(location.path(), self.path_options)?;
            let full_path = location.full_path();
            Some(ResolvedRoute {
                name: route.name.clone(),
                pattern: route.pattern.source().to_string(),
                path: location.path().to_string(),
                href: self.href(&full_path),
                full_path,
                params,
                query: location.query_pairs(),
                hash: location.hash().map(str::to_string),
                loader: route.loader.clone(),
            })
        })
    }

    // --- Current state ---

    /// The committed route, if any navigation has succeeded yet.
    pub fn current_route(&self) -> Option<ResolvedRoute> {
        self.current().map(|n| n.route)
    }

    /// The committed navigation including its loaded module.
    pub fn current(&self) -> Option<Navigation> {
        self.current.read(|c| c.clone()).ok().flatten()
    }

    /// Entity holding the committed navigation; views subscribe to it to re-render.
    pub fn current_entity(&self) -> &Entity<Option<Navigation>> {
        &self.current
    }

    /// Notified on every commit.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.current.subscribe()
    }

    /// The current history location.
    pub fn location(&self) -> String {
        self.history().location().to_string()
    }

    pub fn can_go_back(&self) -> bool {
        self.history().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history().can_go_forward()
    }

    /// Resolves once the first navigation has committed.
    pub async fn is_ready(&self) {
        let mut rx = self.ready.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    // --- Navigation ---

    /// Initial navigation from the browser URL the application was opened at.
    pub async fn start(&self, url: &str) -> Result<Navigation, NavigationFailure> {
        let location = self.browser_location(url)?;
        self.navigate(location, Commit::Replace).await
    }

    /// Navigate to a browser URL, pushing a history entry.
    pub async fn navigate_url(&self, url: &str) -> Result<Navigation, NavigationFailure> {
        let location = self.browser_location(url)?;
        self.navigate(location, Commit::Push).await
    }

    /// Navigate to an application location, pushing a history entry.
    ///
    /// Relative locations resolve against the current location.
    pub async fn push(&self, to: &str) -> Result<Navigation, NavigationFailure> {
        let location = self.app_location(to)?;
        self.navigate(location, Commit::Push).await
    }

    /// Navigate to an application location, replacing the current history entry.
    pub async fn replace(&self, to: &str) -> Result<Navigation, NavigationFailure> {
        let location = self.app_location(to)?;
        self.navigate(location, Commit::Replace).await
    }

    pub async fn back(&self) -> Result<Navigation, NavigationFailure> {
        self.go(-1).await
    }

    pub async fn forward(&self) -> Result<Navigation, NavigationFailure> {
        self.go(1).await
    }

    /// Move `delta` entries through history. The move happens only if the target view loads.
    pub async fn go(&self, delta: isize) -> Result<Navigation, NavigationFailure> {
        let target = self.history().peek(delta).map(str::to_string);
        let target = target.context(NoHistorySnafu)?;
        let location = Location::absolute(&target)
            .ok()
            .context(NotFoundSnafu { location: target })?;
        self.navigate(location, Commit::Traverse(delta)).await
    }

    fn browser_location(&self, url: &str) -> Result<Location, NavigationFailure> {
        let stripped = self.history().strip_base(url);
        stripped
            .and_then(|l| Location::absolute(&l).ok())
            .context(NotFoundSnafu { location: url })
    }

    fn app_location(&self, to: &str) -> Result<Location, NavigationFailure> {
        let current = self.location();
        Location::parse(to, &current)
            .ok()
            .context(NotFoundSnafu { location: to })
    }

    async fn navigate(
        &self,
        location: Location,
        commit: Commit,
    ) -> Result<Navigation, NavigationFailure> {
        let full_path = location.full_path();

        let Some(route) = self.match_location(&location) else {
            tracing::warn!(location = %full_path, "No route matches location");
            return NotFoundSnafu { location: full_path }.fail();
        };

        if !matches!(commit, Commit::Traverse(_)) {
            let current = self.current_route().map(|r| r.full_path);
            if current.as_deref() == Some(full_path.as_str()) {
                tracing::debug!(location = %full_path, "Navigation to current location ignored");
                return DuplicatedSnafu { location: full_path }.fail();
            }
        }

        let ticket = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(route = %route.name, location = %full_path, "Loading route view");
        let loaded = route.loader.load().await;

        if self.pending.load(Ordering::SeqCst) != ticket {
            tracing::debug!(location = %full_path, "Navigation superseded while loading");
            return CancelledSnafu { location: full_path }.fail();
        }

        let module = match loaded.context(LoadFailedSnafu {
            route: route.name.clone(),
        }) {
            Ok(module) => module,
            Err(failure) => {
                tracing::error!(route = %route.name, location = %full_path, error = %failure, "Route view failed to load");
                return Err(failure);
            }
        };

        {
            let mut history = self.history();
            match commit {
                Commit::Push => history.push(full_path.clone()),
                Commit::Replace => history.replace(full_path.clone()),
                Commit::Traverse(delta) => {
                    history.go(delta);
                }
            }
        }

        let navigation = Navigation {
            id: self.commits.fetch_add(1, Ordering::SeqCst) + 1,
            route,
            module,
        };
        let _ = self.current.update(|c| *c = Some(navigation.clone()));
        self.ready.send_replace(true);

        tracing::info!(
            route = %navigation.route.name,
            location = %navigation.route.full_path,
            href = %navigation.route.href,
            "Navigation committed"
        );
        Ok(navigation)
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes().collect::<Vec<_>>())
            .field("location", &self.location())
            .finish()
    }
}
