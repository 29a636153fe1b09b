//! Client-side routing.
//!
//! A route table maps URL paths to views that are loaded on first use. [`create_router`]
//! compiles [`RouteRecord`]s against a [`History`]; the resulting [`Router`] resolves URLs,
//! runs navigations and publishes the committed route. [`RouterView`] mounts that route's view.
//!
//! # Example
//! ```ignore
//! use rook::router::{create_router, create_web_history, RouterOptions};
//!
//! let router = create_router(RouterOptions::new(
//!     create_web_history("/app/"),
//!     rook::routes! { "/" => "Chess": chess_loader() },
//! ))?;
//! ```

pub mod error;
pub mod history;
pub mod loader;
pub mod location;
pub mod navigation;
pub mod path;
pub mod record;
pub mod view;

pub use error::{LoadError, NavigationFailure, RouterError};
pub use history::{create_web_hash_history, create_web_history, History, HistoryMode};
pub use loader::{ComponentLoader, ComponentModule, LoadFuture, ViewModule};
pub use location::Location;
pub use navigation::{create_router, Navigation, ResolvedRoute, Router, RouterOptions};
pub use path::{Params, PathOptions, PathPattern};
pub use record::RouteRecord;
pub use view::RouterView;
