pub mod application;
pub mod component;
pub mod error;
pub mod router;
pub mod state;
pub mod task;

pub use error::{Error, Result};

// Re-export common types for convenience
pub use application::{AppContext, Application, Context, EventContext};
pub use component::{Component, traits::{Action, AnyComponent, Event}};
pub use router::{
    create_router, create_web_hash_history, create_web_history, ComponentLoader, ComponentModule,
    LoadError, NavigationFailure, RouteRecord, Router, RouterError, RouterOptions, RouterView,
    ViewModule,
};
pub use state::{Entity, EntityId};
pub use task::{TaskHandle, TaskTracker};

pub use rook_macros::component;
