//! The application's route table.

use std::sync::Arc;

use rook::router::{
    create_router, create_web_history, ComponentLoader, ComponentModule, LoadError, Router,
    RouterError, RouterOptions, ViewModule,
};
use rook::routes;

use crate::views::ChessView;

/// Name of the root route.
pub const CHESS_ROUTE: &str = "Chess";

/// Deferred loader for the Chess view.
///
/// The module is built on the blocking pool the first time a navigation needs it; later
/// navigations reuse the cached module.
pub fn chess_loader() -> ComponentLoader {
    ComponentLoader::new(|| async {
        let module = tokio::task::spawn_blocking(|| -> Arc<dyn ViewModule> {
            Arc::new(ComponentModule::new(CHESS_ROUTE, ChessView::new))
        })
        .await
        .map_err(|e| LoadError::with_cause("chess view failed to initialize", e))?;

        tracing::debug!(view = CHESS_ROUTE, "View module loaded");
        Ok::<_, LoadError>(module)
    })
}

/// Build the route table mounted under `base_url`: `/` serves the Chess view.
pub fn create_route_table(base_url: &str) -> Result<Router, RouterError> {
    create_router(RouterOptions::new(
        create_web_history(base_url),
        routes! {
            "/" => "Chess": chess_loader(),
        },
    ))
}
