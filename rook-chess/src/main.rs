//! Terminal chess board with client-side routing.

use std::sync::Arc;

use anyhow::Context as _;
use rook::{Application, RouterView};
use rook_chess::config::AppConfig;
use rook_chess::logging;
use rook_chess::routes::create_route_table;
use rook_chess::views::LoadingView;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    logging::init(config.log_file.as_deref())?;

    tracing::info!(base_url = %config.base_url, start_url = %config.start_url, "rook-chess starting");

    let router = create_route_table(&config.base_url)
        .map(Arc::new)
        .with_context(|| format!("invalid route table for base URL '{}'", config.base_url))?;

    Application::new().run(move |cx| {
        cx.set_root(RouterView::new(router, LoadingView).start_at(config.start_url))?;
        Ok(())
    })
}
