//! The view outlet that mounts whatever the router committed.

use std::future::Future;
use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use super::error::NavigationFailure;
use super::loader::ViewModule;
use super::navigation::{Navigation, Router};
use crate::application::{Context, EventContext};
use crate::component::traits::{Action, AnyComponent, Component, Event};
use crate::state::Entity;
use crate::task::TaskTracker;

struct Mounted {
    id: u64,
    route: String,
    module: Arc<dyn ViewModule>,
    component: Box<dyn AnyComponent>,
}

/// Renders the committed route's view and turns navigation actions into router calls.
///
/// Until the first navigation commits, `fallback` is shown. A rejected navigation keeps the
/// mounted view and shows the failure on a one-line notice bar.
pub struct RouterView {
    router: Arc<Router>,
    start: Option<String>,
    mounted: Option<Mounted>,
    fallback: Box<dyn AnyComponent>,
    notice: Entity<Option<String>>,
    tasks: TaskTracker,
}

impl RouterView {
    pub fn new<F: Component>(router: Arc<Router>, fallback: F) -> Self {
        Self {
            router,
            start: None,
            mounted: None,
            fallback: Box::new(fallback),
            notice: Entity::new(None),
            tasks: TaskTracker::new(),
        }
    }

    /// Run the initial navigation from `url` once the view is mounted.
    pub fn start_at(mut self, url: impl Into<String>) -> Self {
        self.start = Some(url.into());
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Name of the route whose view is mounted.
    pub fn mounted_route(&self) -> Option<&str> {
        self.mounted.as_ref().map(|m| m.route.as_str())
    }

    /// Message of the last rejected navigation, cleared by the next successful one.
    pub fn notice(&self) -> Option<String> {
        self.notice.read(|n| n.clone()).ok().flatten()
    }

    /// Bring the mounted view in line with the router's committed navigation.
    fn sync(&mut self, cx: &mut Context<Self>) {
        let Some(navigation) = self.router.current() else {
            return;
        };
        if self.mounted.as_ref().map(|m| m.id) == Some(navigation.id) {
            return;
        }

        let Navigation { id, route, module } = navigation;
        if let Some(mounted) = self.mounted.as_mut() {
            if Arc::ptr_eq(&mounted.module, &module) {
                mounted.id = id;
                mounted.route = route.name;
                return;
            }
        }

        if let Some(mut previous) = self.mounted.take() {
            previous.component.on_exit_any(&mut cx.cast());
        }
        let mut component = module.mount();
        component.on_init_any(&mut cx.cast());
        tracing::debug!(route = %route.name, view = %module.name(), "Mounted view");

        self.mounted = Some(Mounted {
            id,
            route: route.name,
            module,
            component,
        });
    }

    fn dispatch(&mut self, action: Action, cx: &mut EventContext<Self>) -> Option<Action> {
        match action {
            Action::Navigate(to) => {
                let label = format!("navigate {}", to);
                self.spawn_navigation(label, cx, move |router| async move { router.push(&to).await });
                None
            }
            Action::Back => {
                self.spawn_navigation("back", cx, |router| async move { router.back().await });
                None
            }
            Action::Forward => {
                self.spawn_navigation("forward", cx, |router| async move { router.forward().await });
                None
            }
            Action::Quit => Some(Action::Quit),
            Action::Noop => None,
        }
    }

    fn spawn_navigation<F, Fut>(&mut self, label: impl Into<String>, cx: &Context<Self>, f: F)
    where
        F: FnOnce(Arc<Router>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Navigation, NavigationFailure>> + Send + 'static,
    {
        let router = Arc::clone(&self.router);
        let notice = self.notice.clone();
        let handle = cx.spawn(move |app| async move {
            match f(router).await {
                Ok(_) => {
                    let _ = notice.update(|n| *n = None);
                }
                Err(failure) if failure.is_benign() => {}
                Err(failure) => {
                    tracing::warn!(error = %failure, "Navigation rejected");
                    let _ = notice.update(|n| *n = Some(failure.to_string()));
                }
            }
            app.refresh();
        });
        self.tasks.track(label, handle);
    }

    fn active(&mut self) -> &mut dyn AnyComponent {
        match self.mounted.as_mut() {
            Some(mounted) => mounted.component.as_mut(),
            None => self.fallback.as_mut(),
        }
    }
}

impl Component for RouterView {
    fn on_init(&mut self, cx: &mut Context<Self>) {
        if let Some(url) = self.start.take() {
            let label = format!("start {}", url);
            self.spawn_navigation(label, cx, move |router| async move { router.start(&url).await });
        }
    }

    fn on_exit(&mut self, cx: &mut Context<Self>) {
        self.tasks.abort_all();
        self.active().on_exit_any(&mut cx.cast());
    }

    fn on_shutdown(&mut self, cx: &mut Context<Self>) {
        self.tasks.abort_all();
        self.active().on_shutdown_any(&mut cx.cast());
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        cx.subscribe(self.router.current_entity());
        cx.subscribe(&self.notice);
        self.sync(cx);

        let notice = self.notice();
        let (content, bar) = match notice {
            Some(_) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(cx.area);
                (chunks[0], Some(chunks[1]))
            }
            None => (cx.area, None),
        };

        let mut inner = cx.with_area(content).cast::<dyn AnyComponent>();
        self.active().render_any(frame, &mut inner);

        if let (Some(message), Some(bar)) = (notice, bar) {
            let line = Paragraph::new(format!(" ⚠ {} ", message))
                .style(Style::default().bg(Color::Red).fg(Color::White).add_modifier(Modifier::BOLD));
            frame.render_widget(line, bar);
        }
    }

    fn handle_event(&mut self, event: Event, cx: &mut EventContext<Self>) -> Option<Action> {
        let action = {
            let mut inner = cx.cast::<dyn AnyComponent>();
            self.active().handle_event_any(event, &mut inner)
        };
        action.and_then(|action| self.dispatch(action, cx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppContext;
    use crate::router::history::create_web_history;
    use crate::router::loader::{ComponentLoader, ComponentModule};
    use crate::router::navigation::{create_router, RouterOptions};
    use crate::router::record::RouteRecord;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    struct Label(&'static str);

    impl Component for Label {
        fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
            frame.render_widget(Paragraph::new(self.0), cx.area);
        }

        fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
            match event {
                Event::Key(key) if key.code == KeyCode::Char('x') => {
                    Some(Action::Navigate("/missing".into()))
                }
                Event::Key(key) if key.code == KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            }
        }
    }

    fn board() -> Label {
        Label("chess board")
    }

    fn router() -> Arc<Router> {
        let loader = ComponentLoader::ready(Arc::new(ComponentModule::new("Chess", board)));
        let routes = vec![RouteRecord::new("/", "Chess", loader)];
        Arc::new(create_router(RouterOptions::new(create_web_history("/"), routes)).unwrap())
    }

    fn draw(view: &mut RouterView, app: &AppContext) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 4)).unwrap();
        terminal
            .draw(|frame| {
                let mut cx = Context::new(app.clone(), frame.area());
                view.render(frame, &mut cx);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_fallback_until_first_navigation() {
        let app = AppContext::detached();
        let router = router();
        let mut view = RouterView::new(Arc::clone(&router), Label("loading"));

        assert!(draw(&mut view, &app).contains("loading"));
        assert!(view.mounted_route().is_none());

        router.start("/").await.unwrap();
        assert!(draw(&mut view, &app).contains("chess board"));
        assert_eq!(view.mounted_route(), Some("Chess"));
    }

    #[tokio::test]
    async fn test_rejected_navigation_shows_notice() {
        let app = AppContext::detached();
        let router = router();
        router.start("/").await.unwrap();
        let mut view = RouterView::new(Arc::clone(&router), Label("loading"));
        draw(&mut view, &app);

        let mut cx = Context::new(app.clone(), Default::default());
        assert_eq!(view.handle_event(key('x'), &mut cx), None);

        let notice = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if let Some(notice) = view.notice() {
                    return notice;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(notice, "no route matches '/missing'");

        let screen = draw(&mut view, &app);
        assert!(screen.contains("chess board"));
        assert!(screen.contains("no route matches"));
        assert_eq!(router.location(), "/");
    }

    async fn wait_until(mut done: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_start_at_runs_initial_navigation() {
        let app = AppContext::detached();
        let router = router();
        let mut view = RouterView::new(Arc::clone(&router), Label("loading")).start_at("/");
        view.on_init(&mut Context::new(app.clone(), Default::default()));

        wait_until(|| router.current().is_some()).await;
        assert!(draw(&mut view, &app).contains("chess board"));
    }

    #[tokio::test]
    async fn test_failed_start_keeps_fallback() {
        let app = AppContext::detached();
        let router = router();
        let mut view = RouterView::new(Arc::clone(&router), Label("loading")).start_at("/elsewhere");
        view.on_init(&mut Context::new(app.clone(), Default::default()));

        wait_until(|| view.notice().is_some()).await;
        let screen = draw(&mut view, &app);
        assert!(screen.contains("loading"));
        assert!(screen.contains("no route matches '/elsewhere'"));
    }

    #[tokio::test]
    async fn test_quit_passes_through() {
        let app = AppContext::detached();
        let mut view = RouterView::new(router(), Label("loading"));
        let mut cx = Context::new(app, Default::default());
        assert_eq!(view.handle_event(key('q'), &mut cx), Some(Action::Quit));
    }
}
