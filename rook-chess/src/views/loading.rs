/// Shown by the router outlet until the first navigation commits.
#[rook::component("Loading…")]
pub struct LoadingView;

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use rook::{AppContext, Component, Context};

    #[test]
    fn test_renders_message() {
        let mut view = LoadingView;
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|frame| {
                let mut cx = Context::new(AppContext::detached(), frame.area());
                view.render(frame, &mut cx);
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Loading"));
    }
}
