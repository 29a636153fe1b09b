//! Chess board view.
//! Free play on a standard starting position: pieces move wherever they are put, legality is
//! left to the players.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use rook::{Action, Component, Context, Entity, Event, EventContext};

const BOARD_SIZE: usize = 8;
const FILES: [char; BOARD_SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub side: Side,
    pub kind: Kind,
}

impl Piece {
    pub fn new(side: Side, kind: Kind) -> Self {
        Self { side, kind }
    }

    pub fn symbol(&self) -> &'static str {
        match (self.side, self.kind) {
            (Side::White, Kind::King) => "♔",
            (Side::White, Kind::Queen) => "♕",
            (Side::White, Kind::Rook) => "♖",
            (Side::White, Kind::Bishop) => "♗",
            (Side::White, Kind::Knight) => "♘",
            (Side::White, Kind::Pawn) => "♙",
            (Side::Black, Kind::King) => "♚",
            (Side::Black, Kind::Queen) => "♛",
            (Side::Black, Kind::Rook) => "♜",
            (Side::Black, Kind::Bishop) => "♝",
            (Side::Black, Kind::Knight) => "♞",
            (Side::Black, Kind::Pawn) => "♟",
        }
    }
}

/// Square name in algebraic notation. Row 0 is rank 8.
pub fn square_name(row: usize, col: usize) -> String {
    format!("{}{}", FILES[col], BOARD_SIZE - row)
}

// ============================================
// Board
// ============================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        use Kind::*;
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut squares = [[None; BOARD_SIZE]; BOARD_SIZE];
        for col in 0..BOARD_SIZE {
            squares[0][col] = Some(Piece::new(Side::Black, back[col]));
            squares[1][col] = Some(Piece::new(Side::Black, Pawn));
            squares[6][col] = Some(Piece::new(Side::White, Pawn));
            squares[7][col] = Some(Piece::new(Side::White, back[col]));
        }
        Self { squares }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.squares[row][col]
    }

    /// Move whatever stands on `from` to `to`, returning the captured piece.
    pub fn relocate(&mut self, from: (usize, usize), to: (usize, usize)) -> Option<Piece> {
        let piece = self.squares[from.0][from.1].take();
        std::mem::replace(&mut self.squares[to.0][to.1], piece)
    }

    pub fn count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.map_or(false, |p| p.side == side))
            .count()
    }
}

// ============================================
// Game State
// ============================================
#[derive(Clone, Debug)]
pub struct ChessState {
    board: Board,
    cursor: (usize, usize),
    selected: Option<(usize, usize)>,
    turn: Side,
    moves: Vec<String>,
    captured: Vec<Piece>,
    message: Option<String>,
}

impl Default for ChessState {
    fn default() -> Self {
        Self {
            board: Board::new(),
            cursor: (6, 4),
            selected: None,
            turn: Side::White,
            moves: Vec::new(),
            captured: Vec::new(),
            message: None,
        }
    }
}

impl ChessState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn selected(&self) -> Option<(usize, usize)> {
        self.selected
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let clamp = |v: usize, d: isize| (v as isize + d).clamp(0, BOARD_SIZE as isize - 1) as usize;
        self.cursor = (clamp(self.cursor.0, d_row), clamp(self.cursor.1, d_col));
    }

    /// Select the piece under the cursor, or move the selected piece there.
    pub fn activate(&mut self) {
        let target = self.cursor;
        let Some(from) = self.selected else {
            match self.board.get(target.0, target.1) {
                Some(piece) if piece.side == self.turn => {
                    self.selected = Some(target);
                    self.message = None;
                }
                _ => {
                    self.message = Some(format!("Pick a {} piece", self.turn.label()));
                }
            }
            return;
        };

        if from == target {
            self.selected = None;
            return;
        }
        if let Some(piece) = self.board.get(target.0, target.1) {
            if piece.side == self.turn {
                self.selected = Some(target);
                return;
            }
        }

        if let Some(taken) = self.board.relocate(from, target) {
            self.captured.push(taken);
        }
        self.moves.push(format!(
            "{}-{}",
            square_name(from.0, from.1),
            square_name(target.0, target.1)
        ));
        self.selected = None;
        self.message = None;
        self.turn = self.turn.opponent();
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.message = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================
// Chess View Component
// ============================================
pub struct ChessView {
    state: Entity<ChessState>,
}

impl Default for ChessView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessView {
    pub fn new() -> Self {
        Self {
            state: Entity::new(ChessState::default()),
        }
    }

    pub fn state(&self) -> ChessState {
        self.state.read(|s| s.clone()).unwrap_or_default()
    }

    fn render_board(&self, frame: &mut ratatui::Frame, area: Rect, state: &ChessState) {
        let mut lines = Vec::with_capacity(BOARD_SIZE + 1);
        for row in 0..BOARD_SIZE {
            let mut spans = vec![Span::styled(
                format!(" {} ", BOARD_SIZE - row),
                Style::default().fg(Color::DarkGray),
            )];
            for col in 0..BOARD_SIZE {
                let light = (row + col) % 2 == 0;
                let mut bg = if light { Color::Rgb(240, 217, 181) } else { Color::Rgb(181, 136, 99) };
                if state.selected == Some((row, col)) {
                    bg = Color::Green;
                } else if state.cursor == (row, col) {
                    bg = Color::Cyan;
                }
                let symbol = state.board.get(row, col).map_or(" ", |p| p.symbol());
                spans.push(Span::styled(
                    format!(" {} ", symbol),
                    Style::default().bg(bg).fg(Color::Black),
                ));
            }
            lines.push(Line::from(spans));
        }
        let files: String = FILES.iter().map(|f| format!(" {} ", f)).collect();
        lines.push(Line::from(Span::styled(
            format!("   {}", files),
            Style::default().fg(Color::DarkGray),
        )));

        let board = Paragraph::new(lines).block(
            Block::default()
                .title(" Board ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(board, area);
    }

    fn render_info_panel(&self, frame: &mut ratatui::Frame, area: Rect, state: &ChessState) {
        let turn_color = match state.turn {
            Side::White => Color::White,
            Side::Black => Color::Yellow,
        };
        let (row, col) = state.cursor;
        let captured: String = state.captured.iter().map(|p| p.symbol()).collect();
        let last = state.moves.last().cloned().unwrap_or_else(|| "-".to_string());

        let mut info_lines = vec![
            Line::from(vec![
                Span::styled(" Turn: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} to move", state.turn.label()),
                    Style::default().fg(turn_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Cursor: ", Style::default().fg(Color::DarkGray)),
                Span::styled(square_name(row, col), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled(" Moves: ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{} (last {})", state.moves.len(), last)),
            ]),
            Line::from(vec![
                Span::styled(" Taken: ", Style::default().fg(Color::DarkGray)),
                Span::raw(captured),
            ]),
        ];
        if let Some(message) = &state.message {
            info_lines.push(Line::from(""));
            info_lines.push(Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Red),
            )));
        }

        let info = Paragraph::new(info_lines).block(
            Block::default()
                .title(" Game ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Magenta)),
        );
        frame.render_widget(info, area);
    }
}

impl Component for ChessView {
    fn on_init(&mut self, _cx: &mut Context<Self>) {
        tracing::debug!("Chess view mounted");
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        cx.subscribe(&self.state);
        let state = self.state();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(cx.area);

        let content_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(main_layout[0]);

        self.render_board(frame, content_layout[0], &state);
        self.render_info_panel(frame, content_layout[1], &state);

        let footer = Paragraph::new(" ←↑↓→ Move | Enter Select | Esc Clear | R Reset | B/F History | Q Quit ")
            .style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .alignment(Alignment::Center);
        frame.render_widget(footer, main_layout[1]);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut EventContext<Self>) -> Option<Action> {
        let Event::Key(key) = event else {
            return None;
        };
        let update = |f: fn(&mut ChessState)| {
            let _ = self.state.update(f);
            None
        };
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('b') => Some(Action::Back),
            KeyCode::Char('f') => Some(Action::Forward),
            KeyCode::Char('r') => update(ChessState::reset),
            KeyCode::Esc => update(ChessState::deselect),
            KeyCode::Up | KeyCode::Char('k') => update(|s| s.move_cursor(-1, 0)),
            KeyCode::Down | KeyCode::Char('j') => update(|s| s.move_cursor(1, 0)),
            KeyCode::Left | KeyCode::Char('h') => update(|s| s.move_cursor(0, -1)),
            KeyCode::Right | KeyCode::Char('l') => update(|s| s.move_cursor(0, 1)),
            KeyCode::Enter | KeyCode::Char(' ') => update(ChessState::activate),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use rook::AppContext;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press(view: &mut ChessView, codes: &[KeyCode]) -> Option<Action> {
        let mut cx = EventContext::new(AppContext::detached(), Rect::default());
        let mut last = None;
        for code in codes {
            last = view.handle_event(key(*code), &mut cx);
        }
        last
    }

    #[test]
    fn test_starting_position() {
        let board = Board::new();
        assert_eq!(board.count(Side::White), 16);
        assert_eq!(board.count(Side::Black), 16);
        assert_eq!(board.get(7, 4), Some(Piece::new(Side::White, Kind::King)));
        assert_eq!(board.get(0, 3), Some(Piece::new(Side::Black, Kind::Queen)));
        assert_eq!(square_name(6, 4), "e2");
    }

    #[test]
    fn test_move_flips_turn() {
        let mut view = ChessView::new();
        press(&mut view, &[KeyCode::Enter, KeyCode::Up, KeyCode::Up, KeyCode::Enter]);

        let state = view.state();
        assert_eq!(state.turn(), Side::Black);
        assert_eq!(state.moves(), ["e2-e4"]);
        assert_eq!(state.board().get(4, 4), Some(Piece::new(Side::White, Kind::Pawn)));
        assert_eq!(state.board().get(6, 4), None);
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_wrong_side_cannot_be_selected() {
        let mut state = ChessState::default();
        state.cursor = (1, 4);
        state.activate();
        assert!(state.selected().is_none());
        assert_eq!(state.message.as_deref(), Some("Pick a White piece"));
    }

    #[test]
    fn test_capture_and_reset() {
        let mut state = ChessState::default();
        state.cursor = (6, 0);
        state.activate();
        state.cursor = (1, 0);
        state.activate();
        assert_eq!(state.captured(), [Piece::new(Side::Black, Kind::Pawn)]);
        assert_eq!(state.board().count(Side::Black), 15);

        state.reset();
        assert!(state.captured().is_empty());
        assert_eq!(state.turn(), Side::White);
        assert_eq!(state.cursor(), (6, 4));
    }

    #[test]
    fn test_reselect_own_piece() {
        let mut state = ChessState::default();
        state.activate();
        state.cursor = (7, 6);
        state.activate();
        assert_eq!(state.selected(), Some((7, 6)));
        assert!(state.moves().is_empty());
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut state = ChessState::default();
        state.move_cursor(5, 9);
        assert_eq!(state.cursor(), (7, 7));
    }

    #[test]
    fn test_navigation_keys() {
        let mut view = ChessView::new();
        assert_eq!(press(&mut view, &[KeyCode::Char('q')]), Some(Action::Quit));
        assert_eq!(press(&mut view, &[KeyCode::Char('b')]), Some(Action::Back));
        assert_eq!(press(&mut view, &[KeyCode::Char('f')]), Some(Action::Forward));
        assert_eq!(press(&mut view, &[KeyCode::Char('x')]), None);
    }

    #[tokio::test]
    async fn test_render_shows_turn() {
        let mut view = ChessView::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
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
        assert!(screen.contains("White to move"));
        assert!(screen.contains("♔"));
    }
}
