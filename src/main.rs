mod error;
mod events;
mod level;
mod sweep;

use crate::{
    error::Error,
    events::{Event, Events},
    level::GameLevel,
    sweep::{Board, Cell, CellState, ChordIntent, Content, Coordinate, Status},
};
use anyhow::Result;
use crossterm::{
    event::{KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use num_traits::ToPrimitive;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::Stdout;
use structopt::StructOpt;
use typed_builder::TypedBuilder;

#[derive(Debug, StructOpt)]
#[structopt(name = "minesweep-plus", about = "A game of minesweeper")]
struct Opt {
    /// Difficulty: easy, normal or hard. Unrecognized names fall back to
    /// normal.
    #[structopt(short, long, default_value = "normal")]
    level: GameLevel,

    /// Number of rows for a custom board
    #[structopt(long)]
    rows: Option<usize>,

    /// Number of columns for a custom board
    #[structopt(long)]
    columns: Option<usize>,

    /// Number of mines for a custom board
    #[structopt(long)]
    mines: Option<usize>,

    /// Seed for the mine layout, for reproducible games
    #[structopt(short, long)]
    seed: Option<u64>,
}

impl Opt {
    fn resolve_level(&self) -> Result<GameLevel> {
        match (self.rows, self.columns, self.mines) {
            (None, None, None) => Ok(self.level),
            (Some(rows), Some(columns), Some(mines)) => {
                Ok(GameLevel::custom(rows, columns, mines)?)
            }
            _ => anyhow::bail!("custom boards need --rows, --columns and --mines together"),
        }
    }
}

#[derive(TypedBuilder)]
struct App {
    board: Board,
    level: GameLevel,
    seed: Option<u64>,
    #[builder(default)]
    cursor: Coordinate,
    #[builder(default)]
    should_quit: bool,
}

impl App {
    fn cursor_index(&self) -> usize {
        self.board.index_from_coord(self.cursor)
    }

    fn new_game(&mut self, level: GameLevel) {
        self.level = level;
        self.board = Board::new(&level, self.seed);
        self.cursor = (0, 0);
    }

    fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.0 = self.cursor.0.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.0 = (self.cursor.0 + 1).min(self.board.rows - 1);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor.1 = self.cursor.1.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cursor.1 = (self.cursor.1 + 1).min(self.board.columns - 1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.board.reveal(self.cursor_index());
            }
            KeyCode::Char('f') => self.board.toggle_flag(self.cursor_index()),
            KeyCode::Char('o') => {
                self.board.chord(self.cursor_index(), ChordIntent::Open);
            }
            KeyCode::Char('x') => {
                self.board.chord(self.cursor_index(), ChordIntent::Flag);
            }
            KeyCode::Char('r') => self.board.restart(),
            KeyCode::Char('n') => self.new_game(self.level),
            KeyCode::Char('1') => self.new_game(GameLevel::easy()),
            KeyCode::Char('2') => self.new_game(GameLevel::normal()),
            KeyCode::Char('3') => self.new_game(GameLevel::hard()),
            _ => {}
        }
    }
}

fn digit_color(n: u8) -> Color {
    match n {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::LightBlue,
        5 => Color::LightRed,
        6 => Color::Magenta,
        7 => Color::Yellow,
        _ => Color::White,
    }
}

fn cell_symbol(cell: &Cell) -> String {
    match cell.state {
        CellState::Covered => String::from("."),
        CellState::Flagged => String::from("X"),
        CellState::Revealed => match cell.content {
            Content::Mine => String::from("*"),
            Content::Empty(0) => String::from(" "),
            Content::Empty(n) => n.to_string(),
        },
    }
}

fn cell_style(board: &Board, cell: &Cell, index: usize) -> Style {
    match cell.state {
        CellState::Covered => Style::default().fg(Color::DarkGray),
        CellState::Flagged => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        CellState::Revealed => match cell.content {
            Content::Mine if board.is_hit_mine(index) => Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            Content::Mine => Style::default().fg(Color::Black),
            Content::Empty(0) => Style::default(),
            Content::Empty(n) => Style::default()
                .fg(digit_color(n))
                .add_modifier(Modifier::BOLD),
        },
    }
}

fn message_widget(board: &Board) -> Paragraph<'static> {
    let (text, color) = match board.status() {
        Status::Start => (
            String::from("PRESS ANY BUTTON TO START THE GAME"),
            Color::Cyan,
        ),
        Status::Count { mines, flagged } => {
            (format!("MINE: {mines}   FLAG: {flagged}"), Color::Blue)
        }
        Status::Win => (String::from("YOU WIN! CONGRATULATIONS!"), Color::Green),
        Status::Lose => (String::from("GAME OVER!"), Color::Magenta),
    };

    Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn help_widget() -> Paragraph<'static> {
    Paragraph::new(concat!(
        "move: arrows/hjkl  reveal: space  flag: f  chord: o/x  ",
        "replay: r  new game: n  level: 1/2/3  quit: q",
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
}

fn board_widget(app: &App) -> Result<Paragraph<'static>, Error> {
    let board = &app.board;
    let mut lines = Vec::with_capacity(board.rows);

    for r in 0..board.rows {
        let mut spans = Vec::with_capacity(board.columns);
        for c in 0..board.columns {
            let cell = board.tile(r, c)?;
            let index = board.index_from_coord((r, c));
            let mut style = cell_style(board, cell, index);
            if (r, c) == app.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {} ", cell_symbol(cell)), style));
        }
        lines.push(Line::from(spans));
    }

    Ok(Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.level.name)
            .title_alignment(Alignment::Center),
    ))
}

// center the board in the available area, clipping to the terminal size
fn board_area(area: Rect, board: &Board) -> Result<Rect, Error> {
    let width = board.columns * 3 + 2;
    let height = board.rows + 2;
    let width = width.to_u16().ok_or(Error::Cast(width))?.min(area.width);
    let height = height.to_u16().ok_or(Error::Cast(height))?.min(area.height);
    Ok(Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    ))
}

fn draw(frame: &mut Frame, app: &App) -> Result<(), Error> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    frame.render_widget(message_widget(&app.board), chunks[0]);
    frame.render_widget(board_widget(app)?, board_area(chunks[1], &app.board)?);
    frame.render_widget(help_widget(), chunks[2]);
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &Events,
) -> Result<()> {
    while !app.should_quit {
        let mut drawn = Ok(());
        terminal.draw(|frame| drawn = draw(frame, app))?;
        drawn?;

        if let Event::Input(key) = events.next()? {
            if key.kind == KeyEventKind::Press {
                app.on_key(key.code);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let level = opt.resolve_level()?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    ctrlc::set_handler(|| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        std::process::exit(0);
    })?;

    let mut app = App::builder()
        .board(Board::new(&level, opt.seed))
        .level(level)
        .seed(opt.seed)
        .build();

    let events = Events::new();
    let result = run(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
