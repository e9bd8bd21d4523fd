use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::seq::SliceRandom;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    },
    prelude::*,
    widgets::*,
};
use twenty48::{Board, Direction, MoveOutcome};

const DEFAULT_ROWS: usize = 4;
const DEFAULT_COLUMNS: usize = 4;
const SAVE_FILE: &str = "board.txt";
/// How long the autoplay thread sleeps between moves.
const AUTOPLAY_TICK: Duration = Duration::from_millis(5);

const LOCK_MSG: &str = "another thread panicked while holding the game state";

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();
    let mut should_quit = false;
    while !should_quit {
        terminal.draw(|frame| app.ui(frame))?;
        should_quit = app.handle_events()?;
    }
    app.stop_autoplay();

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Everything the game mutates, bundled up so that the event loop and the
/// autoplay thread share a single synchronized state instead of globals.
struct Game {
    board: Board,
    snapshot: Option<Board>,
    game_over: bool,
}

impl Game {
    fn new() -> Self {
        Self {
            board: Board::new(DEFAULT_ROWS, DEFAULT_COLUMNS),
            snapshot: None,
            game_over: false,
        }
    }

    fn make_move(&mut self, direction: Direction) {
        if let MoveOutcome::GameOver { .. } = self.board.make_move(direction) {
            self.game_over = true;
        }
    }
}

struct App {
    game: Arc<Mutex<Game>>,
    save_path: PathBuf,
    autoplay: Arc<AtomicBool>,
    autoplay_thread: Option<JoinHandle<()>>,
    status: Option<String>,
}

impl App {
    fn new() -> Self {
        Self {
            game: Arc::new(Mutex::new(Game::new())),
            save_path: PathBuf::from(SAVE_FILE),
            autoplay: Arc::new(AtomicBool::new(false)),
            autoplay_thread: None,
            status: None,
        }
    }

    fn handle_events(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    return Ok(self.handle_key(key.code));
                }
            }
        }
        Ok(false)
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_board(Direction::Up),
            KeyCode::Down => self.move_board(Direction::Down),
            KeyCode::Left => self.move_board(Direction::Left),
            KeyCode::Right => self.move_board(Direction::Right),
            KeyCode::Char('r') => {
                let mut game = self.game.lock().expect(LOCK_MSG);
                game.board = Board::new(DEFAULT_ROWS, DEFAULT_COLUMNS);
                game.game_over = false;
                self.status = None;
            }
            KeyCode::Char('o') => {
                let mut game = self.game.lock().expect(LOCK_MSG);
                let snapshot = game.board.clone();
                game.snapshot = Some(snapshot);
                self.status = Some(String::from("Snapshot taken"));
            }
            KeyCode::Char('p') => {
                let mut game = self.game.lock().expect(LOCK_MSG);
                match game.snapshot.clone() {
                    Some(snapshot) => {
                        game.board = snapshot;
                        game.game_over = false;
                        self.status = Some(String::from("Snapshot restored"));
                    }
                    None => self.status = Some(String::from("No snapshot taken yet")),
                }
            }
            KeyCode::Char('u') => {
                let game = self.game.lock().expect(LOCK_MSG);
                self.status = Some(match game.board.save_to_file(&self.save_path) {
                    Ok(()) => format!("Saved to {}", self.save_path.display()),
                    Err(err) => format!("Save failed: {}", err),
                });
            }
            KeyCode::Char('i') => {
                // A failed load leaves the current board in place.
                match Board::load_from_file(&self.save_path) {
                    Ok(board) => {
                        let mut game = self.game.lock().expect(LOCK_MSG);
                        game.board = board;
                        game.game_over = false;
                        self.status = Some(format!("Loaded from {}", self.save_path.display()));
                    }
                    Err(err) => self.status = Some(format!("Load failed: {}", err)),
                }
            }
            KeyCode::Char('k') => {
                self.game.lock().expect(LOCK_MSG).board.auto_chain();
            }
            KeyCode::Char('l') => self.toggle_autoplay(),
            _ => {}
        }
        false
    }

    fn move_board(&mut self, direction: Direction) {
        self.game.lock().expect(LOCK_MSG).make_move(direction);
    }

    fn toggle_autoplay(&mut self) {
        if self.autoplay.load(Ordering::Relaxed) {
            self.stop_autoplay();
            self.status = Some(String::from("Autoplay stopped"));
            return;
        }
        self.autoplay.store(true, Ordering::Relaxed);
        self.status = Some(String::from("Autoplay running"));
        let game = Arc::clone(&self.game);
        let running = Arc::clone(&self.autoplay);
        self.autoplay_thread = Some(std::thread::spawn(move || {
            let mut rng = rand::thread_rng();
            while running.load(Ordering::Relaxed) {
                {
                    let mut game = game.lock().expect(LOCK_MSG);
                    if game.game_over {
                        break;
                    }
                    let direction = *Direction::ALL.choose(&mut rng).expect("four directions");
                    game.make_move(direction);
                    game.board.auto_chain();
                }
                std::thread::sleep(AUTOPLAY_TICK);
            }
        }));
    }

    fn stop_autoplay(&mut self) {
        self.autoplay.store(false, Ordering::Relaxed);
        if let Some(handle) = self.autoplay_thread.take() {
            let _ = handle.join();
        }
    }

    fn ui(&self, frame: &mut Frame) {
        let main_layout =
            Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).split(frame.size());

        let game = self.game.lock().expect(LOCK_MSG);
        let mut text = format!(
            "Highest tile: {}\n\n{}",
            game.board.highest_value(),
            game.board
        );
        if game.game_over {
            text.push_str("\nGame over!");
        }
        let block = Block::new()
            .border_type(BorderType::Rounded)
            .borders(Borders::all())
            .title("2048");
        frame.render_widget(Paragraph::new(text).block(block), main_layout[0]);

        let mut help = String::from(
            "arrows: move | r: restart | o/p: snapshot/restore | u/i: save/load | k: chain | l: autoplay | q: quit",
        );
        if let Some(status) = &self.status {
            help.push('\n');
            help.push_str(status);
        }
        frame.render_widget(Paragraph::new(help), main_layout[1]);
    }
}
