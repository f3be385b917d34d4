//! Interactive terminal front end
//!
//! The stepper runs on its own thread and takes the simulation's write guard
//! for each whole generation; drawing and input happen here under the read
//! guard, and edits take the write guard between steps.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use crate::editor::{Direction, Editor};
use crate::persistence;
use crate::renderer::Viewport;
use crate::settings::Settings;
use crate::sim::{Coord, SharedSimulation, Simulation, Stats};

/// Longest wait for input between frames
const MAX_FRAME_WAIT: Duration = Duration::from_millis(50);

/// What the arrow keys do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Generations advance; arrows scroll the view
    Run,
    /// Stepping is paused; arrows move the edit cursor
    Edit,
}

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Scroll(Direction),
    MoveCursor(Direction),
    Toggle,
    TogglePause,
    EnterEdit,
    ExitEdit,
    Save,
    Quit,
}

/// Map a key press to a command for the current mode
pub fn decode_key(mode: Mode, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let direction = match key.code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    };
    if let Some(dir) = direction {
        return Some(match mode {
            Mode::Run => Command::Scroll(dir),
            Mode::Edit => Command::MoveCursor(dir),
        });
    }

    match (mode, key.code) {
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(Command::Quit),
        (_, KeyCode::Char('S')) => Some(Command::Save),
        (Mode::Run, KeyCode::Char('p')) => Some(Command::TogglePause),
        (Mode::Run, KeyCode::Char('e')) => Some(Command::EnterEdit),
        (Mode::Edit, KeyCode::Char('r')) => Some(Command::ExitEdit),
        (Mode::Edit, KeyCode::Char(' ')) | (Mode::Edit, KeyCode::Enter) => Some(Command::Toggle),
        _ => None,
    }
}

/// Bottom status line, padded or cut to `cols`
pub fn status_line(stats: &Stats, mode: Mode, paused: bool, message: Option<&str>, cols: u16) -> String {
    let state = match (mode, paused) {
        (Mode::Edit, _) => "EDIT",
        (Mode::Run, true) => "PAUSED",
        (Mode::Run, false) => "RUN",
    };
    let mut line = format!(
        " {} | gen {} | live {} | born {} | died {}",
        state, stats.generations, stats.live, stats.total_born, stats.total_died
    );
    if let Some(msg) = message {
        line.push_str(" | ");
        line.push_str(msg);
    }
    let cols = cols as usize;
    let mut line: String = line.chars().take(cols).collect();
    let pad = cols.saturating_sub(line.chars().count());
    line.extend(std::iter::repeat_n(' ', pad));
    line
}

/// Raw mode and alternate screen, restored on drop
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    pub fn start() -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("failed to enter alternate screen")?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.stdout, Show, LeaveAlternateScreen) {
            log::error!("failed to leave alternate screen: {}", err);
        }
        if let Err(err) = disable_raw_mode() {
            log::error!("failed to disable raw mode: {}", err);
        }
    }
}

fn spawn_stepper(
    shared: SharedSimulation,
    interval: Duration,
    paused: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
) -> JoinHandle<Result<()>> {
    thread::spawn(move || {
        while !quit.load(Ordering::Relaxed) {
            thread::sleep(interval);
            if paused.load(Ordering::Relaxed) {
                continue;
            }
            let mut sim = shared
                .write()
                .map_err(|_| anyhow!("simulation lock poisoned"))?;
            sim.step().context("generation step failed")?;
        }
        Ok(())
    })
}

fn view_for_terminal(origin: Coord) -> Result<Viewport> {
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    Ok(Viewport::new(origin, rows.saturating_sub(1), cols))
}

/// Interactive loop state
struct App {
    settings: Settings,
    mode: Mode,
    view: Viewport,
    editor: Editor,
    paused: Arc<AtomicBool>,
    message: Option<String>,
}

impl App {
    fn draw(&self, out: &mut impl Write, sim: &Simulation) -> io::Result<()> {
        for (row, line) in self
            .view
            .render_rows(sim.cells(), self.settings.glyphs)
            .iter()
            .enumerate()
        {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        let status = status_line(
            &sim.stats(),
            self.mode,
            self.paused.load(Ordering::Relaxed),
            self.message.as_deref(),
            self.view.cols,
        );
        queue!(out, MoveTo(0, self.view.rows), Print(status))?;

        match self.mode {
            Mode::Edit => {
                if let Some((col, row)) = self.view.screen_pos(self.editor.cursor) {
                    queue!(out, MoveTo(col, row), Show)?;
                }
            }
            Mode::Run => queue!(out, Hide)?,
        }
        out.flush()
    }

    /// Apply one command; returns `false` when the user quits
    fn apply(&mut self, command: Command, shared: &SharedSimulation) -> Result<bool> {
        match command {
            Command::Quit => return Ok(false),
            Command::Scroll(dir) => {
                let (dx, dy) = dir.delta();
                self.view.scroll(dx, dy);
            }
            Command::MoveCursor(dir) => self.editor.move_cursor(dir, &mut self.view),
            Command::TogglePause => {
                self.paused.fetch_xor(true, Ordering::Relaxed);
            }
            Command::EnterEdit => {
                self.mode = Mode::Edit;
                self.paused.store(true, Ordering::Relaxed);
                self.editor.cursor = self
                    .view
                    .board_coord(self.view.cols / 2, self.view.rows / 2);
            }
            Command::ExitEdit => {
                self.mode = Mode::Run;
                self.paused.store(false, Ordering::Relaxed);
            }
            Command::Toggle => {
                let mut sim = shared
                    .write()
                    .map_err(|_| anyhow!("simulation lock poisoned"))?;
                self.editor.toggle(&mut sim)?;
            }
            Command::Save => {
                let sim = shared
                    .read()
                    .map_err(|_| anyhow!("simulation lock poisoned"))?;
                self.message = Some(
                    match persistence::save_file(&self.settings.save_path, sim.cells()) {
                        Ok(()) => format!("saved {}", self.settings.save_path.display()),
                        Err(err) => {
                            log::warn!("{}", err);
                            format!("save failed: {}", err)
                        }
                    },
                );
            }
        }
        Ok(true)
    }
}

/// Run the interactive session until the user quits; returns final statistics
pub fn run(shared: SharedSimulation, settings: Settings, mode: Mode) -> Result<Stats> {
    let mut session = TerminalSession::start()?;
    let paused = Arc::new(AtomicBool::new(settings.start_paused || mode == Mode::Edit));
    let quit = Arc::new(AtomicBool::new(false));
    let interval = settings.tick_interval();
    let stepper = spawn_stepper(shared.clone(), interval, paused.clone(), quit.clone());

    let view = view_for_terminal(settings.origin)?;
    let mut app = App {
        editor: Editor::new(view.board_coord(view.cols / 2, view.rows / 2)),
        settings,
        mode,
        view,
        paused,
        message: None,
    };

    let result = event_loop(&mut app, &mut session, &shared, &stepper, interval);
    quit.store(true, Ordering::Relaxed);
    let stepped = stepper
        .join()
        .map_err(|_| anyhow!("stepper thread panicked"))?;
    drop(session);
    result?;
    stepped?;

    let sim = shared
        .read()
        .map_err(|_| anyhow!("simulation lock poisoned"))?;
    Ok(sim.stats())
}

fn event_loop(
    app: &mut App,
    session: &mut TerminalSession,
    shared: &SharedSimulation,
    stepper: &JoinHandle<Result<()>>,
    interval: Duration,
) -> Result<()> {
    let wait = interval.min(MAX_FRAME_WAIT);
    loop {
        if stepper.is_finished() {
            // The stepper only stops early on error; join() reports it.
            return Ok(());
        }

        {
            let sim = shared
                .read()
                .map_err(|_| anyhow!("simulation lock poisoned"))?;
            app.draw(&mut session.stdout, &sim)
                .context("failed to draw frame")?;
        }

        if !event::poll(wait).context("failed to poll input")? {
            continue;
        }
        match event::read().context("failed to read input")? {
            Event::Key(key) => {
                if let Some(command) = decode_key(app.mode, key) {
                    if !app.apply(command, shared)? {
                        return Ok(());
                    }
                }
            }
            Event::Resize(cols, rows) => {
                app.view.resize(rows.saturating_sub(1), cols);
                execute!(session.stdout, Clear(ClearType::All))?;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_depend_on_mode() {
        assert_eq!(
            decode_key(Mode::Run, press(KeyCode::Up)),
            Some(Command::Scroll(Direction::Up))
        );
        assert_eq!(
            decode_key(Mode::Edit, press(KeyCode::Char('d'))),
            Some(Command::MoveCursor(Direction::Right))
        );
    }

    #[test]
    fn test_quit_keys() {
        for mode in [Mode::Run, Mode::Edit] {
            assert_eq!(decode_key(mode, press(KeyCode::Char('q'))), Some(Command::Quit));
            assert_eq!(decode_key(mode, press(KeyCode::Esc)), Some(Command::Quit));
            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert_eq!(decode_key(mode, ctrl_c), Some(Command::Quit));
        }
    }

    #[test]
    fn test_mode_specific_keys() {
        assert_eq!(decode_key(Mode::Run, press(KeyCode::Char('p'))), Some(Command::TogglePause));
        assert_eq!(decode_key(Mode::Edit, press(KeyCode::Char('p'))), None);
        assert_eq!(decode_key(Mode::Run, press(KeyCode::Char('e'))), Some(Command::EnterEdit));
        assert_eq!(decode_key(Mode::Edit, press(KeyCode::Char('r'))), Some(Command::ExitEdit));
        assert_eq!(decode_key(Mode::Edit, press(KeyCode::Char(' '))), Some(Command::Toggle));
        assert_eq!(decode_key(Mode::Run, press(KeyCode::Char(' '))), None);
        assert_eq!(decode_key(Mode::Run, press(KeyCode::Char('S'))), Some(Command::Save));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(decode_key(Mode::Run, release), None);
    }

    #[test]
    fn test_status_line_fits_width() {
        let stats = Stats {
            generations: 12,
            live: 40,
            total_born: 7,
            total_died: 3,
        };
        let line = status_line(&stats, Mode::Run, false, None, 60);
        assert_eq!(line.chars().count(), 60);
        assert!(line.starts_with(" RUN | gen 12 | live 40 | born 7 | died 3"));

        let short = status_line(&stats, Mode::Edit, true, Some("saved"), 8);
        assert_eq!(short, " EDIT | ");
    }
}
