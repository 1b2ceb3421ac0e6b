use std::{
    fmt,
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crossterm::{
    cursor::{Hide, RestorePosition, SavePosition, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
    tty::IsTty,
};
use tracing::{error, info, warn};

use crate::{
    error::Result,
    grid::Grid,
    proc::{Engine, Outcome},
};

pub const ALIVE_SYMBOL: &str = " o ";
pub const DEAD_SYMBOL: &str = " _ ";

/// Frame delays selectable with `j`/`k`, in milliseconds.
static DELAYS: [u64; 14] = [1, 10, 20, 40, 60, 100, 150, 200, 300, 450, 800, 1200, 1500, 2000];

const PAUSE_POLL: Duration = Duration::from_millis(50);
const KEY_POLL: Duration = Duration::from_millis(150);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Rect {
    w: u16, // columns
    h: u16, // rows
}

impl Rect {
    #[inline]
    pub fn new(width: u16, height: u16) -> Self {
        Rect { w: width, h: height }
    }

    #[inline]
    pub fn term_size() -> Option<Self> {
        terminal::size().ok().map(|(w, h)| Rect::new(w, h))
    }

    /// Screen area a grid needs: one symbol per cell plus the status line.
    pub fn for_grid(grid: &Grid) -> Self {
        let cols = grid.size().saturating_mul(ALIVE_SYMBOL.len());
        let rows = grid.size().saturating_add(1);
        Rect::new(
            u16::try_from(cols).unwrap_or(u16::MAX),
            u16::try_from(rows).unwrap_or(u16::MAX),
        )
    }

    #[inline]
    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    #[inline]
    pub fn w(&self) -> u16 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> u16 {
        self.h
    }
}

/// How frames reach the user.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// Alternate screen, redrawn in place, with hotkeys.
    Interactive,
    /// Frames written to stdout one after another.
    Plain,
}

impl Mode {
    pub fn detect(plain: bool) -> Self {
        if plain || !io::stdout().is_tty() {
            Mode::Plain
        } else {
            Mode::Interactive
        }
    }
}

/// Flags shared between the frame loop and the keyboard thread.
#[derive(Debug)]
pub struct Controls {
    should_exit: AtomicBool,
    pause: AtomicBool,
    delay_ms: AtomicU64,
}

impl Controls {
    #[inline]
    pub fn new(delay: Duration) -> Self {
        Controls {
            should_exit: false.into(),
            pause: false.into(),
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX).into(),
        }
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pause(&self) -> bool {
        self.pause.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn quit(&self) {
        self.should_exit.store(true, Ordering::Relaxed)
    }

    /// Returns the new pause state.
    pub fn toggle_pause(&self) -> bool {
        !self.pause.fetch_xor(true, Ordering::Relaxed)
    }

    /// Next shorter delay on the ladder.
    pub fn faster(&self) {
        let cur = self.delay_ms.load(Ordering::Relaxed);
        let next = DELAYS.iter().rev().find(|&&d| d < cur).unwrap_or(&DELAYS[0]);
        self.delay_ms.store(*next, Ordering::Relaxed);
    }

    /// Next longer delay on the ladder.
    pub fn slower(&self) {
        let cur = self.delay_ms.load(Ordering::Relaxed);
        let next = DELAYS.iter().find(|&&d| d > cur).unwrap_or(&DELAYS[DELAYS.len() - 1]);
        self.delay_ms.store(*next, Ordering::Relaxed);
    }
}

/// What the driver reports once the loop ends.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Summary {
    pub generation: u64,
    /// `None` when the user quit before the run ended.
    pub outcome: Option<Outcome>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Some(Outcome::Extinct { .. }) => write!(f, "GAME OVER - No Cells Alive"),
            Some(Outcome::CapReached { generation }) => write!(f, "{generation} generations"),
            None => write!(f, "stopped at generation {}", self.generation),
        }
    }
}

/// Text form of a grid, one symbol per cell, `\n` after each row.
pub fn render_frame(grid: &Grid) -> String {
    render_rows(grid, "\n")
}

fn render_rows(grid: &Grid, eol: &str) -> String {
    let mut s = String::with_capacity(grid.size() * (grid.size() * ALIVE_SYMBOL.len() + eol.len()));
    for r in grid.rows() {
        for c in r {
            s.push_str(if c.is_alive() { ALIVE_SYMBOL } else { DEAD_SYMBOL });
        }
        s.push_str(eol);
    }
    s
}

/// Runs `engine` until it is terminal or the user quits.
pub fn run(engine: &mut Engine, mode: Mode, controls: Arc<Controls>) -> Result<Summary> {
    info!(?mode, size = engine.grid().size(), max_generations = ?engine.max_generations(), "run started");
    let summary = match mode {
        Mode::Plain => {
            let mut out = io::stdout().lock();
            drive(engine, &controls, |grid, _| {
                out.write_all(render_frame(grid).as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()?;
                Ok(())
            })?
        }
        Mode::Interactive => run_interactive(engine, controls)?,
    };
    info!(generation = summary.generation, outcome = ?summary.outcome, "run finished");
    Ok(summary)
}

/// Frame loop shared by both modes: show, step, wait.
///
/// The grid is shown once more after the loop so the last generation is seen.
pub fn drive<F>(engine: &mut Engine, controls: &Controls, mut show: F) -> Result<Summary>
where
    F: FnMut(&Grid, u64) -> Result<()>,
{
    while !engine.is_terminal() && !controls.should_exit() {
        if controls.pause() {
            sleep(PAUSE_POLL);
            continue;
        }
        show(engine.grid(), engine.generation_count())?;
        engine.step();
        sleep(controls.delay());
    }
    show(engine.grid(), engine.generation_count())?;
    Ok(Summary {
        generation: engine.generation_count(),
        outcome: engine.outcome(),
    })
}

fn run_interactive(engine: &mut Engine, controls: Arc<Controls>) -> Result<Summary> {
    let need = Rect::for_grid(engine.grid());
    if let Some(term) = Rect::term_size() {
        if !need.fits_in(&term) {
            warn!(
                need_w = need.w(),
                need_h = need.h(),
                term_w = term.w(),
                term_h = term.h(),
                "grid does not fit the terminal"
            );
        }
    }

    if let Err(err) = runup() {
        shutdown();
        return Err(err);
    }
    let d = draw(engine, controls);
    shutdown();
    d
}

fn runup() -> Result<()> {
    execute!(io::stderr(), EnterAlternateScreen, SetTitle("Life on a torus"), Hide)?;
    enable_raw_mode()?;
    clear(&mut io::stdout())?;
    execute!(io::stdout(), SavePosition)?;
    Ok(())
}

fn shutdown() {
    if let Err(err) = disable_raw_mode() {
        error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(io::stderr(), LeaveAlternateScreen, Show) {
        error!(?err, "failed to leave alternate screen");
    }
}

fn draw(engine: &mut Engine, controls: Arc<Controls>) -> Result<Summary> {
    let keys = Arc::clone(&controls);
    let key_thread = thread::Builder::new()
        .name("Keyboard input".into())
        .spawn(move || {
            while !keys.should_exit() {
                if let Err(err) = hotkeys(&keys) {
                    warn!(?err, "keyboard polling failed");
                    break;
                }
            }
        })?;

    let mut out = io::stdout();
    let d = drive(engine, &controls, |grid, gen| {
        clear(&mut out)?;
        out.write_all(render_rows(grid, "\r\n").as_bytes())?;
        write!(
            out,
            "generation {gen}  live {}  delay {}ms\r\n",
            grid.live_count(),
            controls.delay().as_millis()
        )?;
        out.flush()?;
        Ok(())
    });

    controls.quit();
    if key_thread.join().is_err() {
        error!("keyboard thread panicked");
    }
    d
}

fn clear(out: &mut impl Write) -> Result<()> {
    use terminal::{Clear, ClearType};

    queue!(out, Clear(ClearType::Purge), Clear(ClearType::All), RestorePosition)?;
    Ok(())
}

fn sleep(t: Duration) {
    if !t.is_zero() {
        thread::sleep(t)
    }
}

fn hotkeys(c: &Controls) -> Result<()> {
    if event::poll(KEY_POLL)? {
        if let Event::Key(key) = event::read()? {
            apply_key(c, key);
        }
    }
    Ok(())
}

fn apply_key(c: &Controls, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            c.quit();
        }
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => c.quit(),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let paused = c.toggle_pause();
            info!(paused, "pause toggled");
        }
        KeyCode::Char('j') => c.faster(),
        KeyCode::Char('k') => c.slower(),
        _ => {}
    }
}
