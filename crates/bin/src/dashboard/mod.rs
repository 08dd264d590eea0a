//! Interactive terminal dashboard.

mod app;
mod chart;
mod event;
mod ui;

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ff5::PredictionSession;
use ratatui::prelude::*;

use app::App;
use event::{handle_key_event, poll_event};
use ui::draw_ui;

type PanicHook = Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Panic hook that leaves raw mode and the alternate screen before handing
/// over to the previous hook. The previous hook is reinstated on drop.
struct PanicHookGuard {
    previous: Arc<PanicHook>,
}

impl std::fmt::Debug for PanicHookGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanicHookGuard").finish_non_exhaustive()
    }
}

impl PanicHookGuard {
    fn install() -> Self {
        let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            (*chained)(info);
        }));
        Self { previous }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        let previous = Arc::clone(&self.previous);
        drop(panic::take_hook());
        panic::set_hook(Box::new(move |info| (*previous)(info)));
    }
}

/// First error among steps that have all been attempted.
fn first_error<const N: usize>(results: [io::Result<()>; N]) -> io::Result<()> {
    results.into_iter().collect()
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    first_error([
        disable_raw_mode(),
        execute!(terminal.backend_mut(), LeaveAlternateScreen),
        terminal.show_cursor(),
    ])
}

/// Take over the terminal until the user quits.
///
/// Raw mode and the alternate screen are undone on return and on panic.
pub(crate) fn run(session: PredictionSession) -> Result<(), Box<dyn std::error::Error>> {
    let _hook = PanicHookGuard::install();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(err.into());
        }
    };

    let mut app = App::new(session);
    tracing::info!(stock = app.session.selected(), "dashboard started");

    let result = run_app(&mut terminal, &mut app);
    let restored = restore_terminal(&mut terminal);

    tracing::info!("dashboard closed");
    result?;
    restored?;
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        app.clear_expired_status();

        if let Some(Event::Key(key)) = poll_event(tick_rate)? {
            if key.kind == KeyEventKind::Press {
                handle_key_event(app, key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
