use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::store::Store;
use crate::ui::app::{App, Focus, Mode};
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

// Title, status and notice bars, the totals cards, table borders and header.
const REPORT_CHROME_ROWS: u16 = 11;

pub(crate) fn as_tui(store: &Store, config: &Config) -> Result<()> {
    let mut app = App::new(store.path().display().to_string(), config.default_range);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "terminal session failed");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Store,
) -> Result<()> {
    tracing::info!(table = %store.path().display(), "session started");
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(REPORT_CHROME_ROWS) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, store);
        }
    }
    tracing::info!("session ended");
    Ok(())
}

/// Route one key press. Storage failures are logged and shown in the notice
/// bar so the session keeps running.
fn handle_key(key: KeyEvent, app: &mut App, store: &Store) {
    if let Err(e) = dispatch_key(key, app, store) {
        tracing::error!(mode = %app.mode, error = %format!("{e:#}"), "action failed");
        app.set_error(format!("{e:#}"));
    }
}

fn dispatch_key(key: KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
    {
        app.running = false;
        return Ok(());
    }
    if app.mode == Mode::Exit {
        app.running = false;
        return Ok(());
    }
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    match app.focus {
        Focus::Menu => handle_menu_input(key, app, store),
        Focus::Content => match app.mode {
            Mode::AddIncome | Mode::AddExpense => handle_entry_input(key, app, store),
            Mode::ViewReport => handle_report_input(key, app, store),
            Mode::Analyze => handle_analyze_input(key, app, store),
            Mode::Exit => Ok(()),
        },
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_menu_input(key: KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    let modes = Mode::all();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.menu_index = (app.menu_index + 1) % modes.len();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.menu_index = if app.menu_index == 0 {
                modes.len() - 1
            } else {
                app.menu_index - 1
            };
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            if let Some(mode) = modes.get(idx) {
                open_mode(app, store, *mode)?;
            }
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(mode) = modes.get(app.menu_index) {
                open_mode(app, store, *mode)?;
            }
        }
        KeyCode::Tab => app.focus = Focus::Content,
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Ok(())
}

fn open_mode(app: &mut App, store: &Store, mode: Mode) -> Result<()> {
    app.switch_mode(mode, store)?;
    if mode != Mode::Exit {
        app.focus = Focus::Content;
    }
    Ok(())
}

fn handle_entry_input(key: KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.focus = Focus::Menu,
        KeyCode::Char('u') if ctrl => app.form.clear_field(),
        KeyCode::Char('s') if ctrl => app.submit_entry(store)?,
        KeyCode::Enter => {
            if app.form.is_last_field() {
                app.submit_entry(store)?;
            } else {
                app.form.field = app.form.field.next();
            }
        }
        KeyCode::Tab | KeyCode::Down => app.form.field = app.form.field.next(),
        KeyCode::BackTab | KeyCode::Up => app.form.field = app.form.field.prev(),
        KeyCode::Backspace => app.form.pop(),
        KeyCode::Char(c) if !ctrl => app.form.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_report_input(key: KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    let len = app.report_len();
    let page = app.visible_rows;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.focus = Focus::Menu,
        KeyCode::Char('d') if ctrl => {
            for _ in 0..page / 2 {
                scroll_down(&mut app.report_index, &mut app.report_scroll, len, page);
            }
        }
        KeyCode::Char('u') if ctrl => {
            for _ in 0..page / 2 {
                scroll_up(&mut app.report_index, &mut app.report_scroll);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            scroll_down(&mut app.report_index, &mut app.report_scroll, len, page);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            scroll_up(&mut app.report_index, &mut app.report_scroll);
        }
        KeyCode::Char('g') | KeyCode::Home => {
            scroll_to_top(&mut app.report_index, &mut app.report_scroll);
        }
        KeyCode::Char('G') | KeyCode::End => {
            scroll_to_bottom(&mut app.report_index, &mut app.report_scroll, len, page);
        }
        KeyCode::Char('r') => app.refresh_report(store)?,
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    Ok(())
}

fn handle_analyze_input(key: KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Menu,
        KeyCode::Tab | KeyCode::BackTab => app.analyze.toggle_field(),
        KeyCode::Enter => app.run_analysis(store)?,
        KeyCode::Backspace => {
            app.analyze.input_mut().pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
            let input = app.analyze.input_mut();
            if input.len() < 10 {
                input.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
