use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::todotxt::{SystemClock, TodoFile};
use crate::tui::app::{App, AppMode, StatusLevel};
use crate::tui::keybindings::{Action, KeyBindings};
use crate::tui::theme::Theme;

pub mod app;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod views;

/// Watches the directory holding the todo file and forwards events that
/// touch the file itself.
fn setup_file_watcher(
    path: &Path,
) -> crate::error::Result<(RecommendedWatcher, Receiver<NotifyEvent>)> {
    let (tx, rx) = channel::<NotifyEvent>();
    let file_name = path.file_name().map(|n| n.to_os_string());

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let is_todo_event = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);

                if is_todo_event {
                    match event.kind {
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                            let _ = tx.send(event);
                        }
                        _ => {}
                    }
                }
            }
        },
        notify::Config::default(),
    )?;

    // Watch the parent; editors often replace the file instead of writing it
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher.watch(&parent, RecursiveMode::NonRecursive)?;

    Ok((watcher, rx))
}

pub fn run(
    path: PathBuf,
    file: TodoFile,
    filters: Vec<String>,
    config: Config,
) -> crate::error::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::load(&config.general.theme);

    // _watcher must stay alive for the duration of the event loop
    let (_watcher, file_rx) = match setup_file_watcher(&path) {
        Ok((watcher, rx)) => (Some(watcher), Some(rx)),
        Err(e) => {
            warn!("Not watching {}: {}", path.display(), e);
            (None, None)
        }
    };

    let mut app = App::new(path, file, filters);

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut last_file_change = Instant::now();
    let mut reload_pending = false;

    loop {
        terminal.draw(|f| ui::render(f, &app, &theme))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key(key, &app) {
                        if action == Action::OpenInEditor {
                            match get_open_command(&app) {
                                Some(cmd) => {
                                    run_external(&mut terminal, &cmd, &mut app)?;
                                }
                                None => app.set_status(
                                    "Set $EDITOR to open tasks",
                                    StatusLevel::Error,
                                ),
                            }
                        } else {
                            process_action(action, &mut app);
                        }
                    }
                }
            }
        }

        if let Some(ref rx) = file_rx {
            while rx.try_recv().is_ok() {
                reload_pending = true;
            }
            if reload_pending && last_file_change.elapsed() >= Duration::from_secs(1) {
                debug!("{} changed on disk", app.path.display());
                app.reload();
                reload_pending = false;
                last_file_change = Instant::now();
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Suspends the TUI while an external command runs, then reloads the file.
fn run_external(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cmd: &[String],
    app: &mut App,
) -> crate::error::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let status = std::process::Command::new(&cmd[0]).args(&cmd[1..]).status();

    enable_raw_mode()?;
    terminal.backend_mut().execute(EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    match status {
        Ok(s) if s.success() => app.reload(),
        Ok(s) => app.set_status(
            format!("Editor exited with code {}", s.code().unwrap_or(-1)),
            StatusLevel::Warning,
        ),
        Err(e) => app.set_status(format!("Failed to open: {}", e), StatusLevel::Error),
    }
    Ok(())
}

fn get_open_command(app: &App) -> Option<Vec<String>> {
    let (index, _) = app.selected_task()?;
    let editor = std::env::var("EDITOR").ok()?;
    Some(vec![
        editor,
        format!("+{}", index + 1),
        app.path.to_string_lossy().into_owned(),
    ])
}

fn handle_key(key: KeyEvent, app: &App) -> Option<Action> {
    match app.mode {
        AppMode::Normal => KeyBindings::handle_normal(key),
        AppMode::Input => KeyBindings::handle_input(key),
        AppMode::Help => KeyBindings::handle_help(key),
    }
}

fn process_action(action: Action, app: &mut App) {
    match action {
        Action::CloseWindow => app.close_window(),
        Action::MoveUp => app.move_selection_up(),
        Action::MoveDown => app.move_selection_down(),
        Action::MoveTop => app.move_to_top(),
        Action::MoveBottom => app.move_to_bottom(),
        Action::Complete => app.complete_selected(&SystemClock),
        Action::OpenFilter => app.start_filter(),
        Action::ToggleSort => app.toggle_sort(),
        Action::Reload => {
            app.reload();
            app.set_status("Reloaded", StatusLevel::Info);
        }
        Action::OpenInEditor => {}
        Action::Help => app.toggle_help(),
        Action::Cancel => match app.mode {
            AppMode::Help => app.mode = AppMode::Normal,
            _ => app.cancel_input(),
        },
        Action::Submit => app.submit_input(),
        Action::Backspace => {
            app.input_buffer.pop();
        }
        Action::Char(c) => app.input_buffer.push(c),
    }
}
