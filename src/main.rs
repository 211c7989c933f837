mod app;
mod bus;
mod model;
mod msg;
mod note_list;
mod timer;

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use app::App;
use model::config::AppConfig;
use msg::Msg;

fn main() -> Result<()> {
    // Initialize logging to file (never stdout)
    let log_dir = directories::ProjectDirs::from("", "", "notelist")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "notelist.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("notelist=info")
        .init();

    tracing::info!("notelist starting");

    let config = AppConfig::load()?;
    if let Some(parent) = config.library_path().parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("notelist error: {e:?}");
    }

    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let library_path = config.library_path();
    let mut app = App::new(config, tx.clone())?;

    // Input thread: reads terminal events and forwards them as Msg
    let tx_input = tx.clone();
    thread::spawn(move || forward_input(event::read, &tx_input));

    spawn_library_watcher(library_path, tx.clone());

    draw(terminal, &mut app)?;

    // ── Main event loop ──
    loop {
        // Batch-drain all pending messages
        let first = rx.recv()?;
        app.update(first)?;

        while let Ok(msg) = rx.try_recv() {
            app.update(msg)?;
        }

        if app.should_quit {
            app.shutdown();
            break;
        }

        draw(terminal, &mut app)?;
    }

    Ok(())
}

/// Forward terminal events until reading fails or the receiver is gone.
fn forward_input(mut read: impl FnMut() -> io::Result<Event>, tx: &mpsc::Sender<Msg>) {
    loop {
        let event = match read() {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("terminal input failed: {err}");
                break;
            }
        };
        let msg = match event {
            Event::Key(k) => Msg::Key(k),
            Event::Mouse(m) => Msg::Mouse(m),
            Event::Resize(w, h) => Msg::Resize(w, h),
            _ => continue,
        };
        if tx.send(msg).is_err() {
            break;
        }
    }
}

/// Draw a frame, and a second one when layout changed what the list shows.
fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| app.view(f))?;
    if app.after_draw() {
        terminal.draw(|f| app.view(f))?;
    }
    Ok(())
}

/// Watch the library file's directory and report changes to the file itself.
fn spawn_library_watcher(library_path: PathBuf, tx: mpsc::Sender<Msg>) {
    let Some(dir) = library_path.parent().map(PathBuf::from) else {
        tracing::warn!("library path {} has no parent", library_path.display());
        return;
    };
    let file_name: Option<OsString> = library_path.file_name().map(OsString::from);

    thread::spawn(move || {
        let tx_watch = tx.clone();
        let mut watcher: RecommendedWatcher =
            match notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    let touches_library = event
                        .paths
                        .iter()
                        .any(|path| path.file_name() == file_name.as_deref());
                    if touches_library {
                        let _ = tx_watch.send(Msg::LibraryChanged);
                    }
                }
                Err(err) => {
                    tracing::warn!("library watcher error: {err}");
                }
            }) {
                Ok(w) => w,
                Err(err) => {
                    tracing::warn!("failed to initialize library watcher: {err}");
                    return;
                }
            };

        if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            tracing::warn!("failed to watch {}: {err}", dir.display());
            return;
        }

        loop {
            thread::park();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn input_stops_after_read_error() {
        let (tx, rx) = mpsc::channel();
        let mut reads = vec![
            Err(io::Error::other("tty closed")),
            Ok(Event::FocusGained),
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE))),
        ];
        forward_input(|| reads.pop().unwrap_or_else(|| Err(io::ErrorKind::Other.into())), &tx);

        assert!(matches!(rx.try_recv(), Ok(Msg::Key(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn input_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut calls = 0;
        forward_input(
            || {
                calls += 1;
                Ok(Event::Resize(80, 24))
            },
            &tx,
        );
        assert_eq!(calls, 1);
    }
}
