//! userfeeds: a terminal viewer for a remote JSON feed with offline cache.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ Published ┌───────────┐  draw()  ┌──────────┐
//! │  sync.rs  │ ────────► │  app.rs   │ ───────► │  ui.rs   │
//! │ (tokio)   │ (channel) │ (state)   │          │ (render) │
//! └───────────┘           └───────────┘          └──────────┘
//!   │      ▲                   ▲
//!   │      │ read_all          │ handle_key_event()
//!   ▼      │                   │
//! ┌───────────┐           ┌──────────┐
//! │ store/    │           │ input.rs │
//! │ (sqlite)  │           └──────────┘
//! └───────────┘
//! ```
//!
//! * **`source/`**: the `FeedFetcher` trait, `FeedRecord`, JSON decoding, and
//!   the HTTP implementation.
//! * **`store/`**: the replace-all cache and its background writer thread.
//! * **`view_model`**: display projections of records.
//! * **`filter`**: the All/Text/Image/Other segment filter.
//! * **`sync`**: the fetch → fallback → publish → persist controller.
//! * **`app`** / **`ui`** / **`input`**: terminal state, rendering, keys.
//! * **`main`**: parse args, set up logging and the terminal, run the loop.

mod app;
mod filter;
mod input;
mod source;
mod store;
mod sync;
mod ui;
mod view_model;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use source::{HttpFeedSource, DEFAULT_FEED_URL};
use store::{LocalStore, MemoryStore, SqliteStore};
use sync::{FeedSyncController, StateChange};

const DEBUG_LOG_PATH: &str = "/tmp/userfeeds-debug.log";

#[derive(Parser, Debug)]
#[command(name = "userfeeds", version, about = "Browse a JSON feed in the terminal, with an offline cache")]
struct Cli {
    /// Feed endpoint returning a JSON array of items.
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    url: String,

    /// Path of the SQLite cache file.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Keep the cache in memory only.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Write debug logs to /tmp/userfeeds-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

/// `$XDG_CACHE_HOME/userfeeds`, then `$HOME/.cache/userfeeds`, then `.`.
fn default_cache_path() -> PathBuf {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")));

    match base {
        Some(dir) => dir.join("userfeeds").join("feeds.sqlite3"),
        None => PathBuf::from("feeds.sqlite3"),
    }
}

fn init_logging() -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(DEBUG_LOG_PATH)
        .with_context(|| format!("opening {DEBUG_LOG_PATH}"))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();
    tracing::info!("userfeeds debug log started; tail -f {DEBUG_LOG_PATH}");
    Ok(())
}

fn open_store(cli: &Cli) -> Arc<dyn LocalStore> {
    if cli.no_cache {
        return Arc::new(MemoryStore::new());
    }
    let path = cli.cache.clone().unwrap_or_else(default_cache_path);
    match SqliteStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot open cache; using memory");
            Arc::new(MemoryStore::new())
        }
    }
}

// ---------------------------------------------------------------------------
// RAII terminal guard: cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        init_logging()?;
    }
    install_panic_hook();

    // -- background runtime and collaborators --------------------------------
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let fetcher = HttpFeedSource::new(&cli.url, Duration::from_secs(cli.timeout_secs))
        .context("building HTTP client")?;
    let store = open_store(&cli);

    let mut controller = FeedSyncController::new(Arc::new(fetcher), store, runtime.handle().clone());
    controller.subscribe(|change| match change {
        StateChange::Loading => tracing::debug!("state: loading"),
        StateChange::Ready {
            origin,
            total,
            visible,
            filter,
        } => tracing::debug!(?origin, total, visible, filter = filter.label(), "state: ready"),
    });

    let mut app = App::new(controller);
    app.refresh();

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply any finished sync.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.tick();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    drop(guard);
    // Flushes the cache writer before the runtime goes away.
    drop(app);
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["userfeeds"]);
        assert_eq!(cli.url, DEFAULT_FEED_URL);
        assert_eq!(cli.timeout_secs, 30);
        assert!(cli.cache.is_none());
        assert!(!cli.no_cache);
        assert!(!cli.debug);
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::parse_from([
            "userfeeds",
            "--url",
            "http://localhost:8080/feed.json",
            "--cache",
            "/tmp/f.sqlite3",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(cli.url, "http://localhost:8080/feed.json");
        assert_eq!(cli.cache, Some(PathBuf::from("/tmp/f.sqlite3")));
        assert_eq!(cli.timeout_secs, 5);
    }

    #[test]
    fn cli_rejects_cache_with_no_cache() {
        assert!(Cli::try_parse_from(["userfeeds", "--no-cache", "--cache", "x"]).is_err());
    }

    #[test]
    fn default_cache_path_ends_in_app_dir() {
        let path = default_cache_path();
        assert!(path.ends_with("feeds.sqlite3"));
    }

    #[test]
    fn no_cache_uses_memory_store() {
        let cli = Cli::parse_from(["userfeeds", "--no-cache"]);
        assert!(open_store(&cli).read_all().is_empty());
    }
}
