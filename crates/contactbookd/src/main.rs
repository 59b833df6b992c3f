// # contactbookd - Contact Book Shell
//
// A thin front end over contactbook-core and contactbook-ui. It is
// responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the store through the registry and opening the book
// 4. Turning stdin lines into UI actions and printing the rendered list
//
// All contact book rules live in the library crates.
//
// ## Configuration
//
// - `CONTACTBOOK_STORE_TYPE`: Store type (file, memory). Default: file
// - `CONTACTBOOK_STORE_PATH`: Data directory (required for the file store)
// - `CONTACTBOOK_SEED`: Seed demonstration data on first load (true, false). Default: true
// - `CONTACTBOOK_LOG_LEVEL`: trace, debug, info, warn, error. Default: info
//
// Logs go to stderr so stdout only carries the shell output.
//
// ## Example
//
// ```bash
// export CONTACTBOOK_STORE_PATH=$HOME/.local/share/contactbook
// echo 'add Ann Lee | +1 555 000 1111 | 1' | contactbookd
// ```

mod command;
mod shell;

use anyhow::Result;
use contactbook_core::{BookConfig, BookEvent, ContactBook, StoreConfig, StoreRegistry};
use contactbook_ui::App;
use shell::Flow;
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::{LinesStream, ReceiverStream};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum ShellExitCode {
    /// Input ended or `quit` was entered
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ShellExitCode> for ExitCode {
    fn from(code: ShellExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    store_type: String,
    store_path: Option<String>,
    seed: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let seed = match env::var("CONTACTBOOK_SEED") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!(
                    "CONTACTBOOK_SEED '{}' is not valid. Use true or false",
                    value
                )
            })?,
            Err(_) => true,
        };

        Ok(Self {
            store_type: env::var("CONTACTBOOK_STORE_TYPE").unwrap_or_else(|_| "file".to_string()),
            store_path: env::var("CONTACTBOOK_STORE_PATH").ok(),
            seed,
            log_level: env::var("CONTACTBOOK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.store_type.as_str() {
            "file" => match self.store_path.as_deref() {
                None | Some("") => anyhow::bail!(
                    "CONTACTBOOK_STORE_PATH is required when CONTACTBOOK_STORE_TYPE=file. \
                    Set it via: export CONTACTBOOK_STORE_PATH=/path/to/data"
                ),
                Some(path) => {
                    let path = std::path::Path::new(path);
                    if path.exists() && !path.is_dir() {
                        anyhow::bail!(
                            "CONTACTBOOK_STORE_PATH must be a directory: {}",
                            path.display()
                        );
                    }
                }
            },
            "memory" => {
                if self.store_path.is_some() {
                    eprintln!(
                        "WARNING: CONTACTBOOK_STORE_PATH is ignored for the memory store. \
                        Nothing will be saved."
                    );
                }
            }
            _ => anyhow::bail!(
                "CONTACTBOOK_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                self.store_type
            ),
        }

        if parse_level(&self.log_level).is_none() {
            anyhow::bail!(
                "CONTACTBOOK_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn book_config(&self) -> BookConfig {
        let store = match (self.store_type.as_str(), &self.store_path) {
            ("file", Some(path)) => StoreConfig::File { path: path.clone() },
            _ => StoreConfig::Memory,
        };
        BookConfig::new()
            .with_store(store)
            .with_seed_demo_data(self.seed)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ShellExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ShellExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ShellExitCode::ConfigError.into();
    }

    info!("Starting contactbookd");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ShellExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let app = match open_app(&config).await {
            Ok(app) => app,
            Err(e) => {
                error!("Startup error: {}", e);
                return ShellExitCode::ConfigError;
            }
        };

        if let Err(e) = run_shell(app).await {
            error!("Shell error: {}", e);
            ShellExitCode::RuntimeError
        } else {
            ShellExitCode::CleanShutdown
        }
    });

    // A pending stdin read cannot be cancelled
    rt.shutdown_background();

    result.into()
}

/// Build the store, open the book and start logging its events
async fn open_app(config: &Config) -> Result<App> {
    let book_config = config.book_config();
    book_config.validate()?;

    let registry = StoreRegistry::with_builtin();
    info!("Available stores: {}", registry.list_stores().join(", "));

    let store = registry.create_store(&book_config.store).await?;
    let (book, events) = ContactBook::open(store, &book_config).await?;
    tokio::spawn(log_events(events));

    Ok(App::new(book, book_config.notifications))
}

async fn log_events(events: mpsc::Receiver<BookEvent>) {
    let mut events = ReceiverStream::new(events);
    while let Some(event) = events.next().await {
        match event {
            BookEvent::SaveFailed { error } => warn!("Save failed: {}", error),
            other => debug!("Book event: {:?}", other),
        }
    }
}

/// Read commands until EOF, `quit` or a shutdown signal
async fn run_shell(mut app: App) -> Result<()> {
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    print(&app.view().to_string())?;

    loop {
        let line = tokio::select! {
            line = lines.next() => line,
            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                break;
            }
        };

        let Some(line) = line else {
            debug!("End of input");
            break;
        };

        let command = match command::parse(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                print(&format!("{}\n", e))?;
                continue;
            }
        };

        let outcome = shell::execute(&mut app, command).await;
        print(&outcome.output)?;
        if outcome.flow == Flow::Quit {
            return Ok(());
        }
    }

    if let Err(e) = app.flush().await {
        print(&format!("{}\n", e))?;
        anyhow::bail!("Exiting with unsaved changes: {}", e);
    }
    info!("Shutting down");
    Ok(())
}

fn print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(store_type: &str, store_path: Option<&str>) -> Config {
        Config {
            store_type: store_type.to_string(),
            store_path: store_path.map(str::to_string),
            seed: true,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn file_store_requires_path() {
        assert!(config("file", None).validate().is_err());
        assert!(config("file", Some("")).validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        let cfg = config("file", dir.path().to_str());
        assert!(cfg.validate().is_ok());
        assert!(matches!(cfg.book_config().store, StoreConfig::File { .. }));
    }

    #[test]
    fn file_path_must_not_be_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(config("file", file.path().to_str()).validate().is_err());
    }

    #[test]
    fn unknown_store_and_level_are_rejected() {
        assert!(config("sqlite", None).validate().is_err());

        let mut cfg = config("memory", None);
        cfg.log_level = "loud".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn memory_store_config() {
        let mut cfg = config("memory", None);
        cfg.seed = false;
        let book = cfg.book_config();
        assert_eq!(book.store, StoreConfig::Memory);
        assert!(!book.seed_demo_data);
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
