use std::future::Future;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};
use tracing::{error, warn};

use super::config::ViewSelection;
use super::error::AppError;
use crate::domain::DashboardSnapshot;
use crate::io::{IoError, write_metadata, write_view};

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

impl CliApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the CLI application with signal handling
    ///
    /// Creates a buffered stdout writer and passes it to the main function,
    /// which is responsible for flushing it.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = BufWriter::new(tokio::io::stdout());

        let code = tokio::select! {
            result = main_fn(writer) => match result {
                Ok(()) => 0,
                Err(e) => {
                    error!(app = %self.name, error = %e, "Run failed");
                    eprintln!("Error: {e}");
                    1
                }
            },
            code = wait_for_signal() => code,
        };

        std::process::exit(code);
    }
}

/// Wait for SIGINT, SIGTERM or SIGHUP (Ctrl+C elsewhere)
/// Returns the exit code to use (128 + signal number)
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let handlers = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match handlers {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                warn!("Failed to install signal handlers; running without them");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                warn!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                warn!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                warn!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler; running without it");
            return std::future::pending().await;
        }
        warn!("Received Ctrl+C");
        130
    }
}

/// Write the selected views as CSV sections
///
/// A single view is written as plain CSV. `All` writes every view and the
/// metadata, each preceded by a `# <name>` line and followed by a blank line.
pub async fn write_report<W>(
    snapshot: &DashboardSnapshot,
    selection: ViewSelection,
    writer: &mut W,
) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    match selection {
        ViewSelection::One(kind) => write_view(snapshot.view(kind), &mut *writer).await,
        ViewSelection::All => {
            for kind in selection.kinds() {
                writer.write_all(format!("# {kind}\n").as_bytes()).await?;
                write_view(snapshot.view(kind), &mut *writer).await?;
                writer.write_all(b"\n").await?;
            }
            writer.write_all(b"# metadata\n").await?;
            write_metadata(&snapshot.metadata, &mut *writer).await
        }
    }
}
