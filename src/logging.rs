use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ZFIND_LOG";
const LOG_FILE: &str = "zfind.log";

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// `None` when logging to stderr.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Daily rolling file under `log_dir`, or stderr. Stdout is left alone; it
/// carries the event stream.
pub fn init(log_dir: Option<&Path>) -> Option<LoggingGuard> {
    let log_dir = log_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => Some(dir.to_path_buf()),
        Err(e) => {
            eprintln!("zfind: cannot create log dir {}: {}", dir.display(), e);
            None
        }
    });

    let (non_blocking, guard) = match &log_dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE)),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("zfind=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    match &log_dir {
        Some(dir) => tracing::info!(log_dir = %dir.display(), "tracing initialized"),
        None => tracing::info!("tracing initialized"),
    }

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
