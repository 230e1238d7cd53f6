//! zfind: find-in-document over a form-feed paginated text file.
//!
//! Reads JSON find commands from stdin, one per line, and writes every
//! published event as a JSON line to stdout.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use zfind::kernel::services::adapters::{get_config_path, load_config, InMemoryDocument};
use zfind::kernel::services::ports::{FindConfig, PageNavigator};
use zfind::kernel::services::FindHost;
use zfind::kernel::{FindCommand, FindEvent, EVENT_NAMES};

mod logging;

const USAGE: &str = "usage: zfind [--config PATH] FILE";

struct Args {
    config: Option<PathBuf>,
    file: PathBuf,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config = None;
    let mut file = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(USAGE.to_string()),
            "-c" | "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {}", arg)),
        }
    }
    let file = file.ok_or_else(|| USAGE.to_string())?;
    Ok(Args { config, file })
}

fn print_event(event: &FindEvent) {
    let line = serde_json::json!({ "event": event.name(), "data": event });
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
        tracing::warn!(error = %e, "failed to write event");
    }
}

async fn run(config: FindConfig, text: String) -> io::Result<()> {
    let mut host = FindHost::new(config);
    let (document, attached) = InMemoryDocument::from_form_feed_text(&text).into_document();
    tracing::info!(pages = attached.page_count(), "document loaded");
    host.attach_document(Some(attached));
    for name in EVENT_NAMES {
        host.bus_mut().subscribe(name, print_event);
    }

    let sender = host.command_sender();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let now = Instant::now();
        host.pump(now);
        let deadline = host.next_deadline(now);
        if !stdin_open && deadline.is_none() {
            break;
        }
        let wake = deadline.map_or_else(tokio::time::Instant::now, tokio::time::Instant::from_std);

        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match serde_json::from_str::<FindCommand>(&line) {
                    Ok(cmd) => {
                        if sender.send(cmd).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, line = %line, "invalid command"),
                },
                None => stdin_open = false,
            },
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => {}
            else => break,
        }
    }

    tracing::info!(current_page = document.current_page(), "input closed");
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = match args.config.or_else(get_config_path) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("zfind: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => FindConfig::default(),
    };
    let logging_guard = logging::init(config.log_dir.as_deref());
    if let Some(dir) = logging_guard.as_ref().and_then(|guard| guard.log_dir()) {
        eprintln!("zfind: logging to {}", dir.display());
    }

    let text = match std::fs::read_to_string(&args.file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("zfind: {}: {}", args.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("zfind: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config, text)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "zfind failed");
            eprintln!("zfind: {}", e);
            ExitCode::FAILURE
        }
    }
}
