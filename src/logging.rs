use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "logs/chase.log";

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Install the global subscriber: stderr plus a daily-rolled log file.
///
/// `RUST_LOG` filters (default `info`), `RUST_LOG_FILE` picks the file.
/// Calling it twice is harmless; the second call does nothing.
pub fn init() {
    if FILE_GUARD.get().is_some() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .compact();

    let log_path = env::var("RUST_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let log_path = Path::new(&log_path);
    let directory = log_path.parent().unwrap_or(Path::new("."));
    let file_name = log_path.file_name().unwrap_or(OsStr::new("chase.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name));
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        // someone else owns the global subscriber (tests, embedding host)
        return;
    }

    install_panic_hook();
}

/// Route panics through tracing with their location and a backtrace
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let mut msg = String::new();
        if let Some(loc) = info.location() {
            msg.push_str(&format!("panic at {}:{}:{} ", loc.file(), loc.line(), loc.column()));
        }
        if let Some(s) = info.payload().downcast_ref::<&str>() {
            msg.push_str(s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            msg.push_str(s);
        } else {
            msg.push_str("<non-string panic>");
        }
        let bt = std::backtrace::Backtrace::force_capture();
        tracing::error!("{}\nBacktrace:\n{:?}", msg, bt);
    }));
}
