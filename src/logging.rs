use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

const LOG_DIR: &str = "logs";

// the non-blocking writer stops flushing once its guard drops
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber: compact stdout output plus a JSON file
/// per launch under `logs/`. Safe to call more than once.
pub fn init_logs() {
    if LOG_GUARD.get().is_some() {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    if std::fs::create_dir_all(LOG_DIR).is_ok() {
        let file_name = format!(
            "pixel_marker_{}.log",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let appender = tracing_appender::rolling::never(LOG_DIR, file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);

        let file_layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(file_writer);

        let subscriber = Registry::default()
            .with(env_filter)
            .with(stdout_layer)
            .with(file_layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            return;
        }
    } else {
        let subscriber = Registry::default().with(env_filter).with(stdout_layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            return;
        }
    }

    let _ = tracing_log::LogTracer::init();
}
