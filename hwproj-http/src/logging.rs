use file_rotate::compression::Compression;
use file_rotate::TimeFrequency;
use file_rotate::{ContentLimit, FileRotate, suffix::AppendCount};
use hwproj_bridge::{Logging, LoggingRotation};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::{EnvFilter, Registry, prelude::*};

const LOG_FILE_NAME: &str = "hwproj.log";

/// Keeps the non-blocking writers flushing until dropped.
pub struct LoggingHandle {
    _guards: Vec<WorkerGuard>,
}

fn content_limit(rotation: &LoggingRotation, max_size: usize) -> ContentLimit {
    match rotation {
        LoggingRotation::Size => ContentLimit::Bytes(max_size),
        LoggingRotation::Hourly => ContentLimit::Time(TimeFrequency::Hourly),
        LoggingRotation::Daily => ContentLimit::Time(TimeFrequency::Daily),
        LoggingRotation::Weekly => ContentLimit::Time(TimeFrequency::Weekly),
        LoggingRotation::Monthly => ContentLimit::Time(TimeFrequency::Monthly),
        LoggingRotation::Yearly => ContentLimit::Time(TimeFrequency::Yearly),
        LoggingRotation::Never => ContentLimit::None,
    }
}

fn boxed_writer(nb: NonBlocking) -> BoxMakeWriter {
    BoxMakeWriter::new(move || -> Box<dyn Write + Send + Sync> {
        Box::new(nb.clone())
    })
}

/// Installs the global subscriber. Returns `None` when logging is disabled
/// or a subscriber is already installed.
pub fn init_logging(cfg: &Logging) -> Option<LoggingHandle> {
    if !cfg.logs() {
        return None;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = cfg.output.stdout.then(|| {
        let (stdout_nb, guard) = NonBlocking::new(io::stdout());
        guards.push(guard);

        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_writer(boxed_writer(stdout_nb))
    });

    let file_layer = cfg.output.file.then(|| {
        std::fs::create_dir_all(&cfg.file_path).ok();

        let mut opts = OpenOptions::new();
        opts.read(true).write(true).create(true).append(true);

        let fr = FileRotate::new(
            Path::new(&cfg.file_path).join(LOG_FILE_NAME),
            AppendCount::new(cfg.max_files),
            content_limit(&cfg.rotation, cfg.max_size),
            Compression::None,
            Some(opts),
        );

        let (file_nb, guard) = NonBlocking::new(fr);
        guards.push(guard);

        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(boxed_writer(file_nb))
    });

    let subscriber = Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    // If a subscriber is running (e.g. tests)
    if subscriber.try_init().is_err() {
        return None;
    }

    Some(LoggingHandle { _guards: guards })
}
