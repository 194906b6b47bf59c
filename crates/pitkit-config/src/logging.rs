use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A level (`warn`, `debug`, ...) or `EnvFilter` directives such as
    /// `pitkit.resolve=debug`.
    pub level: String,
    pub json: bool,
    pub stderr: bool,
    /// Log file, appended to. Skipped with a warning when it cannot be opened.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            json: false,
            stderr: true,
            file: None,
        }
    }
}

const DEFAULT_LEVEL: &str = "warn";

impl LoggingConfig {
    /// Configured directives, with `warning` accepted for `warn`.
    pub(crate) fn directives(&self) -> String {
        match self.level.trim() {
            "" => DEFAULT_LEVEL.to_owned(),
            level if level.eq_ignore_ascii_case("warning") => "warn".to_owned(),
            level => level.to_owned(),
        }
    }

    /// Configured directives followed by `RUST_LOG`, so the environment wins
    /// for targets it names.
    pub fn env_filter(&self) -> EnvFilter {
        let mut directives = self.directives();
        if let Some(rust_log) = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            directives.push(',');
            directives.push_str(rust_log.trim());
        }
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber on first call; later calls are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let file = config.file.as_ref().map(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| (path, err))
        });

        let stderr_sink = config.stderr.then(|| sink(config.json, io::stderr));
        let file_sink = match &file {
            Some(Ok(handle)) => handle
                .try_clone()
                .ok()
                .map(|handle| sink(config.json, Mutex::new(handle))),
            _ => None,
        };

        let installed = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(stderr_sink)
            .with(file_sink)
            .try_init()
            .is_ok();

        if let (true, Some(Err((path, err)))) = (installed, file) {
            tracing::warn!(
                target: "pitkit.config",
                path = %path.display(),
                error = %err,
                "cannot open log file; logging to file is off"
            );
        }
    });
}

fn sink<S, W>(json: bool, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}
