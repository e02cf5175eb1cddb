//! `tracing` output to the browser console.
//!
//! The filter directive is read from the `waveportal_log` localStorage key,
//! e.g. `localStorage.waveportal_log = "debug"`.

use gloo_storage::{LocalStorage, Storage};
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

pub const LOG_LEVEL_KEY: &str = "waveportal_log";
const DEFAULT_DIRECTIVE: &str = "info";

pub fn init() {
    let stored = LocalStorage::raw().get_item(LOG_LEVEL_KEY).ok().flatten();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(stored.as_deref()))
        .with_writer(ConsoleWriter)
        .with_ansi(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        gloo_console::warn!("tracing subscriber was already installed");
    }
}

/// Filter for a stored directive. Missing or invalid directives fall back to
/// `info`.
pub fn filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Hands out one [`ConsoleLine`] per event.
pub struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one formatted event and logs it with the console method for its
/// level when dropped.
pub struct ConsoleLine {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf).trim_end().to_owned();
        if line.is_empty() {
            return;
        }
        match self.level {
            Level::ERROR => gloo_console::error!(line),
            Level::WARN => gloo_console::warn!(line),
            Level::INFO => gloo_console::info!(line),
            Level::DEBUG => gloo_console::debug!(line),
            _ => gloo_console::log!(line),
        }
    }
}
