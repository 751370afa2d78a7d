//! Opt-in timing scopes and the render debug log.
//!
//! `--perf` prints scope durations to stderr when they drop.
//! `--render-debug-log PATH` writes a timestamped trail of navigation, layout
//! and image events; every event is mirrored to `tracing` at TRACE level.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const LOG_HEADER: &str = "snekkja render debug log start";

static PERF: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: Mutex<Option<DebugLog>> = Mutex::new(None);

struct DebugLog {
    opened: Instant,
    out: BufWriter<File>,
}

fn debug_log() -> MutexGuard<'static, Option<DebugLog>> {
    DEBUG_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reports how long it lived, if `--perf` is on.
#[derive(Debug)]
#[must_use = "a scope measures until it is dropped"]
pub struct Scope {
    label: &'static str,
    started: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if is_enabled() {
            let ms = self.started.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[perf] {}: {ms:.2} ms", self.label);
        }
    }
}

pub fn scope(label: &'static str) -> Scope {
    Scope {
        label,
        started: Instant::now(),
    }
}

pub fn set_enabled(enabled: bool) {
    PERF.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    PERF.load(Ordering::Relaxed)
}

/// Start writing the render debug log to `path`, or stop with `None`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let log = match path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            writeln!(out, "{LOG_HEADER}")?;
            out.flush()?;
            Some(DebugLog {
                opened: Instant::now(),
                out,
            })
        }
        None => None,
    };
    *debug_log() = log;
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    debug_log().is_some()
}

/// Record one event. Write failures are ignored.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let detail = detail.as_ref();
    tracing::trace!(event = name, "{detail}");

    if let Some(log) = debug_log().as_mut() {
        let ms = log.opened.elapsed().as_secs_f64() * 1000.0;
        let _ = writeln!(log.out, "[{ms:>10.3} ms] {name}: {detail}");
        let _ = log.out.flush();
    }
}
