//! Test helpers shared by the unit test modules

use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use crate::cli::Context;
use crate::loader::{LoadError, LoadedScript, ScriptLoader};
use crate::logging::Logger;

/// Log output captured from a scoped subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Lines emitted at the given level, e.g. `"WARN"`
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.split_whitespace().next() == Some(level))
            .collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that records every event as plain text
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}

/// Loader that records requested features instead of touching the filesystem
#[derive(Clone, Default)]
pub struct RecordingLoader {
    pub requests: Rc<RefCell<Vec<String>>>,
    seen: Rc<RefCell<HashSet<String>>>,
    scripts: Vec<LoadedScript>,
}

impl ScriptLoader for RecordingLoader {
    fn require(&mut self, feature: &str) -> Result<bool, LoadError> {
        self.requests.borrow_mut().push(feature.to_string());
        if !self.seen.borrow_mut().insert(feature.to_string()) {
            return Ok(false);
        }
        self.scripts.push(LoadedScript {
            path: PathBuf::from(format!("{feature}.rb")),
            source: String::new(),
        });
        Ok(true)
    }

    fn loaded(&self) -> &[LoadedScript] {
        &self.scripts
    }
}

/// Context with a detached logger and a recording loader
pub fn test_context() -> (Context, RecordingLoader) {
    let loader = RecordingLoader::default();
    let ctx = Context::new(Logger::default(), Box::new(loader.clone()));
    (ctx, loader)
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
