use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

enum Sink {
    Off,
    File(Mutex<std::fs::File>),
    Memory(Mutex<Vec<String>>),
}

/// Appends transition traces as JSON lines.
///
/// Trace problems are reported on stderr and otherwise ignored: a widget
/// must keep working when its trace file cannot be written.
pub struct TraceLogger {
    sink: Sink,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                sink: Sink::File(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: Sink::Off }
    }

    /// Keep lines in memory; read them back with `lines()`.
    pub fn in_memory() -> Self {
        Self {
            sink: Sink::Memory(Mutex::new(Vec::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.sink, Sink::Off)
    }

    pub fn log(&self, event: &TraceEvent) {
        if !self.is_enabled() {
            return;
        }

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        match &self.sink {
            Sink::Off => {}
            Sink::File(file) => match file.lock() {
                Ok(mut f) => {
                    if let Err(e) = writeln!(f, "{}", json) {
                        eprintln!("Warning: failed to write trace event: {}", e);
                    }
                }
                Err(e) => eprintln!("Warning: trace logger lock poisoned: {}", e),
            },
            Sink::Memory(lines) => match lines.lock() {
                Ok(mut l) => l.push(json),
                Err(e) => eprintln!("Warning: trace logger lock poisoned: {}", e),
            },
        }
    }

    /// Lines captured by an in-memory logger. Empty for other sinks.
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
