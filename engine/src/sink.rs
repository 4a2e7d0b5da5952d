//! The outbound event contract (C7) and a concrete file-backed
//! implementation (C8).
//!
//! `record` is called synchronously while the engine mutex is held, so
//! every `EventSink` implementation MUST NOT block: no network I/O, no
//! fsync. `FileLogger` buffers in memory with a bounded ring and only
//! touches disk when `dump()` is called explicitly by the owner.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Discriminant carried alongside every event's textual payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Add,
    Amend,
    Cancel,
    Trade,
}

impl EventKind {
    fn as_str(&self) -> &'static str {
        match self {
            EventKind::Add => "ADD",
            EventKind::Amend => "AMEND",
            EventKind::Cancel => "CANCEL",
            EventKind::Trade => "TRADE",
        }
    }
}

/// Outbound interface to loggers/publishers. At most one sink is
/// injected per engine, at construction time.
pub trait EventSink: Send + Sync {
    fn record(&self, event: EventKind, payload: String);
}

/// Discards every event. Used by tests and benchmarks that don't care
/// about the log.
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: EventKind, _payload: String) {}
}

struct LogEntry {
    kind: EventKind,
    message: String,
}

const MAX_LOG_ENTRIES: usize = 2000;

/// Bounded in-memory ring of the most recent `MAX_LOG_ENTRIES` events,
/// with a `dump()` that truncates `filename` and writes it out in FIFO
/// order as `"<KIND> , <payload>\n"` lines.
pub struct FileLogger {
    filename: PathBuf,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl FileLogger {
    pub fn new(filename: impl AsRef<Path>) -> Self {
        Self {
            filename: filename.as_ref().to_path_buf(),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Writes out all currently buffered entries, oldest first,
    /// truncating the target file.
    pub fn dump(&self) -> io::Result<()> {
        let entries = self.entries.lock().unwrap();
        let mut file = File::create(&self.filename)?;
        for entry in entries.iter() {
            writeln!(file, "{} , {}", entry.kind.as_str(), entry.message)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for FileLogger {
    fn record(&self, event: EventKind, payload: String) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            kind: event,
            message: payload,
        });
    }
}

/// Lets an `Arc<FileLogger>` (or any other shared sink) be handed to the
/// engine as its sink while the owner keeps a handle to call `dump()` on
/// a timer or at shutdown.
impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn record(&self, event: EventKind, payload: String) {
        (**self).record(event, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn ring_evicts_oldest_past_capacity() {
        let logger = FileLogger::new("unused.log");
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            logger.record(EventKind::Add, format!("entry-{i}"));
        }
        assert_eq!(logger.len(), MAX_LOG_ENTRIES);
    }

    #[test]
    fn dump_writes_fifo_and_truncates() {
        let tmp = NamedTempFile::new().unwrap();
        let logger = FileLogger::new(tmp.path());
        logger.record(EventKind::Add, "NVDA,BUY,100,10,2024-01-01 00:00:00".into());
        logger.record(EventKind::Trade, "1,2,NVDA,100,10,2024-01-01 00:00:01".into());
        logger.dump().unwrap();

        let contents = std::fs::read_to_string(tmp.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ADD , NVDA"));
        assert!(lines[1].starts_with("TRADE , 1,2,NVDA"));

        // dumping again with fewer entries must truncate, not append
        let logger2 = FileLogger::new(tmp.path());
        logger2.record(EventKind::Cancel, "NVDA,BUY,100,10,2024-01-01 00:00:02".into());
        logger2.dump().unwrap();
        let contents2 = std::fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(contents2.lines().count(), 1);
    }
}
