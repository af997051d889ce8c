use std::collections::VecDeque;
use std::fmt;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::catalog::CatalogItem;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Start,
    Stdout,
    Stderr,
    Success,
    Failure,
}

/// One line of the install log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: LogKind,
    pub text: String,
    pub at: DateTime<Local>,
}

impl LogRecord {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            at: Local::now(),
        }
    }

    pub fn started(item: &CatalogItem) -> Self {
        Self::new(LogKind::Start, format!(">>> Installing {}...", item.name))
    }

    pub fn succeeded(item: &CatalogItem) -> Self {
        Self::new(
            LogKind::Success,
            format!("\u{2713} {} completed successfully", item.name),
        )
    }

    pub fn failed(item: &CatalogItem, error: &str) -> Self {
        Self::new(
            LogKind::Failure,
            format!("\u{2717} {} failed: {}", item.name, error),
        )
    }

    /// Script output that is shown without stream distinction
    pub fn output(text: impl Into<String>) -> Self {
        Self::new(LogKind::Stdout, text)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Append-only record of a whole installation run
#[derive(Debug, Clone, Default)]
pub struct InstallLog {
    records: Vec<LogRecord>,
}

impl InstallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = LogRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&LogRecord> {
        self.records.last()
    }

    /// Write the log as timestamped text, replacing any previous file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for record in &self.records {
            let tag = match record.kind {
                LogKind::Start => "START",
                LogKind::Stdout => "OUT",
                LogKind::Stderr => "ERR",
                LogKind::Success => "OK",
                LogKind::Failure => "FAIL",
            };
            writeln!(
                file,
                "{} [{tag:<5}] {}",
                record.at.format("%Y-%m-%d %H:%M:%S"),
                record.text
            )?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Keeps only the most recent `capacity` entries
#[derive(Debug, Clone)]
pub struct TailBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> TailBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;

    #[test]
    fn test_markers_reference_item_name() {
        let zsh = item("zsh", None);
        assert_eq!(LogRecord::started(&zsh).text, ">>> Installing zsh name...");
        assert_eq!(
            LogRecord::succeeded(&zsh).text,
            "\u{2713} zsh name completed successfully"
        );
        assert_eq!(
            LogRecord::failed(&zsh, "Process exited with code 2").text,
            "\u{2717} zsh name failed: Process exited with code 2"
        );
    }

    #[test]
    fn test_tail_buffer_keeps_most_recent() {
        let mut tail = TailBuffer::new(3);
        tail.extend(1..=5);
        assert_eq!(tail.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(tail.len(), 3);
    }

    #[test]
    fn test_tail_buffer_does_not_reserve_capacity_up_front() {
        let mut tail = TailBuffer::new(usize::MAX);
        tail.extend(["a", "b"]);
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn test_tail_buffer_zero_capacity_stays_empty() {
        let mut tail = TailBuffer::new(0);
        tail.push("line");
        assert!(tail.is_empty());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install.log");
        let zsh = item("zsh", None);

        let mut log = InstallLog::new();
        log.push(LogRecord::started(&zsh));
        log.push(LogRecord::new(LogKind::Stderr, "warning: slow mirror"));
        log.push(LogRecord::succeeded(&zsh));
        log.write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[START] >>> Installing zsh name..."));
        assert!(lines[1].contains("[ERR  ] warning: slow mirror"));
        assert!(lines[2].contains("[OK   ]"));
    }
}
