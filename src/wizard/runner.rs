//! Sequential execution of install scripts.
//!
//! A run is a tokio task that executes each selected item's script in queue
//! order, one process at a time, and reports progress as [`RunnerEvent`]s over
//! a bounded channel. A failing step never stops the queue; the first failure
//! is kept in the [`InstallReport`] returned when the task finishes.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, trace, warn};

use super::log::{InstallLog, LogKind, LogRecord};
use crate::catalog::CatalogItem;

const EVENT_BUFFER: usize = 64;
const READ_CHUNK: usize = 4096;

/// Progress notifications emitted while a run is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    StepStarted {
        index: usize,
        item: CatalogItem,
    },
    /// Complete output lines from stdout or stderr, in arrival order
    OutputChunk {
        index: usize,
        item: CatalogItem,
        lines: Vec<String>,
    },
    StepSucceeded {
        index: usize,
        item: CatalogItem,
    },
    StepFailed {
        index: usize,
        item: CatalogItem,
        error: String,
    },
    AllComplete,
}

/// How a step's process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Exited(i32),
    Signaled,
    /// The process could not be started or its output could not be read
    ProcessError(String),
}

impl StepOutcome {
    fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => StepOutcome::Exited(code),
            None => StepOutcome::Signaled,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == StepOutcome::Exited(0)
    }

    /// Human-readable failure description, `None` on success
    pub fn failure_message(&self) -> Option<String> {
        match self {
            StepOutcome::Exited(0) => None,
            StepOutcome::Exited(code) => Some(format!("Process exited with code {code}")),
            StepOutcome::Signaled => Some("Process terminated by signal".to_string()),
            StepOutcome::ProcessError(message) => Some(message.clone()),
        }
    }
}

/// Result of executing one item
#[derive(Debug, Clone)]
pub struct StepResult {
    pub index: usize,
    pub item: CatalogItem,
    pub outcome: StepOutcome,
    /// Every output line of the step, stdout and stderr interleaved
    pub output: Vec<String>,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub log: InstallLog,
    pub steps: Vec<StepResult>,
    pub first_failure: Option<String>,
}

impl InstallReport {
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|step| !step.outcome.is_success())
    }
}

/// A run in progress: its event stream and the task driving it
pub struct RunHandle {
    pub events: mpsc::Receiver<RunnerEvent>,
    pub task: JoinHandle<InstallReport>,
}

impl RunHandle {
    /// Stop listening and wait for the run's report. Events not yet received
    /// are discarded; the runner keeps going until its queue is done.
    pub async fn finish(self) -> std::result::Result<InstallReport, JoinError> {
        let RunHandle { events, task } = self;
        drop(events);
        task.await
    }
}

/// Executes install scripts from the repository root
#[derive(Debug, Clone)]
pub struct TaskRunner {
    working_dir: PathBuf,
}

impl TaskRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Start executing `items` in order. Consumes the runner so a second run
    /// cannot overlap the first.
    pub fn run(self, items: Vec<CatalogItem>) -> RunHandle {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        info!(
            "Starting install run: {} step(s) in {:?}",
            items.len(),
            self.working_dir
        );

        let task = tokio::spawn(async move { self.drive(items, tx).await });

        RunHandle { events: rx, task }
    }

    async fn drive(self, items: Vec<CatalogItem>, tx: mpsc::Sender<RunnerEvent>) -> InstallReport {
        let mut report = InstallReport::default();

        for (index, item) in items.into_iter().enumerate() {
            info!("[{}] Installing {} ({})", index + 1, item.name, item.script);
            report.log.push(LogRecord::started(&item));
            emit(&tx, RunnerEvent::StepStarted {
                index,
                item: item.clone(),
            })
            .await;

            let mut output = Vec::new();
            let outcome = match self.execute(index, &item, &tx, &mut output).await {
                Ok(status) => StepOutcome::from_status(status),
                Err(e) => StepOutcome::ProcessError(e.to_string()),
            };

            report.log.extend(output.iter().cloned());

            match outcome.failure_message() {
                None => {
                    info!("{} completed successfully", item.name);
                    report.log.push(LogRecord::succeeded(&item));
                    emit(&tx, RunnerEvent::StepSucceeded {
                        index,
                        item: item.clone(),
                    })
                    .await;
                }
                Some(error) => {
                    warn!("{} failed: {}", item.name, error);
                    report.log.push(LogRecord::failed(&item, &error));
                    if report.first_failure.is_none() {
                        report.first_failure = Some(error.clone());
                    }
                    emit(&tx, RunnerEvent::StepFailed {
                        index,
                        item: item.clone(),
                        error,
                    })
                    .await;
                }
            }

            report.steps.push(StepResult {
                index,
                item,
                outcome,
                output: output.into_iter().map(|record| record.text).collect(),
            });
        }

        emit(&tx, RunnerEvent::AllComplete).await;
        info!(
            "Install run finished: {} step(s), {} failed",
            report.steps.len(),
            report.failed_steps().count()
        );
        report
    }

    /// Run one script to completion, forwarding its output as it arrives
    async fn execute(
        &self,
        index: usize,
        item: &CatalogItem,
        tx: &mpsc::Sender<RunnerEvent>,
        output: &mut Vec<LogRecord>,
    ) -> io::Result<ExitStatus> {
        let script = self.script_path(&item.script);
        debug!("Spawning {:?} in {:?}", script, self.working_dir);

        let mut child = Command::new(&script)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut stdout_lines = LineSplitter::default();
        let mut stderr_lines = LineSplitter::default();
        let mut stdout_buf = [0u8; READ_CHUNK];
        let mut stderr_buf = [0u8; READ_CHUNK];

        while stdout.is_some() || stderr.is_some() {
            let (kind, lines) = tokio::select! {
                read = read_chunk(&mut stdout, &mut stdout_buf), if stdout.is_some() => {
                    let n = read?;
                    if n == 0 {
                        stdout = None;
                        (LogKind::Stdout, stdout_lines.finish())
                    } else {
                        (LogKind::Stdout, stdout_lines.push(&stdout_buf[..n]))
                    }
                }
                read = read_chunk(&mut stderr, &mut stderr_buf), if stderr.is_some() => {
                    let n = read?;
                    if n == 0 {
                        stderr = None;
                        (LogKind::Stderr, stderr_lines.finish())
                    } else {
                        (LogKind::Stderr, stderr_lines.push(&stderr_buf[..n]))
                    }
                }
            };

            if lines.is_empty() {
                continue;
            }

            output.extend(lines.iter().map(|line| LogRecord::new(kind, line.clone())));
            emit(tx, RunnerEvent::OutputChunk {
                index,
                item: item.clone(),
                lines,
            })
            .await;
        }

        child.wait().await
    }

    fn script_path(&self, script: &str) -> PathBuf {
        let path = Path::new(script);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Repository root for a working directory: the path above the first
/// `installer_dir` component, or `cwd` itself when not nested in one.
pub fn resolve_repo_root(cwd: &Path, installer_dir: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in cwd.components() {
        if component.as_os_str() == installer_dir {
            if root.as_os_str().is_empty() {
                return PathBuf::from(".");
            }
            return root;
        }
        root.push(component);
    }
    cwd.to_path_buf()
}

async fn emit(tx: &mpsc::Sender<RunnerEvent>, event: RunnerEvent) {
    if tx.send(event).await.is_err() {
        trace!("Runner event dropped, receiver closed");
    }
}

async fn read_chunk<R: AsyncRead + Unpin>(stream: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize> {
    match stream {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}

/// Splits a byte stream into lines across read boundaries.
///
/// `\r` ends a line like `\n` does, so progress meters that redraw with a
/// bare carriage return show up as each update arrives.
#[derive(Debug, Default)]
struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n' || b == b'\r') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            push_line(&mut lines, &line[..pos]);
        }
        lines
    }

    /// Flush an unterminated final line
    fn finish(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.pending);
        let mut lines = Vec::new();
        push_line(&mut lines, &rest);
        lines
    }
}

fn push_line(lines: &mut Vec<String>, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}
