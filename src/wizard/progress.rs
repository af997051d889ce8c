use super::log::{LogRecord, TailBuffer};
use super::runner::RunnerEvent;
use crate::catalog::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Success,
    Failed,
}

/// Status of one queued item as shown on the install screen
#[derive(Debug, Clone)]
pub struct TaskStatus {
    pub name: String,
    pub status: TaskState,
}

/// What the install screen shows, folded from runner events.
///
/// Both views are bounded: the current output keeps the last lines of the
/// running step, the log keeps the last lines across the run.
#[derive(Debug, Clone)]
pub struct InstallProgress {
    pub tasks: Vec<TaskStatus>,
    pub current_task: Option<usize>,
    output: TailBuffer<String>,
    step_lines: TailBuffer<String>,
    log: TailBuffer<LogRecord>,
    first_failure: Option<String>,
    finished: bool,
}

impl InstallProgress {
    pub fn new(items: &[CatalogItem], output_lines: usize, log_lines: usize) -> Self {
        Self {
            tasks: items
                .iter()
                .map(|item| TaskStatus {
                    name: item.name.clone(),
                    status: TaskState::Pending,
                })
                .collect(),
            current_task: None,
            output: TailBuffer::new(output_lines),
            step_lines: TailBuffer::new(log_lines),
            log: TailBuffer::new(log_lines),
            first_failure: None,
            finished: false,
        }
    }

    pub fn apply(&mut self, event: &RunnerEvent) {
        match event {
            RunnerEvent::StepStarted { index, item } => {
                self.set_state(*index, TaskState::Running);
                self.current_task = Some(*index);
                self.output.clear();
                self.step_lines.clear();
                self.log.push(LogRecord::started(item));
            }
            RunnerEvent::OutputChunk { lines, .. } => {
                self.output.extend(lines.iter().cloned());
                self.step_lines.extend(lines.iter().cloned());
            }
            RunnerEvent::StepSucceeded { index, item } => {
                self.set_state(*index, TaskState::Success);
                self.flush_step_lines();
                self.log.push(LogRecord::succeeded(item));
            }
            RunnerEvent::StepFailed { index, item, error } => {
                self.set_state(*index, TaskState::Failed);
                self.flush_step_lines();
                self.log.push(LogRecord::failed(item, error));
                if self.first_failure.is_none() {
                    self.first_failure = Some(error.clone());
                }
            }
            RunnerEvent::AllComplete => {
                self.current_task = None;
                self.finished = true;
            }
        }
    }

    fn set_state(&mut self, index: usize, status: TaskState) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.status = status;
        }
    }

    fn flush_step_lines(&mut self) {
        let lines: Vec<String> = self.step_lines.iter().cloned().collect();
        self.log.extend(lines.into_iter().map(LogRecord::output));
        self.step_lines.clear();
    }

    /// Recent output of the running step
    pub fn output(&self) -> impl Iterator<Item = &String> {
        self.output.iter()
    }

    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    /// Recent log lines across all steps
    pub fn log(&self) -> impl Iterator<Item = &LogRecord> {
        self.log.iter()
    }

    pub fn first_failure(&self) -> Option<&str> {
        self.first_failure.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_task
            .and_then(|idx| self.tasks.get(idx))
            .map(|task| task.name.as_str())
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = &TaskStatus> {
        self.tasks.iter().filter(|task| task.status == TaskState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;
    use crate::wizard::log::LogKind;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_output_is_bounded_and_reset_per_step() {
        let a = item("a", None);
        let b = item("b", None);
        let mut progress = InstallProgress::new(&[a.clone(), b.clone()], 2, 20);

        progress.apply(&RunnerEvent::StepStarted { index: 0, item: a.clone() });
        progress.apply(&RunnerEvent::OutputChunk {
            index: 0,
            item: a.clone(),
            lines: lines(&["1", "2", "3"]),
        });
        assert_eq!(progress.output().cloned().collect::<Vec<_>>(), vec!["2", "3"]);
        assert_eq!(progress.current_name(), Some("a name"));

        progress.apply(&RunnerEvent::StepSucceeded { index: 0, item: a });
        progress.apply(&RunnerEvent::StepStarted { index: 1, item: b });
        assert!(!progress.has_output());
        assert_eq!(progress.tasks[0].status, TaskState::Success);
        assert_eq!(progress.tasks[1].status, TaskState::Running);
    }

    #[test]
    fn test_log_gets_output_on_step_end() {
        let a = item("a", None);
        let mut progress = InstallProgress::new(&[a.clone()], 10, 20);

        progress.apply(&RunnerEvent::StepStarted { index: 0, item: a.clone() });
        progress.apply(&RunnerEvent::OutputChunk {
            index: 0,
            item: a.clone(),
            lines: lines(&["x", "y"]),
        });
        assert_eq!(progress.log().count(), 1);

        progress.apply(&RunnerEvent::StepFailed {
            index: 0,
            item: a,
            error: "Process exited with code 1".to_string(),
        });
        let texts: Vec<&str> = progress.log().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                ">>> Installing a name...",
                "x",
                "y",
                "\u{2717} a name failed: Process exited with code 1",
            ]
        );
        assert_eq!(progress.log().last().map(|r| r.kind), Some(LogKind::Failure));
        assert_eq!(progress.first_failure(), Some("Process exited with code 1"));
        assert_eq!(progress.failed_tasks().count(), 1);
    }

    #[test]
    fn test_log_is_bounded() {
        let a = item("a", None);
        let mut progress = InstallProgress::new(&[a.clone()], 10, 3);

        progress.apply(&RunnerEvent::StepStarted { index: 0, item: a.clone() });
        progress.apply(&RunnerEvent::OutputChunk {
            index: 0,
            item: a.clone(),
            lines: lines(&["1", "2", "3", "4", "5"]),
        });
        progress.apply(&RunnerEvent::StepSucceeded { index: 0, item: a });

        let texts: Vec<&str> = progress.log().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["4", "5", "\u{2713} a name completed successfully"]);
    }

    #[test]
    fn test_first_failure_is_kept() {
        let a = item("a", None);
        let b = item("b", None);
        let mut progress = InstallProgress::new(&[a.clone(), b.clone()], 10, 20);

        progress.apply(&RunnerEvent::StepFailed { index: 0, item: a, error: "first".into() });
        progress.apply(&RunnerEvent::StepFailed { index: 1, item: b, error: "second".into() });
        progress.apply(&RunnerEvent::AllComplete);

        assert_eq!(progress.first_failure(), Some("first"));
        assert!(progress.is_finished());
        assert!(progress.current_task.is_none());
    }
}
