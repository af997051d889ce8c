mod config;
mod log;
mod navigation;
mod progress;
mod runner;
mod selection;
pub mod ui;
mod widgets;

pub use config::{
    GeneralConfig, InstallerConfig, CONFIG_FILE_NAME, DEFAULT_INSTALLER_DIR, MAX_VIEW_LINES,
};
pub use log::{InstallLog, LogKind, LogRecord, TailBuffer};
pub use navigation::{FlatEntry, Navigation};
pub use progress::{InstallProgress, TaskState, TaskStatus};
pub use runner::{
    resolve_repo_root, InstallReport, RunHandle, RunnerEvent, StepOutcome, StepResult, TaskRunner,
};
pub use selection::Selection;
pub use widgets::StatusBarState;

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::{filter_by_profile, Catalog, CatalogItem, Profile};
use crate::ui::Theme;

/// Wizard phases, in the only order they can be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Selecting,
    Confirming,
    Installing,
    Complete,
}

/// Discrete user inputs the wizard reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Toggle,
    SwitchProfile,
    ToggleAll,
    Confirm,
    Yes,
    No,
    Escape,
    Quit,
    Interrupt,
}

impl Input {
    /// Map a key press; anything unrecognized yields `None`
    pub fn from_key(key: KeyEvent) -> Option<Input> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Input::Interrupt),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Input::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Input::Down),
            KeyCode::Char(' ') => Some(Input::Toggle),
            KeyCode::Tab => Some(Input::SwitchProfile),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Input::ToggleAll),
            KeyCode::Enter => Some(Input::Confirm),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Input::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Input::No),
            KeyCode::Esc => Some(Input::Escape),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
            _ => None,
        }
    }
}

/// Actions the event loop has to carry out for the wizard
#[derive(Debug, PartialEq, Eq)]
pub enum WizardAction {
    /// Leave the program
    Quit,
    /// Run these items, in this order
    StartInstall(Vec<CatalogItem>),
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Main wizard state
pub struct Wizard {
    pub config: InstallerConfig,
    pub theme: Theme,
    repo_root: PathBuf,

    // Full catalog and the view visible under the current profile
    catalog: Catalog,
    visible: Catalog,

    pub phase: Phase,
    pub profile: Profile,
    pub navigation: Navigation,
    pub selection: Selection,

    // Install phase state, created on entering Installing
    pub progress: Option<InstallProgress>,

    // UI state
    pub message: Option<Message>,
    pub status_bar: StatusBarState,
    pub should_exit: bool,
    spinner_frame: usize,
}

impl Wizard {
    pub fn new(config: InstallerConfig, repo_root: PathBuf) -> Self {
        let catalog = config.categories.clone();
        let profile = config.general.default_profile;
        let visible = filter_by_profile(&catalog, profile);
        let navigation = Navigation::new(&visible);
        let selection = Selection::with_defaults(&config.default_selections, &visible.item_ids());

        let mut wizard = Self {
            config,
            theme: Theme::default(),
            repo_root,
            catalog,
            visible,
            phase: Phase::Selecting,
            profile,
            navigation,
            selection,
            progress: None,
            message: None,
            status_bar: StatusBarState::default(),
            should_exit: false,
            spinner_frame: 0,
        };
        wizard.update_status_bar();
        wizard
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Items visible under the current profile
    pub fn visible(&self) -> &Catalog {
        &self.visible
    }

    /// Selected items in install order
    pub fn selected_items(&self) -> Vec<CatalogItem> {
        self.selection.selected_items(&self.visible)
    }

    /// Runner bound to the repository root
    pub fn runner(&self) -> TaskRunner {
        TaskRunner::new(&self.repo_root)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        let input = Input::from_key(key)?;

        // Clear message on any key (unless installing)
        if self.message.is_some() && self.phase != Phase::Installing {
            self.message = None;
        }

        let action = self.handle_input(input);
        self.update_status_bar();
        action
    }

    pub fn handle_input(&mut self, input: Input) -> Option<WizardAction> {
        match self.phase {
            Phase::Selecting => self.handle_selecting(input),
            Phase::Confirming => self.handle_confirming(input),
            // No cancellation once scripts are running
            Phase::Installing => None,
            Phase::Complete => match input {
                Input::Confirm | Input::Escape | Input::Quit | Input::Interrupt => self.quit(),
                _ => None,
            },
        }
    }

    fn handle_selecting(&mut self, input: Input) -> Option<WizardAction> {
        match input {
            Input::Up => self.navigation.move_up(),
            Input::Down => self.navigation.move_down(),
            Input::Toggle => self.toggle_current(),
            Input::SwitchProfile => self.switch_profile(),
            Input::ToggleAll => {
                let visible_ids = self.visible.item_ids();
                self.selection.toggle_all(&visible_ids);
            }
            Input::Confirm => {
                self.phase = Phase::Confirming;
            }
            Input::Quit | Input::Escape | Input::Interrupt => return self.quit(),
            Input::Yes | Input::No => {}
        }
        None
    }

    fn handle_confirming(&mut self, input: Input) -> Option<WizardAction> {
        match input {
            Input::Yes => return self.start_install(),
            Input::No => {
                self.phase = Phase::Selecting;
            }
            Input::Escape | Input::Interrupt => return self.quit(),
            _ => {}
        }
        None
    }

    fn quit(&mut self) -> Option<WizardAction> {
        self.should_exit = true;
        Some(WizardAction::Quit)
    }

    /// Toggle the focused row: an item, or every item of a category header
    fn toggle_current(&mut self) {
        match self.navigation.current() {
            Some(FlatEntry::Header { category }) => {
                let ids = self.navigation.category_item_ids(category);
                self.selection.toggle_category(&ids);
            }
            Some(FlatEntry::Item { item, .. }) => {
                self.selection.toggle_item(&item.id);
            }
            None => {}
        }
    }

    /// Flip between work and personal, rebuilding the list for the new view
    fn switch_profile(&mut self) {
        self.profile = self.profile.toggled();
        self.visible = filter_by_profile(&self.catalog, self.profile);
        self.navigation.rebuild(&self.visible);

        // Personal is a superset of work, so only the work direction can hide selections
        if self.profile == Profile::Work {
            let before = self.selection.len();
            self.selection.prune_to_visible(&self.visible.item_ids());
            let pruned = before - self.selection.len();
            if pruned > 0 {
                debug!("Pruned {} selection(s) hidden by the work profile", pruned);
            }
        }

        info!("Switched to {} profile", self.profile.display_name());
    }

    fn start_install(&mut self) -> Option<WizardAction> {
        let items = self.selected_items();

        // Nothing to install: go straight to the end
        if items.is_empty() {
            info!("No items selected, skipping installation");
            self.phase = Phase::Complete;
            return None;
        }

        info!("Installing {} item(s)", items.len());
        self.progress = Some(InstallProgress::new(
            &items,
            self.config.general.output_lines,
            self.config.general.log_lines,
        ));
        self.phase = Phase::Installing;
        Some(WizardAction::StartInstall(items))
    }

    /// Fold a runner event into the install screen.
    ///
    /// Failures are shown as they happen but every step is tracked; the wizard
    /// completes only once the runner reports the whole queue done.
    pub fn handle_runner_event(&mut self, event: &RunnerEvent) {
        if self.phase != Phase::Installing {
            return;
        }

        if let Some(progress) = self.progress.as_mut() {
            progress.apply(event);
        }

        match event {
            RunnerEvent::StepFailed { item, error, .. } => {
                self.set_error(format!("{} failed: {}", item.name, error));
            }
            RunnerEvent::AllComplete => {
                self.phase = Phase::Complete;
                let failed = self.failed_count();
                if failed > 0 {
                    self.set_error(format!("{} item(s) failed to install", failed));
                } else {
                    self.set_info("All items installed".to_string());
                }
            }
            _ => {}
        }

        self.update_status_bar();
    }

    /// Wait for a run to end and keep its report. Called when the runner
    /// closes its channel and again before exiting, so a quick exit after
    /// the last step still writes the log.
    pub async fn finish_run(&mut self, handle: RunHandle) {
        match handle.finish().await {
            Ok(report) => self.finish_install(&report),
            Err(e) => {
                error!("Install task failed: {}", e);
                self.handle_runner_event(&RunnerEvent::AllComplete);
                self.set_error(format!("Installer task failed: {e}"));
            }
        }
    }

    /// Persist the full log of a finished run, if configured
    pub fn finish_install(&mut self, report: &InstallReport) {
        let Some(path) = self.install_log_path() else {
            return;
        };

        match report.log.write_to(&path) {
            Ok(()) => info!("Install log written to {:?}", path),
            Err(e) => {
                warn!("Failed to write install log {:?}: {}", path, e);
                self.set_error(format!("Could not save install log: {e}"));
            }
        }
    }

    pub fn install_log_path(&self) -> Option<PathBuf> {
        self.config
            .general
            .install_log
            .as_ref()
            .map(|path| self.repo_root.join(path))
    }

    pub fn failed_count(&self) -> usize {
        self.progress
            .as_ref()
            .map(|progress| progress.failed_tasks().count())
            .unwrap_or(0)
    }

    /// Whether the run ended without installing anything
    pub fn nothing_installed(&self) -> bool {
        self.progress.is_none()
    }

    pub fn is_category_fully_selected(&self, category: &str) -> bool {
        let ids = self.navigation.category_item_ids(category);
        !ids.is_empty() && self.selection.all_selected(&ids)
    }

    pub fn is_category_partially_selected(&self, category: &str) -> bool {
        let ids = self.navigation.category_item_ids(category);
        self.selection.any_selected(&ids) && !self.selection.all_selected(&ids)
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    /// Update status bar based on the current phase
    pub fn update_status_bar(&mut self) {
        self.status_bar = match self.phase {
            Phase::Selecting => StatusBarState::selecting(),
            Phase::Confirming => StatusBarState::confirming(!self.selection.is_empty()),
            Phase::Installing => StatusBarState::installing(),
            Phase::Complete => StatusBarState::complete(),
        };
    }
}
