use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotfiles_installer::catalog::Profile;
use dotfiles_installer::error::{InstallerError, Result};
use dotfiles_installer::event::{Event, EventHandler};
use dotfiles_installer::wizard::{
    resolve_repo_root, InstallerConfig, RunHandle, RunnerEvent, Wizard, WizardAction,
    DEFAULT_INSTALLER_DIR,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotfiles-installer")]
#[command(author, version, about = "Interactive installer for a dotfiles repository")]
struct Args {
    /// Path to installer config file (default: <repo>/installer.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Profile to start in, overriding the config
    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// Save the full installation log to this file after the run
    #[arg(long)]
    install_log: Option<PathBuf>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting dotfiles-installer");
        }
    }

    // Configuration problems are reported before the terminal is taken over
    let (config, repo_root) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load config: {}", e);
            eprintln!("dotfiles-installer: {e}");
            std::process::exit(1);
        }
    };
    info!("Repository root: {:?}", repo_root);

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run_wizard(&mut terminal, config, repo_root).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Installer error: {}", e);
    }

    result
}

/// Resolve the repository root and the config that applies to it
fn load_config(args: &Args) -> Result<(InstallerConfig, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let repo_root = resolve_repo_root(&cwd, DEFAULT_INSTALLER_DIR);

    let mut config = match args.config {
        Some(ref path) => InstallerConfig::load_from(path)?,
        None => InstallerConfig::discover(&repo_root)?,
    };

    // A config may place the installer under a different directory name
    let repo_root = if config.general.installer_dir == DEFAULT_INSTALLER_DIR {
        repo_root
    } else {
        resolve_repo_root(&cwd, &config.general.installer_dir)
    };

    if let Some(profile) = args.profile {
        config.general.default_profile = profile;
    }
    if let Some(ref path) = args.install_log {
        config.general.install_log = Some(path.clone());
    }

    if config.categories.is_empty() {
        warn!("Catalog has no categories");
    }

    Ok((config, absolute(&cwd, repo_root)))
}

fn absolute(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| InstallerError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| InstallerError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| InstallerError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| InstallerError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| InstallerError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: InstallerConfig,
    repo_root: PathBuf,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut events = EventHandler::new(tick_rate);

    let mut wizard = Wizard::new(config, repo_root);
    let mut run: Option<RunHandle> = None;

    loop {
        terminal
            .draw(|frame| dotfiles_installer::wizard::ui::draw(frame, &wizard))
            .map_err(|e| InstallerError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => {
                    if let Some(WizardAction::StartInstall(items)) = wizard.handle_key(key) {
                        run = Some(wizard.runner().run(items));
                    }
                }
                Some(Event::Resize) => {}
                Some(Event::Tick) => wizard.tick(),
                None => break,
            },
            runner_event = next_runner_event(&mut run) => match runner_event {
                Some(event) => wizard.handle_runner_event(&event),
                // The runner dropped its sender: the run is over
                None => {
                    if let Some(handle) = run.take() {
                        wizard.finish_run(handle).await;
                    }
                }
            },
        }

        if wizard.should_exit {
            if let Some(handle) = run.take() {
                wizard.finish_run(handle).await;
            }
            break;
        }
    }

    Ok(())
}

async fn next_runner_event(run: &mut Option<RunHandle>) -> Option<RunnerEvent> {
    match run {
        Some(handle) => handle.events.recv().await,
        None => std::future::pending().await,
    }
}
