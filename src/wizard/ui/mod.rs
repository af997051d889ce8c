mod complete;
mod confirm;
mod installing;
mod selector;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{Phase, Wizard};
use crate::ui::Layout as ScreenLayout;

/// Main draw function for the installer wizard
pub fn draw(frame: &mut Frame, wizard: &Wizard) {
    let layout = ScreenLayout::new(frame.area());
    frame.render_widget(Clear, layout.full);

    draw_header(frame, layout.header, wizard);

    match wizard.phase {
        Phase::Selecting => selector::draw(frame, layout.content, wizard),
        Phase::Confirming => {
            confirm::draw_summary(frame, layout.content, wizard);
            confirm::draw_dialog(frame, layout.content, wizard);
        }
        Phase::Installing => installing::draw(frame, layout.content, wizard),
        Phase::Complete => complete::draw(frame, layout.content, wizard),
    }

    draw_message(frame, layout.message, wizard);
    draw_status_bar(frame, layout.status, wizard);
}

/// Draw header bar (1 line, no borders)
fn draw_header(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let title = format!(
        " {} v{} ",
        wizard.config.general.title,
        env!("CARGO_PKG_VERSION")
    );
    frame.render_widget(
        Paragraph::new(title).style(wizard.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let profile = format!("[Profile: {}] ", wizard.profile.display_name());
    frame.render_widget(
        Paragraph::new(profile)
            .style(wizard.theme.secondary_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_message(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let Some(msg) = &wizard.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", wizard.theme.error_style(), wizard.theme.error_style())
    } else {
        (" Info ", wizard.theme.secondary_style(), wizard.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Line::from(Span::styled(msg.text.as_str(), text_style)))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    frame.render_widget(Clear, area);

    let badge = match wizard.phase {
        Phase::Selecting => "SELECT",
        Phase::Confirming => "CONFIRM",
        Phase::Installing => "INSTALL",
        Phase::Complete => "DONE",
    };

    let left_line = Line::from(vec![
        Span::styled(format!(" {badge} "), wizard.theme.badge_style(badge)),
        Span::raw(" "),
        Span::styled(wizard.status_bar.left_hint.clone(), wizard.theme.muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(left_line),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let count = format!("{} selected", wizard.selection.len());
    let right_text = if wizard.status_bar.right_hint.is_empty() {
        count
    } else {
        format!("{count}  {}", wizard.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(wizard.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::catalog::fixtures::sample;
    use crate::wizard::{GeneralConfig, Input, InstallerConfig, RunnerEvent, WizardAction};

    pub(super) fn wizard(defaults: &[&str]) -> Wizard {
        let config = InstallerConfig {
            general: GeneralConfig::default(),
            default_selections: defaults.iter().map(|s| s.to_string()).collect(),
            categories: sample(),
        };
        Wizard::new(config, PathBuf::from("/repo"))
    }

    pub(super) fn render(wizard: &Wizard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| draw(frame, wizard)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_header_shows_title_and_profile() {
        let screen = render(&wizard(&[]));
        assert!(screen.contains("Dotfiles Manager"));
        assert!(screen.contains("[Profile: Work]"));
    }

    #[test]
    fn test_selecting_screen_lists_checkboxes() {
        let screen = render(&wizard(&["zsh"]));
        assert!(screen.contains("[~] Terminal"));
        assert!(screen.contains("[x] zsh name"));
        assert!(screen.contains("[ ] tmux name"));
        assert!(!screen.contains("git name"));
    }

    #[test]
    fn test_confirm_screen_lists_selection() {
        let mut wizard = wizard(&["zsh"]);
        wizard.handle_input(Input::Confirm);
        let screen = render(&wizard);
        assert!(screen.contains("Selected components to install:"));
        assert!(screen.contains("zsh name"));
        assert!(screen.contains("[Y]es / [N]o"));
    }

    #[test]
    fn test_confirm_screen_without_selection() {
        let mut wizard = wizard(&[]);
        wizard.handle_input(Input::Confirm);
        assert!(render(&wizard).contains("No components selected"));
    }

    #[test]
    fn test_install_and_complete_screens() {
        let mut wizard = wizard(&["zsh"]);
        wizard.handle_input(Input::Confirm);
        let Some(WizardAction::StartInstall(items)) = wizard.handle_input(Input::Yes) else {
            panic!("expected install to start");
        };
        let zsh = items[0].clone();

        wizard.handle_runner_event(&RunnerEvent::StepStarted { index: 0, item: zsh.clone() });
        wizard.handle_runner_event(&RunnerEvent::OutputChunk {
            index: 0,
            item: zsh.clone(),
            lines: vec!["cloning plugins".to_string()],
        });
        let screen = render(&wizard);
        assert!(screen.contains("[1/1] zsh name"));
        assert!(screen.contains("Current Output"));
        assert!(screen.contains("cloning plugins"));

        wizard.handle_runner_event(&RunnerEvent::StepFailed {
            index: 0,
            item: zsh,
            error: "Process exited with code 2".to_string(),
        });
        let screen = render(&wizard);
        assert!(screen.contains("Installation Log"));
        assert!(screen.contains("zsh name failed: Process exited with code 2"));

        wizard.handle_runner_event(&RunnerEvent::AllComplete);
        let screen = render(&wizard);
        assert!(screen.contains("Installation finished with errors"));
        assert!(screen.contains("Restart your shell"));
    }
}
