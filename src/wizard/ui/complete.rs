use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::wizard::Wizard;

const RESTART_HINT: &str = "Restart your shell or run `exec $SHELL` to load the new configuration.";

pub fn draw(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let theme = &wizard.theme;
    let mut lines = vec![Line::raw("")];

    let border_style = match wizard.progress.as_ref() {
        None => {
            lines.push(Line::styled(
                "No components were installed",
                theme.muted_style().add_modifier(Modifier::BOLD),
            ));
            theme.border_style()
        }
        Some(progress) if progress.failed_tasks().next().is_none() => {
            lines.push(Line::styled(
                "Installation complete!",
                theme.success_style().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("{} component(s) installed.", progress.total()),
                theme.style(),
            ));
            lines.push(Line::styled(RESTART_HINT, theme.style()));
            theme.success_style()
        }
        Some(progress) => {
            lines.push(Line::styled(
                "Installation finished with errors",
                theme.error_style().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
            lines.push(Line::styled("Failed components:", theme.style()));
            for task in progress.failed_tasks() {
                lines.push(Line::styled(format!("  \u{2717} {}", task.name), theme.error_style()));
            }
            if let Some(error) = progress.first_failure() {
                lines.push(Line::raw(""));
                lines.push(Line::styled(format!("First error: {error}"), theme.muted_style()));
            }
            // Whatever did install still needs a fresh shell
            lines.push(Line::raw(""));
            lines.push(Line::styled(RESTART_HINT, theme.style()));
            theme.error_style()
        }
    };

    if let Some(path) = wizard.install_log_path() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Full log: {}", path.display()),
            theme.muted_style(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Done ");

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
