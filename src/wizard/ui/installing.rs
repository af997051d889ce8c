use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::Theme;
use crate::wizard::{InstallProgress, LogKind, TaskState, Wizard};

/// Task list rows shown before it starts eating into the output boxes
const MAX_TASK_ROWS: usize = 8;

pub fn draw(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let Some(progress) = wizard.progress.as_ref() else {
        return;
    };

    let banner_rows = u16::from(progress.first_failure().is_some());
    let task_rows = progress.total().min(MAX_TASK_ROWS) as u16;
    let output_rows = u16::try_from(wizard.config.general.output_lines)
        .unwrap_or(u16::MAX)
        .saturating_add(2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Current step
            Constraint::Length(banner_rows),  // First error
            Constraint::Length(task_rows),    // Step list
            Constraint::Length(output_rows),  // Current output
            Constraint::Min(3),               // Installation log
        ])
        .split(area);

    draw_current_step(frame, chunks[0], wizard, progress);
    if let Some(error) = progress.first_failure() {
        frame.render_widget(
            Paragraph::new(format!(" ! {error}"))
                .style(wizard.theme.error_style().add_modifier(Modifier::BOLD)),
            chunks[1],
        );
    }
    draw_task_list(frame, chunks[2], wizard, progress);
    draw_output(frame, chunks[3], wizard, progress);
    draw_log(frame, chunks[4], wizard, progress);
}

fn draw_current_step(frame: &mut Frame, area: Rect, wizard: &Wizard, progress: &InstallProgress) {
    let line = match (progress.current_task, progress.current_name()) {
        (Some(idx), Some(name)) => format!(
            " [{}/{}] {} {}",
            idx + 1,
            progress.total(),
            name,
            wizard.spinner_char()
        ),
        _ => " Preparing...".to_string(),
    };

    frame.render_widget(
        Paragraph::new(line).style(wizard.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );
}

fn draw_task_list(frame: &mut Frame, area: Rect, wizard: &Wizard, progress: &InstallProgress) {
    // Keep the running step in view when the list is longer than the area
    let skip = progress
        .current_task
        .map(|idx| (idx + 1).saturating_sub(area.height as usize))
        .unwrap_or(0);

    let lines: Vec<Line> = progress
        .tasks
        .iter()
        .skip(skip)
        .take(area.height as usize)
        .map(|task| {
            let (status_char, style) = match task.status {
                TaskState::Pending => (' ', wizard.theme.muted_style()),
                TaskState::Running => (wizard.spinner_char(), wizard.theme.primary_style()),
                TaskState::Success => ('x', wizard.theme.success_style()),
                TaskState::Failed => ('!', wizard.theme.error_style()),
            };
            Line::styled(format!("  [{status_char}] {}", task.name), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_output(frame: &mut Frame, area: Rect, wizard: &Wizard, progress: &InstallProgress) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(wizard.theme.border_style())
        .title(" Current Output ");

    let lines: Vec<Line> = if progress.has_output() {
        progress
            .output()
            .map(|line| Line::styled(line.as_str(), wizard.theme.style()))
            .collect()
    } else {
        vec![Line::styled("Waiting for output...", wizard.theme.muted_style())]
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_log(frame: &mut Frame, area: Rect, wizard: &Wizard, progress: &InstallProgress) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(wizard.theme.border_style())
        .title(" Installation Log ");

    // Newest lines at the bottom
    let visible = area.height.saturating_sub(2) as usize;
    let records: Vec<_> = progress.log().collect();
    let skip = records.len().saturating_sub(visible);

    let lines: Vec<Line> = records[skip..]
        .iter()
        .map(|record| Line::styled(record.text.as_str(), log_style(&wizard.theme, record.kind)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn log_style(theme: &Theme, kind: LogKind) -> Style {
    match kind {
        LogKind::Start => theme.primary_style().add_modifier(Modifier::BOLD),
        LogKind::Success => theme.success_style(),
        LogKind::Failure => theme.error_style().add_modifier(Modifier::BOLD),
        LogKind::Stderr => theme.muted_style(),
        LogKind::Stdout => theme.style(),
    }
}
