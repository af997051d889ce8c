use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout as ScreenLayout;
use crate::wizard::Wizard;

/// The list of components about to be installed
pub fn draw_summary(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(wizard.theme.border_style())
        .title(" Confirm ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = wizard.selected_items();
    let mut lines = Vec::with_capacity(items.len() + 2);

    if items.is_empty() {
        lines.push(Line::styled("No components selected", wizard.theme.muted_style()));
    } else {
        lines.push(Line::styled(
            "Selected components to install:",
            wizard.theme.style().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::raw(""));
        for item in &items {
            lines.push(Line::styled(
                format!("  \u{2022} {}", item.name),
                wizard.theme.secondary_style(),
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height),
    );
}

pub fn draw_dialog(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let count = wizard.selection.len();
    let message = if count == 0 {
        "Finish without installing anything?".to_string()
    } else {
        format!("Install {count} component(s)?")
    };

    let width = 44.min(area.width.saturating_sub(4));
    let dialog = ScreenLayout::centered_box(area, width, 7);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(wizard.theme.primary_style())
        .title(" Proceed ");

    let inner = block.inner(dialog);
    frame.render_widget(Clear, dialog);
    frame.render_widget(block, dialog);

    if inner.height < 4 {
        return;
    }

    frame.render_widget(
        Paragraph::new(message)
            .style(wizard.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let key = wizard.theme.primary_style().add_modifier(Modifier::BOLD);
    let hints = Line::from(vec![
        Span::styled("[", wizard.theme.style()),
        Span::styled("Y", key),
        Span::styled("]es / [", wizard.theme.style()),
        Span::styled("N", key),
        Span::styled("]o", wizard.theme.style()),
    ]);

    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}
