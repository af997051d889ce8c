use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::wizard::{FlatEntry, Wizard};

pub fn draw(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(wizard.theme.border_style())
        .title(" Select components ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if wizard.navigation.is_empty() {
        frame.render_widget(
            Paragraph::new("No components available for this profile")
                .style(wizard.theme.muted_style())
                .alignment(Alignment::Center),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
        return;
    }

    let (lines, focus) = list_lines(wizard);
    let offset = scroll_offset(focus, inner.height as usize);

    frame.render_widget(
        Paragraph::new(lines).scroll((offset as u16, 0)),
        Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height),
    );
}

/// All rows of the list plus the line range the cursor row and its details occupy
fn list_lines(wizard: &Wizard) -> (Vec<Line<'static>>, (usize, usize)) {
    let theme = &wizard.theme;
    let mut lines = Vec::new();
    let mut focus = (0, 0);

    for (idx, entry) in wizard.navigation.entries().iter().enumerate() {
        let is_cursor = idx == wizard.navigation.cursor();
        let cursor = if is_cursor { ">" } else { " " };
        let start = lines.len();

        match entry {
            FlatEntry::Header { category } => {
                // Blank line between categories
                if idx > 0 {
                    lines.push(Line::raw(""));
                }

                let checkbox = if wizard.is_category_fully_selected(category) {
                    "[x]"
                } else if wizard.is_category_partially_selected(category) {
                    "[~]"
                } else {
                    "[ ]"
                };

                let style = if is_cursor {
                    theme.cursor_style()
                } else {
                    theme.style().add_modifier(Modifier::BOLD)
                };
                lines.push(Line::styled(format!("{cursor} {checkbox} {category}"), style));
            }
            FlatEntry::Item { item, .. } => {
                let selected = wizard.selection.contains(&item.id);
                let checkbox = if selected { "[x]" } else { "[ ]" };

                let style = if is_cursor {
                    theme.cursor_style()
                } else if selected {
                    theme.secondary_style()
                } else {
                    theme.style()
                };

                let mut spans = vec![Span::styled(
                    format!("  {cursor} {checkbox} {}", item.name),
                    style,
                )];
                if !item.description.is_empty() {
                    spans.push(Span::styled(
                        format!(" - {}", item.description),
                        theme.muted_style(),
                    ));
                }
                lines.push(Line::from(spans));

                if is_cursor {
                    for detail in &item.details {
                        lines.push(Line::styled(
                            format!("        \u{2192} {detail}"),
                            theme.muted_style(),
                        ));
                    }
                }
            }
        }

        if is_cursor {
            focus = (start, lines.len());
        }
    }

    (lines, focus)
}

/// First visible line so the focused rows stay on screen, preferring the row itself
fn scroll_offset((start, end): (usize, usize), height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let wanted = end.saturating_sub(height);
    wanted.min(start)
}
