use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Screen regions shared by every wizard phase
pub struct Layout {
    pub full: Rect,
    pub header: Rect,
    pub content: Rect,
    pub message: Rect,
    pub status: Rect,
}

impl Layout {
    /// Title and profile line on top, phase content, step errors and info
    /// in the message panel, key hints in the status bar
    pub fn new(area: Rect) -> Self {
        // Message panel space is always reserved so the list never jumps
        // when a failure is reported
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Title and profile
                Constraint::Min(10),    // Selector / confirm / install / done
                Constraint::Length(3),  // Error or info message
                Constraint::Length(1),  // Key hints
            ])
            .split(area);

        Self {
            full: area,
            header: chunks[0],
            content: chunks[1],
            message: chunks[2],
            status: chunks[3],
        }
    }

    /// Box for the confirm dialog, shrunk to fit small terminals
    pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let horizontal = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(width.min(area.width)),
                Constraint::Fill(1),
            ])
            .split(area);

        let vertical = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height.min(area.height)),
                Constraint::Fill(1),
            ])
            .split(horizontal[1]);

        vertical[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_reserves_fixed_rows() {
        let layout = Layout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.message.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.content.height, 19);
    }

    #[test]
    fn test_centered_box_fits_small_area() {
        let area = Rect::new(0, 0, 20, 5);
        let centered = Layout::centered_box(area, 44, 7);
        assert!(centered.width <= area.width);
        assert!(centered.height <= area.height);
    }
}
