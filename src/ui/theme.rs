use ratatui::style::{Color, Modifier, Style};

/// Colours shared by every installer screen
#[derive(Debug, Clone)]
pub struct Theme {
    /// Title, cursor row, running step and dialog keys
    pub primary: Color,
    /// Selected items and the profile badge
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    /// Failed steps and the error banner
    pub error: Color,
    /// Finished steps and success markers in the log
    pub success: Color,
    pub border: Color,
    /// Descriptions, details, stderr and hints
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Completed steps and the final success summary
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Row under the selection cursor
    pub fn cursor_style(&self) -> Style {
        self.primary_style().add_modifier(Modifier::BOLD)
    }

    /// Wizard phase badge at the left of the status bar (SELECT, CONFIRM, INSTALL, DONE)
    pub fn badge_style(&self, phase: &str) -> Style {
        let color = match phase {
            "SELECT" => self.secondary,
            "CONFIRM" => self.primary,
            "INSTALL" => self.success,
            _ => self.foreground,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
