use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Help popup widget
pub struct HelpPopup;

impl HelpPopup {
    /// Render the help popup
    pub fn render(frame: &mut Frame, area: Rect) {
        // Clear the area first
        frame.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "usagemon - LLM usage monitor",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Self::section("Form"),
            Self::help_line("Tab / ↓", "Next field"),
            Self::help_line("Shift+Tab / ↑", "Previous field"),
            Self::help_line("← / →", "Move cursor, or change model"),
            Self::help_line("Alt+Enter", "New line in prompt"),
            Line::from(""),
            Self::section("Actions"),
            Self::help_line("Enter", "Send prompt"),
            Self::help_line("F5 / Ctrl+r", "Refresh usage summary"),
            Line::from(""),
            Self::section("General"),
            Self::help_line("F1", "Toggle this help"),
            Self::help_line("Esc / Ctrl+c", "Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press any key to close",
                Style::default().fg(Color::DarkGray),
            )]),
        ];

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(help_text).block(block);

        frame.render_widget(paragraph, area);
    }

    fn section(title: &str) -> Line<'static> {
        Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )])
    }

    fn help_line(key: &str, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:15}", key),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ])
    }
}
