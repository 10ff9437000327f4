use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use usagemon_core::usage::ChatResponse;

/// Panel showing the last model answer
pub struct ResponsePanel;

impl ResponsePanel {
    /// Render the response panel
    pub fn render(frame: &mut Frame, area: Rect, response: Option<&ChatResponse>) {
        let block = Block::default()
            .title(" Response ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        let lines = Self::build_lines(response);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_lines(response: Option<&ChatResponse>) -> Vec<Line<'static>> {
        match response {
            Some(response) => response
                .content
                .lines()
                .map(|line| {
                    Line::from(Span::styled(
                        line.to_string(),
                        Style::default().fg(Color::White),
                    ))
                })
                .collect(),
            None => vec![Line::from(Span::styled(
                "No answer yet. Press Enter to send the prompt.",
                Style::default().fg(Color::DarkGray),
            ))],
        }
    }
}
