use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use usagemon_core::controller::{ControllerState, Status};

use super::usage_table::format_tokens;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(frame: &mut Frame, area: Rect, state: &ControllerState, spinner: char) {
        let line = Line::from(Self::build_spans(state, spinner));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn build_spans(state: &ControllerState, spinner: char) -> Vec<Span<'static>> {
        let status = state.status();
        let mut spans = vec![Self::status_badge(&status, spinner), Span::raw(" ")];

        if let Some(error) = state.error() {
            // Errors stay on one line
            let error = error.replace('\n', " ");
            spans.push(Span::styled(
                error,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }

        let totals = state.grand_total();
        spans.push(Span::styled(
            format!(
                "Σ {} in / {} out ",
                format_tokens(totals.input_tokens),
                format_tokens(totals.output_tokens)
            ),
            Style::default().fg(Color::White),
        ));

        for (key, action) in [
            ("Enter", "Send"),
            ("Tab", "Next"),
            ("F5", "Refresh"),
            ("F1", "Help"),
            ("Esc", "Quit"),
        ] {
            spans.push(Span::styled(
                key,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(":{} ", action),
                Style::default().fg(Color::DarkGray),
            ));
        }

        spans
    }

    fn status_badge(status: &Status, spinner: char) -> Span<'static> {
        let (text, color) = match status {
            Status::Idle => (format!(" {} ", status.label()), Color::DarkGray),
            Status::SummaryLoading => (format!(" {} {} ", spinner, status.label()), Color::Blue),
            Status::ChatSubmitting => (format!(" {} {} ", spinner, status.label()), Color::Magenta),
            Status::Error(_) => (format!(" {} ", status.label()), Color::Red),
        };
        Span::styled(
            text,
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    }
}
