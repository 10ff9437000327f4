//! Totals-by-model panel: one proportional bar per model.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use usagemon_core::controller::ControllerState;
use usagemon_core::usage::ModelTotal;

use super::usage_table::format_tokens;

/// Model name column is capped to this many characters
const MAX_LABEL_WIDTH: usize = 16;

/// Totals-by-model widget
pub struct ModelTotals;

impl ModelTotals {
    /// Render the totals panel
    pub fn render(frame: &mut Frame, area: Rect, state: &ControllerState) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(Self::build_title(state))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let totals = state.totals();
        if totals.is_empty() {
            let message = if state.summary_in_flight() > 0 {
                " Fetching usage..."
            } else {
                " No usage recorded yet"
            };
            let line = Line::from(Span::styled(message, Style::default().fg(Color::DarkGray)));
            frame.render_widget(Paragraph::new(vec![line]), inner);
            return;
        }

        // Uniform label and count columns across rows
        let label_width = totals
            .iter()
            .map(|t| t.model.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH);
        let counts: Vec<String> = totals.iter().map(Self::counts_text).collect();
        let counts_width = counts.iter().map(|s| s.len()).max().unwrap_or(0);
        let max_tokens = totals
            .iter()
            .map(|t| t.input_tokens.saturating_add(t.output_tokens))
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = totals
            .iter()
            .zip(counts.iter())
            .take(inner.height as usize)
            .map(|(total, counts)| {
                Self::render_total_line(
                    total,
                    counts,
                    inner.width,
                    label_width,
                    counts_width,
                    max_tokens,
                )
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Build the block title with optional timestamp
    fn build_title(state: &ControllerState) -> String {
        if let Some(fetched_at) = state.summary_fetched_at() {
            let local = fetched_at.with_timezone(&chrono::Local);
            format!(" Totals by Model ({}) ", local.format("%H:%M:%S"))
        } else {
            " Totals by Model ".to_string()
        }
    }

    fn counts_text(total: &ModelTotal) -> String {
        format!(
            "{} in / {} out",
            format_tokens(total.input_tokens),
            format_tokens(total.output_tokens)
        )
    }

    /// " gpt-4o      ████████░░░░  17 in / 8 out"
    fn render_total_line(
        total: &ModelTotal,
        counts: &str,
        width: u16,
        label_width: usize,
        counts_width: usize,
        max_tokens: u64,
    ) -> Line<'static> {
        let label: String = total.model.chars().take(label_width).collect();
        let fixed_width = 1 + label_width + 1 + 1 + counts_width;
        let bar_width = if width as usize > fixed_width + 4 {
            width as usize - fixed_width
        } else {
            4
        };

        let filled = Self::filled_cells(
            total.input_tokens.saturating_add(total.output_tokens),
            max_tokens,
            bar_width,
        );
        let empty = bar_width.saturating_sub(filled);

        Line::from(vec![
            Span::styled(
                format!(" {:w$} ", label, w = label_width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Gray)),
            Span::styled(
                "░".repeat(empty),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ),
            Span::styled(
                format!(" {:>w$}", counts, w = counts_width),
                Style::default().fg(Color::White),
            ),
        ])
    }

    /// Cells of a `bar_width` bar filled for `tokens` relative to `max_tokens`
    fn filled_cells(tokens: u64, max_tokens: u64, bar_width: usize) -> usize {
        if max_tokens == 0 {
            return 0;
        }
        ((tokens as u128 * bar_width as u128) / max_tokens as u128) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(model: &str, input: u64, output: u64) -> ModelTotal {
        ModelTotal {
            model: model.to_string(),
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(ModelTotals::filled_cells(0, 0, 10), 0);
        assert_eq!(ModelTotals::filled_cells(25, 25, 10), 10);
        assert_eq!(ModelTotals::filled_cells(5, 10, 10), 5);
        assert_eq!(ModelTotals::filled_cells(u64::MAX, u64::MAX, 40), 40);
    }

    #[test]
    fn test_counts_text() {
        assert_eq!(
            ModelTotals::counts_text(&total("gpt-4o", 17, 8)),
            "17 in / 8 out"
        );
        assert_eq!(
            ModelTotals::counts_text(&total("gpt-4o", 12_000, 3)),
            "12,000 in / 3 out"
        );
    }

    #[test]
    fn test_line_fills_width() {
        let t = total("gpt-4o-mini", 2, 1);
        let counts = ModelTotals::counts_text(&t);
        let line = ModelTotals::render_total_line(&t, &counts, 50, 11, counts.len(), 3);

        assert_eq!(line.width(), 50);
        assert_eq!(line.spans[0].content, " gpt-4o-mini ");
    }

    #[test]
    fn test_title_without_fetch() {
        let state = ControllerState::new();
        assert_eq!(ModelTotals::build_title(&state), " Totals by Model ");
    }
}
