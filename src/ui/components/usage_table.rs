use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use usagemon_core::usage::UsageRow;

/// Table of every (model, user label) row reported by the service
pub struct UsageTable;

impl UsageTable {
    /// Render the usage table
    pub fn render(frame: &mut Frame, area: Rect, rows: &[UsageRow]) {
        let block = Block::default()
            .title(format!(" Usage ({} rows) ", rows.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray));

        if rows.is_empty() {
            let paragraph = Paragraph::new("No usage recorded yet")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Model"),
            Cell::from("User"),
            Cell::from(Text::from("Input").alignment(Alignment::Right)),
            Cell::from(Text::from("Output").alignment(Alignment::Right)),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.model.clone()),
                    Cell::from(row.user_label.clone()),
                    Cell::from(
                        Text::from(format_tokens(row.total_input_tokens))
                            .alignment(Alignment::Right),
                    ),
                    Cell::from(
                        Text::from(format_tokens(row.total_output_tokens))
                            .alignment(Alignment::Right),
                    ),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(34),
            Constraint::Percentage(26),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ];

        let table = Table::new(body, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}

/// Format a token count with thousands separators ("1,234,567")
pub fn format_tokens(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
