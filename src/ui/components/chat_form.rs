use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::form::{ChatForm, FormField, TextInput};

/// Width of the label column ("API key" + padding)
const LABEL_WIDTH: usize = 9;
/// Rows above the first prompt line (key, user, model, "Prompt" header)
const PROMPT_OFFSET: u16 = 4;
/// Character shown instead of each API key character
const MASK_CHAR: char = '•';

/// Chat form widget
pub struct ChatFormWidget;

impl ChatFormWidget {
    /// Render the form; `sending` is the number of chats in flight
    pub fn render(frame: &mut Frame, area: Rect, form: &ChatForm, sending: usize) {
        let title = if sending > 0 {
            format!(" Send a Prompt (sending {}) ", sending)
        } else {
            " Send a Prompt ".to_string()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        let focus = form.focus();
        let masked = Self::mask(form.api_key.value());

        let mut lines = vec![
            Self::field_line(FormField::ApiKey, focus, &masked),
            Self::field_line(FormField::UserLabel, focus, form.user_label.value()),
            Self::model_line(form.model(), focus == FormField::Model),
            Line::from(Span::styled(
                FormField::Prompt.label(),
                Self::label_style(focus == FormField::Prompt),
            )),
        ];
        for prompt_line in form.prompt.value().split('\n') {
            lines.push(Line::from(Span::styled(
                format!("  {}", prompt_line),
                Style::default().fg(Color::White),
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some((x, y)) = Self::cursor_position(form, area) {
            frame.set_cursor_position((x, y));
        }
    }

    /// Height needed to show every prompt line, capped at `max_height`
    pub fn calculate_height(form: &ChatForm, max_height: u16) -> u16 {
        let prompt_lines = Self::clamp_u16(form.prompt.value().split('\n').count());
        (2 + PROMPT_OFFSET).saturating_add(prompt_lines).min(max_height)
    }

    /// Replace every character with the mask character
    pub(crate) fn mask(value: &str) -> String {
        value.chars().map(|_| MASK_CHAR).collect()
    }

    fn label_style(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn field_line(field: FormField, focus: FormField, value: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{:w$}", field.label(), w = LABEL_WIDTH),
                Self::label_style(field == focus),
            ),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    }

    fn model_line(model: &str, focused: bool) -> Line<'static> {
        let arrow_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::styled(
                format!("{:w$}", FormField::Model.label(), w = LABEL_WIDTH),
                Self::label_style(focused),
            ),
            Span::styled("◀ ", arrow_style),
            Span::styled(
                model.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", arrow_style),
        ])
    }

    /// Terminal cursor position for the focused text field
    fn cursor_position(form: &ChatForm, area: Rect) -> Option<(u16, u16)> {
        let (row, column) = match form.focus() {
            FormField::ApiKey => (0, LABEL_WIDTH + Self::chars_before(&form.api_key)),
            FormField::UserLabel => (1, LABEL_WIDTH + Self::width_before(&form.user_label)),
            FormField::Model => return None,
            FormField::Prompt => {
                let before = &form.prompt.value()[..form.prompt.cursor()];
                let line_index = Self::clamp_u16(before.split('\n').count().saturating_sub(1));
                let last_line = before.rsplit('\n').next().unwrap_or("");
                (
                    PROMPT_OFFSET.saturating_add(line_index),
                    last_line.width().saturating_add(2),
                )
            }
        };

        let x = area.x.saturating_add(1).saturating_add(Self::clamp_u16(column));
        let y = area.y.saturating_add(1).saturating_add(row);

        // Ensure cursor is within bounds
        let x = x.min(area.x + area.width.saturating_sub(2));
        let y = y.min(area.y + area.height.saturating_sub(2));
        Some((x, y))
    }

    fn clamp_u16(value: usize) -> u16 {
        u16::try_from(value).unwrap_or(u16::MAX)
    }

    fn chars_before(input: &TextInput) -> usize {
        input.value()[..input.cursor()].chars().count()
    }

    fn width_before(input: &TextInput) -> usize {
        input.value()[..input.cursor()].width()
    }
}
