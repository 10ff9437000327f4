use ratatui::layout::{Constraint, Direction, Rect};

/// Minimum height of the chat form block
const MIN_FORM_HEIGHT: u16 = 8;

/// Layout configuration for the dashboard
pub struct Layout {
    /// Width percentage of the chat form (left of the response panel)
    pub form_width_pct: u16,
    /// Width percentage of the usage table (left of the totals panel)
    pub table_width_pct: u16,
}

impl Layout {
    /// Create a new layout with default settings
    pub fn new() -> Self {
        Self {
            form_width_pct: 50,
            table_width_pct: 60,
        }
    }

    /// Calculate the main areas
    ///
    /// Layout: [ Chat form   ] [ Response      ]
    ///         [ Usage table ] [ Totals        ]
    ///         [         Status bar            ]
    ///
    /// `form_height` is the height the form wants; it is clamped so the
    /// usage panels keep at least a few rows.
    pub fn calculate(&self, area: Rect, form_height: u16) -> LayoutAreas {
        // First, split off the status bar at the bottom
        let main_and_status = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(area);

        let main_area = main_and_status[0];
        let status_bar = main_and_status[1];

        let max_form = main_area.height.saturating_sub(5).max(MIN_FORM_HEIGHT);
        let form_height = form_height.clamp(MIN_FORM_HEIGHT, max_form);

        let rows = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(form_height), Constraint::Min(3)])
            .split(main_area);

        let top = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(self.form_width_pct),
                Constraint::Percentage(100 - self.form_width_pct),
            ])
            .split(rows[0]);

        let bottom = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(self.table_width_pct),
                Constraint::Percentage(100 - self.table_width_pct),
            ])
            .split(rows[1]);

        LayoutAreas {
            form: top[0],
            response: top[1],
            usage_table: bottom[0],
            totals: bottom[1],
            status_bar,
        }
    }

    /// Calculate areas for a popup (centered)
    pub fn popup_area(&self, area: Rect, width_pct: u16, height_pct: u16) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - height_pct) / 2),
                Constraint::Percentage(height_pct),
                Constraint::Percentage((100 - height_pct) / 2),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculated layout areas
pub struct LayoutAreas {
    pub form: Rect,
    pub response: Rect,
    pub usage_table: Rect,
    pub totals: Rect,
    pub status_bar: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_calculation() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 100, 50);
        let areas = layout.calculate(area, 10);

        assert_eq!(areas.status_bar.height, 1);
        assert_eq!(areas.status_bar.y, 49);
        assert_eq!(areas.form.height, 10);
        assert_eq!(areas.form.y, areas.response.y);
        assert!(areas.form.x < areas.response.x);
        assert!(areas.usage_table.y > areas.form.y);
        assert!(areas.usage_table.x < areas.totals.x);
    }

    #[test]
    fn test_form_height_clamped() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 80, 24);

        let small = layout.calculate(area, 2);
        assert_eq!(small.form.height, MIN_FORM_HEIGHT);

        let huge = layout.calculate(area, 200);
        // 23 main rows, 5 kept for the usage panels
        assert_eq!(huge.form.height, 18);
        assert!(huge.usage_table.height >= 3);
    }

    #[test]
    fn test_popup_area() {
        let layout = Layout::new();
        let area = Rect::new(0, 0, 100, 50);
        let popup = layout.popup_area(area, 60, 40);

        // Popup should be centered
        assert!(popup.x > 0);
        assert!(popup.y > 0);
        assert!(popup.x + popup.width < area.width);
        assert!(popup.y + popup.height < area.height);
    }
}
