use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};

use usagemon_core::client::HttpUsageClient;
use usagemon_core::config::Settings;
use usagemon_core::controller::{ControllerEvent, InteractionController};

use super::components::{
    ChatFormWidget, HelpPopup, ModelTotals, ResponsePanel, StatusBar, UsageTable,
};
use super::form::ChatForm;
use super::key_handler::{resolve_key, EditOp, KeyAction};
use super::Layout;

/// Spinner frames for in-flight operations
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Interactive dashboard
pub struct App {
    controller: InteractionController<HttpUsageClient>,
    form: ChatForm,
    layout: Layout,
    tick_rate: Duration,
    show_help: bool,
    running: bool,
    spinner_frame: usize,
    last_spinner_update: Instant,
}

impl App {
    /// Create a new application
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = HttpUsageClient::from_settings(&settings.service)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            controller: InteractionController::new(client),
            form: ChatForm::from_settings(&settings.chat),
            layout: Layout::new(),
            tick_rate: Duration::from_millis(settings.ui.tick_rate_ms),
            show_help: false,
            running: true,
            spinner_frame: 0,
            last_spinner_update: Instant::now(),
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.controller.start();

        // Main loop
        let result = self.main_loop(&mut terminal).await;

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        while self.running {
            // Draw UI
            terminal.draw(|frame| self.render(frame))?;

            self.tick_spinner();

            // Handle events with timeout
            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Apply finished transport calls
            for event in self.controller.poll_completions() {
                Self::log_event(&event);
            }

            // Give spawned calls a chance to run between frames
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let state = self.controller.state();
        let area = frame.area();
        let form_height = ChatFormWidget::calculate_height(&self.form, area.height);
        let areas = self.layout.calculate(area, form_height);

        ChatFormWidget::render(frame, areas.form, &self.form, state.chat_in_flight());
        ResponsePanel::render(frame, areas.response, state.response());
        UsageTable::render(frame, areas.usage_table, state.rows());
        ModelTotals::render(frame, areas.totals, state);
        StatusBar::render(frame, areas.status_bar, state, self.spinner_char());

        if self.show_help {
            let popup_area = self.layout.popup_area(area, 60, 70);
            HelpPopup::render(frame, popup_area);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = resolve_key(key, self.form.focus(), self.show_help);
        self.execute(action);
    }

    fn execute(&mut self, action: KeyAction) {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => self.running = false,
            KeyAction::Submit => {
                let op = self.controller.submit_chat(self.form.to_request());
                tracing::info!(op, model = %self.form.model(), "Prompt submitted");
            }
            KeyAction::Refresh => {
                self.controller.refresh_summary();
            }
            KeyAction::ToggleHelp => self.show_help = !self.show_help,
            KeyAction::FocusNext => self.form.focus_next(),
            KeyAction::FocusPrevious => self.form.focus_previous(),
            KeyAction::NextModel => self.form.next_model(),
            KeyAction::PreviousModel => self.form.previous_model(),
            KeyAction::Edit(op) => {
                if let Some(input) = self.form.focused_input_mut() {
                    match op {
                        EditOp::Insert(c) => input.insert(c),
                        EditOp::Newline => input.insert('\n'),
                        EditOp::Backspace => input.backspace(),
                        EditOp::Delete => input.delete(),
                        EditOp::Left => input.left(),
                        EditOp::Right => input.right(),
                        EditOp::Home => input.home(),
                        EditOp::End => input.end(),
                    }
                }
            }
        }
    }

    fn log_event(event: &ControllerEvent) {
        match event {
            ControllerEvent::SummaryUpdated { op } => tracing::debug!(op, "Usage summary updated"),
            ControllerEvent::ChatAnswered { op, refresh } => {
                tracing::info!(op, refresh, "Chat answered")
            }
            // Failures are logged by the controller and shown in the status bar
            ControllerEvent::SummaryFailed { .. } | ControllerEvent::ChatFailed { .. } => {}
        }
    }

    /// Advance the spinner animation frame (time-based, ~100ms per frame)
    fn tick_spinner(&mut self) {
        if !self.controller.has_in_flight() {
            return;
        }
        if self.last_spinner_update.elapsed() >= Duration::from_millis(100) {
            self.last_spinner_update = Instant::now();
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }
}
