//! Dashboard state owned by the interaction controller.
//!
//! Every mutation goes through one of the `begin_*` / `finish_*`
//! transitions below. Completions are applied in the order they are
//! received, so the rows always reflect the last fetch to *arrive*.

use chrono::{DateTime, Utc};

use crate::client::ClientError;
use crate::usage::{aggregate_by_model, grand_total, ChatResponse, ModelTotal, UsageRow, UsageTotals};

/// Identifier of one submitted operation
pub type OpId = u64;

/// Coarse status shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Nothing in flight, no error visible
    Idle,
    /// At least one summary refresh in flight (and no chat)
    SummaryLoading,
    /// At least one chat submission in flight
    ChatSubmitting,
    /// Nothing in flight, last failure still visible
    Error(String),
}

impl Status {
    /// Short label for the status bar
    pub fn label(&self) -> &str {
        match self {
            Status::Idle => "Idle",
            Status::SummaryLoading => "Loading usage",
            Status::ChatSubmitting => "Sending",
            Status::Error(_) => "Error",
        }
    }

    /// Whether any operation is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Status::SummaryLoading | Status::ChatSubmitting)
    }
}

/// State of the dashboard: usage rows, derived totals, the last answer and
/// the last error
#[derive(Debug, Default)]
pub struct ControllerState {
    rows: Vec<UsageRow>,
    totals: Vec<ModelTotal>,
    response: Option<ChatResponse>,
    error: Option<String>,
    summary_in_flight: usize,
    chat_in_flight: usize,
    summary_fetched_at: Option<DateTime<Utc>>,
}

impl ControllerState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage rows from the last summary to arrive
    pub fn rows(&self) -> &[UsageRow] {
        &self.rows
    }

    /// Per-model totals derived from [`rows`](Self::rows)
    pub fn totals(&self) -> &[ModelTotal] {
        &self.totals
    }

    /// Totals across all rows
    pub fn grand_total(&self) -> UsageTotals {
        grand_total(&self.rows)
    }

    /// Last successful chat answer
    pub fn response(&self) -> Option<&ChatResponse> {
        self.response.as_ref()
    }

    /// Last failure message, if still visible
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// When the current rows were received
    pub fn summary_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.summary_fetched_at
    }

    /// Number of summary refreshes in flight
    pub fn summary_in_flight(&self) -> usize {
        self.summary_in_flight
    }

    /// Number of chat submissions in flight
    pub fn chat_in_flight(&self) -> usize {
        self.chat_in_flight
    }

    /// Current status
    pub fn status(&self) -> Status {
        if self.chat_in_flight > 0 {
            Status::ChatSubmitting
        } else if self.summary_in_flight > 0 {
            Status::SummaryLoading
        } else if let Some(ref error) = self.error {
            Status::Error(error.clone())
        } else {
            Status::Idle
        }
    }

    /// Refreshes never clear the error; only a chat submission does
    pub(crate) fn begin_summary(&mut self) {
        self.summary_in_flight += 1;
    }

    pub(crate) fn finish_summary(&mut self, result: Result<Vec<UsageRow>, ClientError>) {
        self.summary_in_flight = self.summary_in_flight.saturating_sub(1);
        match result {
            Ok(rows) => {
                self.totals = aggregate_by_model(&rows);
                self.rows = rows;
                self.summary_fetched_at = Some(Utc::now());
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub(crate) fn begin_chat(&mut self) {
        self.chat_in_flight += 1;
        self.error = None;
    }

    /// Returns true when the chat succeeded and a summary refresh should follow
    pub(crate) fn finish_chat(&mut self, result: Result<ChatResponse, ClientError>) -> bool {
        self.chat_in_flight = self.chat_in_flight.saturating_sub(1);
        match result {
            Ok(response) => {
                self.response = Some(response);
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
