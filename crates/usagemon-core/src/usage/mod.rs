//! Usage data: rows reported by the service and totals derived from them.

pub mod aggregate;
pub mod types;

pub use aggregate::{aggregate_by_model, grand_total};
pub use types::{ChatRequest, ChatResponse, ModelTotal, UsageRow, UsageTotals};
