//! Reduce per-(model, user) rows into per-model totals.

use std::collections::HashMap;

use super::types::{ModelTotal, UsageRow, UsageTotals};

/// Sum token counts per model, ignoring the user label.
///
/// Output order is the order in which each model first appears in `rows`.
/// Rows sharing a model (same or different user label) are summed.
pub fn aggregate_by_model(rows: &[UsageRow]) -> Vec<ModelTotal> {
    let mut totals: Vec<ModelTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.model.as_str()).or_insert_with(|| {
            totals.push(ModelTotal {
                model: row.model.clone(),
                input_tokens: 0,
                output_tokens: 0,
            });
            totals.len() - 1
        });

        let total = &mut totals[slot];
        total.input_tokens = total.input_tokens.saturating_add(row.total_input_tokens);
        total.output_tokens = total.output_tokens.saturating_add(row.total_output_tokens);
    }

    totals
}

/// Sum token counts across every row
pub fn grand_total(rows: &[UsageRow]) -> UsageTotals {
    rows.iter().fold(UsageTotals::default(), |acc, row| UsageTotals {
        input_tokens: acc.input_tokens.saturating_add(row.total_input_tokens),
        output_tokens: acc.output_tokens.saturating_add(row.total_output_tokens),
    })
}
