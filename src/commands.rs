//! Non-interactive commands: `usagemon summary` and `usagemon chat`.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;

use usagemon_core::client::{HttpUsageClient, UsageService};
use usagemon_core::config::{Command, Settings};
use usagemon_core::controller::{ControllerEvent, ControllerState, InteractionController};
use usagemon_core::usage::{ChatRequest, ModelTotal, UsageRow, UsageTotals};

use crate::ui::components::format_tokens;

/// Run a subcommand against the configured service, printing to stdout
pub async fn run(settings: &Settings, command: &Command) -> Result<()> {
    let client = HttpUsageClient::from_settings(&settings.service)
        .context("Failed to create HTTP client")?;
    let mut stdout = std::io::stdout();

    match command {
        Command::Summary { json } => run_summary(client, *json, &mut stdout).await,
        Command::Chat { prompt } => {
            let req = ChatRequest {
                api_key: settings.chat.api_key.clone().unwrap_or_default(),
                model: settings.chat.model.clone(),
                user_label: settings.chat.user_label.clone(),
                prompt: prompt.clone(),
            };
            run_chat(client, req, &mut stdout).await
        }
    }
}

/// Fetch the summary once and print it as a table or JSON
pub async fn run_summary<S: UsageService>(
    service: S,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut controller = InteractionController::new(service);
    controller.start();

    while let Some(event) = controller.next_completion().await {
        if let ControllerEvent::SummaryFailed { message, .. } = event {
            bail!("Failed to fetch usage summary: {}", message);
        }
    }

    let state = controller.state();
    if json {
        let report = SummaryReport::from_state(state);
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_summary(state))?;
    }
    Ok(())
}

/// Send one prompt, print the answer, then the refreshed totals
pub async fn run_chat<S: UsageService>(
    service: S,
    req: ChatRequest,
    out: &mut impl Write,
) -> Result<()> {
    let mut controller = InteractionController::new(service);
    controller.submit_chat(req);

    while let Some(event) = controller.next_completion().await {
        match event {
            ControllerEvent::ChatAnswered { .. } => {
                if let Some(response) = controller.state().response() {
                    writeln!(out, "{}", response.content)?;
                    writeln!(out)?;
                }
            }
            ControllerEvent::ChatFailed { message, .. } => {
                bail!("Chat request failed: {}", message);
            }
            ControllerEvent::SummaryFailed { message, .. } => {
                bail!("Chat answered but usage refresh failed: {}", message);
            }
            ControllerEvent::SummaryUpdated { .. } => {}
        }
    }

    write!(out, "{}", format_summary(controller.state()))?;
    Ok(())
}

/// JSON shape printed by `summary --json`
#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    rows: &'a [UsageRow],
    totals: &'a [ModelTotal],
    grand_total: UsageTotals,
}

impl<'a> SummaryReport<'a> {
    fn from_state(state: &'a ControllerState) -> Self {
        Self {
            rows: state.rows(),
            totals: state.totals(),
            grand_total: state.grand_total(),
        }
    }
}

/// Plain-text rendering of the usage rows and per-model totals
pub fn format_summary(state: &ControllerState) -> String {
    let mut out = String::new();

    if state.rows().is_empty() {
        out.push_str("No usage recorded yet\n");
        return out;
    }

    let model_width = column_width("MODEL", state.rows().iter().map(|r| r.model.as_str()));
    let user_width = column_width("USER", state.rows().iter().map(|r| r.user_label.as_str()));

    out.push_str(&format!(
        "{:mw$}  {:uw$}  {:>12}  {:>12}\n",
        "MODEL",
        "USER",
        "INPUT",
        "OUTPUT",
        mw = model_width,
        uw = user_width
    ));
    for row in state.rows() {
        out.push_str(&format!(
            "{:mw$}  {:uw$}  {:>12}  {:>12}\n",
            row.model,
            row.user_label,
            format_tokens(row.total_input_tokens),
            format_tokens(row.total_output_tokens),
            mw = model_width,
            uw = user_width
        ));
    }

    out.push_str("\nTotals by model\n");
    let totals_width = column_width("MODEL", state.totals().iter().map(|t| t.model.as_str()));
    for total in state.totals() {
        out.push_str(&format!(
            "{:w$}  {:>12} in  {:>12} out\n",
            total.model,
            format_tokens(total.input_tokens),
            format_tokens(total.output_tokens),
            w = totals_width
        ));
    }

    let grand = state.grand_total();
    out.push_str(&format!(
        "\nAll models: {} in / {} out\n",
        format_tokens(grand.input_tokens),
        format_tokens(grand.output_tokens)
    ));
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}
