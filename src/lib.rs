//! usagemon - terminal dashboard for an LLM usage-recording service

pub mod commands;
pub mod logging;
pub mod ui;
