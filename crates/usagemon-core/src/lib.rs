//! Core library for usagemon.
//!
//! - [`usage`]: wire types reported by the usage-recording service and the
//!   per-model aggregation over them
//! - [`client`]: the HTTP transport that talks to the service
//! - [`controller`]: the interaction controller that ties user actions to
//!   transport calls and keeps the dashboard state
//! - [`config`]: CLI arguments and TOML settings

pub mod client;
pub mod config;
pub mod controller;
pub mod usage;
