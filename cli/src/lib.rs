//! # Docflow CLI - blob storage and workflow console
//!
//! Talks to the same HTTP endpoints as the browser front end.
//!
//! ```text
//! ┌──────────┐     ┌────────────┐     ┌─────────────────┐
//! │ commands │────▶│ HttpApi    │────▶│ storage backend │
//! │  (clap)  │     │ (reqwest)  │     │  + orchestrator │
//! └────┬─────┘     └────────────┘     └─────────────────┘
//!      │ run
//!      ▼
//! docflow_core::run_workflow (TokioPause, Ctrl-C token)
//! ```
//!
//! ## Modules
//!
//! - [`error`] - CLI error type
//! - [`client`] - `reqwest` implementation of `StorageApi`
//! - [`commands`] - list / upload / delete / run / status / watch
//! - [`logging`] - terminal logger setup

pub mod error;
pub mod client;
pub mod commands;
pub mod logging;

pub use error::{CliError, CliResult};
pub use client::{ClientSettings, HttpApi, TokioPause, DEFAULT_API_URL};
