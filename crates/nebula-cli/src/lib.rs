//! # nebula-cli
//!
//! Command-line interface for the Nebula cluster platform.
//!
//! Provides commands for:
//! - Cluster enumeration across organizations
//! - Namespace lifecycle (create, start, stop, delete) with optional
//!   synchronous waiting
//! - Shell service control
//! - Reverse tunnels into a running namespace
//!
//! # Architecture
//!
//! The CLI talks to the Nebula REST API through [`nebula_api::ApiClient`];
//! the tunnel command resolves the in-namespace shell endpoint and then
//! shuttles local TCP connections over authenticated websockets.
//!
//! ```text
//! ┌───────────┐      REST (JSON/HTTPS)      ┌─────────────────┐
//! │ nebulactl │◄───────────────────────────►│   Nebula API    │
//! └───────────┘      wss:// (tunnel)        └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod tunnel;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
