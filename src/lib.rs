//! Pinforge - Pinterest pin drafting and publishing library
//!
//! This library provides the core functionality for Pinforge: turning blog
//! posts into pin drafts with a generative model, persisting them locally,
//! and publishing them through a small Pinterest relay.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `proxy`: Stateless HTTP relay to the Pinterest API (`get_boards`, `create_pin`)
//! - `pinterest`: Upstream Pinterest v5 client (boards, media upload, pin creation)
//! - `publish`: Publish orchestrator with the API path and the manual fallback
//! - `generator`: Draft generation, image generation, scheduling and edits
//! - `providers`: Generative provider abstraction and the Gemini implementation
//! - `storage`: Local key/value storage and typed pin/user stores
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use pinforge::{cli::Cli, Config};
//! use clap::Parser;
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_from(["pinforge", "list"]);
//!     let config = Config::load("config/config.yaml", &cli)?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod pinterest;
pub mod prompts;
pub mod providers;
pub mod proxy;
pub mod publish;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{PinforgeError, Result};
pub use models::{PinStatus, PinSuggestion, PinterestUser};
pub use proxy::{build_router, ProxyClient, ProxyState};
pub use publish::{PublishOrchestrator, PublishOutcome};
