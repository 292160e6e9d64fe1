//! Command-line interface definition for Pinforge
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// Pinforge - Pinterest pin concepts from blog posts
///
/// Generate pin drafts with a generative model, schedule them, and publish
/// through the Pinterest relay or the manual hand-off.
#[derive(Parser, Debug, Clone)]
#[command(name = "pinforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the local storage database path
    #[arg(long, env = "PINFORGE_STORAGE_PATH")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Pinforge
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the Pinterest publish proxy
    Serve {
        /// Listen address (overrides proxy.listen_addr)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Generate draft pins for a blog post
    Generate {
        /// Blog post title
        #[arg(long)]
        title: String,

        /// Blog post summary or content
        #[arg(long)]
        summary: String,

        /// Blog post URL used as the pins' destination link
        #[arg(long, default_value = "")]
        url: String,

        /// Target board name
        #[arg(long, default_value = "")]
        board: String,
    },

    /// Generate (or regenerate) the image for a pin
    Image {
        /// Pin identifier
        id: String,
    },

    /// Edit a pin's text fields
    Edit {
        /// Pin identifier
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        alt_text: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Destination link
        #[arg(long)]
        link: Option<String>,

        /// Board name
        #[arg(long)]
        board: Option<String>,
    },

    /// Schedule a pin for a date (ISO-8601)
    Schedule {
        /// Pin identifier
        id: String,

        /// Schedule timestamp, e.g. 2030-01-15T09:30
        date: String,
    },

    /// Publish a pin via the API, falling back to the manual hand-off
    Publish {
        /// Pin identifier
        id: String,
    },

    /// Show the dashboard: counts and pins
    List {
        /// Only show pins with this status (draft, scheduled, published)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show scheduled pins, earliest first
    Upcoming {
        /// Maximum number of pins to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Connect a Pinterest account using a developer access token
    Connect {
        /// Pinterest username
        #[arg(short, long)]
        username: String,

        /// Pinterest API access token
        #[arg(short, long, env = "PINFORGE_PINTEREST_TOKEN")]
        token: String,

        /// Default board id (first listed board when omitted)
        #[arg(short, long)]
        board_id: Option<String>,
    },

    /// Disconnect the Pinterest account and forget the token
    Disconnect,

    /// List boards of the connected account
    Boards,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
