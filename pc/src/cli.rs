//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Platform;

/// Intents the input screen offers as starting points
pub const EXAMPLE_INTENTS: [&str; 4] = [
    "Share insights about building products that users love",
    "Announce our new sustainability initiative",
    "Reflect on lessons learned from scaling a startup",
    "Discuss the future of remote work and collaboration",
];

/// postcraft - adapt one intent into platform-ready drafts
#[derive(Parser, Debug)]
#[command(name = "pc")]
#[command(author, version, about = "Adapt one intent into platform-ready drafts", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate drafts for an intent with the live reasoning reveal
    Generate {
        /// What you want to share
        #[arg(required = true)]
        intent: String,

        /// Target platform (repeatable; defaults come from config)
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,

        /// Seed for reproducible confidence and timing
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the reveal delays
        #[arg(long)]
        fast: bool,

        /// Approve every draft once generated
        #[arg(long)]
        approve_all: bool,

        /// Write the export to this file or directory
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Show reasoning steps under each draft
        #[arg(short, long)]
        reasoning: bool,
    },

    /// Render one platform's draft and reasoning without delays
    Preview {
        /// What you want to share
        #[arg(required = true)]
        intent: String,

        /// Target platform
        #[arg(short, long, default_value = "twitter")]
        platform: Platform,
    },

    /// Review drafts interactively
    Review {
        /// Start right away with this intent
        intent: Option<String>,

        /// Seed for reproducible confidence and timing
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List supported platforms
    Platforms,

    /// List example intents
    Examples,
}
