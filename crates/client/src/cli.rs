// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use parley_core::QuestionId;

use crate::config::Overrides;

const QUICKSTART_HELP: &str = "\
Get started:
  parley watch                  Follow questions live
  parley ask \"How do I...?\"     Post a question
  parley answer 12 \"Try...\"     Answer a question (needs PARLEY_TOKEN)
  parley escalate 12            Flag a question for attention";

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Real-time Q&A client: post questions and follow answers as they arrive")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to config file (default: <config dir>/parley/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the question API (overrides PARLEY_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Stream URL (overrides PARLEY_WS_URL; derived from the API URL by default)
    #[arg(long, global = true, value_name = "URL")]
    pub ws_url: Option<String>,

    /// Responder token for privileged commands (overrides PARLEY_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Flag values that override config and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            ws_url: self.ws_url.clone(),
            token: self.token.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Follow the question list live
    #[command(after_help = "Examples:\n  \
        parley watch              Print the list on every change\n  \
        parley watch --details    Include answers")]
    Watch {
        /// Print each question with its answers
        #[arg(long)]
        details: bool,
    },

    /// Print the current question list once
    List {
        /// Print status counts after the list
        #[arg(long)]
        counts: bool,
    },

    /// Post a new question
    Ask {
        /// Question text (at most 500 characters)
        text: String,
    },

    /// Answer a question (requires a responder token)
    Answer {
        /// Question ID
        id: QuestionId,

        /// Answer text
        content: String,
    },

    /// Mark a question as answered (requires a responder token)
    Resolve {
        /// Question ID
        id: QuestionId,
    },

    /// Escalate a question (requires a responder token)
    Escalate {
        /// Question ID
        id: QuestionId,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
