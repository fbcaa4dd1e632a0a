// SPDX-License-Identifier: AGPL-3.0-or-later

//! CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

/// GigaChat in your terminal
#[derive(Parser, Debug)]
#[command(name = "gigachat")]
#[command(version, about = "Chat with GigaChat from your terminal")]
pub struct Cli {
    /// Settings file path (defaults to ~/.gigachat/settings.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model identifier override
    #[arg(long)]
    pub model: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
