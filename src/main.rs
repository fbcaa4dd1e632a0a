// SPDX-License-Identifier: AGPL-3.0-or-later

//! GigaChat in your terminal
//!
//! Entry point for the gigachat CLI: settings, tracing, and the interactive
//! read loop.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;

use gigachat::chat::ChatSession;
use gigachat::cli::Cli;
use gigachat::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. `-v` enables crate diagnostics without requiring
    // users to know target names; `RUST_LOG` still takes precedence.
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if cli.verbose > 0 {
        if let Ok(directive) = "gigachat=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load().context("failed to load settings")?,
    };

    let mut session = ChatSession::from_settings(&settings)?;
    if let Some(model) = cli.model {
        session = session.with_model(model);
    }

    println!("GigaChat chat (type 'exit' or 'quit' to leave)");
    let stdin = io::stdin();
    loop {
        print!("you: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        match session.send(input).await {
            Ok(reply) => println!("gigachat: {}", reply.content),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}
