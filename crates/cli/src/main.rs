// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tk - Topic Keeper CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{daemon, publish};

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(name = "tk", version, about = "Topic Keeper - publish to and inspect tkd")]
struct Cli {
    /// Daemon socket (defaults to $TK_SOCKET, then $TK_SOCKET_DIR/tk.sock)
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish one event
    Publish(publish::PublishArgs),
    /// Show daemon counters
    Status,
    /// Check the daemon is answering
    Ping,
    /// Stop the daemon
    Stop,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::connect(cli.socket)?;

    match cli.command {
        Commands::Publish(args) => publish::handle(&client, args).await?,
        Commands::Status => daemon::status(&client).await?,
        Commands::Ping => daemon::ping(&client).await?,
        Commands::Stop => daemon::stop(&client).await?,
    }

    Ok(())
}
