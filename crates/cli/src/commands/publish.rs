// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tk publish <topic> [payload]` - Send one event to the daemon

use std::io::Read;

use anyhow::Result;
use clap::Args;

use crate::client::{DaemonClient, PublishOutcome};

#[derive(Args)]
pub struct PublishArgs {
    /// Topic, e.g. home/kitchen/power
    pub topic: String,

    /// Payload; read from stdin when omitted
    pub payload: Option<String>,

    /// Event time in milliseconds since the epoch (defaults to arrival time)
    #[arg(long)]
    pub timestamp_ms: Option<i64>,
}

pub async fn handle(client: &DaemonClient, args: PublishArgs) -> Result<()> {
    let payload = match args.payload {
        Some(payload) => payload.into_bytes(),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let outcome = client
        .publish(&args.topic, payload, args.timestamp_ms)
        .await?;

    match outcome {
        PublishOutcome::Stored => println!("stored"),
        PublishOutcome::Unchanged => println!("unchanged"),
        PublishOutcome::Filtered => println!("filtered"),
    }
    Ok(())
}
