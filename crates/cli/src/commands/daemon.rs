// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon inspection and control: status, ping, stop

use anyhow::Result;

use crate::client::DaemonClient;

pub async fn status(client: &DaemonClient) -> Result<()> {
    let status = client.status().await?;

    println!("Daemon: {}", client.socket_path().display());
    println!("  Uptime: {}", format_uptime(status.uptime_secs));
    println!("  Stored: {}", status.stored);
    println!("  Unchanged: {}", status.unchanged);
    println!("  Filtered: {}", status.filtered);
    println!("  Rejected: {}", status.rejected);
    println!("  Background failures: {}", status.background_failures);
    Ok(())
}

pub async fn ping(client: &DaemonClient) -> Result<()> {
    client.ping().await?;
    let version = client.hello().await?;
    println!("pong (protocol {})", version);
    Ok(())
}

pub async fn stop(client: &DaemonClient) -> Result<()> {
    client.shutdown().await?;
    println!("Daemon stopping");
    Ok(())
}

fn format_uptime(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}
