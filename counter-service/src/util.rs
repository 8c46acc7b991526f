// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{io, num::ParseIntError, time::Duration};

use tokio::signal::unix;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn parse_millis(s: &str) -> Result<Duration, ParseIntError> {
    Ok(Duration::from_millis(s.parse()?))
}

/// Listens for shutdown signals, and notifies the [`CancellationToken`] if one is
/// received.
pub async fn listen_for_shutdown_signals(shutdown_sender: CancellationToken) {
    match wait_for_shutdown_signal().await {
        Ok(()) => {
            info!("shutdown signal received");
            shutdown_sender.cancel();
        }
        Err(error) => warn!("failed to set up signal handlers: {error}"),
    }
}

async fn wait_for_shutdown_signal() -> io::Result<()> {
    let mut sigint = unix::signal(unix::SignalKind::interrupt())?;
    let mut sigterm = unix::signal(unix::SignalKind::terminate())?;
    let mut sighup = unix::signal(unix::SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => (),
        _ = sigterm.recv() => (),
        _ = sighup.recv() => (),
    }
    Ok(())
}
