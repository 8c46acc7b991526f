// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use counter_rpc::provider::TonCenterClient;
use counter_service::{options::CounterOptions, runner::Runner, util::listen_for_shutdown_signals};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

fn main() -> Result<()> {
    let options = <CounterOptions as clap::Parser>::parse();

    counter_base::tracing::init("counter")?;

    let mut runtime = if options.tokio_threads == Some(1) {
        tokio::runtime::Builder::new_current_thread()
    } else {
        let mut builder = tokio::runtime::Builder::new_multi_thread();

        if let Some(threads) = options.tokio_threads {
            builder.worker_threads(threads);
        }

        builder
    };

    let result = runtime.enable_all().build()?.block_on(options.run());
    if let Err(error) = &result {
        error!("{error:#}");
    }
    result
}

trait Runnable {
    async fn run(self) -> Result<()>;
}

impl Runnable for CounterOptions {
    async fn run(self) -> Result<()> {
        let config = self.counter_config()?;
        let key_pair = self
            .mnemonic
            .is_some()
            .then(|| self.key_pair())
            .transpose()?;
        let rpc = Arc::new(TonCenterClient::new(
            self.endpoint.clone(),
            self.api_key.clone(),
        )?);
        let cancellation = CancellationToken::new();
        tokio::spawn(listen_for_shutdown_signals(cancellation.clone()));
        info!(
            revision = %config.revision,
            counter = %config.address,
            "using {}",
            self.endpoint
        );

        Runner::new(config, rpc, key_pair, cancellation)
            .run(self.command)
            .await
    }
}
