// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Submitting an increment and waiting until the counter is observed to change.

use std::sync::Arc;

use counter_base::data_types::CounterValue;
use counter_rpc::client::TonQueries;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{CounterConfig, RetryPolicy},
    getter::Getter,
    messages::IncrementRequest,
    sender::Sender,
    Error,
};

/// What was observed of one submitted increment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationState {
    /// The value read right before submission.
    pub before: CounterValue,
    /// The last value read.
    pub after: CounterValue,
    /// The number of polls that saw no change.
    pub attempt: u32,
}

impl ConfirmationState {
    fn new(before: CounterValue) -> Self {
        Self {
            after: before.clone(),
            before,
            attempt: 0,
        }
    }

    /// Records a polled value, returning whether the change is now observed.
    pub fn observe(&mut self, value: CounterValue) -> bool {
        self.after = value;
        if self.after != self.before {
            return true;
        }
        self.attempt += 1;
        false
    }
}

/// How a submission ended, when it did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The counter changed from `before` to `value` after `attempts` unchanged polls.
    Confirmed {
        attempts: u32,
        before: CounterValue,
        value: CounterValue,
    },
    /// Nothing was sent.
    Aborted { reason: String },
}

/// Sends one increment from a wallet and polls the counter until the change is visible.
pub struct Submitter<Q, S> {
    getter: Getter<Q>,
    rpc: Arc<Q>,
    sender: S,
    request: IncrementRequest,
    retry: RetryPolicy,
}

impl<Q, S> Submitter<Q, S>
where
    Q: TonQueries + Send + Sync,
    S: Sender,
{
    pub fn new(config: &CounterConfig, rpc: Arc<Q>, sender: S) -> Self {
        Self {
            getter: Getter::new(config, rpc.clone()),
            rpc,
            sender,
            request: config.request.clone(),
            retry: config.retry.clone(),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Runs the whole submission. An undeployed wallet aborts before anything is sent;
    /// every other failure is returned, including RPC errors while polling.
    #[instrument(skip_all, fields(counter = %self.getter.counter().address(), wallet = %self.sender.address()))]
    pub async fn run(&self, cancellation: &CancellationToken) -> Result<Outcome, Error> {
        match self.ensure_deployed().await {
            Err(Error::UndeployedWallet(address)) => {
                let reason = format!("wallet {address} is not deployed");
                warn!("{reason}");
                return Ok(Outcome::Aborted { reason });
            }
            result => result?,
        }

        let before = self.getter.get().await?;
        info!(%before, "baseline read");

        self.getter
            .counter()
            .send_increment(&self.sender, &self.request)
            .await?;
        info!(
            kind = ?self.request.kind(),
            value = %self.request.value,
            "increment submitted"
        );

        let state = self.poll(before, cancellation).await?;
        info!(
            attempts = state.attempt,
            value = %state.after,
            "increment confirmed"
        );
        Ok(Outcome::Confirmed {
            attempts: state.attempt,
            before: state.before,
            value: state.after,
        })
    }

    async fn ensure_deployed(&self) -> Result<(), Error> {
        let address = self.sender.address();
        if !self.rpc.is_contract_deployed(&address).await? {
            return Err(Error::UndeployedWallet(address));
        }
        Ok(())
    }

    /// Reads the counter until it differs from `before`, sleeping between polls.
    pub async fn poll(
        &self,
        before: CounterValue,
        cancellation: &CancellationToken,
    ) -> Result<ConfirmationState, Error> {
        let started = Instant::now();
        let mut state = ConfirmationState::new(before);
        loop {
            if cancellation.is_cancelled() {
                return Err(Error::Cancelled {
                    attempts: state.attempt,
                });
            }
            if state.observe(self.getter.get().await?) {
                return Ok(state);
            }
            debug!(attempt = state.attempt, value = %state.after, "counter unchanged");
            if self.retry.is_exhausted(state.attempt)
                || self
                    .retry
                    .deadline
                    .is_some_and(|deadline| started.elapsed() + self.retry.poll_interval > deadline)
            {
                return Err(Error::ConfirmationTimeout {
                    attempts: state.attempt,
                });
            }
            tokio::select! {
                () = cancellation.cancelled() => {
                    return Err(Error::Cancelled {
                        attempts: state.attempt,
                    });
                }
                () = tokio::time::sleep(self.retry.poll_interval) => {}
            }
        }
    }
}
