// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber set up for the counter binary.

use std::{
    env,
    fs::{File, OpenOptions},
    io,
    path::PathBuf,
    sync::Arc,
};

use is_terminal::IsTerminal as _;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
    EnvFilter,
};

/// The environment variable naming a directory where log files are written.
pub const LOG_DIR_VARIABLE: &str = "COUNTER_LOG_DIR";

/// The output formats selectable with `RUST_LOG_FORMAT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event.
    #[default]
    Plain,
    /// Multi-line, human-oriented events.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Reads a format name. Unknown names select [`LogFormat::Plain`].
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Plain,
        }
    }
}

/// Initializes tracing: `RUST_LOG` sets the verbosity (`info` by default) and
/// `RUST_LOG_FORMAT` the output format.
///
/// Events go to standard error, in color unless `NO_COLOR` is set or standard error is not
/// a terminal. If `COUNTER_LOG_DIR` is set, they are also appended to `<log_name>.log` in
/// that directory.
pub fn init(log_name: &str) -> io::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let format = env::var("RUST_LOG_FORMAT")
        .map(|name| LogFormat::from_name(&name))
        .unwrap_or_default();
    let color = env::var("NO_COLOR").map_or(true, |value| value.is_empty())
        && io::stderr().is_terminal();

    let file_layer = open_log_file(log_name)?
        .map(|file| formatted_layer(format, Arc::new(file), false));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(formatted_layer(format, io::stderr, color))
        .init();
    Ok(())
}

/// Opens `<log_name>.log` in `COUNTER_LOG_DIR` for appending, if the variable is set.
fn open_log_file(log_name: &str) -> io::Result<Option<File>> {
    let Some(directory) = env::var_os(LOG_DIR_VARIABLE) else {
        return Ok(None);
    };
    let path = PathBuf::from(directory).join(log_name).with_extension("log");
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map(Some)
}

fn formatted_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Plain => layer.boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
