//! # Cirrus Shell
//!
//! Command-line front end for inspecting Cirrus shapes: decode a JSON payload
//! into a model and print its rendering, stable hash and re-encoded wire form,
//! or map a raw error response to the fault a caller would receive.
//!
//! ## Example
//! ```no_run
//! use cirrus_shell::{Command, Shell, ShellConfig};
//!
//! let mut out = Vec::new();
//! Shell::new(ShellConfig::default()).run(&Command::Shapes, &mut out)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use cirrus::prelude::*;
use cirrus::shapes;
use cirrus_logger::LogSettings;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads input from stdin instead of a file.
pub const STDIN_MARKER: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "cirrus", version, about = "Inspect Cirrus SDK shapes and error responses")]
pub struct Cli {
    /// Configuration file (TOML, JSON, YAML...); `cirrus.*` in the working directory otherwise.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of configuration.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Decode a JSON payload into a shape and describe it.
    Decode {
        #[arg(long, value_enum)]
        shape: ShapeKind,
        /// Payload file, or `-` for stdin.
        input: PathBuf,
    },
    /// Map a raw error response body to the fault a caller would see.
    Fault {
        #[arg(long)]
        status: u16,
        #[arg(long)]
        request_id: Option<String>,
        #[arg(long)]
        service: Option<String>,
        /// Response body file, or `-` for stdin.
        input: PathBuf,
    },
    /// List known shapes and their field labels.
    Shapes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeKind {
    EngineOption,
    EngineOptionSetting,
    Timeout,
}

/// Shell configuration, one section per concern.
///
/// ```toml
/// [log]
/// level = "warn"
///
/// [wire]
/// pretty = true
/// max_payload_bytes = 65536
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub log: LogSettings,
    pub wire: WireSettings,
}

#[derive(Debug)]
pub struct Shell {
    config: ShellConfig,
}

impl Shell {
    #[must_use]
    pub const fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Executes one command, writing its report to `out`.
    ///
    /// # Errors
    /// Returns an error if the input cannot be read, the payload does not decode,
    /// or `out` cannot be written.
    pub fn run(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Decode { shape, input } => {
                let bytes = read_input(input)?;
                match shape {
                    ShapeKind::EngineOption => self.describe::<EngineOption>(&bytes, out),
                    ShapeKind::EngineOptionSetting => {
                        self.describe::<EngineOptionSetting>(&bytes, out)
                    },
                    ShapeKind::Timeout => self.describe::<TimeoutSignal>(&bytes, out),
                }
            },
            Command::Fault { status, request_id, service, input } => {
                let response = ErrorResponse {
                    status: *status,
                    request_id: request_id.clone(),
                    service: service.clone(),
                    body: read_input(input)?,
                };
                self.fault(&response, out)
            },
            Command::Shapes => {
                for shape in shapes::ALL {
                    writeln!(out, "{}: {}", shape.name, shape.fields.join(", "))?;
                }
                Ok(())
            },
        }
    }

    fn describe<M>(&self, bytes: &[u8], out: &mut impl Write) -> Result<()>
    where
        M: SdkModel + Serialize + DeserializeOwned + Display,
    {
        let model: M = wire::decode(bytes, &self.config.wire)
            .with_context(|| format!("Failed to decode {}", M::SHAPE))?;
        info!(shape = M::SHAPE, "Decoded input");

        writeln!(out, "shape: {}", M::SHAPE)?;
        writeln!(out, "rendered: {model}")?;
        writeln!(out, "stable_hash: {}", model.stable_hash())?;
        writeln!(out, "json: {}", wire::encode(&model, &self.config.wire)?)?;
        Ok(())
    }

    fn fault(&self, response: &ErrorResponse, out: &mut impl Write) -> Result<()> {
        let fault = map_error_response(response);
        info!(status = response.status, timeout = fault.is_timeout(), "Mapped response");

        let (kind, json) = match &fault {
            ServiceFault::RequestTimeout(signal) => {
                ("RequestTimeout", wire::encode(signal, &self.config.wire)?)
            },
            ServiceFault::Service(details) => ("Service", wire::encode(details, &self.config.wire)?),
        };
        writeln!(out, "fault: {kind}")?;
        writeln!(out, "message: {fault}")?;
        writeln!(out, "json: {json}")?;
        Ok(())
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == STDIN_MARKER {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).context("Failed to read stdin")?;
        return Ok(bytes);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
