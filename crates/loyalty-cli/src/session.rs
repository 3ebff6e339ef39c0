//! Command session: one reward book driven by a command script.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use loyalty_engine::{RewardEngine, RewardPolicy};
use loyalty_ingest::ContractLoader;
use loyalty_registry::RewardBook;
use tracing::{debug, warn};

use crate::commands::{command_map, Handler};
use crate::config::LoyaltyConfig;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// What a script does after a command fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Stop at the first failing command
    Stop,
    /// Report the failure and run the remaining commands
    KeepGoing,
}

/// An in-memory reward book plus the command table that drives it.
pub struct Session<W> {
    pub(crate) book: RewardBook,
    pub(crate) policy: RewardPolicy,
    pub(crate) loader: ContractLoader,
    pub(crate) format: OutputFormat,
    pub(crate) out: W,
    handlers: HashMap<&'static str, Handler<W>>,
}

impl<W: Write> Session<W> {
    pub fn new(config: &LoyaltyConfig, format: OutputFormat, out: W) -> Self {
        Self {
            book: RewardBook::with_policy(config.registry.registration),
            policy: config.policy.clone(),
            loader: ContractLoader::new(config.ingest.clone()),
            format,
            out,
            handlers: command_map(),
        }
    }

    pub fn book(&self) -> &RewardBook {
        &self.book
    }

    pub(crate) fn engine(&self) -> RewardEngine<'_> {
        RewardEngine::for_book(&self.book, self.policy.clone())
    }

    /// Run a single command line such as `LEVEL 1 2011 1`.
    pub fn execute(&mut self, line: &str) -> CliResult<()> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(());
        };
        let args: Vec<&str> = parts.collect();

        let handler = *self
            .handlers
            .get(name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
        debug!(command = name, ?args, "Executing command");
        handler(self, &args)
    }

    /// Run a script, one command per line. Blank lines and lines starting
    /// with `#` are ignored.
    pub fn run_script<R: BufRead>(&mut self, input: R, mode: FailureMode) -> CliResult<()> {
        let mut total = 0;
        let mut failed = 0;

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() || command.starts_with('#') {
                continue;
            }
            total += 1;

            if let Err(source) = self.execute(command) {
                let err = CliError::CommandFailed {
                    line: idx + 1,
                    command: command.to_string(),
                    source: Box::new(source),
                };
                match mode {
                    FailureMode::Stop => return Err(err),
                    FailureMode::KeepGoing => {
                        warn!(line = idx + 1, "Command failed, continuing");
                        eprintln!("Error: {}", err);
                        failed += 1;
                    }
                }
            }
        }

        self.out.flush()?;
        if failed > 0 {
            return Err(CliError::ScriptFailed { failed, total });
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
