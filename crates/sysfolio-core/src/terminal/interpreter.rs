//! The terminal session: parses input lines, dispatches builtins and keeps
//! the record history and recall buffer.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::builtin::{command_not_found, find_builtin_command, CommandAction, CommandContext};
use super::recall::RecallBuffer;
use crate::service::ServiceDirectory;

const WELCOME_OUTPUT: &str =
    "All systems operational. 5/6 services online. 1 service in degraded state.";

/// One submitted line paired with its rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    /// The raw submitted line
    pub command: String,
    pub output: String,
    pub timestamp: DateTime<Local>,
}

/// What a call to [`Terminal::execute`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    /// The line was blank; nothing changed.
    Ignored,
    /// `clear` emptied the record history.
    Cleared,
    /// A record was appended to the history.
    Recorded(CommandRecord),
}

/// A single terminal session.
///
/// Owns its history and random source; reads the shared service directory.
pub struct Terminal<R = StdRng> {
    directory: Arc<ServiceDirectory>,
    records: Vec<CommandRecord>,
    recall: RecallBuffer,
    rng: R,
}

impl Terminal<StdRng> {
    /// Creates a session with an entropy-seeded random source.
    pub fn new(directory: Arc<ServiceDirectory>) -> Self {
        Self::with_rng(directory, StdRng::from_entropy())
    }

    /// Creates a session whose `ping` latencies are reproducible.
    pub fn seeded(directory: Arc<ServiceDirectory>, seed: u64) -> Self {
        Self::with_rng(directory, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> Terminal<R> {
    pub fn with_rng(directory: Arc<ServiceDirectory>, rng: R) -> Self {
        Self {
            directory,
            records: Vec::new(),
            recall: RecallBuffer::new(),
            rng,
        }
    }

    /// Seeds the history with the greeting record shown when a terminal opens.
    pub fn with_welcome(mut self) -> Self {
        self.records.push(CommandRecord {
            command: "system --status".to_string(),
            output: WELCOME_OUTPUT.to_string(),
            timestamp: Local::now() - Duration::minutes(1),
        });
        self
    }

    /// Interprets one line of input.
    ///
    /// Blank input is ignored. Every other line is pushed to the recall
    /// buffer; `clear` empties the history and all remaining lines append
    /// exactly one record.
    pub fn execute(&mut self, input: &str) -> Execution {
        let timestamp = Local::now();

        let mut tokens = input.split_whitespace();
        let Some(first) = tokens.next() else {
            return Execution::Ignored;
        };
        let command = first.to_lowercase();
        let args: Vec<&str> = tokens.collect();

        self.recall.push(input);

        let output = match find_builtin_command(&command).map(|cmd| cmd.action) {
            Some(CommandAction::ClearHistory) => {
                debug!(cleared = self.records.len(), "terminal history cleared");
                self.records.clear();
                return Execution::Cleared;
            }
            Some(CommandAction::Output(handler)) => {
                let mut ctx = CommandContext {
                    directory: &self.directory,
                    rng: &mut self.rng,
                };
                handler(&mut ctx, &args)
            }
            None => command_not_found(&command),
        };

        debug!(%command, args = args.len(), "terminal command executed");
        let record = CommandRecord {
            command: input.to_string(),
            output,
            timestamp,
        };
        self.records.push(record.clone());
        Execution::Recorded(record)
    }

    /// Recalls the previous submitted line (shell up-arrow).
    pub fn previous_command(&mut self) -> String {
        self.recall.previous().to_string()
    }

    /// Recalls the next submitted line (shell down-arrow).
    pub fn next_command(&mut self) -> String {
        self.recall.next().to_string()
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    pub fn recall(&self) -> &RecallBuffer {
        &self.recall
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }
}
