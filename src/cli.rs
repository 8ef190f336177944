//! CLI interface for Drover.
//!
//! With no subcommand, drover opens the trip screen. The other
//! subcommands are non-interactive: arguments in, text out.
//!
//! - `drover show` prints the assigned trip.
//! - `drover simulate <script.json>` drives the trip headlessly from a
//!   script of timed driver commands.

mod format;
mod simulate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::controller::{Settings, TripController};
use crate::{mock, tui};

/// Drover: the trip screen for livestock-transport drivers.
#[derive(Debug, Parser)]
#[command(name = "drover", version, after_long_help = KEYS_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

const KEYS_HELP: &str = r#"Trip screen keys:
  ←/→, Tab      switch tab (disabled tabs are skipped)
  1-5           jump to tab
  i             report an incident
  q, Ctrl-C     quit

  Checklist     ↑↓ select, space toggle, p attach photo, s start trip
  Map           p pause (1-4 pick reason, ⏎ confirm), r resume
  Chat          type, ⏎ send
  ePOD          ↑↓ field, type quantity/name, ⏎ sign/submit,
                space toggle health, p add photo, x remove photo

Simulate script (JSON):
  [
    {"atMs": 0,     "command": {"kind": "attachItemPhoto", "item": "vehicleInspection"}},
    {"atMs": 0,     "command": {"kind": "toggleItem", "item": "vehicleInspection"}},
    {"atMs": 100,   "command": {"kind": "startTrip"}},
    {"atMs": 40000, "command": {"kind": "submitEpod"}}
  ]"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the trip screen. This is the default.
    Ui,

    /// Print the assigned trip.
    Show,

    /// Run a script of driver commands against a virtual clock.
    ///
    /// Timers fire up to each step's `atMs` before its command is applied.
    /// Prints every notice, then a JSON snapshot of the final state.
    Simulate {
        /// Path to a JSON array of `{ "atMs": ..., "command": {...} }` steps.
        script: PathBuf,

        /// Keep the clock running until this many milliseconds after the start.
        #[arg(long)]
        until_ms: Option<u64>,
    },
}

impl Cli {
    /// Whether this invocation runs without taking over the terminal.
    pub fn is_headless(&self) -> bool {
        !matches!(self.command, None | Some(Command::Ui))
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            tui::run(new_controller(config)).map_err(|e| format!("terminal error: {e}"))
        }
        Command::Show => {
            println!("{}", format::overview(&mock::sample_trip()));
            Ok(())
        }
        Command::Simulate { script, until_ms } => {
            simulate::cmd_simulate(new_controller(config), &script, until_ms)
        }
    }
}

fn new_controller(config: &Config) -> TripController {
    TripController::new(mock::sample_trip(), Settings::from(config)).with_chat(mock::opening_chat())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["drover"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.is_headless());
    }

    #[test]
    fn simulate_is_headless() {
        let cli =
            Cli::try_parse_from(["drover", "simulate", "run.json", "--until-ms", "5000"]).unwrap();
        assert!(cli.is_headless());
        assert!(matches!(
            cli.command,
            Some(Command::Simulate {
                until_ms: Some(5000),
                ..
            })
        ));
    }
}
