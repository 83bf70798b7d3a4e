//! Tally daemon: replays operation scripts against a ledger.

mod script;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tally_ledger::{Ledger, LedgerConfig};
use tally_types::Address;
use tally_utils::LogFormat;

use crate::script::{ReplaySummary, Step};

#[derive(Parser)]
#[command(name = "tally-daemon", about = "Tally rebasing ledger daemon")]
struct Cli {
    /// Log output format: "human" or "json".
    #[arg(long, default_value = "human", env = "TALLY_LOG_FORMAT")]
    log_format: LogFormat,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "TALLY_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a JSON script of operations and print a summary.
    Replay {
        /// Path to the TOML ledger configuration.
        #[arg(long, env = "TALLY_CONFIG")]
        config: PathBuf,

        /// Path to the JSON operation script.
        #[arg(long)]
        script: PathBuf,

        /// State file. Loaded if it exists, written back after the replay.
        #[arg(long, env = "TALLY_STATE")]
        state: Option<PathBuf>,
    },
    /// Print a default configuration for the given administrator.
    InitConfig {
        #[arg(long)]
        admin: Address,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tally_utils::init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::Replay {
            config,
            script,
            state,
        } => replay(&config, &script, state.as_deref()),
        Command::InitConfig { admin } => {
            let config = LedgerConfig::with_admin(admin);
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn open_ledger(config_path: &Path, state_path: Option<&Path>) -> anyhow::Result<Ledger> {
    if let Some(path) = state_path.filter(|p| p.exists()) {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        let ledger = Ledger::load_state(&bytes)
            .with_context(|| format!("invalid state file {}", path.display()))?;
        tracing::info!(
            "Loaded ledger state from {} at block {}",
            path.display(),
            ledger.current_block()
        );
        return Ok(ledger);
    }

    let config = LedgerConfig::from_toml_file(config_path)?;
    tracing::info!("Loaded config from {}", config_path.display());
    Ok(Ledger::new(&config)?)
}

fn replay(config_path: &Path, script_path: &Path, state_path: Option<&Path>) -> anyhow::Result<()> {
    let mut ledger = open_ledger(config_path, state_path)?;

    let contents = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse script {}", script_path.display()))?;
    tracing::info!("Replaying {} steps from {}", steps.len(), script_path.display());

    let (mut applied, mut reverted) = (0, 0);
    for (index, step) in steps.iter().enumerate() {
        match step.apply(&mut ledger) {
            Ok(()) => {
                applied += 1;
                tracing::debug!(index, op = step.name(), block = ledger.current_block(), "step applied");
            }
            Err(e) => {
                reverted += 1;
                tracing::warn!(index, op = step.name(), "step reverted: {e}");
            }
        }
    }
    ledger
        .verify_invariants()
        .context("ledger inconsistent after replay")?;

    for event in ledger.drain_events() {
        tracing::trace!(?event, "event");
    }

    if let Some(path) = state_path {
        std::fs::write(path, ledger.save_state()?)
            .with_context(|| format!("failed to write state file {}", path.display()))?;
        tracing::info!("Saved ledger state to {}", path.display());
    }

    let summary = ReplaySummary::collect(&ledger, applied, reverted);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_replay() {
        let cli = Cli::try_parse_from([
            "tally-daemon",
            "--log-format",
            "json",
            "replay",
            "--config",
            "tally.toml",
            "--script",
            "ops.json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Replay { state: None, .. }));
    }

    #[test]
    fn cli_rejects_bad_admin() {
        assert!(Cli::try_parse_from(["tally-daemon", "init-config", "--admin", "0x12"]).is_err());
    }

    #[test]
    fn replay_persists_state_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let admin = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let alice = "0x0101010101010101010101010101010101010101";

        let config = dir.path().join("tally.toml");
        std::fs::write(&config, format!("admin = \"{admin}\"\nminters = [\"{admin}\"]\n")).unwrap();
        let script = dir.path().join("ops.json");
        std::fs::write(
            &script,
            format!(r#"[{{ "op": "mint", "caller": "{admin}", "to": "{alice}", "amount": 7 }}]"#),
        )
        .unwrap();
        let state = dir.path().join("ledger.bin");

        replay(&config, &script, Some(&state)).unwrap();
        replay(&config, &script, Some(&state)).unwrap();

        let ledger = Ledger::load_state(&std::fs::read(&state).unwrap()).unwrap();
        assert_eq!(ledger.balance_of(&alice.parse().unwrap()), 14);
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("tally.toml");
        std::fs::write(&config, "admin = \"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\"\n").unwrap();
        assert!(replay(&config, &dir.path().join("missing.json"), None).is_err());
    }
}
