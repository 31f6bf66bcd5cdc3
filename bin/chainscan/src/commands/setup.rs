//! The `setup` mode.

use anyhow::{Result, bail};
use chainscan_index::{IndexStore, RecordKind};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::info;

/// The `setup` mode.
///
/// Drops and recreates the blocks, transactions and contracts indices with
/// their mappings.
///
/// # Usage
///
/// ```sh
/// chainscan setup [--yes]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Recreates every index with its mapping")]
pub struct SetupCommand {
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl SetupCommand {
    /// Runs the setup against `store`.
    pub async fn run<S: IndexStore>(self, store: &S) -> Result<()> {
        confirm_or_bail(self.yes, "Recreate all indices? Every indexed document is deleted.")?;
        for kind in RecordKind::ALL {
            store.recreate(kind).await?;
            info!(target: "chainscan", %kind, "Index recreated");
        }
        Ok(())
    }
}

/// Writes `prompt` to `output` and reads one answer from `input`.
///
/// Only `y` or `yes`, in any case, counts as consent.
pub fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Asks on the terminal unless `yes` is set, failing on refusal.
pub(super) fn confirm_or_bail(yes: bool, prompt: &str) -> Result<()> {
    if yes || confirm(io::stdin().lock(), io::stdout(), prompt)? {
        return Ok(());
    }
    bail!("aborted")
}
