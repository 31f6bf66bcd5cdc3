//! The `guess` mode.

use anyhow::Result;
use chainscan_evm::SignatureGuesser;
use clap::Parser;

/// The `guess` mode.
///
/// Searches keyword and argument type combinations for a signature whose
/// selector matches.
///
/// # Usage
///
/// ```sh
/// chainscan guess da95ebf7 --depth 2
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Recovers a function signature from its 4-byte selector")]
pub struct GuessCommand {
    /// The selector, as 8 hex characters with optional `0x`.
    pub selector: String,
    /// Maximum number of arguments to try.
    #[arg(long, short, default_value_t = 2)]
    pub depth: usize,
    /// Function name keywords, replacing the built-in list.
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,
    /// Argument types, replacing the built-in list.
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,
}

impl GuessCommand {
    /// Builds the guesser for the given vocabulary.
    pub fn guesser(&self) -> SignatureGuesser {
        let defaults = SignatureGuesser::default();
        match (self.keywords.is_empty(), self.types.is_empty()) {
            (true, true) => defaults,
            (false, true) => SignatureGuesser::new(self.keywords.clone(), defaults.types().to_vec()),
            (true, false) => SignatureGuesser::new(defaults.keywords().to_vec(), self.types.clone()),
            (false, false) => SignatureGuesser::new(self.keywords.clone(), self.types.clone()),
        }
    }

    /// Runs the search and prints the match.
    pub fn run(self) -> Result<()> {
        match self.guesser().guess(&self.selector, self.depth) {
            Some(signature) => println!("{signature}"),
            None => println!("no match"),
        }
        Ok(())
    }
}
