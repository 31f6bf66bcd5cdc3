//! Function selector recovery by enumeration.

use chainscan_codec::fingerprint;

/// Function name keywords tried by [`SignatureGuesser::default`].
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "requestWithdrawal",
    "kill",
    "create",
    "init",
    "transfer",
    "transferFrom",
    "approve",
    "withdraw",
    "deposit",
    "mint",
    "burn",
    "owner",
    "balanceOf",
];

/// Argument types tried by [`SignatureGuesser::default`].
pub const DEFAULT_ARGUMENT_TYPES: &[&str] =
    &["address", "string", "uint256", "bool", "bytes32", "uint8"];

/// Returns the 4-byte selector of a canonical signature as 8 lowercase hex chars.
pub fn hash_signature(signature: &str) -> String {
    fingerprint(signature.as_bytes())
}

/// Brute-force matcher over a keyword and argument type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureGuesser {
    keywords: Vec<String>,
    argument_types: Vec<String>,
}

impl Default for SignatureGuesser {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORDS.iter().map(|s| s.to_string()),
            DEFAULT_ARGUMENT_TYPES.iter().map(|s| s.to_string()),
        )
    }
}

impl SignatureGuesser {
    /// Creates a guesser over a custom vocabulary.
    pub fn new(
        keywords: impl IntoIterator<Item = String>,
        argument_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            keywords: keywords.into_iter().collect(),
            argument_types: argument_types.into_iter().collect(),
        }
    }

    /// Function name keywords, in search order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Argument types, in search order.
    pub fn types(&self) -> &[String] {
        &self.argument_types
    }

    /// Searches for a signature whose selector equals `target`.
    ///
    /// Candidates are tried keyword by keyword, shortest argument list first, and
    /// within one length with the first argument varying slowest.
    pub fn guess(&self, target: &str, max_depth: usize) -> Option<String> {
        let target = target.trim();
        let target = target
            .strip_prefix("0x")
            .or_else(|| target.strip_prefix("0X"))
            .unwrap_or(target)
            .to_ascii_lowercase();

        for keyword in &self.keywords {
            for depth in 0..=max_depth {
                if depth > 0 && self.argument_types.is_empty() {
                    break;
                }
                if let Some(found) = self.search_depth(keyword, depth, &target) {
                    debug!(target: "evm", signature = %found, "Selector matched");
                    return Some(found);
                }
            }
        }
        None
    }

    fn search_depth(&self, keyword: &str, depth: usize, target: &str) -> Option<String> {
        let mut digits = vec![0usize; depth];
        loop {
            let arguments: Vec<&str> =
                digits.iter().map(|&d| self.argument_types[d].as_str()).collect();
            let candidate = format!("{keyword}({})", arguments.join(","));
            if hash_signature(&candidate) == target {
                return Some(candidate);
            }

            // Odometer increment; the last position turns fastest.
            let mut position = depth;
            loop {
                if position == 0 {
                    return None;
                }
                position -= 1;
                digits[position] += 1;
                if digits[position] < self.argument_types.len() {
                    break;
                }
                digits[position] = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("kill(address)", "cbf0b0c0")]
    #[case("kill()", "41c0e1b5")]
    #[case("transfer(address,uint256)", "a9059cbb")]
    #[case("balanceOf(address)", "70a08231")]
    #[case("owner()", "8da5cb5b")]
    fn test_hash_signature(#[case] signature: &str, #[case] selector: &str) {
        assert_eq!(hash_signature(signature), selector);
    }

    #[rstest]
    #[case("da95ebf7", 2, "requestWithdrawal(address,uint256)")]
    #[case("0xA9059CBB", 2, "transfer(address,uint256)")]
    #[case("cbf0b0c0", 2, "kill(address)")]
    #[case("41c0e1b5", 0, "kill()")]
    #[case("23b872dd", 3, "transferFrom(address,address,uint256)")]
    fn test_guess_found(#[case] target: &str, #[case] depth: usize, #[case] expected: &str) {
        assert_eq!(SignatureGuesser::default().guess(target, depth).as_deref(), Some(expected));
    }

    #[test]
    fn test_guess_exhausted() {
        let guesser = SignatureGuesser::default();
        assert_eq!(guesser.guess("00000000", 2), None);
        // Two arguments are needed.
        assert_eq!(guesser.guess("a9059cbb", 1), None);
    }

    #[test]
    fn test_custom_vocabulary() {
        let guesser = SignatureGuesser::new(["kill".to_string()], Vec::new());
        assert_eq!(guesser.guess("41c0e1b5", 3).as_deref(), Some("kill()"));
        assert_eq!(guesser.guess("cbf0b0c0", 3), None);
    }
}
