//! TOML config file loading.

use crate::{CliError, CliResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reads and parses the TOML file at `path`.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| CliError::ConfigRead { path: path.to_path_buf(), source })?;
    toml::from_str(&contents)
        .map_err(|source| CliError::ConfigParse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Sample {
        url: String,
        retries: Option<u32>,
    }

    #[test]
    fn test_load_toml() {
        let path = std::env::temp_dir().join(format!("chainscan-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "url = \"http://localhost:8545\"\nretries = 3\n").unwrap();

        let sample: Sample = load_toml(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(sample, Sample { url: "http://localhost:8545".into(), retries: Some(3) });
    }

    #[test]
    fn test_missing_file() {
        let err = load_toml::<Sample>(Path::new("/nonexistent/chainscan.toml")).unwrap_err();
        assert!(matches!(err, CliError::ConfigRead { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let path =
            std::env::temp_dir().join(format!("chainscan-cli-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "url = ").unwrap();

        let err = load_toml::<Sample>(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, CliError::ConfigParse { .. }));
    }
}
