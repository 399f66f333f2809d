use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Shell configuration, read from an optional TOML file. Every field has a
/// default, so an empty file (or none at all) is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Directory holding the saved-state document.
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,

    /// Trailing-edge delay before a state change hits disk, in
    /// milliseconds. Rapid moves coalesce into one write.
    #[serde(default = "defaults::debounce_ms")]
    pub debounce_ms: u64,

    /// Fixed RNG seed for reproducible games. Omit to seed from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: defaults::state_dir(),
            debounce_ms: defaults::debounce_ms(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut file = std::fs::File::open(&path)
            .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.as_ref().display()))?;
        Ok(cfg)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn state_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn debounce_ms() -> u64 {
        300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_missing_fields() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.debounce_ms, 300);
        assert_eq!(cfg.state_dir, PathBuf::from("."));
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn it_reads_partial_files() {
        let cfg: Config = toml::from_str("debounce_ms = 50\nseed = 7\n").unwrap();
        assert_eq!(cfg.debounce_ms, 50);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.state_dir, PathBuf::from("."));
    }
}
