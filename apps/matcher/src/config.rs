use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::engine::{DEFAULT_EDGE_THRESHOLD, DEFAULT_TOP_K};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub top_k: usize,
    pub edge_threshold: f64,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            port: 8080,
            top_k: DEFAULT_TOP_K,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to the
    /// defaults for absent keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let edge_threshold = check_edge_threshold(parse_or(
            "GRAPH_EDGE_THRESHOLD",
            &lookup,
            defaults.edge_threshold,
        )?)
        .context("GRAPH_EDGE_THRESHOLD is out of range")?;

        Ok(Config {
            data_dir: lookup("MATCHER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: parse_or("PORT", &lookup, defaults.port)?,
            top_k: parse_or("MATCH_TOP_K", &lookup, defaults.top_k)?,
            edge_threshold,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    /// Overrides the graph threshold, applying the same range check as the
    /// environment value.
    pub fn set_edge_threshold(&mut self, value: f64) -> Result<()> {
        self.edge_threshold = check_edge_threshold(value)?;
        Ok(())
    }
}

fn check_edge_threshold(value: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&value) {
        anyhow::bail!("edge threshold must be in [0, 1), got {value}");
    }
    Ok(value)
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
