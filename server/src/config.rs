//! Server configuration
//!
//! Values come from `DIABETES_*` environment variables (after an optional
//! `.env` file is read) and are then overridden by command-line flags.
//! Unparseable environment values fall back to their defaults with a warning.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use diabetes_learning::{LearningError, TrainerConfig};
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATASET_PATH: &str = "data/diabetes.csv";
pub const DEFAULT_MODEL_PATH: &str = "diabetes_model.json";
pub const DEFAULT_TEST_SIZE: f64 = 0.25;
pub const DEFAULT_RANDOM_SEED: u64 = 0;

/// Command-line flags. Every flag overrides its environment variable.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Diabetes risk prediction API",
    long_about = "Serves a logistic regression diabetes classifier over HTTP.\n\n\
                  On startup the model artifact is loaded; if it is missing or\n\
                  unreadable the model is trained from the dataset and saved.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DIABETES_HOST           Bind address (default 0.0.0.0)\n  \
                  DIABETES_PORT           Listen port (default 5000)\n  \
                  DIABETES_DATASET_PATH   Training CSV (default data/diabetes.csv)\n  \
                  DIABETES_MODEL_PATH     Model artifact (default diabetes_model.json)\n  \
                  DIABETES_TEST_SIZE      Held-out fraction (default 0.25)\n  \
                  DIABETES_RANDOM_SEED    Split seed (default 0)\n  \
                  RUST_LOG                Log filter, overrides --log-level"
)]
pub struct Args {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the training dataset (CSV)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Path to the model artifact
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Fraction of rows held out for accuracy
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the train/test split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub test_size: f64,
    pub random_seed: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            test_size: DEFAULT_TEST_SIZE,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("DIABETES_HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),

            port: parse_or("DIABETES_PORT", &lookup, defaults.port),

            dataset_path: lookup("DIABETES_DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),

            model_path: lookup("DIABETES_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            test_size: parse_or("DIABETES_TEST_SIZE", &lookup, defaults.test_size),

            random_seed: parse_or("DIABETES_RANDOM_SEED", &lookup, defaults.random_seed),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(dataset) = &args.dataset {
            self.dataset_path = dataset.clone();
        }
        if let Some(model) = &args.model {
            self.model_path = model.clone();
        }
        if let Some(test_size) = args.test_size {
            self.test_size = test_size;
        }
        if let Some(seed) = args.seed {
            self.random_seed = seed;
        }
        self
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Fails if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Validated trainer settings.
    pub fn trainer_config(&self) -> Result<TrainerConfig, LearningError> {
        TrainerConfig::builder()
            .test_size(self.test_size)
            .random_seed(self.random_seed)
            .build()
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {raw:?} for {key}, using default {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_env_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DIABETES_HOST", "127.0.0.1"),
            ("DIABETES_PORT", "8081"),
            ("DIABETES_DATASET_PATH", "/srv/pima.csv"),
            ("DIABETES_MODEL_PATH", "/srv/model.json"),
            ("DIABETES_TEST_SIZE", "0.3"),
            ("DIABETES_RANDOM_SEED", "42"),
        ]));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.dataset_path, PathBuf::from("/srv/pima.csv"));
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DIABETES_PORT", "not-a-port"),
            ("DIABETES_TEST_SIZE", "a quarter"),
            ("DIABETES_RANDOM_SEED", "-1"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.test_size, DEFAULT_TEST_SIZE);
        assert_eq!(config.random_seed, DEFAULT_RANDOM_SEED);
    }

    #[test]
    fn test_args_override_env() {
        let args = Args::parse_from([
            "diabetes-server",
            "--port",
            "9000",
            "--model",
            "models/m.json",
            "--seed",
            "7",
        ]);
        let config =
            ServerConfig::from_lookup(lookup(&[("DIABETES_PORT", "8081")])).with_args(&args);

        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path, PathBuf::from("models/m.json"));
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_trainer_config_is_validated() {
        let mut config = ServerConfig::default();
        assert!(config.trainer_config().is_ok());

        config.test_size = 1.5;
        assert!(config.trainer_config().is_err());
    }
}
