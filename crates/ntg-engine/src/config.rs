//! Engine configuration

use ntg_core::{ContestantError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Path to a JSON engine config; wins over the individual variables below
pub const ENV_CONFIG: &str = "NTG_ENGINE_CONFIG";
pub const ENV_CMD: &str = "NTG_ENGINE_CMD";
pub const ENV_ARGS: &str = "NTG_ENGINE_ARGS";
pub const ENV_MODE: &str = "NTG_ENGINE_MODE";
pub const ENV_TIMEOUT_MS: &str = "NTG_ENGINE_TIMEOUT_MS";
pub const ENV_DIR: &str = "NTG_ENGINE_DIR";

const DEFAULT_PROGRAM: &str = "./ntg-engine";
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// How the engine process is managed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineMode {
    /// One child for the whole session, state blocks sent over its stdin
    #[default]
    Persistent,
    /// A fresh child per state block, the block passed as the last argument
    SpawnPerMove,
}

impl FromStr for EngineMode {
    type Err = ContestantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persistent" | "pipe" => Ok(EngineMode::Persistent),
            "spawn" | "spawn-per-move" => Ok(EngineMode::SpawnPerMove),
            other => Err(ContestantError::Config(format!(
                "Unknown engine mode {:?} (expected persistent or spawn)",
                other
            ))),
        }
    }
}

/// Configuration for launching and talking to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable
    pub program: PathBuf,
    /// Fixed arguments passed before any per-move payload
    pub args: Vec<String>,
    /// Working directory for the child (default: inherited)
    pub working_dir: Option<PathBuf>,
    pub mode: EngineMode,
    /// Maximum wait for one reply. `None` waits forever.
    #[serde(rename = "response_timeout_ms", with = "option_millis")]
    pub response_timeout: Option<Duration>,
    /// How long `close` waits for a voluntary exit before killing the child
    #[serde(rename = "shutdown_grace_ms", with = "millis")]
    pub shutdown_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            args: Vec::new(),
            working_dir: None,
            mode: EngineMode::Persistent,
            response_timeout: None,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl EngineConfig {
    /// Config for `program` with every other field at its default
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: EngineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ContestantError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ContestantError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment, in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = get(ENV_CONFIG) {
            return Self::from_json_file(path);
        }

        let mut config = Self::default();
        if let Some(program) = get(ENV_CMD) {
            config.program = PathBuf::from(program);
        }
        if let Some(args) = get(ENV_ARGS) {
            config.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(mode) = get(ENV_MODE) {
            config.mode = mode.parse()?;
        }
        if let Some(ms) = get(ENV_TIMEOUT_MS) {
            let ms: u64 = ms.parse().map_err(|_| {
                ContestantError::Config(format!(
                    "{} must be milliseconds, got {:?}",
                    ENV_TIMEOUT_MS, ms
                ))
            })?;
            config.response_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(dir) = get(ENV_DIR) {
            config.working_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    /// Human-readable command line for logs
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

mod option_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
