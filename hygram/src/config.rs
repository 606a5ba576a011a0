//! Engine configuration.
//!
//! Configuration is plain data (`serde`) so it can live in a TOML file next to the
//! grammars that use it:
//!
//! ```toml
//! max_depth = 1024
//! when_default = "pass_through"
//! ```
use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the path of a TOML file read by [`EngineConfig::from_env`].
pub const ENV_CONFIG_PATH: &str = "HYGRAM_CONFIG";

/// Behaviour of a `when` action declared without an inner action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhenDefault {
    /// Use the guarding pattern itself as the action. Structural patterns then rebuild
    /// only the subtrees they describe and every other pattern returns the node as is.
    #[default]
    Pattern,
    /// Rebuild the whole matched subtree with pass-through semantics.
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting of `matches`/`apply` steps within one top-level call.
    ///
    /// This counts engine steps, not tree levels: every grammar or action entered on the
    /// way down costs one. Matching a recursive `switch` spends about three steps per tree
    /// level (the switch, the case pattern, the `recurse`), and evaluating case bodies of
    /// the form `invoke(recurse(), child)` about four, so the default of 512 admits trees
    /// somewhat over a hundred levels deep.
    pub max_depth: usize,
    pub when_default: WhenDefault,
}

impl EngineConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_when_default(mut self, when_default: WhenDefault) -> Self {
        self.when_default = when_default;
        self
    }

    /// Parse a configuration from a TOML document. Missing keys take their default value.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            source: e,
            file: "<inline>".to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> ConfigResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        toml::from_str(&toml_str).map_err(|e| ConfigError::Parse {
            source: e,
            file: path.display().to_string(),
        })
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load the file named by [`ENV_CONFIG_PATH`], or the defaults when the variable is unset.
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load_from_toml(Path::new(&path)),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(value)) => Err(ConfigError::NotUnicode {
                variable: ENV_CONFIG_PATH,
                value,
            }),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            when_default: WhenDefault::default(),
        }
    }
}
