//! Cache configuration
//!
//! Settings live in the `[cache]` table of a `keypath.toml` file:
//!
//! ```toml
//! [cache]
//! overalloc = 5    # spare subscript slots reserved by every new buffer
//! max_depth = 31   # deepest key the builders will construct
//! ```
//!
//! Missing keys take their defaults. Out-of-range values are clamped
//! rather than rejected so that an old config file keeps working.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MAX_SUBSCRIPTS;

/// Spare slots reserved beyond the depth a new buffer needs right away.
///
/// Callers usually descend a few levels below the node they start from;
/// with this headroom those descendants share the buffer instead of copying.
pub const DEFAULT_OVERALLOC: usize = 5;

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or has wrongly typed keys
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tuning for key buffer allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Extra subscript slots allocated with every new buffer (`K`)
    pub overalloc: usize,
    /// Deepest key the builders accept before failing with
    /// [`Error::StackGrowth`](crate::Error::StackGrowth)
    pub max_depth: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            overalloc: DEFAULT_OVERALLOC,
            max_depth: MAX_SUBSCRIPTS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cache: CacheConfig,
}

impl CacheConfig {
    /// Parse the `[cache]` table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.cache.normalized())
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: "keypath::config",
            path = %path.display(),
            overalloc = config.overalloc,
            max_depth = config.max_depth,
            "Loaded cache config"
        );
        Ok(config)
    }

    /// Capacity of a new buffer that must hold `depth` subscripts.
    #[inline]
    pub fn capacity_for(&self, depth: usize) -> usize {
        depth + self.overalloc
    }

    /// Fail with `StackGrowth` if `depth` is deeper than allowed.
    #[inline]
    pub fn check_depth(&self, depth: usize) -> crate::Result<()> {
        if depth > self.max_depth {
            return Err(crate::Error::stack_growth(depth, self.max_depth));
        }
        Ok(())
    }

    fn normalized(mut self) -> Self {
        if self.overalloc == 0 {
            tracing::warn!(target: "keypath::config", "cache.overalloc of 0 raised to 1");
            self.overalloc = 1;
        }
        if self.max_depth > MAX_SUBSCRIPTS {
            tracing::warn!(
                target: "keypath::config",
                requested = self.max_depth,
                limit = MAX_SUBSCRIPTS,
                "cache.max_depth capped"
            );
            self.max_depth = MAX_SUBSCRIPTS;
        }
        self
    }
}
