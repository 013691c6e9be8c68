//! Engine configuration.
//!
//! Centralizes the constants used throughout the engine and the
//! [`SessionConfig`] knobs an embedding application may override.

use serde::Deserialize;

use crate::core::error::ConfigError;

// =============================================================================
// Output Conventions
// =============================================================================

/// Open target for link files that do not declare one.
pub const DEFAULT_LINK_TARGET: &str = "_blank";

/// `ls` output for a directory with no children.
pub const EMPTY_DIR_LISTING: &str = "(empty)";

/// Separator between names in `ls` output.
pub const LS_SEPARATOR: &str = "  ";

/// Separator between names in `help` output.
pub const HELP_SEPARATOR: &str = ", ";

/// Prompt sigil appended after the working directory.
pub const PROMPT_SIGIL: &str = "$";

// =============================================================================
// Session Configuration
// =============================================================================

/// Maximum number of scrollback entries to keep.
pub const MAX_SCROLLBACK: usize = 1000;

/// Maximum number of recall stack entries to keep.
pub const MAX_RECALL: usize = 1000;

/// Per-session limits and history behaviour.
///
/// Every field has a default, so a partial TOML document is valid:
///
/// ```
/// let config = vfsh::SessionConfig::from_toml_str("recall_limit = 50").unwrap();
/// assert_eq!(config.recall_limit, 50);
/// assert_eq!(config.scrollback_limit, vfsh::config::MAX_SCROLLBACK);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Oldest scrollback entries are evicted past this count.
    pub scrollback_limit: usize,
    /// Oldest recall entries are evicted past this count.
    pub recall_limit: usize,
    /// Skip pushing a line equal to the most recent recall entry.
    pub dedupe_recall: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scrollback_limit: MAX_SCROLLBACK,
            recall_limit: MAX_RECALL,
            dedupe_recall: false,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML, rejecting zero limits.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrollback_limit == 0 {
            return Err(ConfigError::ZeroLimit("scrollback_limit"));
        }
        if self.recall_limit == 0 {
            return Err(ConfigError::ZeroLimit("recall_limit"));
        }
        Ok(())
    }
}
