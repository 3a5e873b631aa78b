//! Analysis configuration.
//!
//! Every option has a serde default so a partial `.cxmetrics.toml` is valid.

pub mod loader;

pub use loader::{find_config_file, load_config, parse_config, resolve_config, CONFIG_FILE_NAME};

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Which size measure drives the long-method flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LongMethodMeasure {
    #[default]
    Statements,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A unit is a long method when its measure strictly exceeds this value.
    #[serde(default = "default_long_method_threshold")]
    pub long_method_threshold: usize,

    #[serde(default)]
    pub long_method_measure: LongMethodMeasure,

    /// Add one decision point per `&&`/`||` in control conditions.
    #[serde(default)]
    pub count_logical_operators: bool,

    /// Count a `default:` label like a `case` label.
    #[serde(default)]
    pub count_default_label: bool,

    /// Count a trailing plain `else` as a decision point.
    #[serde(default)]
    pub count_else_branch: bool,

    /// Count each `?:` expression as a decision point.
    #[serde(default)]
    pub count_conditional_expressions: bool,

    /// A unit with more parameters than this has a long parameter list.
    #[serde(default = "default_long_parameter_list_threshold")]
    pub long_parameter_list_threshold: usize,

    /// A file with more comment lines than this has excessive comments.
    #[serde(default = "default_excessive_comments_threshold")]
    pub excessive_comments_threshold: usize,

    /// Calls along one receiver chain that make it a message chain.
    #[serde(default = "default_message_chain_threshold")]
    pub message_chain_threshold: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            long_method_threshold: default_long_method_threshold(),
            long_method_measure: LongMethodMeasure::default(),
            count_logical_operators: false,
            count_default_label: false,
            count_else_branch: false,
            count_conditional_expressions: false,
            long_parameter_list_threshold: default_long_parameter_list_threshold(),
            excessive_comments_threshold: default_excessive_comments_threshold(),
            message_chain_threshold: default_message_chain_threshold(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_long_method_threshold(mut self, threshold: usize) -> Self {
        self.long_method_threshold = threshold;
        self
    }

    pub fn with_logical_operators(mut self, enabled: bool) -> Self {
        self.count_logical_operators = enabled;
        self
    }

    pub fn with_conditional_expressions(mut self, enabled: bool) -> Self {
        self.count_conditional_expressions = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.long_method_threshold == 0 {
            return Err(ConfigError::Invalid {
                field: "long_method_threshold",
                message: "must be at least 1".to_string(),
            });
        }
        if self.message_chain_threshold == 0 {
            return Err(ConfigError::Invalid {
                field: "message_chain_threshold",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn default_long_method_threshold() -> usize {
    15
}

fn default_long_parameter_list_threshold() -> usize {
    4
}

fn default_excessive_comments_threshold() -> usize {
    10
}

fn default_message_chain_threshold() -> u32 {
    4
}
