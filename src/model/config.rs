use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::task::{Category, Priority};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Values applied to new tasks when the caller does not choose one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// flexi_logger spec string, e.g. "info" or "debug, tally::io=trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How the terminal board arranges tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// All / Active / Completed side by side
    #[default]
    Board,
    /// One list narrowed by the current filter
    List,
}

impl Layout {
    pub fn toggle(self) -> Self {
        match self {
            Layout::Board => Layout::List,
            Layout::List => Layout::Board,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub layout: Layout,
    /// Show "Completed on <date>" under completed tasks
    #[serde(default = "default_true")]
    pub show_completed_date: bool,
    /// Color overrides by theme slot name, as "#RRGGBB"
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            layout: Layout::Board,
            show_completed_date: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
