//! Configuration loading and parsing.
//!
//! Parses `promptedit.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 4        # spaces inserted by Tab when no placeholders exist
//! [history]
//! max_actions = 100    # undo depth
//! [viewport]
//! height = 24          # text rows
//! [autosave]
//! debounce_ms = 750
//! [diff]
//! context_lines = 3    # omit to keep all context
//! ```
//!
//! Every section and field is optional. Unknown fields are ignored so newer
//! files keep loading on older builds. A file that fails to parse falls back to
//! defaults with a warning. Out-of-range values are clamped into range at load
//! time and the clamp is logged under the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

const FILE_NAME: &str = "promptedit.toml";
const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        4
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_actions")]
    pub max_actions: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_actions: Self::default_max_actions(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_actions() -> usize {
        100
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewportConfig {
    #[serde(default = "ViewportConfig::default_height")]
    pub height: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            height: Self::default_height(),
        }
    }
}

impl ViewportConfig {
    const fn default_height() -> usize {
        24
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AutosaveConfig {
    #[serde(default = "AutosaveConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl AutosaveConfig {
    const fn default_debounce_ms() -> u64 {
        750
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    #[serde(default)]
    pub context_lines: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub diff: DiffConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub path: Option<PathBuf>,   // where `raw` came from
    pub file: ConfigFile,        // parsed (or default) data, clamped into range
}

/// Best-effort config path: `promptedit.toml` in the working directory, then the
/// platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("promptedit").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            let mut cfg = Config {
                raw: Some(content),
                path: Some(path),
                file,
            };
            cfg.clamp_ranges();
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn tab_width(&self) -> usize {
        self.file.editor.tab_width
    }

    pub fn history_capacity(&self) -> usize {
        self.file.history.max_actions
    }

    pub fn viewport_height(&self) -> usize {
        self.file.viewport.height
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.file.autosave.debounce_ms)
    }

    pub fn diff_context_lines(&self) -> Option<usize> {
        self.file.diff.context_lines
    }

    fn clamp_ranges(&mut self) {
        let raw = self.file.editor.tab_width;
        let clamped = raw.clamp(1, MAX_TAB_WIDTH);
        if clamped != raw {
            info!(target: "config", raw, clamped, max = MAX_TAB_WIDTH, "tab_width_clamped");
            self.file.editor.tab_width = clamped;
        }
        if self.file.history.max_actions == 0 {
            info!(target: "config", raw = 0, clamped = 1, "history_max_actions_clamped");
            self.file.history.max_actions = 1;
        }
        if self.file.viewport.height == 0 {
            info!(target: "config", raw = 0, clamped = 1, "viewport_height_clamped");
            self.file.viewport.height = 1;
        }
    }
}
