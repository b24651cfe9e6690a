//! Engine timing/feel preferences (`~/.config/bannerstack/config.toml`).
//!
//! Hosts can load persisted overrides or construct a config directly. Loading
//! is forgiving: a missing or malformed file falls back to the reference
//! defaults so a bad config can never keep banners from presenting.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "BANNERSTACK_CONFIG_DIR";

/// Reference presentation (slide-in) duration.
pub const DEFAULT_PRESENT_MS: u64 = 350;

/// Reference drag-release snap duration.
pub const DEFAULT_SNAP_MS: u64 = 200;

/// Reference collapse (dismiss) duration.
pub const DEFAULT_COLLAPSE_MS: u64 = 350;

/// Reference movement slop separating a tap from a drag, in layout units.
pub const DEFAULT_DRAG_SLOP: f32 = 6.0;

/// Timing and gesture-feel preferences.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub present_ms: u64,
    pub snap_ms: u64,
    pub collapse_ms: u64,
    pub drag_slop: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            present_ms: DEFAULT_PRESENT_MS,
            snap_ms: DEFAULT_SNAP_MS,
            collapse_ms: DEFAULT_COLLAPSE_MS,
            drag_slop: DEFAULT_DRAG_SLOP,
        }
    }
}

impl EngineConfig {
    /// Load persisted preferences, falling back to defaults when the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Self {
        match toml::from_str(contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(error = %err, "banner config unreadable; using defaults");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn present_duration(&self) -> Duration {
        Duration::from_millis(self.present_ms)
    }

    #[must_use]
    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_ms)
    }

    #[must_use]
    pub fn collapse_duration(&self) -> Duration {
        Duration::from_millis(self.collapse_ms)
    }
}

/// Resolve the config directory: env override first, then `~/.config`.
fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let home = env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config").join("bannerstack"))
}

/// Resolve the full config file path.
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let config = EngineConfig::default();
        assert_eq!(config.present_duration(), Duration::from_millis(350));
        assert_eq!(config.snap_duration(), Duration::from_millis(200));
        assert_eq!(config.collapse_duration(), Duration::from_millis(350));
        assert_eq!(config.drag_slop, DEFAULT_DRAG_SLOP);
    }

    #[test]
    fn parse_reads_partial_overrides() {
        let config = EngineConfig::parse("present_ms = 500\ndrag_slop = 10.0\n");
        assert_eq!(config.present_ms, 500);
        assert_eq!(config.drag_slop, 10.0);
        // Unmentioned keys keep their defaults.
        assert_eq!(config.snap_ms, DEFAULT_SNAP_MS);
        assert_eq!(config.collapse_ms, DEFAULT_COLLAPSE_MS);
    }

    #[test]
    fn parse_falls_back_to_defaults_on_malformed_toml() {
        let config = EngineConfig::parse("present_ms = \"not a number");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let config = EngineConfig::parse("future_knob = true\nsnap_ms = 150\n");
        assert_eq!(config.snap_ms, 150);
    }

    #[test]
    fn config_path_ends_with_expected_file() {
        if let Some(path) = config_file_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
