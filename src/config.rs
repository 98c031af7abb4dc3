use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::Shape;

/// Inclusive bounds on the grid row count.
pub const MIN_ROWS: u32 = 2;
pub const MAX_ROWS: u32 = 7;

const CONFIG_FILE: &str = "tracelock.json";
const CONFIG_PATH_ENV: &str = "TRACELOCK_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Last-used widget settings, written back on every change so the next
/// launch restores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub rows: u32,
    pub shape: Shape,
    pub animate: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            shape: Shape::Square,
            animate: true,
        }
    }
}

impl WidgetConfig {
    /// Loads persisted settings, falling back to defaults when the file is
    /// missing. A malformed file is reported but never fatal.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::read_from(&path) {
            Ok(config) => config.clamped(),
            Err(err) => {
                log::warn!("ignoring settings at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path();
        let body = serde_json::to_string_pretty(self)?;
        fs::write(&path, body)?;
        Ok(())
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Row count forced into [MIN_ROWS, MAX_ROWS].
    pub fn clamped(mut self) -> Self {
        self.rows = self.rows.clamp(MIN_ROWS, MAX_ROWS);
        self
    }

    pub fn set_rows(&mut self, rows: u32) {
        self.rows = rows.clamp(MIN_ROWS, MAX_ROWS);
    }

    pub fn adjust_rows(&mut self, delta: i32) {
        let rows = (self.rows as i32 + delta).clamp(MIN_ROWS as i32, MAX_ROWS as i32);
        self.rows = rows as u32;
    }

    /// Applies `--rows=<n>` / `--shape=<name>` load-time overrides.
    /// Unknown flags and malformed values are reported and skipped.
    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if let Some(value) = arg.strip_prefix("--rows=") {
                match value.parse::<u32>() {
                    Ok(rows) => self.set_rows(rows),
                    Err(_) => log::warn!("ignoring malformed row count {:?}", value),
                }
            } else if let Some(value) = arg.strip_prefix("--shape=") {
                match Shape::from_name(value) {
                    Some(shape) => self.shape = shape,
                    None => log::warn!("ignoring unknown shape {:?}", value),
                }
            } else {
                log::warn!("ignoring unrecognized argument {:?}", arg);
            }
        }
    }
}

fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_bounds() {
        let config = WidgetConfig::default();
        assert!(config.rows >= MIN_ROWS && config.rows <= MAX_ROWS);
        assert_eq!(config.shape, Shape::Square);
        assert!(config.animate);
    }

    #[test]
    fn clamping_pins_out_of_range_rows() {
        let config = WidgetConfig { rows: 99, ..Default::default() }.clamped();
        assert_eq!(config.rows, MAX_ROWS);
        let config = WidgetConfig { rows: 0, ..Default::default() }.clamped();
        assert_eq!(config.rows, MIN_ROWS);
    }

    #[test]
    fn adjust_rows_saturates_at_the_bounds() {
        let mut config = WidgetConfig::default();
        config.adjust_rows(100);
        assert_eq!(config.rows, MAX_ROWS);
        config.adjust_rows(-100);
        assert_eq!(config.rows, MIN_ROWS);
        config.adjust_rows(1);
        assert_eq!(config.rows, MIN_ROWS + 1);
    }

    #[test]
    fn json_round_trip_keeps_shape_names() {
        let config = WidgetConfig {
            rows: 5,
            shape: Shape::TriangleInverted,
            animate: false,
        };
        let body = serde_json::to_string(&config).unwrap();
        assert!(body.contains("triangle-inverted"));
        let back: WidgetConfig = serde_json::from_str(&body).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn args_override_persisted_values() {
        let mut config = WidgetConfig::default();
        config.apply_args(["--rows=5", "--shape=hex"]);
        assert_eq!(config.rows, 5);
        assert_eq!(config.shape, Shape::Hex);
    }

    #[test]
    fn malformed_args_are_skipped() {
        let mut config = WidgetConfig::default();
        config.apply_args(["--rows=lots", "--shape=dodecahedron", "--frobnicate"]);
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn args_clamp_like_everything_else() {
        let mut config = WidgetConfig::default();
        config.apply_args(["--rows=42"]);
        assert_eq!(config.rows, MAX_ROWS);
    }
}
