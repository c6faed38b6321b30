//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let ceilings = config
        .throttle
        .ceilings
        .iter()
        .map(|(class, ceiling)| format!("{}:{}", class, ceiling))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"[run]
; Time between ticks in milliseconds
tick_interval_ms = {}
; Work budget of one tick in milliseconds. A single slow cell can overrun it.
work_budget_ms = {}
; Seconds between progress lines
log_interval_secs = {}

[markers]
; Root of the marker database. Markers for a run are read from
; {{database}}/{{version}}/{{dimension id}} (overworld = 0, nether = -1, end = 1)
database = {}
; How markers are read:
;   directory  - one c.{{x}}.{{z}}.idx file per finished cell
;   index      - index.txt loaded once, scanned a slice per tick
;   background - index.txt loaded and scanned on a worker thread
strategy = {}

[throttle]
; Pause generation while the instance's CPU credit balance is low.
; Has no effect when the instance identity cannot be resolved.
enabled = {}
; Generation runs while balance > ceiling * threshold_ratio
threshold_ratio = {}
; Minimum seconds between credit balance queries
poll_interval_secs = {}
; Seconds of history each query looks at
window_secs = {}
; Maximum credit balance per instance class (class:ceiling, comma separated).
; Unknown classes have a ceiling of 0.
ceilings = {}

[logging]
; Log file path
file = {}
"#,
        config.run.tick_interval_ms,
        config.run.work_budget_ms,
        config.run.log_interval_secs,
        path_to_string(&config.markers.database),
        config.markers.strategy,
        config.throttle.enabled,
        config.throttle.threshold_ratio,
        config.throttle.poll_interval_secs,
        config.throttle.window_secs,
        ceilings,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use crate::marker::MarkerStrategy;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.run.tick_interval_ms = 20;
        config.markers.database = PathBuf::from("/data/markers");
        config.markers.strategy = MarkerStrategy::Index;
        config.throttle.enabled = false;
        config.throttle.threshold_ratio = 0.35;
        config.throttle.ceilings.insert("custom.class".to_string(), 12.5);

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded.run.tick_interval_ms, 20);
        assert_eq!(loaded.markers.database, PathBuf::from("/data/markers"));
        assert_eq!(loaded.markers.strategy, MarkerStrategy::Index);
        assert!(!loaded.throttle.enabled);
        assert_eq!(loaded.throttle.threshold_ratio, 0.35);
        assert_eq!(loaded.throttle.ceilings, config.throttle.ceilings);
    }

    #[test]
    fn test_default_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        assert_eq!(ConfigFile::load_from(&config_path).unwrap(), ConfigFile::default());
    }
}
