//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::marker::MarkerStrategy;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [run] section
    if let Some(section) = ini.section(Some("run")) {
        if let Some(v) = section.get("tick_interval_ms") {
            config.run.tick_interval_ms = parse_positive("run", "tick_interval_ms", v)?;
        }
        if let Some(v) = section.get("work_budget_ms") {
            config.run.work_budget_ms = parse_positive("run", "work_budget_ms", v)?;
        }
        if let Some(v) = section.get("log_interval_secs") {
            config.run.log_interval_secs = parse_number("run", "log_interval_secs", v)?;
        }
    }

    // [markers] section
    if let Some(section) = ini.section(Some("markers")) {
        if let Some(v) = section.get("database") {
            let v = v.trim();
            if !v.is_empty() {
                config.markers.database = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("strategy") {
            config.markers.strategy =
                MarkerStrategy::from_str(v).map_err(|_| ConfigFileError::InvalidValue {
                    section: "markers".to_string(),
                    key: "strategy".to_string(),
                    value: v.to_string(),
                    reason: "must be one of: directory, index, background".to_string(),
                })?;
        }
    }

    // [throttle] section
    if let Some(section) = ini.section(Some("throttle")) {
        if let Some(v) = section.get("enabled") {
            config.throttle.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("threshold_ratio") {
            let ratio: f64 = parse_number("throttle", "threshold_ratio", v)?;
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigFileError::InvalidValue {
                    section: "throttle".to_string(),
                    key: "threshold_ratio".to_string(),
                    value: v.to_string(),
                    reason: "must be between 0.0 and 1.0".to_string(),
                });
            }
            config.throttle.threshold_ratio = ratio;
        }
        if let Some(v) = section.get("poll_interval_secs") {
            config.throttle.poll_interval_secs = parse_number("throttle", "poll_interval_secs", v)?;
        }
        if let Some(v) = section.get("window_secs") {
            config.throttle.window_secs = parse_positive("throttle", "window_secs", v)?;
        }
        if let Some(v) = section.get("ceilings") {
            config.throttle.ceilings = parse_ceilings(v).map_err(|reason| {
                ConfigFileError::InvalidValue {
                    section: "throttle".to_string(),
                    key: "ceilings".to_string(),
                    value: v.to_string(),
                    reason,
                }
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a number".to_string(),
    })
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<u64, ConfigFileError> {
    let n: u64 = parse_number(section, key, value)?;
    if n == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(n)
}

/// Parses a comma-separated `class:ceiling` list, e.g.
/// `t2.micro:144, t2.small:288`.
pub(super) fn parse_ceilings(value: &str) -> Result<BTreeMap<String, f64>, String> {
    let mut ceilings = BTreeMap::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (class, ceiling) = entry
            .rsplit_once(':')
            .ok_or_else(|| format!("expected 'class:ceiling', got '{}'", entry))?;
        let class = class.trim();
        if class.is_empty() {
            return Err(format!("missing instance class in '{}'", entry));
        }
        let ceiling: f64 = ceiling
            .trim()
            .parse()
            .map_err(|_| format!("invalid ceiling in '{}'", entry))?;
        if !ceiling.is_finite() || ceiling < 0.0 {
            return Err(format!("ceiling must be a non-negative number in '{}'", entry));
        }
        ceilings.insert(class.to_string(), ceiling);
    }
    Ok(ceilings)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
