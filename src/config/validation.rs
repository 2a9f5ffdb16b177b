//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Raw TOML is first parsed into `toml::Value`, its key tree is walked and
//! compared against the known field names, and a warning with a
//! "did you mean?" suggestion is emitted for each stranger. Warnings never
//! break loading; serde deserialization proceeds regardless.

/// A non-fatal config warning (typo, unknown section).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

/// Every valid dotted key path of `BmaConfig`.
///
/// Maintained by hand alongside `bma_config.rs`.
pub const KNOWN_CONFIG_KEYS: &[&str] = &[
    "server",
    "server.addr",
    "storage",
    "storage.data_dir",
    "storage.backend",
    "mobility",
    "mobility.base_speed_kmh",
    "mobility.adverse_weather_factor",
    "mobility.cloudy_factor",
    "mobility.rugged_terrain_factor",
    "mobility.terrain_band_min_lat",
    "mobility.terrain_band_max_lat",
    "recommendation",
    "recommendation.response_radius_km",
    "recommendation.distance_weight",
    "recommendation.engaged_penalty",
    "recommendation.ammo_critical_fraction",
    "recommendation.ammo_critical_penalty",
    "recommendation.ammo_low_fraction",
    "recommendation.ammo_low_penalty",
    "recommendation.capability_bonus",
    "recommendation.max_results",
    "logistics",
    "logistics.low_supply_days",
    "logistics.critical_supply_days",
    "hotspot",
    "hotspot.cluster_radius_km",
    "hotspot.min_cluster_size",
    "hotspot.default_window_hours",
    "hotspot.historical_window_hours",
    "hotspot.scan_interval_secs",
    "hotspot.scheduler_enabled",
    "weather",
    "weather.mode",
    "weather.temperature_c",
    "weather.humidity_percent",
    "weather.wind_speed_kmh",
    "weather.condition",
];

/// Recursively collect dotted key paths from a TOML table.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Closest known key within edit distance 3, first in table order on ties.
pub fn suggest_correction(unknown: &str) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in KNOWN_CONFIG_KEYS {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((k, dist)),
        }
    }
    best.map(|(k, _)| k.to_string())
}

/// Warn about every key in `raw_toml` that `BmaConfig` does not know.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !KNOWN_CONFIG_KEYS.contains(&key.as_str()))
        .map(|key| ValidationWarning {
            message: format!("Unknown config key '{key}'"),
            suggestion: suggest_correction(&key),
            field: key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn walk_collects_nested_paths() {
        let v: toml::Value = "[hotspot]\ncluster_radius_km = 4.0\n".parse().unwrap();
        let keys = walk_toml_keys(&v, "");
        assert!(keys.contains(&"hotspot".to_string()));
        assert!(keys.contains(&"hotspot.cluster_radius_km".to_string()));
    }
}
