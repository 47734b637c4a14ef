//! TOML server configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use yardnav_core::{
    DEFAULT_PRE_ALERT_DISTANCE, DEFAULT_SAMPLING_INTERVAL, DEFAULT_WALKING_SPEED, YardConfig,
    model::NetworkConfig,
    navigation::TrackerConfig,
    routing::{InstructionConfig, RouteConfig},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Yard used when a request names none or an unknown one; the first
    /// yard otherwise
    #[serde(default)]
    pub default_yard: Option<String>,
    pub yards: Vec<YardConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind: String,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            concurrency_limit: 64,
        }
    }
}

/// Flat view of the network, routing and tracker parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    pub sampling_interval_m: f64,
    pub walking_speed_mps: f64,
    pub pre_alert_distance_m: f64,
    pub straight_threshold_deg: f64,
    pub turn_threshold_deg: f64,
    pub u_turn_threshold_deg: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let instructions = InstructionConfig::default();
        Self {
            sampling_interval_m: DEFAULT_SAMPLING_INTERVAL,
            walking_speed_mps: DEFAULT_WALKING_SPEED,
            pre_alert_distance_m: DEFAULT_PRE_ALERT_DISTANCE,
            straight_threshold_deg: instructions.straight_threshold_deg,
            turn_threshold_deg: instructions.turn_threshold_deg,
            u_turn_threshold_deg: instructions.u_turn_threshold_deg,
        }
    }
}

impl NavigationConfig {
    pub fn network(&self) -> NetworkConfig {
        NetworkConfig {
            sampling_interval_m: self.sampling_interval_m,
        }
    }

    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            pre_alert_distance_m: self.pre_alert_distance_m,
            route: RouteConfig {
                walking_speed_mps: self.walking_speed_mps,
                instructions: InstructionConfig {
                    straight_threshold_deg: self.straight_threshold_deg,
                    turn_threshold_deg: self.turn_threshold_deg,
                    u_turn_threshold_deg: self.u_turn_threshold_deg,
                },
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.network()
            .validate()
            .and_then(|()| self.tracker().route.validate())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !(self.pre_alert_distance_m.is_finite() && self.pre_alert_distance_m > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pre_alert_distance_m must be positive, got {}",
                self.pre_alert_distance_m
            )));
        }

        let thresholds = [
            self.straight_threshold_deg,
            self.turn_threshold_deg,
            self.u_turn_threshold_deg,
        ];
        let ordered = thresholds.windows(2).all(|pair| pair[0] <= pair[1]);
        if !ordered || thresholds[0] <= 0.0 || thresholds[2] > 180.0 {
            return Err(ConfigError::Invalid(format!(
                "Turn thresholds must satisfy 0 < straight <= turn <= u_turn <= 180, got {thresholds:?}"
            )));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Reads and validates a config file. Relative yard data paths are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base_dir)
    }

    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: ServerConfig = toml::from_str(content)?;
        for yard in &mut config.yards {
            yard.roads = resolve(base_dir, &yard.roads);
            yard.slots = resolve(base_dir, &yard.slots);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.yards.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one [[yards]] entry is required".to_string(),
            ));
        }
        if let Some(default) = &self.default_yard {
            if !self.yards.iter().any(|yard| &yard.key == default) {
                return Err(ConfigError::Invalid(format!(
                    "default_yard {default} is not a configured yard"
                )));
            }
        }
        if self.server.request_timeout_secs == 0 || self.server.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs and concurrency_limit must be positive".to_string(),
            ));
        }
        self.navigation.validate()
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [[yards]]
        key = "yard1"
        name = "North yard"
        roads = "data/roads.geojson"
        slots = "/srv/slots.geojson"
    "#;

    #[test]
    fn defaults_fill_missing_sections() {
        let config = ServerConfig::from_toml_str(MINIMAL, Path::new("/etc/yardnav")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.navigation, NavigationConfig::default());
        assert_eq!(config.default_yard, None);
        assert_eq!(
            config.navigation.tracker(),
            TrackerConfig::default(),
            "flat defaults must match the core defaults"
        );
    }

    #[test]
    fn relative_paths_resolve_against_the_config_dir() {
        let config = ServerConfig::from_toml_str(MINIMAL, Path::new("/etc/yardnav")).unwrap();
        let yard = &config.yards[0];
        assert_eq!(yard.roads, Path::new("/etc/yardnav/data/roads.geojson"));
        assert_eq!(yard.slots, Path::new("/srv/slots.geojson"));
    }

    #[test]
    fn navigation_overrides_are_applied() {
        let content = format!(
            "default_yard = \"yard1\"\n[navigation]\nwalking_speed_mps = 1.0\npre_alert_distance_m = 30.0\n{MINIMAL}"
        );
        let config = ServerConfig::from_toml_str(&content, Path::new(".")).unwrap();
        let tracker = config.navigation.tracker();
        assert_eq!(tracker.route.walking_speed_mps, 1.0);
        assert_eq!(tracker.pre_alert_distance_m, 30.0);
        assert_eq!(config.default_yard.as_deref(), Some("yard1"));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let unknown_default = format!("default_yard = \"elsewhere\"\n{MINIMAL}");
        let bad_speed = format!("[navigation]\nwalking_speed_mps = 0.0\n{MINIMAL}");
        let bad_thresholds = format!("[navigation]\nturn_threshold_deg = 10.0\n{MINIMAL}");
        let unknown_field = format!("[server]\nport = 80\n{MINIMAL}");

        for content in [
            "yards = []",
            unknown_default.as_str(),
            bad_speed.as_str(),
            bad_thresholds.as_str(),
            unknown_field.as_str(),
        ] {
            assert!(
                ServerConfig::from_toml_str(content, Path::new(".")).is_err(),
                "accepted: {content}"
            );
        }
    }
}
