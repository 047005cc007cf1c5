use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Map the built-in MiR robots were commissioned on.
const DEFAULT_MAP: &str = "/v2.0.0/maps/6bad8aa5-b6e0-11ef-9eaa-b46921170fcf";

/// One robot the client can talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotProfile {
    /// Model name, also the primary selector token (e.g. "mir200").
    pub name: String,
    /// Nicknames operators may say instead of the model name.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// REST API root, e.g. `http://10.0.0.5/api/v2.0.0/`.
    pub base_url: String,
    /// Position `type_id`s that count as navigable targets.
    #[serde(default)]
    pub position_type_ids: Vec<u32>,
    /// Only keep positions on this map when set.
    #[serde(default)]
    pub map: Option<String>,
}

impl RobotProfile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let name = name.into();
        let position_type_ids = Self::default_type_ids(&name);
        Self {
            name,
            aliases: Vec::new(),
            base_url: base_url.into(),
            position_type_ids,
            map: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }

    /// Plain positions are type 0 on every model; the charger type differs.
    pub fn default_type_ids(model: &str) -> Vec<u32> {
        match model {
            "mir100" | "mir200" => vec![0, 7],
            _ => vec![0, 20],
        }
    }

    /// Whether `token` names this robot (case-insensitive).
    pub fn matches(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
    }

    pub fn accepts_position(&self, type_id: u32, map: Option<&str>) -> bool {
        if !self.position_type_ids.is_empty() && !self.position_type_ids.contains(&type_id) {
            return false;
        }
        match (&self.map, map) {
            (Some(want), Some(have)) => want == have,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Robots reachable from this host plus shared request settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    pub robots: Vec<RobotProfile>,
    /// Robot selected at startup; the first profile when unset.
    #[serde(default)]
    pub default_robot: Option<String>,
    /// Value of the `Authorization` header sent with every request.
    #[serde(default)]
    pub authorization: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            robots: vec![
                RobotProfile::new("mir200", "http://10.52.17.100/api/v2.0.0/")
                    .with_alias("superman")
                    .with_map(DEFAULT_MAP),
                RobotProfile::new("mir250", "http://10.52.17.21/api/v2.0.0/")
                    .with_alias("batman")
                    .with_map(DEFAULT_MAP),
            ],
            default_robot: Some("mir200".to_string()),
            authorization: None,
            language: default_language(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl FleetConfig {
    /// Find the profile a selector token refers to.
    pub fn find_robot(&self, token: &str) -> Option<&RobotProfile> {
        self.robots.iter().find(|r| r.matches(token))
    }

    pub fn initial_robot(&self) -> Option<&RobotProfile> {
        match &self.default_robot {
            Some(name) => self.find_robot(name),
            None => self.robots.first(),
        }
    }
}

pub fn load_fleet_config(path: impl AsRef<Path>) -> anyhow::Result<FleetConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading fleet config: {}", path.display()))?;
    let cfg: FleetConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing fleet config: {}", path.display()))?;
    if cfg.robots.is_empty() {
        anyhow::bail!("fleet config {} lists no robots", path.display());
    }
    if let Some(name) = &cfg.default_robot {
        if cfg.find_robot(name).is_none() {
            anyhow::bail!("default robot '{}' is not in {}", name, path.display());
        }
    }
    Ok(cfg)
}
