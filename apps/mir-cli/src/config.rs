use anyhow::{Context, Result};
use intent_parser::IntentConfig;
use robot_client::{load_fleet_config, FleetConfig};
use std::fs;
use std::path::Path;

pub fn fleet(path: Option<&Path>) -> Result<FleetConfig> {
    match path {
        Some(p) => load_fleet_config(p),
        None => Ok(FleetConfig::default()),
    }
}

pub fn intent(path: Option<&Path>) -> Result<IntentConfig> {
    let Some(path) = path else {
        return Ok(IntentConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading intent config: {}", path.display()))?;
    let mut cfg: IntentConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing intent config: {}", path.display()))?;
    if !(0.0..=1.0).contains(&cfg.similarity_threshold) {
        anyhow::bail!(
            "similarity_threshold must be within 0..=1, got {}",
            cfg.similarity_threshold
        );
    }
    if !(0.0..=100.0).contains(&cfg.fuzzy_threshold) {
        anyhow::bail!(
            "fuzzy_threshold must be within 0..=100, got {}",
            cfg.fuzzy_threshold
        );
    }
    // lexicon paths are relative to the config file
    if let (Some(lexicon), Some(dir)) = (cfg.lexicon_path.as_ref(), path.parent()) {
        if lexicon.is_relative() {
            cfg.lexicon_path = Some(dir.join(lexicon));
        }
    }
    Ok(cfg)
}
