//! Admission config loader (strict parsing).

pub mod schema;

use std::fs;

use admitgate_core::error::{AdmitError, Result};

pub use schema::{ActionConfig, AdmitConfig, BehaviorConfig, ScopeConfig, StrategyConfig};

pub fn load_from_file(path: &str) -> Result<AdmitConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AdmitError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AdmitConfig> {
    let cfg: AdmitConfig = serde_yaml::from_str(s)
        .map_err(|e| AdmitError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
