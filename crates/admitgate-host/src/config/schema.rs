use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use admitgate_core::error::{AdmitError, ClientCode, Result};
use admitgate_core::{
    AdmissionConfig, OperationScope, PeriodicSampler, Polarity, RandomSampler, Strategy,
};

use crate::guard::GuardAction;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmitConfig {
    pub version: u32,

    /// Default debug flag for behaviors that do not set their own.
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub behaviors: Vec<BehaviorConfig>,
}

impl AdmitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AdmitError::UnsupportedVersion);
        }
        if self.behaviors.is_empty() {
            return Err(AdmitError::BadRequest("behaviors must not be empty".into()));
        }

        let mut names = HashSet::new();
        for b in &self.behaviors {
            b.validate()?;
            if !names.insert(b.name.as_str()) {
                return Err(AdmitError::BadRequest(format!(
                    "duplicate behavior name: {}",
                    b.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BehaviorConfig {
    pub name: String,
    pub scope: ScopeConfig,
    pub strategy: StrategyConfig,
    pub action: ActionConfig,

    /// Span name; unset disables per-decision spans.
    #[serde(default)]
    pub span: Option<String>,

    #[serde(default)]
    pub span_suffix: Option<String>,

    #[serde(default)]
    pub debug: Option<bool>,
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdmitError::BadRequest("behavior name must not be empty".into()));
        }
        if self.scope.operations.iter().any(|op| op.is_empty()) {
            return Err(AdmitError::BadRequest(format!(
                "behaviors.{}.scope.operations must not contain empty entries",
                self.name
            )));
        }
        if let StrategyConfig::Random { rate, .. } = self.strategy {
            if !rate.is_finite() {
                return Err(AdmitError::BadRequest(format!(
                    "behaviors.{}.strategy.rate must be a finite number",
                    self.name
                )));
            }
        }
        if let ActionConfig::Timeout { ms } = self.action {
            if ms == 0 {
                return Err(AdmitError::BadRequest(format!(
                    "behaviors.{}.action.ms must be greater than 0",
                    self.name
                )));
            }
        }
        if matches!(&self.span, Some(s) if s.is_empty()) {
            return Err(AdmitError::BadRequest(format!(
                "behaviors.{}.span must not be empty when set",
                self.name
            )));
        }
        Ok(())
    }

    /// Compile into core decision options. `default_debug` comes from the
    /// top-level config.
    pub fn admission_config(&self, default_debug: bool) -> AdmissionConfig {
        let scope = OperationScope::new(self.scope.polarity, self.scope.operations.iter().cloned());
        let mut cfg = AdmissionConfig::new(self.name.clone(), scope, self.strategy.compile())
            .with_debug(self.debug.unwrap_or(default_debug));
        if let Some(span) = &self.span {
            cfg = cfg.with_span_name(span.clone());
        }
        if let Some(suffix) = &self.span_suffix {
            cfg = cfg.with_span_suffix(suffix.clone());
        }
        cfg
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    pub polarity: Polarity,
    #[serde(default)]
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StrategyConfig {
    /// Every in-scope call.
    Scope,
    Random {
        rate: f64,
        /// Treat `rate` as the pass-through probability.
        #[serde(default)]
        invert: bool,
    },
    Periodic {
        period: u32,
        #[serde(default = "default_match_first")]
        match_first: bool,
    },
}

impl StrategyConfig {
    pub fn compile(self) -> Strategy {
        match self {
            StrategyConfig::Scope => Strategy::Scope,
            StrategyConfig::Random { rate, invert: false } => {
                Strategy::Random(RandomSampler::new(rate))
            }
            StrategyConfig::Random { rate, invert: true } => {
                Strategy::Random(RandomSampler::pass_rate(rate))
            }
            StrategyConfig::Periodic {
                period,
                match_first,
            } => Strategy::Periodic(PeriodicSampler::new(period).with_match_first(match_first)),
        }
    }
}

fn default_match_first() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ActionConfig {
    Annotate,
    Reject {
        code: ClientCode,
        #[serde(default)]
        message: Option<String>,
    },
    Timeout {
        ms: u64,
    },
}

impl ActionConfig {
    pub fn compile(&self, behavior: &str) -> GuardAction {
        match self {
            ActionConfig::Annotate => GuardAction::Annotate,
            ActionConfig::Reject { code, message } => GuardAction::Reject {
                code: *code,
                message: message
                    .clone()
                    .unwrap_or_else(|| format!("{behavior}: {}", code.as_str().to_lowercase())),
            },
            ActionConfig::Timeout { ms } => GuardAction::Timeout(Duration::from_millis(*ms)),
        }
    }
}
