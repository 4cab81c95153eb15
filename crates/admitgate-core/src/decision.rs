//! Admission decision: scope check first, then exactly one sampling strategy.
//!
//! The scope check short-circuits. An out-of-scope call never reaches the
//! sampler, so periodic counters only advance for in-scope operations.
//!
//! Logging and spans are side channels. They never affect the returned
//! boolean.

use tracing::{debug, info, info_span};

use crate::sampling::{PeriodicOutcome, PeriodicSampler, RandomSampler};
use crate::scope::OperationScope;

const DEFAULT_SPAN_SUFFIX: &str = "-match";

/// Sampling strategy applied to in-scope operations.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Every in-scope call matches.
    Scope,
    Random(RandomSampler),
    Periodic(PeriodicSampler),
}

impl Strategy {
    /// Span name used by `AdmissionConfig::with_default_span_name`.
    pub fn default_span_name(&self) -> &'static str {
        match self {
            Strategy::Scope => "match-scope",
            Strategy::Random(s) if s.is_inverted() => "pass-random",
            Strategy::Random(_) => "match-random",
            Strategy::Periodic(_) => "match-period",
        }
    }
}

/// Construction-time options for one behavior's decision.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    name: String,
    scope: OperationScope,
    strategy: Strategy,
    span_name: Option<String>,
    span_suffix: String,
    debug: bool,
}

impl AdmissionConfig {
    pub fn new(name: impl Into<String>, scope: OperationScope, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            scope,
            strategy,
            span_name: None,
            span_suffix: DEFAULT_SPAN_SUFFIX.to_string(),
            debug: false,
        }
    }

    /// Log every decision and dump the scope at construction.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Run each decision inside a span. Empty name disables it.
    pub fn with_span_name(mut self, span_name: impl Into<String>) -> Self {
        let span_name = span_name.into();
        self.span_name = (!span_name.is_empty()).then_some(span_name);
        self
    }

    pub fn with_default_span_name(self) -> Self {
        let name = self.strategy.default_span_name();
        self.with_span_name(name)
    }

    pub fn with_span_suffix(mut self, span_suffix: impl Into<String>) -> Self {
        self.span_suffix = span_suffix.into();
        self
    }
}

#[derive(Debug)]
pub struct AdmissionDecision {
    name: String,
    scope: OperationScope,
    strategy: Strategy,
    span: Option<String>,
    debug: bool,
}

impl AdmissionDecision {
    pub fn new(cfg: AdmissionConfig) -> Self {
        match &cfg.strategy {
            Strategy::Scope => info!(
                behavior = %cfg.name,
                polarity = cfg.scope.polarity().as_str(),
                operations = cfg.scope.len(),
                "admission decision ready (scope)"
            ),
            Strategy::Random(s) => info!(
                behavior = %cfg.name,
                polarity = cfg.scope.polarity().as_str(),
                operations = cfg.scope.len(),
                rate = s.rate(),
                inverted = s.is_inverted(),
                "admission decision ready (random)"
            ),
            Strategy::Periodic(s) => info!(
                behavior = %cfg.name,
                polarity = cfg.scope.polarity().as_str(),
                operations = cfg.scope.len(),
                period = s.period(),
                match_first = s.match_first(),
                "admission decision ready (periodic)"
            ),
        }
        if cfg.debug {
            let dump = serde_json::to_string(&cfg.scope).unwrap_or_default();
            debug!(behavior = %cfg.name, scope = %dump, "admission scope");
        }

        let span = cfg.span_name.map(|n| format!("{n}{}", cfg.span_suffix));
        Self {
            name: cfg.name,
            scope: cfg.scope,
            strategy: cfg.strategy,
            span,
            debug: cfg.debug,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &OperationScope {
        &self.scope
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// `scope.matches(op) && strategy.decide(op)`, scope first.
    pub fn decide(&self, operation: &str) -> bool {
        let _entered = self
            .span
            .as_deref()
            .map(|span| info_span!("admission", behavior = %self.name, span).entered());

        if !self.scope.matches(operation) {
            if self.debug {
                debug!(behavior = %self.name, operation, polarity = self.scope.polarity().as_str(), "skip -- out of scope");
            }
            return false;
        }

        match &self.strategy {
            Strategy::Scope => {
                if self.debug {
                    debug!(behavior = %self.name, operation, "next -> scope matched");
                }
                true
            }
            Strategy::Random(sampler) => {
                let matched = sampler.decide();
                if self.debug {
                    if matched {
                        debug!(behavior = %self.name, operation, "next -> random matched");
                    } else {
                        debug!(behavior = %self.name, operation, "skip -- random skipped");
                    }
                }
                matched
            }
            Strategy::Periodic(sampler) => {
                let outcome = sampler.evaluate(operation);
                if self.debug {
                    match outcome {
                        PeriodicOutcome::First => {
                            debug!(behavior = %self.name, operation, "next -> match first (count=0)")
                        }
                        PeriodicOutcome::Matched => {
                            debug!(behavior = %self.name, operation, "next -> period matched (count=0)")
                        }
                        PeriodicOutcome::Skipped(count) => {
                            debug!(behavior = %self.name, operation, count, "skip -- period skipped")
                        }
                    }
                }
                outcome.is_match()
            }
        }
    }
}
