//! Guard pipeline runtime.
//! Compile once at startup from config, then share via Arc.
//!
//! Guards run in config order. A reject stops the chain, so later guards are
//! not consulted and their periodic counters do not advance. Annotations
//! accumulate; timeouts keep the shortest deadline.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use admitgate_core::error::{AdmitError, Result};
use admitgate_core::AdmissionDecision;

use crate::config::AdmitConfig;
use crate::guard::{Guard, GuardAction, RequestCtx};
use crate::obs::HostMetrics;

pub struct Pipeline {
    guards: Vec<Guard>,
    metrics: Arc<HostMetrics>,
}

impl Pipeline {
    pub fn new(guards: Vec<Guard>, metrics: Arc<HostMetrics>) -> Self {
        Self { guards, metrics }
    }

    pub fn from_config(cfg: &AdmitConfig, metrics: Arc<HostMetrics>) -> Result<Self> {
        cfg.validate()?;
        let guards = cfg
            .behaviors
            .iter()
            .map(|b| {
                let decision = AdmissionDecision::new(b.admission_config(cfg.debug));
                Guard::new(decision, b.action.compile(&b.name))
            })
            .collect();
        Ok(Self::new(guards, metrics))
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn metrics(&self) -> &Arc<HostMetrics> {
        &self.metrics
    }

    /// Run every guard for `operation` and return the resulting context, or
    /// the first rejection.
    pub fn admit(&self, operation: &str) -> Result<RequestCtx> {
        let mut ctx = RequestCtx::new(operation);
        for guard in &self.guards {
            let Some(action) = guard.check(operation) else {
                self.metrics
                    .decisions
                    .inc(&[("behavior", guard.name()), ("outcome", "skip")]);
                continue;
            };
            self.metrics
                .decisions
                .inc(&[("behavior", guard.name()), ("outcome", "match")]);

            match action {
                GuardAction::Annotate => ctx.marks.push(guard.name().to_string()),
                GuardAction::Reject { code, message } => {
                    self.metrics
                        .rejections
                        .inc(&[("behavior", guard.name()), ("code", code.as_str())]);
                    debug!(behavior = guard.name(), operation, code = code.as_str(), "request rejected");
                    return Err(AdmitError::Rejected {
                        code: *code,
                        message: message.clone(),
                    });
                }
                GuardAction::Timeout(timeout) => ctx.tighten_deadline(*timeout),
            }
        }
        Ok(ctx)
    }

    /// Admit `operation`, then run `next` under the admitted deadline.
    pub async fn run<T, F, Fut>(&self, operation: &str, next: F) -> Result<T>
    where
        F: FnOnce(RequestCtx) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ctx = self.admit(operation)?;
        match ctx.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, next(ctx)).await {
                Ok(res) => res,
                Err(_) => {
                    self.metrics
                        .deadline_exceeded
                        .inc(&[("operation", operation)]);
                    Err(AdmitError::DeadlineExceeded)
                }
            },
            None => next(ctx).await,
        }
    }
}
