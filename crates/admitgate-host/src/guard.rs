//! Guards: an admission decision paired with the action it gates.

use std::time::Duration;

use admitgate_core::error::ClientCode;
use admitgate_core::AdmissionDecision;

/// What a guard does when its decision is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Mark the request with the behavior name and proceed.
    Annotate,
    /// Fail the request.
    Reject { code: ClientCode, message: String },
    /// Shorten the request deadline. Never extends it.
    Timeout(Duration),
}

/// Per-request context built up while guards run.
#[derive(Debug, Clone)]
pub struct RequestCtx {
    pub operation: String,
    /// Names of annotate behaviors that activated, in guard order.
    pub marks: Vec<String>,
    pub deadline: Option<Duration>,
}

impl RequestCtx {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            marks: Vec::new(),
            deadline: None,
        }
    }

    pub fn is_marked(&self, behavior: &str) -> bool {
        self.marks.iter().any(|m| m == behavior)
    }

    /// Keep the shorter of the current and the new deadline.
    pub fn tighten_deadline(&mut self, timeout: Duration) {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(timeout),
            None => timeout,
        });
    }
}

pub struct Guard {
    decision: AdmissionDecision,
    action: GuardAction,
}

impl Guard {
    pub fn new(decision: AdmissionDecision, action: GuardAction) -> Self {
        Self { decision, action }
    }

    pub fn name(&self) -> &str {
        self.decision.name()
    }

    pub fn decision(&self) -> &AdmissionDecision {
        &self.decision
    }

    pub fn action(&self) -> &GuardAction {
        &self.action
    }

    /// The action to apply for `operation`, or `None` when the guard stays idle.
    pub fn check(&self, operation: &str) -> Option<&GuardAction> {
        self.decision.decide(operation).then_some(&self.action)
    }
}
