use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use admitgate_core::error::{AdmitError, Result};

use crate::guard::RequestCtx;

/// Handler for one remote operation.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    fn operation(&self) -> &str;
    async fn handle(&self, ctx: RequestCtx, payload: String) -> Result<String>;
}

/// Registry of operation handlers, keyed by operation identifier.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<String, Arc<dyn OperationHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn OperationHandler>) {
        self.handlers
            .insert(handler.operation().to_string(), handler);
    }

    pub fn registered_operations(&self) -> Vec<String> {
        self.handlers.iter().map(|e| e.key().clone()).collect()
    }

    pub fn resolve(&self, operation: &str) -> Result<Arc<dyn OperationHandler>> {
        self.handlers
            .get(operation)
            .map(|h| Arc::clone(h.value()))
            .ok_or_else(|| AdmitError::UnknownOperation(operation.to_string()))
    }
}
