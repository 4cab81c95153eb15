//! Shared application state for the admission host.
//!
//! Compiles the guard pipeline from config and pairs it with the handler
//! registry. Startup errors are returned, not panicked.

use std::sync::Arc;

use admitgate_core::error::Result;
use admitgate_core::Polarity;

use crate::config::AdmitConfig;
use crate::dispatch::Dispatcher;
use crate::obs::HostMetrics;
use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    pipeline: Arc<Pipeline>,
    dispatcher: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: AdmitConfig,
    metrics: Arc<HostMetrics>,
}

impl AppState {
    pub fn new(cfg: AdmitConfig, dispatcher: Dispatcher) -> Result<Self> {
        let metrics = Arc::new(HostMetrics::default());
        let pipeline = Pipeline::from_config(&cfg, Arc::clone(&metrics))?;

        // include lists <-> dispatcher sanity check
        let registered = dispatcher.registered_operations();
        if !registered.is_empty() {
            for b in &cfg.behaviors {
                if b.scope.polarity != Polarity::Include {
                    continue;
                }
                for op in &b.scope.operations {
                    if !registered.contains(op) {
                        tracing::warn!(behavior=%b.name, operation=%op, "include scope refers to unregistered operation");
                    }
                }
            }
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
            pipeline: Arc::new(pipeline),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn cfg(&self) -> &AdmitConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<HostMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Resolve the handler, run the guards, then call the handler.
    /// Unknown operations are refused before any guard runs.
    pub async fn dispatch(&self, operation: &str, payload: String) -> Result<String> {
        let handler = self.dispatcher.resolve(operation)?;
        self.pipeline
            .run(operation, |ctx| async move { handler.handle(ctx, payload).await })
            .await
    }
}
