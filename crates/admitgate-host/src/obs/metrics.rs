//! Counter registry for admission outcomes.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering per series.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut lines: Vec<String> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}{{{}}} {}", name, label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
    }
}

#[derive(Default)]
pub struct HostMetrics {
    /// `{behavior, outcome=match|skip}`
    pub decisions: CounterVec,
    /// `{behavior, code}`
    pub rejections: CounterVec,
    /// `{operation}`
    pub deadline_exceeded: CounterVec,
}

impl HostMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.decisions.render("admitgate_decisions_total", &mut out);
        self.rejections.render("admitgate_rejections_total", &mut out);
        self.deadline_exceeded
            .render("admitgate_deadline_exceeded_total", &mut out);
        out
    }
}
