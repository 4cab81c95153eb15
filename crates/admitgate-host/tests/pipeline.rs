//! Guard pipeline: actions, ordering, and deadlines.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use admitgate_core::error::{AdmitError, ClientCode};
use admitgate_core::{
    AdmissionConfig, AdmissionDecision, OperationScope, PeriodicSampler, RandomSampler, Strategy,
};
use admitgate_host::config;
use admitgate_host::guard::{Guard, GuardAction};
use admitgate_host::obs::HostMetrics;
use admitgate_host::pipeline::Pipeline;

const SELECT: &str = "/pkg.Svc/Select";
const CREATE: &str = "/pkg.Svc/Create";
const UPDATE: &str = "/pkg.Svc/Update";

fn guard(name: &str, scope: OperationScope, strategy: Strategy, action: GuardAction) -> Guard {
    Guard::new(
        AdmissionDecision::new(AdmissionConfig::new(name, scope, strategy)),
        action,
    )
}

fn pipeline(guards: Vec<Guard>) -> Pipeline {
    Pipeline::new(guards, Arc::new(HostMetrics::default()))
}

#[test]
fn periodic_annotation_marks_every_third_request() {
    let p = pipeline(vec![guard(
        "sample",
        OperationScope::exclude([SELECT]),
        Strategy::Periodic(PeriodicSampler::new(3)),
        GuardAction::Annotate,
    )]);

    for _ in 0..3 {
        assert!(p.admit(CREATE).unwrap().is_marked("sample"));
        assert!(!p.admit(CREATE).unwrap().is_marked("sample"));
        assert!(!p.admit(CREATE).unwrap().is_marked("sample"));
    }
    for _ in 0..10 {
        assert!(p.admit(SELECT).unwrap().marks.is_empty());
    }

    let m = p.metrics();
    assert_eq!(m.decisions.get(&[("behavior", "sample"), ("outcome", "match")]), 3);
    assert_eq!(m.decisions.get(&[("behavior", "sample"), ("outcome", "skip")]), 16);
}

#[test]
fn reject_short_circuits_later_guards() {
    let sample = PeriodicSampler::new(2).with_match_first(false);
    let store = Arc::clone(sample.store());
    let p = pipeline(vec![
        guard(
            "block-update",
            OperationScope::include([UPDATE]),
            Strategy::Scope,
            GuardAction::Reject {
                code: ClientCode::Unavailable,
                message: "update disabled".into(),
            },
        ),
        guard(
            "sample",
            OperationScope::exclude([SELECT]),
            Strategy::Periodic(sample),
            GuardAction::Annotate,
        ),
    ]);

    for _ in 0..5 {
        let err = p.admit(UPDATE).expect_err("must reject");
        assert_eq!(err.client_code(), ClientCode::Unavailable);
        assert!(matches!(err, AdmitError::Rejected { ref message, .. } if message == "update disabled"));
    }
    // The periodic guard never saw the rejected calls.
    assert!(!store.contains(UPDATE));

    assert!(!p.admit(CREATE).unwrap().is_marked("sample"));
    assert!(p.admit(CREATE).unwrap().is_marked("sample"));
    assert_eq!(
        p.metrics()
            .rejections
            .get(&[("behavior", "block-update"), ("code", "UNAVAILABLE")]),
        5
    );
}

#[test]
fn chaos_pass_rate_blocks_or_passes() {
    let open = pipeline(vec![guard(
        "chaos",
        OperationScope::exclude([SELECT]),
        Strategy::Random(RandomSampler::pass_rate(1.0)),
        GuardAction::Reject {
            code: ClientCode::Unavailable,
            message: "random unavailable".into(),
        },
    )]);
    assert!((0..100).all(|_| open.admit(CREATE).is_ok()));

    let closed = pipeline(vec![guard(
        "chaos",
        OperationScope::exclude([SELECT]),
        Strategy::Random(RandomSampler::pass_rate(0.0)),
        GuardAction::Reject {
            code: ClientCode::Unavailable,
            message: "random unavailable".into(),
        },
    )]);
    assert!((0..100).all(|_| closed.admit(CREATE).is_err()));
    assert!((0..100).all(|_| closed.admit(SELECT).is_ok()));
}

#[test]
fn timeouts_keep_the_shortest_deadline() {
    let p = pipeline(vec![
        guard(
            "slow",
            OperationScope::exclude(Vec::<String>::new()),
            Strategy::Scope,
            GuardAction::Timeout(Duration::from_millis(500)),
        ),
        guard(
            "fast",
            OperationScope::include([CREATE]),
            Strategy::Scope,
            GuardAction::Timeout(Duration::from_millis(50)),
        ),
    ]);
    assert_eq!(p.admit(CREATE).unwrap().deadline, Some(Duration::from_millis(50)));
    assert_eq!(p.admit(SELECT).unwrap().deadline, Some(Duration::from_millis(500)));
}

#[tokio::test]
async fn run_enforces_deadline() {
    let p = pipeline(vec![guard(
        "fast",
        OperationScope::exclude([SELECT]),
        Strategy::Scope,
        GuardAction::Timeout(Duration::from_millis(20)),
    )]);

    let err = p
        .run(CREATE, |_ctx| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok("late")
        })
        .await
        .expect_err("must time out");
    assert_eq!(err.client_code(), ClientCode::DeadlineExceeded);
    assert_eq!(
        p.metrics().deadline_exceeded.get(&[("operation", CREATE)]),
        1
    );

    // Excluded operation keeps no deadline and finishes.
    let ok = p
        .run(SELECT, |ctx| async move {
            assert!(ctx.deadline.is_none());
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok("done")
        })
        .await
        .unwrap();
    assert_eq!(ok, "done");
}

#[tokio::test]
async fn run_skips_handler_on_reject() {
    let p = pipeline(vec![guard(
        "deny",
        OperationScope::include([CREATE]),
        Strategy::Scope,
        GuardAction::Reject {
            code: ClientCode::Unauthenticated,
            message: "token required".into(),
        },
    )]);
    let ran = AtomicBool::new(false);
    let err = p
        .run(CREATE, |_ctx| async {
            ran.store(true, Ordering::SeqCst);
            Ok::<(), AdmitError>(())
        })
        .await
        .expect_err("must reject");
    assert_eq!(err.client_code(), ClientCode::Unauthenticated);
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn from_config_builds_guards_in_order() {
    let cfg = config::load_from_str(
        r#"
version: 1
behaviors:
  - name: sample
    scope: { polarity: include, operations: ["/pkg.Svc/Create"] }
    strategy: { kind: periodic, period: 2, match_first: false }
    action: { kind: annotate }
  - name: gate
    scope: { polarity: include, operations: ["/pkg.Svc/Update"] }
    strategy: { kind: scope }
    action: { kind: reject, code: RATE_LIMITED }
"#,
    )
    .unwrap();
    let p = Pipeline::from_config(&cfg, Arc::new(HostMetrics::default())).unwrap();
    let names: Vec<&str> = p.guards().iter().map(|g| g.name()).collect();
    assert_eq!(names, ["sample", "gate"]);

    assert!(!p.admit(CREATE).unwrap().is_marked("sample"));
    assert!(p.admit(CREATE).unwrap().is_marked("sample"));

    let err = p.admit(UPDATE).expect_err("must reject");
    assert_eq!(err.client_code(), ClientCode::RateLimited);
    assert_eq!(err.to_string(), "rejected (RATE_LIMITED): gate: rate_limited");
}

#[test]
fn metrics_render_prometheus_text() {
    let p = pipeline(vec![guard(
        "trace",
        OperationScope::include([CREATE]),
        Strategy::Scope,
        GuardAction::Annotate,
    )]);
    p.admit(CREATE).unwrap();
    p.admit(SELECT).unwrap();
    let text = p.metrics().render();
    assert!(text.contains("# TYPE admitgate_decisions_total counter"));
    assert!(text.contains("admitgate_decisions_total{behavior=\"trace\",outcome=\"match\"} 1"));
    assert!(text.contains("admitgate_decisions_total{behavior=\"trace\",outcome=\"skip\"} 1"));
}
