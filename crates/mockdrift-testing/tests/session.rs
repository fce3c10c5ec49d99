use mockdrift_testing::{DriftDetected, MockDriftSession, assert_no_drift};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

const SPEC: &str = r##"
swagger: "2.0"
paths:
  /orders/{id}:
    get:
      responses:
        200:
          schema:
            $ref: "#/definitions/Order"
definitions:
  Order:
    type: object
    required: [id, total]
    properties:
      id: {type: integer}
      total: {type: number}
"##;

fn write_spec(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("swagger.yaml");
    std::fs::write(&path, SPEC).unwrap();
    path
}

fn session(fail: Option<&str>) -> (TempDir, MockDriftSession) {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir);
    let session = MockDriftSession::from_settings(spec.to_str(), fail)
        .unwrap()
        .expect("session with spec");
    (dir, session)
}

#[test]
fn clean_session_finishes() {
    let (_dir, session) = session(Some("1"));
    assert!(session.fail_on_drift());

    let finding = session
        .registry()
        .register("order", &json!({"id": 1, "total": 9.5}), "/orders/{id}");
    assert!(!finding.drifted());
    assert_no_drift!(session.registry());

    session.finish().unwrap();
}

#[test]
fn failing_session_reports_drift() {
    let (_dir, session) = session(Some("true"));
    session
        .registry()
        .register("order_without_total", &json!({"id": 1}), "/orders/{id}");

    let DriftDetected(message) = session.finish().unwrap_err();
    assert!(message.starts_with("MockDrift detected 1 drifted mock(s):"));
    assert!(message.contains("order_without_total"));
    assert!(message.contains("total"));
}

#[test]
fn non_failing_session_tolerates_drift() {
    let (_dir, session) = session(None);
    session
        .registry()
        .register("order_without_total", &json!({"id": 1}), "/orders/{id}");

    assert_eq!(session.registry().drifted().len(), 1);
    session.finish().unwrap();
}

#[test]
#[should_panic(expected = "MockDrift detected 1 drifted mock(s)")]
fn dropping_a_failing_session_panics() {
    let (_dir, session) = session(Some("1"));
    session
        .registry()
        .register("bad", &json!({"id": "one", "total": 1}), "/orders/{id}");
    drop(session);
}
