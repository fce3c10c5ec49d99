//! MockDrift Testing Framework
//!
//! Check mock payloads against an OpenAPI spec from inside a test suite and
//! fail the test when any of them drifted.
//!
//! ```rust,ignore
//! use mockdrift_testing::MockDriftSession;
//! use serde_json::json;
//!
//! #[test]
//! fn user_mocks_match_the_api() {
//!     // Skipped unless MOCKDRIFT_SPEC points at a spec.
//!     let Some(session) = MockDriftSession::from_env().unwrap() else { return };
//!     session.registry().register("user", &json!({"id": 1, "email": "a@b"}), "/users/{id}");
//!     session.finish().unwrap();
//! }
//! ```

pub mod registry;
pub mod session;

pub use registry::MockRegistry;
pub use session::{DriftDetected, FAIL_ENV, MockDriftSession, SPEC_ENV};

#[macro_export]
macro_rules! assert_no_drift {
    ($registry:expr) => {
        if let Some(message) = $registry.failure_message() {
            panic!("{}", message);
        }
    };
}
