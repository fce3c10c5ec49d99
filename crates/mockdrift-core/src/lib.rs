//! MockDrift Core
//!
//! Detects mocks and recorded HTTP cassettes that no longer match the
//! response schemas of an OpenAPI 3.x or Swagger 2.0 document.
//!
//! ```rust,ignore
//! use mockdrift_core::{Coordinates, MockDriftDetector};
//! use serde_json::json;
//!
//! let detector = MockDriftDetector::load("openapi.yaml")?;
//! let finding = detector.check_mock(
//!     "user_by_id",
//!     &json!({"id": 1, "email": "a@b.com"}),
//!     &Coordinates::new("/users/{id}"),
//! );
//! assert!(!finding.drifted());
//! ```

// error module
pub mod error;

// config module
pub mod config;

// document loading
pub mod loader;

// spec model, reference resolution and schema lookup
pub mod locator;
pub mod resolver;
pub mod spec;

// validation and findings
pub mod finding;
pub mod validator;

// checks
pub mod cassette;
pub mod detector;

// report rendering
pub mod report;

pub use cassette::{CassetteDriftChecker, ExtraKeyPolicy, Interaction};
pub use config::{ConfigError, DriftConfig};
pub use detector::MockDriftDetector;
pub use error::{DriftError, DriftResult};
pub use finding::{CassetteOrigin, DriftFinding, KeysDiff};
pub use locator::{Coordinates, LocatedSchema};
pub use report::ReportFormat;
pub use resolver::{DefinitionTable, RefResolution, SchemaDialect};
pub use spec::SpecDocument;
pub use validator::{StructuralValidator, ViolationMode};
