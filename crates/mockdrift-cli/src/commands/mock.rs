//! `mockdrift mock` command implementation

use crate::error::CliError;
use mockdrift_core::{Coordinates, DriftConfig, DriftFinding, MockDriftDetector};
use std::path::Path;

pub fn run(
    payload: &Path,
    coords: &Coordinates,
    name: Option<&str>,
    config: &DriftConfig,
) -> Result<Vec<DriftFinding>, CliError> {
    let detector = MockDriftDetector::load(config.require_spec()?)?;
    let name = name.map(str::to_string).unwrap_or_else(|| {
        payload
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| payload.display().to_string())
    });

    let finding = detector.check_mock_file(&name, payload, coords)?;
    Ok(vec![finding])
}
