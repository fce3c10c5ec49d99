//! CLI command implementations

pub mod cassette;
pub mod mock;
