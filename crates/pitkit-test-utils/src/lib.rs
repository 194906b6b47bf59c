//! Utilities shared by pitkit tests.
//!
//! [`TempProject`] materializes a fixture tree on disk; [`samples`] holds the
//! Maven and Gradle projects most integration tests run against.

mod fixture_fs;
pub mod samples;

pub use fixture_fs::*;
