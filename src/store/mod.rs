pub mod json;

use std::path::PathBuf;

use crate::app::Result;
use crate::domain::FeedArtifact;

pub use json::JsonFileWriter;

/// Persists finished artifacts for downstream rendering.
///
/// Every write replaces the category's previous artifact wholesale.
pub trait ArtifactWriter {
    fn write(&self, artifact: &FeedArtifact) -> Result<PathBuf>;
}
