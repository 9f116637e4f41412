use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::domain::FeedArtifact;
use crate::store::ArtifactWriter;

/// Writes `<dir>/<category>.json`.
pub struct JsonFileWriter {
    dir: PathBuf,
}

impl JsonFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{}.json", category))
    }
}

impl ArtifactWriter for JsonFileWriter {
    fn write(&self, artifact: &FeedArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(&artifact.category);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", artifact.category));

        let mut body = serde_json::to_vec_pretty(artifact)?;
        body.push(b'\n');

        // Readers only ever see the old document or the complete new one.
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(path = %path.display(), items = artifact.len(), "artifact written");
        Ok(path)
    }
}
