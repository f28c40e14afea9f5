//! Filesystem-backed release of scratch artefacts.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use marathon_core::ArtifactCleaner;
use marathon_fs::remove_path;

/// Deletes scratch artefacts beneath an extraction workspace.
///
/// Relative artefact paths resolve against the workspace; absolute paths are
/// used as given. Artefacts already gone count as released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsArtifactCleaner {
    workspace: Utf8PathBuf,
}

impl FsArtifactCleaner {
    /// Clean artefacts beneath `workspace`.
    #[must_use]
    pub fn new(workspace: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    /// Workspace artefacts are resolved against.
    #[must_use]
    pub fn workspace(&self) -> &Utf8Path {
        &self.workspace
    }
}

impl ArtifactCleaner for FsArtifactCleaner {
    type Error = io::Error;

    fn release(&self, artifact: &Utf8Path) -> Result<(), io::Error> {
        remove_path(&self.workspace.join(artifact))
    }
}
